use crate::output::print_json;
use chrono::Utc;
use ledger_core::db::CreditDb;
use ledger_core::Ledger;

pub fn run(ledger: &Ledger<CreditDb>, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    let updated = ledger.refill(now)?;

    if json {
        print_json(&serde_json::json!({
            "success": true,
            "updatedCount": updated,
            "timestamp": now.timestamp(),
        }))?;
    } else {
        println!("Refilled {updated} record(s)");
    }
    Ok(())
}
