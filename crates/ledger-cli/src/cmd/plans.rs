use crate::output::{print_json, print_table};
use ledger_core::config::LedgerConfig;
use ledger_core::types::PlanTier;

pub fn run(config: &LedgerConfig, json: bool) -> anyhow::Result<()> {
    if json {
        let plans: Vec<_> = PlanTier::all()
            .iter()
            .map(|&tier| {
                let a = config.allotment_for(tier);
                serde_json::json!({
                    "tier": tier.as_str(),
                    "daily": a.daily,
                    "monthly": a.monthly,
                })
            })
            .collect();
        return print_json(&plans);
    }

    let rows: Vec<Vec<String>> = PlanTier::all()
        .iter()
        .map(|&tier| {
            let a = config.allotment_for(tier);
            vec![
                tier.to_string(),
                a.daily.to_string(),
                a.monthly.to_string(),
            ]
        })
        .collect();
    print_table(&["TIER", "DAILY", "MONTHLY"], rows);
    Ok(())
}
