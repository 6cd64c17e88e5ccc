use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use ledger_core::db::CreditDb;
use ledger_core::record::CreditRecord;
use ledger_core::types::PlanTier;
use ledger_core::{ConsumeOutcome, Ledger};
use std::str::FromStr;

#[derive(Subcommand)]
pub enum CreditSubcommand {
    /// Create (or re-seed on plan change) a user's credit record
    Init {
        user: String,
        /// Plan tier: free, explorer, builder, or accelerator
        #[arg(long, default_value = "free")]
        plan: String,
    },
    /// Show a user's balance and usage
    Status { user: String },
    /// Spend one credit
    Consume { user: String },
    /// Grant purchased credits on top of the current balance
    Grant { user: String, credits: i64 },
    /// List all credit records
    List,
}

pub fn run(ledger: &Ledger<CreditDb>, subcmd: CreditSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CreditSubcommand::Init { user, plan } => init(ledger, &user, &plan, json),
        CreditSubcommand::Status { user } => status(ledger, &user, json),
        CreditSubcommand::Consume { user } => consume(ledger, &user, json),
        CreditSubcommand::Grant { user, credits } => grant(ledger, &user, credits, json),
        CreditSubcommand::List => list(ledger, json),
    }
}

fn init(ledger: &Ledger<CreditDb>, user: &str, plan: &str, json: bool) -> anyhow::Result<()> {
    // Unlike the HTTP surface, the CLI rejects typo'd tier names.
    let tier = PlanTier::from_str(plan)?;
    let record = ledger
        .initialize(user, tier)
        .with_context(|| format!("failed to initialize credits for '{user}'"))?;

    if json {
        print_json(&record)?;
    } else {
        println!(
            "Initialized {user} on plan '{tier}': {} credits",
            record.remaining_credits
        );
    }
    Ok(())
}

fn status(ledger: &Ledger<CreditDb>, user: &str, json: bool) -> anyhow::Result<()> {
    let record = ledger.balance(user)?;

    if json {
        print_json(&record)?;
        return Ok(());
    }

    println!("User: {}", record.user_id);
    println!("Remaining: {}", record.remaining_credits);
    println!("Used (lifetime): {}", record.total_used_credits);
    if record.monthly_credits > 0 {
        println!("Allotment: {} / month", record.monthly_credits);
    } else {
        println!("Allotment: {} / day", record.daily_credits);
    }
    Ok(())
}

fn consume(ledger: &Ledger<CreditDb>, user: &str, json: bool) -> anyhow::Result<()> {
    let outcome = ledger.consume(user)?;

    if json {
        let body = match outcome {
            ConsumeOutcome::Consumed { remaining_credits } => {
                serde_json::json!({"success": true, "remainingCredits": remaining_credits})
            }
            ConsumeOutcome::Insufficient => {
                serde_json::json!({"success": false, "needMoreCredits": true})
            }
        };
        return print_json(&body);
    }

    match outcome {
        ConsumeOutcome::Consumed { remaining_credits } => {
            println!("Consumed 1 credit for {user} ({remaining_credits} remaining)");
        }
        ConsumeOutcome::Insufficient => {
            println!("Insufficient credits for {user}. Run: ledger pack purchase {user} <pack-id>");
        }
    }
    Ok(())
}

fn grant(ledger: &Ledger<CreditDb>, user: &str, credits: i64, json: bool) -> anyhow::Result<()> {
    let record = ledger
        .add_credits(user, credits)
        .with_context(|| format!("failed to grant credits to '{user}'"))?;

    if json {
        print_json(&record)?;
    } else {
        println!(
            "Granted {credits} credits to {user} ({} remaining)",
            record.remaining_credits
        );
    }
    Ok(())
}

fn list(ledger: &Ledger<CreditDb>, json: bool) -> anyhow::Result<()> {
    let records = ledger.records()?;

    if json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No credit records yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records.iter().map(record_row).collect();
    print_table(&["USER", "REMAINING", "DAILY", "MONTHLY", "USED"], rows);
    Ok(())
}

fn record_row(rec: &CreditRecord) -> Vec<String> {
    vec![
        rec.user_id.clone(),
        rec.remaining_credits.to_string(),
        rec.daily_credits.to_string(),
        rec.monthly_credits.to_string(),
        rec.total_used_credits.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::config::LedgerConfig;
    use tempfile::TempDir;

    fn make_ledger(dir: &TempDir) -> Ledger<CreditDb> {
        let db = CreditDb::open(&dir.path().join("ledger.redb")).unwrap();
        Ledger::new(db, LedgerConfig::default())
    }

    #[test]
    fn init_then_grant_updates_balance() {
        let dir = TempDir::new().unwrap();
        let ledger = make_ledger(&dir);

        run(
            &ledger,
            CreditSubcommand::Init {
                user: "u1".to_string(),
                plan: "free".to_string(),
            },
            false,
        )
        .unwrap();
        run(
            &ledger,
            CreditSubcommand::Grant {
                user: "u1".to_string(),
                credits: 50,
            },
            true,
        )
        .unwrap();

        assert_eq!(ledger.balance("u1").unwrap().remaining_credits, 60);
    }

    #[test]
    fn init_rejects_unknown_tier() {
        let dir = TempDir::new().unwrap();
        let ledger = make_ledger(&dir);

        let result = run(
            &ledger,
            CreditSubcommand::Init {
                user: "u1".to_string(),
                plan: "platinum".to_string(),
            },
            false,
        );
        assert!(result.is_err());
        // Rejected init must not create a record as a side effect
        assert_eq!(ledger.records().unwrap().len(), 0);
    }

    #[test]
    fn consume_succeeds_on_empty_balance_without_error() {
        let dir = TempDir::new().unwrap();
        let ledger = make_ledger(&dir);
        ledger
            .initialize("u1", PlanTier::from_str("free").unwrap())
            .unwrap();
        for _ in 0..10 {
            ledger.consume("u1").unwrap();
        }

        // Insufficient balance is an outcome, not a CLI failure
        run(
            &ledger,
            CreditSubcommand::Consume {
                user: "u1".to_string(),
            },
            true,
        )
        .unwrap();
        assert_eq!(ledger.balance("u1").unwrap().remaining_credits, 0);
    }
}
