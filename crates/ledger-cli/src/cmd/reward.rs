use crate::output::{print_json, print_table};
use clap::Subcommand;
use ledger_core::db::CreditDb;
use ledger_core::Ledger;

#[derive(Subcommand)]
pub enum RewardSubcommand {
    /// Show a user's XP total and award history
    Show { user: String },
    /// Award XP for a completed step (no-op if already awarded)
    Award {
        user: String,
        step: String,
        amount: i64,
    },
}

pub fn run(ledger: &Ledger<CreditDb>, subcmd: RewardSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        RewardSubcommand::Show { user } => show(ledger, &user, json),
        RewardSubcommand::Award { user, step, amount } => award(ledger, &user, &step, amount, json),
    }
}

fn show(ledger: &Ledger<CreditDb>, user: &str, json: bool) -> anyhow::Result<()> {
    let rewards = ledger.rewards(user)?;

    if json {
        return print_json(&rewards);
    }

    println!("User:     {}", rewards.user_id);
    println!("Total XP: {}", rewards.total_xp);
    if !rewards.history.is_empty() {
        let rows: Vec<Vec<String>> = rewards
            .history
            .iter()
            .map(|a| {
                vec![
                    a.awarded_at.to_string(),
                    a.step.clone(),
                    a.amount.to_string(),
                ]
            })
            .collect();
        print_table(&["DATE", "STEP", "XP"], rows);
    }
    Ok(())
}

fn award(
    ledger: &Ledger<CreditDb>,
    user: &str,
    step: &str,
    amount: i64,
    json: bool,
) -> anyhow::Result<()> {
    let already = ledger.rewards(user)?.has_step(step);
    let rewards = ledger.award_xp(user, step, amount)?;
    let awarded = !already;

    if json {
        print_json(&serde_json::json!({
            "awarded": awarded,
            "totalXp": rewards.total_xp,
        }))?;
    } else if awarded {
        println!("Awarded {amount} XP for '{step}' (total: {})", rewards.total_xp);
    } else {
        println!("'{step}' already rewarded (total: {})", rewards.total_xp);
    }
    Ok(())
}
