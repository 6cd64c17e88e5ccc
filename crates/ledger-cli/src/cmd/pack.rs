use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use ledger_core::db::CreditDb;
use ledger_core::Ledger;

#[derive(Subcommand)]
pub enum PackSubcommand {
    /// List the purchasable pack catalog
    List,
    /// Apply a completed pack purchase to a user
    Purchase {
        user: String,
        pack_id: String,
        /// Payment processor reference (payment intent id)
        #[arg(long, default_value = "manual")]
        payment_ref: String,
    },
    /// Show a user's purchase history, newest first
    History { user: String },
}

pub fn run(ledger: &Ledger<CreditDb>, subcmd: PackSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PackSubcommand::List => list(ledger, json),
        PackSubcommand::Purchase {
            user,
            pack_id,
            payment_ref,
        } => purchase(ledger, &user, &pack_id, &payment_ref, json),
        PackSubcommand::History { user } => history(ledger, &user, json),
    }
}

fn list(ledger: &Ledger<CreditDb>, json: bool) -> anyhow::Result<()> {
    let packs = &ledger.config().packs;

    if json {
        return print_json(packs);
    }

    let rows: Vec<Vec<String>> = packs
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.credits.to_string(),
                format!("${}.{:02}", p.price_cents / 100, p.price_cents % 100),
                p.name.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "CREDITS", "PRICE", "NAME"], rows);
    Ok(())
}

fn purchase(
    ledger: &Ledger<CreditDb>,
    user: &str,
    pack_id: &str,
    payment_ref: &str,
    json: bool,
) -> anyhow::Result<()> {
    let purchase = ledger
        .purchase_pack(user, pack_id, payment_ref)
        .with_context(|| format!("failed to apply pack '{pack_id}' for '{user}'"))?;

    if json {
        print_json(&purchase)?;
    } else {
        println!(
            "Applied {}: {} credits for {user}",
            purchase.pack_name, purchase.credits
        );
    }
    Ok(())
}

fn history(ledger: &Ledger<CreditDb>, user: &str, json: bool) -> anyhow::Result<()> {
    let purchases = ledger.purchases(user)?;

    if json {
        return print_json(&purchases);
    }

    if purchases.is_empty() {
        println!("No purchases for {user}.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = purchases
        .iter()
        .map(|p| {
            vec![
                p.created_at.to_string(),
                p.pack_id.clone(),
                p.credits.to_string(),
                p.payment_ref.clone(),
            ]
        })
        .collect();
    print_table(&["DATE", "PACK", "CREDITS", "PAYMENT"], rows);
    Ok(())
}
