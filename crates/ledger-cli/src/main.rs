mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{credit::CreditSubcommand, pack::PackSubcommand, reward::RewardSubcommand};
use ledger_core::config::LedgerConfig;
use ledger_core::db::CreditDb;
use ledger_core::Ledger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ledger",
    about = "Prompt credit ledger — manage balances, refills, packs, and XP rewards",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the ledger database file
    #[arg(long, global = true, env = "LEDGER_DB", default_value = "ledger.redb")]
    db: PathBuf,

    /// Path to a YAML config overriding plan allotments and packs
    #[arg(long, global = true, env = "LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage credit balances
    Credit {
        #[command(subcommand)]
        subcommand: CreditSubcommand,
    },

    /// Refill every user below their daily allotment
    Refill,

    /// Show the plan tiers and their allotments
    Plans,

    /// Manage credit packs and purchases
    Pack {
        #[command(subcommand)]
        subcommand: PackSubcommand,
    },

    /// Manage XP rewards
    Reward {
        #[command(subcommand)]
        subcommand: RewardSubcommand,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::default(),
    };

    // Serve owns the database for the process lifetime; everything else
    // opens it per invocation.
    match cli.command {
        Commands::Serve { port } => cmd::serve::run(&cli.db, config, port),
        command => {
            let db = CreditDb::open(&cli.db)?;
            let ledger = Ledger::new(db, config);
            match command {
                Commands::Credit { subcommand } => cmd::credit::run(&ledger, subcommand, cli.json),
                Commands::Refill => cmd::refill::run(&ledger, cli.json),
                Commands::Plans => cmd::plans::run(ledger.config(), cli.json),
                Commands::Pack { subcommand } => cmd::pack::run(&ledger, subcommand, cli.json),
                Commands::Reward { subcommand } => cmd::reward::run(&ledger, subcommand, cli.json),
                Commands::Serve { .. } => unreachable!(),
            }
        }
    }
}
