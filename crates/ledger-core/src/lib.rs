pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod purchase;
pub mod record;
pub mod rewards;
pub mod store;
pub mod types;

pub use error::{LedgerError, Result};
pub use ledger::{ConsumeOutcome, Ledger};
