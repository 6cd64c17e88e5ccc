use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ledger_core::config::LedgerConfig;
use ledger_core::db::CreditDb;
use ledger_core::Ledger;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger<CreditDb>>,
}

impl AppState {
    pub fn new(db_path: &Path, config: LedgerConfig) -> anyhow::Result<Self> {
        let interval_hours = config.refill_interval_hours;
        let db = CreditDb::open(db_path)?;
        let ledger = Arc::new(Ledger::new(db, config));
        let state = Self {
            ledger: ledger.clone(),
        };

        // In-process stand-in for the external daily refill trigger.
        // Guard: only spawn if inside a Tokio runtime (skipped in sync unit tests).
        if interval_hours > 0 && tokio::runtime::Handle::try_current().is_ok() {
            let period = Duration::from_secs(interval_hours * 3600);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(period).await;
                    let ledger = ledger.clone();
                    match tokio::task::spawn_blocking(move || ledger.refill(Utc::now())).await {
                        Ok(Ok(updated)) => {
                            tracing::info!(updated, "scheduled refill complete");
                        }
                        Ok(Err(e)) => tracing::error!("scheduled refill failed: {e}"),
                        Err(e) => tracing::error!("scheduled refill join error: {e}"),
                    }
                }
            });
        }

        Ok(state)
    }
}
