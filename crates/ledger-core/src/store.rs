//! Storage abstraction for the ledger.
//!
//! The ledger never talks to a database directly; it is constructed over a
//! `CreditStore` so production code uses the redb-backed [`crate::db::CreditDb`]
//! while tests can substitute the in-memory [`MemoryStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{LedgerError, Result};
use crate::purchase::PackPurchase;
use crate::record::CreditRecord;
use crate::rewards::Rewards;

// ---------------------------------------------------------------------------
// CreditStore
// ---------------------------------------------------------------------------

pub trait CreditStore: Send + Sync {
    fn get(&self, user_id: &str) -> Result<Option<CreditRecord>>;

    /// Read-modify-write a single record atomically. `apply` receives the
    /// current record (None if absent) and returns the record to write, or
    /// None to leave the store untouched. Implementations must run the whole
    /// cycle inside one write transaction (or equivalent lock) so concurrent
    /// callers serialize on the check-and-mutate.
    fn update_with(
        &self,
        user_id: &str,
        apply: &mut dyn FnMut(Option<CreditRecord>) -> Option<CreditRecord>,
    ) -> Result<Option<CreditRecord>>;

    fn list(&self) -> Result<Vec<CreditRecord>>;

    /// Write a batch of records in a single transaction.
    fn put_batch(&self, records: &[CreditRecord]) -> Result<()>;

    fn get_rewards(&self, user_id: &str) -> Result<Option<Rewards>>;

    fn put_rewards(&self, rewards: &Rewards) -> Result<()>;

    fn record_purchase(&self, purchase: &PackPurchase) -> Result<()>;

    /// Purchase history for a user, newest first.
    fn purchases_for(&self, user_id: &str) -> Result<Vec<PackPurchase>>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryInner {
    credits: HashMap<String, CreditRecord>,
    rewards: HashMap<String, Rewards>,
    purchases: Vec<PackPurchase>,
}

/// In-memory store for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| LedgerError::Store("memory store lock poisoned".to_string()))
    }
}

impl CreditStore for MemoryStore {
    fn get(&self, user_id: &str) -> Result<Option<CreditRecord>> {
        Ok(self.lock()?.credits.get(user_id).cloned())
    }

    fn update_with(
        &self,
        user_id: &str,
        apply: &mut dyn FnMut(Option<CreditRecord>) -> Option<CreditRecord>,
    ) -> Result<Option<CreditRecord>> {
        let mut inner = self.lock()?;
        let current = inner.credits.get(user_id).cloned();
        let updated = apply(current);
        if let Some(rec) = &updated {
            inner.credits.insert(user_id.to_string(), rec.clone());
        }
        Ok(updated)
    }

    fn list(&self) -> Result<Vec<CreditRecord>> {
        let mut records: Vec<CreditRecord> = self.lock()?.credits.values().cloned().collect();
        records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(records)
    }

    fn put_batch(&self, records: &[CreditRecord]) -> Result<()> {
        let mut inner = self.lock()?;
        for rec in records {
            inner.credits.insert(rec.user_id.clone(), rec.clone());
        }
        Ok(())
    }

    fn get_rewards(&self, user_id: &str) -> Result<Option<Rewards>> {
        Ok(self.lock()?.rewards.get(user_id).cloned())
    }

    fn put_rewards(&self, rewards: &Rewards) -> Result<()> {
        self.lock()?
            .rewards
            .insert(rewards.user_id.clone(), rewards.clone());
        Ok(())
    }

    fn record_purchase(&self, purchase: &PackPurchase) -> Result<()> {
        self.lock()?.purchases.push(purchase.clone());
        Ok(())
    }

    fn purchases_for(&self, user_id: &str) -> Result<Vec<PackPurchase>> {
        let mut purchases: Vec<PackPurchase> = self
            .lock()?
            .purchases
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        purchases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(purchases)
    }
}
