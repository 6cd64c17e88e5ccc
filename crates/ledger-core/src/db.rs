//! redb-backed persistent store.
//!
//! # Table design
//!
//! Three tables, all JSON-encoded values:
//!
//! - `credits`: user id → `CreditRecord`. One document per user; the
//!   read-modify-write in [`CreditStore::update_with`] runs inside a single
//!   write transaction, so check-and-decrement is atomic against concurrent
//!   consumers.
//! - `rewards`: user id → `Rewards`.
//! - `purchases`: 24-byte composite key → `PackPurchase`:
//!   ```text
//!   [ timestamp_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//!   ```
//!   Big-endian timestamps in the high bytes make byte order equal time
//!   order, so iteration yields purchases oldest-first without sorting.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::error::{LedgerError, Result};
use crate::purchase::PackPurchase;
use crate::record::CreditRecord;
use crate::rewards::Rewards;
use crate::store::CreditStore;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const CREDITS: TableDefinition<&str, &[u8]> = TableDefinition::new("credits");
const REWARDS: TableDefinition<&str, &[u8]> = TableDefinition::new("rewards");
/// Key: 24-byte composite (timestamp_ms big-endian ++ uuid bytes)
const PURCHASES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("purchases");

fn purchase_key(created_at: i64, id: Uuid) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = (created_at.max(0) as u64).saturating_mul(1000);
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(id.as_bytes());
    key
}

fn store_err(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// CreditDb
// ---------------------------------------------------------------------------

/// Persistent store for credit records, rewards, and pack purchases.
pub struct CreditDb {
    db: Database,
}

impl CreditDb {
    /// Open or create the redb database at `path`.
    ///
    /// Creates all tables up front so reads never race table creation.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(CREDITS).map_err(store_err)?;
        wt.open_table(REWARDS).map_err(store_err)?;
        wt.open_table(PURCHASES).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }
}

impl CreditStore for CreditDb {
    fn get(&self, user_id: &str) -> Result<Option<CreditRecord>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(CREDITS).map_err(store_err)?;
        match table.get(user_id).map_err(store_err)? {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    fn update_with(
        &self,
        user_id: &str,
        apply: &mut dyn FnMut(Option<CreditRecord>) -> Option<CreditRecord>,
    ) -> Result<Option<CreditRecord>> {
        let wt = self.db.begin_write().map_err(store_err)?;
        let updated = {
            let mut table = wt.open_table(CREDITS).map_err(store_err)?;
            let current = match table.get(user_id).map_err(store_err)? {
                Some(v) => Some(serde_json::from_slice(v.value())?),
                None => None,
            };
            let updated = apply(current);
            if let Some(rec) = &updated {
                let value = serde_json::to_vec(rec)?;
                table
                    .insert(user_id, value.as_slice())
                    .map_err(store_err)?;
            }
            updated
        };
        wt.commit().map_err(store_err)?;
        Ok(updated)
    }

    fn list(&self) -> Result<Vec<CreditRecord>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(CREDITS).map_err(store_err)?;
        let mut records = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, v) = entry.map_err(store_err)?;
            records.push(serde_json::from_slice(v.value())?);
        }
        Ok(records)
    }

    fn put_batch(&self, records: &[CreditRecord]) -> Result<()> {
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(CREDITS).map_err(store_err)?;
            for rec in records {
                let value = serde_json::to_vec(rec)?;
                table
                    .insert(rec.user_id.as_str(), value.as_slice())
                    .map_err(store_err)?;
            }
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    fn get_rewards(&self, user_id: &str) -> Result<Option<Rewards>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(REWARDS).map_err(store_err)?;
        match table.get(user_id).map_err(store_err)? {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    fn put_rewards(&self, rewards: &Rewards) -> Result<()> {
        let value = serde_json::to_vec(rewards)?;
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(REWARDS).map_err(store_err)?;
            table
                .insert(rewards.user_id.as_str(), value.as_slice())
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    fn record_purchase(&self, purchase: &PackPurchase) -> Result<()> {
        let key = purchase_key(purchase.created_at, purchase.id);
        let value = serde_json::to_vec(purchase)?;
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(PURCHASES).map_err(store_err)?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    fn purchases_for(&self, user_id: &str) -> Result<Vec<PackPurchase>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(PURCHASES).map_err(store_err)?;
        let mut purchases = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, v) = entry.map_err(store_err)?;
            let purchase: PackPurchase = serde_json::from_slice(v.value())?;
            if purchase.user_id == user_id {
                purchases.push(purchase);
            }
        }
        // Key order is oldest-first; history reads newest-first.
        purchases.reverse();
        Ok(purchases)
    }
}
