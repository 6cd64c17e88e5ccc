//! The credit ledger: consumable prompt-credit balances with a daily refill
//! policy, built over a pluggable [`CreditStore`].
//!
//! A balance moves FULL → PARTIAL → EMPTY through `consume` and back to FULL
//! through `refill`. EMPTY is the only state in which `consume` is rejected,
//! and the rejection is a typed outcome, not an error.

use chrono::{DateTime, Utc};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::purchase::PackPurchase;
use crate::record::{unix_now, CreditRecord};
use crate::rewards::Rewards;
use crate::store::CreditStore;
use crate::types::PlanTier;

/// Upper bound on a single credit grant. Anything larger is assumed to be a
/// duplicated or multiplied request and is rejected.
pub const MAX_CREDIT_GRANT: i64 = 1000;

// ---------------------------------------------------------------------------
// ConsumeOutcome
// ---------------------------------------------------------------------------

/// Result of a consume attempt. Insufficient balance is an expected business
/// outcome the caller must handle by refusing the paid action; it is never
/// surfaced as an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Consumed { remaining_credits: i64 },
    Insufficient,
}

impl ConsumeOutcome {
    pub fn is_consumed(&self) -> bool {
        matches!(self, ConsumeOutcome::Consumed { .. })
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

pub struct Ledger<S: CreditStore> {
    store: S,
    config: LedgerConfig,
}

impl<S: CreditStore> Ledger<S> {
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Credit operations
    // -----------------------------------------------------------------------

    /// Create the credit record for a user at signup, or re-seed an existing
    /// record on plan change. A plan change resets the balance to the new
    /// plan's allotment but preserves lifetime usage.
    pub fn initialize(&self, user_id: &str, plan: PlanTier) -> Result<CreditRecord> {
        check_user_id(user_id)?;
        let allotment = self.config.allotment_for(plan);
        let now = unix_now();

        let written = self.store.update_with(user_id, &mut |current| {
            Some(match current {
                Some(mut rec) => {
                    rec.apply_plan(allotment, now);
                    rec
                }
                None => CreditRecord::new(user_id, allotment, now),
            })
        })?;

        written.ok_or_else(|| LedgerError::Store("initialize wrote no record".to_string()))
    }

    /// Current record for a user. A missing record is not an error: the
    /// caller sees a fabricated free-tier default, which `consume` will
    /// materialize on its first successful write.
    pub fn balance(&self, user_id: &str) -> Result<CreditRecord> {
        check_user_id(user_id)?;
        match self.store.get(user_id)? {
            Some(rec) => Ok(rec),
            None => {
                let free = self.config.allotment_for(PlanTier::Free);
                Ok(CreditRecord::new(user_id, free, unix_now()))
            }
        }
    }

    /// Spend one credit. The balance check and decrement run inside a single
    /// store transaction, so two concurrent consumers cannot both spend the
    /// last credit.
    pub fn consume(&self, user_id: &str) -> Result<ConsumeOutcome> {
        check_user_id(user_id)?;
        let free = self.config.allotment_for(PlanTier::Free);
        let now = unix_now();

        let mut outcome = ConsumeOutcome::Insufficient;
        self.store.update_with(user_id, &mut |current| {
            let mut rec = current.unwrap_or_else(|| CreditRecord::new(user_id, free, now));
            if rec.remaining_credits <= 0 {
                outcome = ConsumeOutcome::Insufficient;
                return None;
            }
            rec.remaining_credits -= 1;
            rec.total_used_credits += 1;
            rec.updated_at = now;
            outcome = ConsumeOutcome::Consumed {
                remaining_credits: rec.remaining_credits,
            };
            Some(rec)
        })?;

        if !outcome.is_consumed() {
            tracing::debug!(user_id, "consume rejected: insufficient credits");
        }
        Ok(outcome)
    }

    /// Grant purchased credits on top of the current balance. Unlike
    /// `consume`, a missing record is an error here: grants only apply to
    /// accounts that completed signup.
    pub fn add_credits(&self, user_id: &str, credits: i64) -> Result<CreditRecord> {
        check_user_id(user_id)?;
        if credits < 1 || credits > MAX_CREDIT_GRANT {
            return Err(LedgerError::InvalidCreditAmount(credits));
        }
        let now = unix_now();

        let written = self.store.update_with(user_id, &mut |current| {
            let mut rec = current?;
            rec.remaining_credits += credits;
            rec.updated_at = now;
            Some(rec)
        })?;

        written.ok_or_else(|| LedgerError::RecordNotFound(user_id.to_string()))
    }

    /// Apply a completed pack purchase: grant the pack's credits and record
    /// the purchase for history.
    pub fn purchase_pack(
        &self,
        user_id: &str,
        pack_id: &str,
        payment_ref: &str,
    ) -> Result<PackPurchase> {
        let pack = self
            .config
            .pack(pack_id)
            .ok_or_else(|| LedgerError::PackNotFound(pack_id.to_string()))?
            .clone();

        let record = self.add_credits(user_id, pack.credits)?;
        let purchase = PackPurchase::new(user_id, &pack, payment_ref, unix_now());
        self.store.record_purchase(&purchase)?;

        tracing::info!(
            user_id,
            pack_id,
            credits = pack.credits,
            remaining = record.remaining_credits,
            "pack purchase applied"
        );
        Ok(purchase)
    }

    pub fn purchases(&self, user_id: &str) -> Result<Vec<PackPurchase>> {
        check_user_id(user_id)?;
        self.store.purchases_for(user_id)
    }

    /// All credit records, for operational inspection.
    pub fn records(&self) -> Result<Vec<CreditRecord>> {
        self.store.list()
    }

    /// Batch refill sweep. Every record whose balance has dipped below its
    /// daily allotment is restored to the allotment; everything else is left
    /// untouched, which makes the sweep idempotent within a day and keeps
    /// purchased overflow safe. Returns the number of records updated.
    pub fn refill(&self, now: DateTime<Utc>) -> Result<usize> {
        let ts = now.timestamp();
        let mut staged = Vec::new();
        for mut rec in self.store.list()? {
            if rec.needs_refill() {
                rec.refill(ts);
                staged.push(rec);
            }
        }
        if !staged.is_empty() {
            self.store.put_batch(&staged)?;
        }
        tracing::info!(updated = staged.len(), "refill sweep complete");
        Ok(staged.len())
    }

    // -----------------------------------------------------------------------
    // Rewards
    // -----------------------------------------------------------------------

    /// Current rewards for a user; missing records read as an empty counter.
    pub fn rewards(&self, user_id: &str) -> Result<Rewards> {
        check_user_id(user_id)?;
        match self.store.get_rewards(user_id)? {
            Some(rewards) => Ok(rewards),
            None => Ok(Rewards::new(user_id, unix_now())),
        }
    }

    /// Award XP for a completed step. Idempotent per step: re-awarding a
    /// step the user already completed returns the unchanged record.
    pub fn award_xp(&self, user_id: &str, step: &str, amount: i64) -> Result<Rewards> {
        check_user_id(user_id)?;
        if amount <= 0 {
            return Err(LedgerError::InvalidXpAmount(amount));
        }
        let now = unix_now();
        let mut rewards = match self.store.get_rewards(user_id)? {
            Some(r) => r,
            None => Rewards::new(user_id, now),
        };
        if rewards.award(step, amount, now) {
            self.store.put_rewards(&rewards)?;
        } else {
            tracing::debug!(user_id, step, "xp already awarded for step");
        }
        Ok(rewards)
    }
}

fn check_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(LedgerError::EmptyUserId);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
