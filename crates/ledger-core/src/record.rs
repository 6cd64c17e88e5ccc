use crate::types::Allotment;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current unix timestamp in seconds, the persisted time unit for all records.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

// ---------------------------------------------------------------------------
// CreditRecord
// ---------------------------------------------------------------------------

/// One per user. Serialized field names match the stored document shape
/// (camelCase), which is also what the HTTP surface returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRecord {
    pub user_id: String,
    /// Per-day allotment (0 for monthly plans).
    pub daily_credits: i64,
    /// Per-month allotment (0 for daily plans).
    pub monthly_credits: i64,
    /// Current spendable balance, never negative.
    pub remaining_credits: i64,
    #[serde(default)]
    pub total_used_credits: i64,
    #[serde(default)]
    pub last_refill_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CreditRecord {
    pub fn new(user_id: impl Into<String>, allotment: Allotment, now: i64) -> Self {
        Self {
            user_id: user_id.into(),
            daily_credits: allotment.daily,
            monthly_credits: allotment.monthly,
            remaining_credits: allotment.starting_balance(),
            total_used_credits: 0,
            last_refill_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a plan change to an existing record: allotments and balance are
    /// reset to the new plan, lifetime usage and creation time are preserved.
    pub fn apply_plan(&mut self, allotment: Allotment, now: i64) {
        self.daily_credits = allotment.daily;
        self.monthly_credits = allotment.monthly;
        self.remaining_credits = allotment.starting_balance();
        self.last_refill_date = now;
        self.updated_at = now;
    }

    /// A record is due for refill only when its balance has dipped below the
    /// daily allotment. Balances at or above the allotment (purchased packs)
    /// are left alone, and monthly plans have `daily_credits == 0` so they
    /// never match.
    pub fn needs_refill(&self) -> bool {
        self.remaining_credits < self.daily_credits
    }

    /// Restore the balance to the daily allotment.
    pub fn refill(&mut self, now: i64) {
        self.remaining_credits = self.daily_credits;
        self.last_refill_date = now;
        self.updated_at = now;
    }
}
