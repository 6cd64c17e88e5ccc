use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// XpAward / Rewards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpAward {
    pub amount: i64,
    /// Identifier of the wizard step (or other action) that earned the XP.
    pub step: String,
    pub awarded_at: i64,
}

/// Per-user experience-point counter. Awards are append-only and idempotent
/// per step: re-awarding a step the user already completed is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewards {
    pub user_id: String,
    pub total_xp: i64,
    #[serde(default)]
    pub history: Vec<XpAward>,
    pub updated_at: i64,
}

impl Rewards {
    pub fn new(user_id: impl Into<String>, now: i64) -> Self {
        Self {
            user_id: user_id.into(),
            total_xp: 0,
            history: Vec::new(),
            updated_at: now,
        }
    }

    pub fn has_step(&self, step: &str) -> bool {
        self.history.iter().any(|a| a.step == step)
    }

    /// Award XP for a step. Returns false (and leaves the record unchanged)
    /// if the step was already awarded.
    pub fn award(&mut self, step: impl Into<String>, amount: i64, now: i64) -> bool {
        let step = step.into();
        if self.has_step(&step) {
            return false;
        }
        self.total_xp += amount;
        self.history.push(XpAward {
            amount,
            step,
            awarded_at: now,
        });
        self.updated_at = now;
        true
    }
}
