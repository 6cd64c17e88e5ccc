use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PlanTier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Explorer,
    Builder,
    Accelerator,
}

impl PlanTier {
    pub fn all() -> &'static [PlanTier] {
        &[
            PlanTier::Free,
            PlanTier::Explorer,
            PlanTier::Builder,
            PlanTier::Accelerator,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Explorer => "explorer",
            PlanTier::Builder => "builder",
            PlanTier::Accelerator => "accelerator",
        }
    }

    /// Lenient parse for plan names coming from subscription records.
    /// Unknown, empty, or mixed-case names fall back to the free tier.
    pub fn from_plan_name(name: &str) -> PlanTier {
        match name.to_ascii_lowercase().as_str() {
            "explorer" => PlanTier::Explorer,
            "builder" => PlanTier::Builder,
            "accelerator" => PlanTier::Accelerator,
            _ => PlanTier::Free,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanTier {
    type Err = crate::error::LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanTier::Free),
            "explorer" => Ok(PlanTier::Explorer),
            "builder" => Ok(PlanTier::Builder),
            "accelerator" => Ok(PlanTier::Accelerator),
            _ => Err(crate::error::LedgerError::InvalidPlan(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Allotment
// ---------------------------------------------------------------------------

/// Credits granted per refill period. Exactly one of `daily`/`monthly` is
/// non-zero for any plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allotment {
    pub daily: i64,
    pub monthly: i64,
}

impl Allotment {
    pub fn daily(credits: i64) -> Self {
        Self {
            daily: credits,
            monthly: 0,
        }
    }

    pub fn monthly(credits: i64) -> Self {
        Self {
            daily: 0,
            monthly: credits,
        }
    }

    /// The balance a fresh or plan-changed record starts with:
    /// monthly if the plan is monthly, daily otherwise.
    pub fn starting_balance(&self) -> i64 {
        if self.monthly > 0 {
            self.monthly
        } else {
            self.daily
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn plan_tier_round_trip() {
        for &tier in PlanTier::all() {
            assert_eq!(PlanTier::from_str(tier.as_str()).unwrap(), tier);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert!(PlanTier::from_str("platinum").is_err());
    }

    #[test]
    fn lenient_parse_falls_back_to_free() {
        assert_eq!(PlanTier::from_plan_name(""), PlanTier::Free);
        assert_eq!(PlanTier::from_plan_name("platinum"), PlanTier::Free);
        assert_eq!(PlanTier::from_plan_name("Builder"), PlanTier::Builder);
        assert_eq!(PlanTier::from_plan_name("EXPLORER"), PlanTier::Explorer);
    }

    #[test]
    fn starting_balance_prefers_monthly() {
        assert_eq!(Allotment::monthly(300).starting_balance(), 300);
        assert_eq!(Allotment::daily(10).starting_balance(), 10);
    }
}
