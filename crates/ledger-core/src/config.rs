use crate::error::Result;
use crate::types::{Allotment, PlanTier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// CreditPack
// ---------------------------------------------------------------------------

/// A purchasable top-up pack. The catalog is static configuration; purchases
/// reference packs by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPack {
    pub id: String,
    pub name: String,
    pub description: String,
    pub credits: i64,
    pub price_cents: i64,
}

fn default_packs() -> Vec<CreditPack> {
    vec![
        CreditPack {
            id: "pack_300".to_string(),
            name: "300 Prompt Pack".to_string(),
            description: "300 additional prompts".to_string(),
            credits: 300,
            price_cents: 1900,
        },
        CreditPack {
            id: "pack_600".to_string(),
            name: "600 Prompt Pack".to_string(),
            description: "600 additional prompts".to_string(),
            credits: 600,
            price_cents: 2900,
        },
        CreditPack {
            id: "pack_900".to_string(),
            name: "900 Prompt Pack".to_string(),
            description: "900 additional prompts".to_string(),
            credits: 900,
            price_cents: 3900,
        },
    ]
}

// ---------------------------------------------------------------------------
// LedgerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Plan tier → allotment overrides. Tiers absent from the map use the
    /// built-in defaults.
    #[serde(default)]
    pub allotments: HashMap<String, Allotment>,
    #[serde(default = "default_packs")]
    pub packs: Vec<CreditPack>,
    /// Interval of the in-process refill sweep, in hours.
    #[serde(default = "default_refill_interval_hours")]
    pub refill_interval_hours: u64,
}

fn default_version() -> u32 {
    1
}

fn default_refill_interval_hours() -> u64 {
    24
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            allotments: HashMap::new(),
            packs: default_packs(),
            refill_interval_hours: default_refill_interval_hours(),
        }
    }
}

impl LedgerConfig {
    /// The allotment for a plan tier, honoring config overrides.
    pub fn allotment_for(&self, tier: PlanTier) -> Allotment {
        if let Some(a) = self.allotments.get(tier.as_str()) {
            return *a;
        }
        match tier {
            PlanTier::Free => Allotment::daily(10),
            PlanTier::Explorer => Allotment::monthly(300),
            PlanTier::Builder => Allotment::monthly(600),
            PlanTier::Accelerator => Allotment::monthly(900),
        }
    }

    pub fn pack(&self, pack_id: &str) -> Option<&CreditPack> {
        self.packs.iter().find(|p| p.id == pack_id)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: LedgerConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
