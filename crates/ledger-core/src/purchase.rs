use crate::config::CreditPack;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed pack purchase, recorded alongside the credit grant so the
/// purchase history survives independently of the balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackPurchase {
    pub id: Uuid,
    pub user_id: String,
    pub pack_id: String,
    pub pack_name: String,
    pub credits: i64,
    pub price_cents: i64,
    /// Opaque reference into the payment processor (e.g. a payment intent id).
    pub payment_ref: String,
    pub status: PurchaseStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Completed,
}

impl PackPurchase {
    pub fn new(
        user_id: impl Into<String>,
        pack: &CreditPack,
        payment_ref: impl Into<String>,
        now: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            pack_id: pack.id.clone(),
            pack_name: pack.name.clone(),
            credits: pack.credits,
            price_cents: pack.price_cents,
            payment_ref: payment_ref.into(),
            status: PurchaseStatus::Completed,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;

    #[test]
    fn purchase_copies_pack_details() {
        let cfg = LedgerConfig::default();
        let pack = cfg.pack("pack_300").unwrap();
        let purchase = PackPurchase::new("u1", pack, "pi_123", 1000);

        assert_eq!(purchase.pack_id, "pack_300");
        assert_eq!(purchase.credits, 300);
        assert_eq!(purchase.price_cents, 1900);
        assert_eq!(purchase.status, PurchaseStatus::Completed);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(PurchaseStatus::Completed).unwrap();
        assert_eq!(json, "completed");
    }
}
