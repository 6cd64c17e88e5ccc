use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/packs — the purchasable pack catalog.
pub async fn list_packs(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!(app.ledger.config().packs))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBody {
    pub user_id: String,
    /// Payment processor reference confirming the completed payment.
    pub payment_ref: String,
}

/// POST /api/packs/:pack_id/purchase — apply a completed pack purchase.
pub async fn purchase_pack(
    State(app): State<AppState>,
    Path(pack_id): Path<String>,
    Json(body): Json<PurchaseBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let purchase = tokio::task::spawn_blocking(move || {
        ledger.purchase_pack(&body.user_id, &pack_id, &body.payment_ref)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "success": true,
        "purchase": purchase,
    })))
}
