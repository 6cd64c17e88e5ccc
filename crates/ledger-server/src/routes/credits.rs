use axum::extract::{Path, State};
use axum::Json;
use ledger_core::types::PlanTier;
use ledger_core::ConsumeOutcome;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/credits/:user_id — current credit record.
///
/// A user without a record sees a fabricated free-tier default; the read does
/// not persist it.
pub async fn get_credits(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let record = tokio::task::spawn_blocking(move || ledger.balance(&user_id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "success": true,
        "credits": record,
    })))
}

#[derive(serde::Deserialize)]
pub struct InitializeBody {
    pub plan: String,
}

/// POST /api/credits/:user_id/initialize — create or re-seed the record for
/// a plan. Unknown plan names fall back to the free tier, matching how
/// subscription records are interpreted elsewhere.
pub async fn initialize_credits(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<InitializeBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let record = tokio::task::spawn_blocking(move || {
        let plan = PlanTier::from_plan_name(&body.plan);
        ledger.initialize(&user_id, plan)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "success": true,
        "credits": record,
    })))
}

/// POST /api/credits/:user_id/consume — spend one credit before a paid action.
///
/// Insufficient balance is a business outcome, not an error: the response is
/// still 200 and the caller branches on `success`/`needMoreCredits`.
pub async fn consume_credit(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let outcome = tokio::task::spawn_blocking(move || ledger.consume(&user_id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let body = match outcome {
        ConsumeOutcome::Consumed { remaining_credits } => serde_json::json!({
            "success": true,
            "remainingCredits": remaining_credits,
        }),
        ConsumeOutcome::Insufficient => serde_json::json!({
            "success": false,
            "error": "Insufficient prompt credits",
            "needMoreCredits": true,
        }),
    };
    Ok(Json(body))
}

#[derive(serde::Deserialize)]
pub struct AddCreditsBody {
    pub credits: i64,
}

/// POST /api/credits/:user_id/add — grant purchased credits.
pub async fn add_credits(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<AddCreditsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let record = tokio::task::spawn_blocking(move || ledger.add_credits(&user_id, body.credits))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "success": true,
        "credits": record,
    })))
}

/// GET /api/credits/:user_id/purchases — purchase history, newest first.
pub async fn list_purchases(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let purchases = tokio::task::spawn_blocking(move || ledger.purchases(&user_id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(purchases)))
}
