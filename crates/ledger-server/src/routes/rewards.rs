use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/rewards/:user_id — XP counter and award history.
pub async fn get_rewards(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let rewards = tokio::task::spawn_blocking(move || ledger.rewards(&user_id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(rewards)))
}

#[derive(serde::Deserialize)]
pub struct AwardBody {
    pub step: String,
    pub amount: i64,
}

/// POST /api/rewards/:user_id/award — award XP for a completed step.
/// Idempotent per step: re-submitting an already-awarded step returns the
/// unchanged record.
pub async fn award_xp(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<AwardBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = app.ledger.clone();
    let rewards =
        tokio::task::spawn_blocking(move || ledger.award_xp(&user_id, &body.step, body.amount))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(rewards)))
}
