use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use crate::state::AppState;

/// GET|POST /api/credits/refill — manual trigger for the daily refill sweep.
///
/// Contract: 200 `{success: true, updatedCount, timestamp}` on success,
/// 500 `{success: false, error}` on failure. The sweep is idempotent per
/// record, so a failed or partial run is safe to retry.
pub async fn trigger_refill(State(app): State<AppState>) -> Response {
    let ledger = app.ledger.clone();
    let now = Utc::now();
    let result = tokio::task::spawn_blocking(move || ledger.refill(now)).await;

    match result {
        Ok(Ok(updated)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "updatedCount": updated,
                "timestamp": now.timestamp(),
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!("manual refill failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": format!("task join error: {e}"),
            })),
        )
            .into_response(),
    }
}
