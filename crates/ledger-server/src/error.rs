use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledger_core::LedgerError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<LedgerError>() {
            match e {
                LedgerError::RecordNotFound(_) | LedgerError::PackNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                LedgerError::EmptyUserId
                | LedgerError::InvalidPlan(_)
                | LedgerError::InvalidCreditAmount(_)
                | LedgerError::InvalidXpAmount(_) => StatusCode::BAD_REQUEST,
                LedgerError::Store(_)
                | LedgerError::Io(_)
                | LedgerError::Yaml(_)
                | LedgerError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
