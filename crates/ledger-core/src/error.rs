use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("credit record not found: {0}")]
    RecordNotFound(String),

    #[error("credit pack not found: {0}")]
    PackNotFound(String),

    #[error("invalid plan tier '{0}': expected free, explorer, builder, or accelerator")]
    InvalidPlan(String),

    #[error("credit amount {0} out of range (must be 1..=1000)")]
    InvalidCreditAmount(i64),

    #[error("xp amount must be positive, got {0}")]
    InvalidXpAmount(i64),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
