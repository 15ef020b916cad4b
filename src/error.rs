use thiserror::Error;

/// Result type for orrery operations.
pub type Result<T> = std::result::Result<T, OrreryError>;

/// Structural failures. Per-record catalog problems never end up here;
/// they degrade to defaults at ingestion.
#[derive(Error, Debug)]
pub enum OrreryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate body identity: {0}")]
    DuplicateBody(String),

    #[error("Unknown body: {0}")]
    UnknownBody(String),
}
