use thiserror::Error;

/// Errors shared across the core crate. Subsystem crates carry their own
/// error enums so the daemon can map them independently.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
