use thiserror::Error;

/// All record-layer errors. Kept separate from the scheduler's error enum so
/// the web layer can map them independently.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),
}

pub type Result<T> = std::result::Result<T, RecordError>;
