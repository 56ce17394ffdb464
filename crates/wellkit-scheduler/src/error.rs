use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No reminder with the given ID exists in the store.
    #[error("Reminder not found: {id}")]
    NotFound { id: String },

    /// A conditional write lost a state-transition race (e.g. a firing vs a
    /// concurrent cancel). Absorbed internally — callers of the job-control
    /// façade never see this.
    #[error("Concurrent state transition on reminder: {id}")]
    Conflict { id: String },

    /// The reminder time or repeat rule could not be parsed. Rejected before
    /// any store write.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
