use thiserror::Error;

/// Errors a delivery backend can report. The engine logs these at the firing
/// site; they never roll back the reminder's state transition.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notifier misconfigured: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
