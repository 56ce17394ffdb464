//! `wellkit-notify` — pluggable delivery backends for fired reminders.
//!
//! The scheduler engine only knows the [`Notifier`] trait. A delivery is
//! attempted at most once per firing; failures are reported to the caller,
//! logged there, and never retried automatically.

pub mod error;
pub mod log;
pub mod webhook;

pub use error::{NotifyError, Result};
pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Delivery capability invoked by the engine when a reminder fires.
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// every armed timer task. `notify` takes `&self` so concurrent firings for
/// independent reminder ids never serialise on the backend.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Stable lowercase identifier for this backend (e.g. `"webhook"`).
    fn name(&self) -> &str;

    /// Deliver one reminder to one user. At-most-one attempt per firing.
    async fn notify(
        &self,
        user_id: &str,
        title: &str,
        fired_at: DateTime<Utc>,
    ) -> Result<()>;
}
