//! Log-only delivery — the default backend for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{Notifier, Result};

/// Writes each delivery to the tracing log and reports success.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, user_id: &str, title: &str, fired_at: DateTime<Utc>) -> Result<()> {
        info!(%user_id, %title, fired_at = %fired_at.to_rfc3339(), "reminder delivered");
        Ok(())
    }
}
