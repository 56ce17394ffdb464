//! Webhook delivery — POSTs fired reminders to an external push gateway.
//!
//! The gateway owns the actual transport (WhatsApp, SMS, mobile push);
//! wellkit only hands it `{user_id, title, fired_at}` as JSON and treats any
//! non-2xx response as a failed delivery.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{Notifier, NotifyError, Result};

/// Delivers reminders with a single HTTP POST per firing.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Build a notifier for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(NotifyError::Config("webhook_url is empty".into()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, user_id: &str, title: &str, fired_at: DateTime<Utc>) -> Result<()> {
        let payload = serde_json::json!({
            "user_id": user_id,
            "title": title,
            "fired_at": fired_at.to_rfc3339(),
        });

        debug!(%user_id, url = %self.url, "posting reminder to webhook");
        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(NotifyError::Delivery(format!(
                "webhook returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_rejected() {
        let err = WebhookNotifier::new("", Duration::from_secs(5)).err();
        assert!(matches!(err, Some(NotifyError::Config(_))));
    }
}
