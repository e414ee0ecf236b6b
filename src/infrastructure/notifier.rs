use std::time::Duration;

use crate::domain::notification::{NotifyError, OrderConfirmation};
use crate::domain::ports::OrderNotifier;

/// Writes the rendered confirmation to the log. Used when no mail relay is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl OrderNotifier for LogNotifier {
    fn send(&self, confirmation: &OrderConfirmation) -> Result<(), NotifyError> {
        log::info!(
            "Order confirmation for {} ({}):\n{}",
            confirmation.to,
            confirmation.subject,
            confirmation.body
        );
        Ok(())
    }
}

/// Hands the confirmation to a mail relay by POSTing it as JSON.
///
/// Uses a blocking client, so `send` must run off the async executor (the
/// handlers call services from `web::block`). The client is built per call
/// for the same reason: dropping a blocking client inside the runtime panics.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    timeout: Duration,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl OrderNotifier for WebhookNotifier {
    fn send(&self, confirmation: &OrderConfirmation) -> Result<(), NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let resp = client
            .post(&self.url)
            .json(confirmation)
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Rejected(resp.status().as_u16()));
        }
        log::debug!("Order confirmation {} relayed to {}", confirmation.order_id, self.url);
        Ok(())
    }
}
