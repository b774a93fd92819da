//! Webhook delivery of run notifications
//!
//! Each call is a single POST. Nothing is queued or retried; the outcome goes
//! straight back to the caller.

use std::time::Duration;

use chrono::Local;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::config::NotifyConfig;
use crate::embed::WebhookMessage;
use crate::error::{E2eError, E2eResult};
use crate::summary::RunSummary;

const USER_AGENT_VALUE: &str = concat!("loginsuite-notifier/", env!("CARGO_PKG_VERSION"));

/// Successful delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivered {
    pub status: u16,
}

/// Posts run notifications to a chat webhook
pub struct WebhookNotifier {
    client: Client,
    url: Url,
    repository_url: Option<String>,
}

impl WebhookNotifier {
    /// Build a notifier from configuration.
    ///
    /// Fails with [`E2eError::WebhookNotConfigured`] when no URL is set.
    pub fn from_config(config: &NotifyConfig, timeout: Duration) -> E2eResult<Self> {
        let url = config.webhook()?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            repository_url: config.repository_url.clone(),
        })
    }

    /// Announce that a test run is starting.
    pub async fn announce_start(&self, branch: &str, commit: &str) -> E2eResult<Delivered> {
        let message = WebhookMessage::run_started(branch, commit, Local::now());
        self.send(&message).await
    }

    /// Announce the outcome of a finished run.
    pub async fn announce_result(&self, summary: &RunSummary) -> E2eResult<Delivered> {
        let message =
            WebhookMessage::run_finished(summary, self.repository_url.as_deref(), Local::now());
        self.send(&message).await
    }

    /// POST a message to the webhook.
    pub async fn send(&self, message: &WebhookMessage) -> E2eResult<Delivered> {
        debug!("Posting notification to {}", self.redacted_url());

        let resp = self
            .client
            .post(self.url.clone())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                warn!("Webhook transport failure: {}", e);
                E2eError::Transport(e)
            })?;

        let status = resp.status();
        if status.is_success() {
            info!("Notification delivered ({})", status.as_u16());
            return Ok(Delivered {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.unwrap_or_default();
        warn!("Webhook returned {}: {}", status.as_u16(), body);
        Err(E2eError::Delivery {
            status: status.as_u16(),
            body,
        })
    }

    /// Webhook URL with the path hidden. The path carries the token.
    pub fn redacted_url(&self) -> String {
        format!(
            "{}://{}/…",
            self.url.scheme(),
            self.url.host_str().unwrap_or_default()
        )
    }
}
