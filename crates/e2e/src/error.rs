//! Error types for result aggregation and notification delivery

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Results file not found: {}", .0.display())]
    MissingResultsFile(PathBuf),

    #[error("Results parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Webhook rejected notification: HTTP {status}: {body}")]
    Delivery { status: u16, body: String },

    #[error("Webhook transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("No webhook URL configured (set DISCORD_WEBHOOK or notify.webhook_url)")]
    WebhookNotConfigured,

    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl E2eError {
    /// True for failures that happened while talking to the webhook.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, E2eError::Delivery { .. } | E2eError::Transport(_))
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
