//! Send a single notification
//!
//! Useful when the browser suite runs as its own CI step.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use loginsuite_e2e::{summarize, Config, WebhookNotifier};

use crate::output::print_success;

#[derive(Subcommand, Debug)]
pub enum NotifyCommands {
    /// Announce that a test run is starting
    Start,

    /// Announce the outcome of a finished run
    Result(ResultArgs),
}

#[derive(Args, Debug)]
pub struct ResultArgs {
    /// Results document (defaults to runner.results_path)
    #[arg(short, long)]
    pub results: Option<PathBuf>,
}

pub async fn execute(cmd: NotifyCommands, config: Config) -> Result<()> {
    let notifier = WebhookNotifier::from_config(&config.notify, config.runner.request_timeout())
        .context("Cannot send notification")?;

    match cmd {
        NotifyCommands::Start => {
            let delivery = notifier
                .announce_start(config.notify.branch(), config.notify.commit())
                .await?;
            print_success(&format!("Start notification sent (HTTP {})", delivery.status));
        }
        NotifyCommands::Result(args) => {
            let path = args.results.unwrap_or(config.runner.results_path);
            let summary = summarize(&path, &config.notify.metadata())
                .with_context(|| format!("No summary available for {}", path.display()))?;
            let delivery = notifier.announce_result(&summary).await?;
            print_success(&format!("Result notification sent (HTTP {})", delivery.status));
        }
    }

    Ok(())
}
