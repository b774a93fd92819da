//! Runs the browser suite and brackets it with notifications

use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::{Config, NotifyConfig, RunnerConfig};
use crate::error::E2eError;
use crate::notifier::WebhookNotifier;
use crate::summary::{format_duration, summarize};

/// Exit code reported when the test command could not run to completion.
pub const EXIT_RUN_FAILED: i32 = 1;

/// Spawns the test command and reports on it
pub struct SuiteRunner {
    runner: RunnerConfig,
    notify: NotifyConfig,
    notifier: Option<WebhookNotifier>,
}

impl SuiteRunner {
    /// Create a runner. Notifications are dropped with a warning when the
    /// webhook is missing or unusable; the suite itself still runs.
    pub fn new(config: Config, notifications: bool) -> Self {
        let notifier = if notifications {
            match WebhookNotifier::from_config(&config.notify, config.runner.request_timeout()) {
                Ok(n) => Some(n),
                Err(E2eError::WebhookNotConfigured) => {
                    warn!("No webhook configured, notifications disabled");
                    None
                }
                Err(e) => {
                    warn!("Notifications disabled: {}", e);
                    None
                }
            }
        } else {
            debug!("Notifications turned off");
            None
        };

        Self {
            runner: config.runner,
            notify: config.notify,
            notifier,
        }
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Run the test command to completion and return its exit code.
    ///
    /// `extra_args` are appended to the configured command.
    pub async fn run_suite(&self, extra_args: &[String]) -> i32 {
        let (program, args) = match self.runner.program() {
            Ok(parts) => parts,
            Err(e) => {
                error!("{}", e);
                return EXIT_RUN_FAILED;
            }
        };

        let shown: Vec<&str> = args.iter().chain(extra_args).map(String::as_str).collect();
        info!("Running tests: {} {}", program, shown.join(" "));

        let status = Command::new(program)
            .args(args)
            .args(extra_args)
            .env("CI", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        match status {
            Ok(status) => status.code().unwrap_or_else(|| {
                warn!("Test command terminated by signal");
                EXIT_RUN_FAILED
            }),
            Err(e) => {
                error!("Failed to run {}: {}", program, e);
                EXIT_RUN_FAILED
            }
        }
    }

    /// Announce the run, execute it, then announce the result.
    ///
    /// Returns the test command's exit code. Notification failures are only
    /// logged.
    pub async fn run_with_notifications(&self, extra_args: &[String]) -> i32 {
        let meta = self.notify.metadata();

        if let Some(notifier) = &self.notifier {
            info!("Sending start notification...");
            if let Err(e) = notifier.announce_start(&meta.branch, &meta.commit).await {
                log_notification_failure("Start", &e);
            }
        }

        let start = Instant::now();
        let code = self.run_suite(extra_args).await;
        info!(
            "Tests finished in {} (exit code {})",
            format_duration(start.elapsed().as_millis() as u64),
            code
        );

        let Some(notifier) = &self.notifier else {
            return code;
        };

        // The reporter may still be flushing the results file.
        tokio::time::sleep(self.runner.settle_delay()).await;

        match summarize(&self.runner.results_path, &meta) {
            Some(summary) => {
                if let Err(e) = notifier.announce_result(&summary).await {
                    log_notification_failure("Result", &e);
                }
            }
            None => warn!("No summary available, skipping result notification"),
        }

        code
    }
}

fn log_notification_failure(kind: &str, err: &E2eError) {
    if err.is_delivery_failure() {
        warn!("{} notification not delivered: {}", kind, err);
    } else {
        error!("{} notification failed: {}", kind, err);
    }
}
