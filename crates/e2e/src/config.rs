//! Harness configuration
//!
//! Values are layered: `loginsuite.toml` (optional) first, then environment
//! variables, then whatever the CLI passes on top.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::summary::RunMetadata;

/// Default name of the config file, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "loginsuite.toml";

pub const ENV_WEBHOOK: &str = "DISCORD_WEBHOOK";
pub const ENV_BRANCH: &str = "GITHUB_REF_NAME";
pub const ENV_COMMIT: &str = "GITHUB_SHA";
pub const ENV_RUN_ID: &str = "GITHUB_RUN_ID";
pub const ENV_SERVER_URL: &str = "GITHUB_SERVER_URL";
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";

const FALLBACK_BRANCH: &str = "local";
const FALLBACK_COMMIT: &str = "unknown";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Everything the notifier needs to know about where a run came from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Chat webhook endpoint. Notifications are disabled when unset.
    pub webhook_url: Option<String>,

    pub branch: Option<String>,

    pub commit: Option<String>,

    /// CI run identifier, used to build the report link.
    pub run_id: Option<String>,

    /// Repository web URL, e.g. `https://github.com/acme/login-e2e`.
    pub repository_url: Option<String>,
}

/// Configuration for spawning the browser suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Program and arguments of the test command.
    pub command: Vec<String>,

    /// Results document written by the JSON reporter.
    pub results_path: PathBuf,

    /// Pause between the test command exiting and reading the results file.
    pub settle_delay_ms: u64,

    /// Per-request timeout for webhook calls.
    pub request_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "npx".to_string(),
                "playwright".to_string(),
                "test".to_string(),
                "--reporter=json".to_string(),
            ],
            results_path: PathBuf::from("test-results/results.json"),
            settle_delay_ms: 1_000,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it is absent.
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            debug!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let notify = &mut self.notify;

        if let Some(url) = get(ENV_WEBHOOK) {
            notify.webhook_url = Some(url);
        }
        if let Some(branch) = get(ENV_BRANCH) {
            notify.branch = Some(branch);
        }
        if let Some(commit) = get(ENV_COMMIT) {
            notify.commit = Some(commit);
        }
        if let Some(run_id) = get(ENV_RUN_ID) {
            notify.run_id = Some(run_id);
        }
        if let (Some(server), Some(repo)) = (get(ENV_SERVER_URL), get(ENV_REPOSITORY)) {
            notify.repository_url = Some(format!("{}/{}", server.trim_end_matches('/'), repo));
        }
    }
}

impl NotifyConfig {
    /// Fill branch and commit from the local git checkout when CI did not
    /// provide them.
    pub fn fill_from_git(&mut self) {
        if self.branch.is_none() {
            self.branch = git_output(&["branch", "--show-current"]);
        }
        if self.commit.is_none() {
            self.commit = git_output(&["rev-parse", "HEAD"]);
        }
    }

    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(FALLBACK_BRANCH)
    }

    pub fn commit(&self) -> &str {
        self.commit.as_deref().unwrap_or(FALLBACK_COMMIT)
    }

    /// Link to the CI run, when both the repository and the run id are known.
    pub fn report_url(&self) -> Option<String> {
        let repo = self.repository_url.as_deref()?;
        let run_id = self.run_id.as_deref()?;
        Some(format!("{}/actions/runs/{}", repo.trim_end_matches('/'), run_id))
    }

    pub fn metadata(&self) -> RunMetadata {
        RunMetadata {
            branch: self.branch().to_string(),
            commit: self.commit().to_string(),
            report_url: self.report_url(),
        }
    }

    /// Parse and validate the webhook URL.
    pub fn webhook(&self) -> E2eResult<Url> {
        let raw = match self.webhook_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(E2eError::WebhookNotConfigured),
        };

        let url = Url::parse(raw).map_err(|e| E2eError::InvalidWebhookUrl(e.to_string()))?;
        match url.scheme() {
            "https" | "http" => {}
            other => {
                return Err(E2eError::InvalidWebhookUrl(format!(
                    "unsupported scheme '{}'",
                    other
                )))
            }
        }
        if url.host_str().is_none() {
            return Err(E2eError::InvalidWebhookUrl("missing host".to_string()));
        }
        Ok(url)
    }
}

impl RunnerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Split the command into program and arguments.
    pub fn program(&self) -> E2eResult<(&str, &[String])> {
        match self.command.split_first() {
            Some((program, args)) if !program.is_empty() => Ok((program.as_str(), args)),
            _ => Err(E2eError::Config("runner.command is empty".to_string())),
        }
    }
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(config.notify.webhook_url.is_none());
        assert_eq!(config.runner.results_path, PathBuf::from("test-results/results.json"));
        assert_eq!(config.runner.settle_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[notify]
repository_url = "https://github.com/acme/login-e2e"

[runner]
command = ["npx", "playwright", "test", "--project=chromium", "--reporter=json"]
settle_delay_ms = 0
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.notify.repository_url.as_deref(),
            Some("https://github.com/acme/login-e2e")
        );
        assert_eq!(config.runner.command.len(), 5);
        assert_eq!(config.runner.settle_delay_ms, 0);
        assert_eq!(config.runner.request_timeout_secs, 10);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[runner]\nsettle_delay_ms = \"soon\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(E2eError::Toml(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.notify.branch = Some("from-file".to_string());

        config.apply_env_from(env(&[
            (ENV_WEBHOOK, "https://discord.com/api/webhooks/1/abc"),
            (ENV_BRANCH, "feature/login"),
            (ENV_COMMIT, "0123456789abcdef"),
            (ENV_RUN_ID, "42"),
            (ENV_SERVER_URL, "https://github.com/"),
            (ENV_REPOSITORY, "acme/login-e2e"),
        ]));

        let meta = config.notify.metadata();
        assert_eq!(meta.branch, "feature/login");
        assert_eq!(meta.commit, "0123456789abcdef");
        assert_eq!(
            meta.report_url.as_deref(),
            Some("https://github.com/acme/login-e2e/actions/runs/42")
        );
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env_from(env(&[(ENV_WEBHOOK, "  "), (ENV_BRANCH, "")]));
        assert!(config.notify.webhook_url.is_none());
        assert_eq!(config.notify.branch(), "local");
        assert_eq!(config.notify.commit(), "unknown");
    }

    #[test]
    fn test_report_url_needs_run_id() {
        let notify = NotifyConfig {
            repository_url: Some("https://github.com/acme/login-e2e".to_string()),
            ..Default::default()
        };
        assert!(notify.report_url().is_none());
    }

    #[test]
    fn test_webhook_validation() {
        let mut notify = NotifyConfig::default();
        assert!(matches!(notify.webhook(), Err(E2eError::WebhookNotConfigured)));

        notify.webhook_url = Some("not a url".to_string());
        assert!(matches!(notify.webhook(), Err(E2eError::InvalidWebhookUrl(_))));

        notify.webhook_url = Some("ftp://example.com/hook".to_string());
        assert!(matches!(notify.webhook(), Err(E2eError::InvalidWebhookUrl(_))));

        notify.webhook_url = Some("https://discord.com/api/webhooks/1/abc?wait=true".to_string());
        let url = notify.webhook().unwrap();
        assert_eq!(url.host_str(), Some("discord.com"));
        assert_eq!(url.path(), "/api/webhooks/1/abc");
        assert_eq!(url.query(), Some("wait=true"));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let runner = RunnerConfig {
            command: vec![],
            ..Default::default()
        };
        assert!(matches!(runner.program(), Err(E2eError::Config(_))));

        let defaults = RunnerConfig::default();
        let (program, args) = defaults.program().unwrap();
        assert_eq!(program, "npx");
        assert_eq!(args, vec!["playwright", "test", "--reporter=json"]);
    }
}
