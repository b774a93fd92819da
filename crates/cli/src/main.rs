//! loginsuite CLI - Main Entry Point
//!
//! Runs the login page E2E suite, summarizes its JSON results and posts
//! run notifications to a chat webhook.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;

mod commands;
mod output;

use commands::{notify, run, summary};
use loginsuite_e2e::config::{Config, CONFIG_FILE_NAME, ENV_WEBHOOK};

/// loginsuite - Playwright login suite with chat notifications
#[derive(Parser, Debug)]
#[command(name = "loginsuite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Chat webhook URL
    #[arg(long, env = ENV_WEBHOOK, hide_env_values = true, global = true)]
    webhook: Option<String>,

    /// Branch name shown in notifications
    #[arg(long, global = true)]
    branch: Option<String>,

    /// Commit hash shown in notifications
    #[arg(long, global = true)]
    commit: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the test suite, bracketed by start and result notifications
    Run(run::RunArgs),

    /// Print the summary of an existing results file
    Summary(summary::SummaryArgs),

    /// Send a single notification
    #[command(subcommand)]
    Notify(notify::NotifyCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let config = match (&cli.command, build_config(&cli)) {
        (_, Ok(config)) => config,
        // A broken harness config must not keep the suite from running.
        (Commands::Run(_), Err(e)) => {
            warn!("{:#}; continuing with default configuration", e);
            layer_config(&cli, Config::default())
        }
        (_, Err(e)) => return Err(e),
    };

    match cli.command {
        Commands::Run(args) => {
            let code = run::execute(args, config).await;
            std::process::exit(code);
        }
        Commands::Summary(args) => {
            if let Err(e) = summary::execute(args, config, cli.format) {
                output::print_error(&e.to_string());
                std::process::exit(1);
            }
        }
        Commands::Notify(cmd) => {
            if let Err(e) = notify::execute(cmd, config).await {
                output::print_error(&format!("{:#}", e));
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Config file, then environment, then flags.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    Ok(layer_config(cli, config))
}

fn layer_config(cli: &Cli, mut config: Config) -> Config {
    config.apply_env();

    let notify = &mut config.notify;
    if let Some(url) = &cli.webhook {
        notify.webhook_url = Some(url.clone());
    }
    if let Some(branch) = &cli.branch {
        notify.branch = Some(branch.clone());
    }
    if let Some(commit) = &cli.commit {
        notify.commit = Some(commit.clone());
    }
    notify.fill_from_git();

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_passthrough_args() {
        let cli = Cli::try_parse_from([
            "loginsuite",
            "run",
            "--no-notify",
            "--",
            "--project=chromium",
            "--grep",
            "login",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert!(args.no_notify);
                assert_eq!(args.test_args, vec!["--project=chromium", "--grep", "login"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_notify_result() {
        let cli = Cli::try_parse_from([
            "loginsuite",
            "--format",
            "json",
            "notify",
            "result",
            "--results",
            "out/results.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Notify(notify::NotifyCommands::Result(args)) => {
                assert_eq!(args.results, Some(PathBuf::from("out/results.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_file_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[notify]\nbranch = \"from-file\"\ncommit = \"cafebabe\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "loginsuite",
            "--config",
            path.to_str().unwrap(),
            "--branch",
            "from-flag",
            "summary",
        ])
        .unwrap();

        let config = build_config(&cli).unwrap();
        assert_eq!(config.notify.branch(), "from-flag");
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[runner]\nsettle_delay_ms = \"soon\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "loginsuite",
            "--config",
            path.to_str().unwrap(),
            "--branch",
            "from-flag",
            "run",
        ])
        .unwrap();

        assert!(build_config(&cli).is_err());
        let fallback = layer_config(&cli, Config::default());
        assert_eq!(fallback.notify.branch(), "from-flag");
        assert_eq!(fallback.runner.settle_delay_ms, 1_000);
    }
}
