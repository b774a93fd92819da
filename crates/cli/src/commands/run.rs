//! Run the browser suite with notifications

use clap::Args;
use tracing::info;

use loginsuite_e2e::{Config, SuiteRunner};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Do not send start/result notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Milliseconds to wait for the results file after the tests exit
    #[arg(long)]
    pub settle_delay_ms: Option<u64>,

    /// Extra arguments appended to the test command (after `--`)
    #[arg(last = true)]
    pub test_args: Vec<String>,
}

/// Run the suite and return the test command's exit code.
pub async fn execute(args: RunArgs, mut config: Config) -> i32 {
    if let Some(ms) = args.settle_delay_ms {
        config.runner.settle_delay_ms = ms;
    }

    info!(
        "Branch {} at {}",
        config.notify.branch(),
        config.notify.commit()
    );

    let runner = SuiteRunner::new(config, !args.no_notify);
    if runner.notifications_enabled() {
        info!("Start and result notifications enabled");
    }
    runner.run_with_notifications(&args.test_args).await
}
