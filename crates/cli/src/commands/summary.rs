//! Summarize an existing results file

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use loginsuite_e2e::{summarize, Config};

use crate::output::{print_item, OutputFormat};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Results document (defaults to runner.results_path)
    #[arg(short, long)]
    pub results: Option<PathBuf>,
}

pub fn execute(args: SummaryArgs, config: Config, format: OutputFormat) -> Result<()> {
    let path = args.results.unwrap_or(config.runner.results_path);

    let Some(summary) = summarize(&path, &config.notify.metadata()) else {
        bail!("No summary available for {}", path.display());
    };

    print_item(&summary, format);
    Ok(())
}
