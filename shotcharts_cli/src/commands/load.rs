use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use shotcharts_lib::{filter_shots, load_shots_csv, summarize, ShotFilter};

use crate::output::{print_shots, print_summary, OutputFormat};

#[derive(Args)]
pub struct LoadArgs {
    /// Path to a shots CSV (header row, one shot per line)
    pub path: PathBuf,

    /// Filter criteria as key=value, repeatable
    /// (e.g. --filter team=SAC --filter made=true)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Print shooting percentages instead of the shot table
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: &LoadArgs, format: &OutputFormat) -> Result<()> {
    let mut filter = ShotFilter::default();
    for criterion in &args.filters {
        let Some((key, value)) = criterion.split_once('=') else {
            bail!("filter '{criterion}' is not of the form key=value");
        };
        filter = filter.with_criterion(key.trim(), value.trim())?;
    }

    let shots = load_shots_csv(&args.path)?;
    let shots = filter_shots(&shots, &filter);

    if args.summary {
        print_summary(&summarize(&shots), format)?;
    } else {
        print_shots(&shots, format)?;
    }
    Ok(())
}
