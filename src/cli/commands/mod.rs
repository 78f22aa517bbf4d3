//! Command implementations for the tradeflow CLI
//!
//! Each subcommand lives in its own module:
//! - `load`: mapping, row statistics and a preview
//! - `report`: KPIs, trends and alerts, as text or JSON
//! - `export`: CSV or Parquet output

pub mod export;
pub mod load;
pub mod report;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};
use crate::config::Config;

/// Dispatch to the subcommand handler
pub fn run(args: &Args, config: &Config) -> Result<()> {
    let show_progress = args.show_progress();
    match &args.command {
        Commands::Load(load_args) => load::run_load(load_args, config, show_progress),
        Commands::Report(report_args) => report::run_report(report_args, config, show_progress),
        Commands::Export(export_args) => export::run_export(export_args, config, show_progress),
    }
}
