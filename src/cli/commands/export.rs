//! Export command: write the filtered canonical dataset to disk

use super::shared::load_source;
use crate::app::services::reporting::export_dataset;
use crate::cli::args::ExportArgs;
use crate::config::Config;
use crate::{Result, filter};
use colored::*;
use tracing::warn;

/// Run the export command
pub fn run_export(args: &ExportArgs, config: &Config, show_progress: bool) -> Result<()> {
    let result = load_source(config, &args.source, &args.mapping, show_progress)?;

    let dataset = filter(&result.dataset, &args.filters.to_criteria())?;
    if dataset.is_empty() {
        warn!("No records match the filters; writing header only");
    }

    let path = args.output_path();
    let rows = export_dataset(&dataset, &path, args.format.into())?;

    if show_progress {
        println!(
            "{} {} rows to {}",
            "Wrote".bright_green().bold(),
            rows,
            path.display().to_string().bright_cyan()
        );
    }
    Ok(())
}
