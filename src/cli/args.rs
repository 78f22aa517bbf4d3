//! Command-line argument definitions for tradeflow
//!
//! The CLI is a thin shell over the library: every subcommand loads one
//! source, optionally narrows it with filters, then prints or writes it.

use crate::app::services::reporting::ExportFormat;
use crate::constants::{DEFAULT_PREVIEW_ROWS, DEFAULT_TOP_N};
use crate::FilterCriteria;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tradeflow shipment analyzer
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tradeflow",
    version,
    about = "Load trade-shipment spreadsheets into a clean dataset and report on them",
    long_about = "Loads shipment data from CSV files, Excel workbooks or published Google \
                  Sheets, maps its columns onto the canonical shipment schema, drops rows \
                  with unusable quantities or dates, and reports KPIs, trends and alerts."
)]
pub struct Args {
    /// Path to configuration file
    ///
    /// TOML file with data directory, state reference, alert thresholds and
    /// an optional preset `[mapping]`. If not specified, looks for
    /// <config_dir>/tradeflow/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress all output except errors"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load a source and show the mapping, row statistics and a preview
    Load(LoadArgs),
    /// Print KPIs, trends and alerts for a source
    Report(ReportArgs),
    /// Write the canonical dataset of a source to CSV or Parquet
    Export(ExportArgs),
}

/// How source columns are matched to the shipment schema
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MappingArgs {
    /// Match columns automatically (default unless the config has a mapping)
    #[arg(long = "auto", conflicts_with_all = ["interactive", "mapping_file"])]
    pub auto: bool,

    /// Ask for each field which column feeds it
    #[arg(long = "interactive", conflicts_with = "mapping_file")]
    pub interactive: bool,

    /// TOML file of `"source column" = "Canonical Field"` entries
    #[arg(long = "mapping", value_name = "FILE")]
    pub mapping_file: Option<PathBuf>,
}

/// Filters applied to the loaded dataset
///
/// `All` (or leaving a flag out) disables that criterion.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// State name or code, e.g. `MH` or `Maharashtra`
    #[arg(long = "state", value_name = "STATE")]
    pub state: Option<String>,

    /// Month name, e.g. `March`
    #[arg(long = "month", value_name = "MONTH")]
    pub month: Option<String>,

    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<String>,

    /// Importer name or ID
    #[arg(long = "importer", value_name = "IMPORTER")]
    pub importer: Option<String>,

    /// Exporter name or ID
    #[arg(long = "exporter", value_name = "EXPORTER")]
    pub exporter: Option<String>,

    /// Equality filter on an extra column (repeatable)
    #[arg(long = "column", value_name = "NAME=VALUE", value_parser = parse_column_filter)]
    pub columns: Vec<(String, String)>,
}

/// Arguments for the load command
#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    /// File path or published spreadsheet URL
    #[arg(value_name = "SOURCE")]
    pub source: String,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Number of rows to preview
    #[arg(long = "preview", value_name = "ROWS", default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview: usize,

    /// List every dropped row instead of a summary
    #[arg(long = "show-issues")]
    pub show_issues: bool,
}

/// Arguments for the report command
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// File path or published spreadsheet URL
    #[arg(value_name = "SOURCE")]
    pub source: String,

    #[command(flatten)]
    pub mapping: MappingArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Importers and exporters to list
    #[arg(long = "top", value_name = "N", default_value_t = DEFAULT_TOP_N)]
    pub top: usize,
}

/// Arguments for the export command
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// File path or published spreadsheet URL
    #[arg(value_name = "SOURCE")]
    pub source: String,

    #[command(flatten)]
    pub mapping: MappingArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output file; the format extension is added when missing
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: PathBuf,

    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormat,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable tables
    Text,
    /// Machine-readable JSON
    Json,
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Parquet => ExportFormat::Parquet,
        }
    }
}

fn parse_column_filter(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing column name in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl Args {
    /// Get log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if spinners and summaries should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(config) = &self.config_file
            && !config.exists()
        {
            return Err(Error::configuration(format!(
                "Configuration file does not exist: {}",
                config.display()
            )));
        }

        let mapping = match &self.command {
            Commands::Load(args) => &args.mapping,
            Commands::Report(args) => {
                if args.top == 0 {
                    return Err(Error::configuration("--top must be at least 1"));
                }
                &args.mapping
            }
            Commands::Export(args) => {
                if args.output.is_dir() {
                    return Err(Error::configuration(format!(
                        "Output path is a directory: {}",
                        args.output.display()
                    )));
                }
                &args.mapping
            }
        };

        if let Some(path) = &mapping.mapping_file
            && !path.exists()
        {
            return Err(Error::configuration(format!(
                "Mapping file does not exist: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

impl FilterArgs {
    /// Convert the flags into filter criteria
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            state: self.state.clone(),
            month: self.month.clone(),
            year: self.year.clone(),
            importer: self.importer.clone(),
            exporter: self.exporter.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl ExportArgs {
    /// Output path with the format's extension
    pub fn output_path(&self) -> PathBuf {
        let extension = ExportFormat::from(self.format).extension();
        if self.output.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(extension)) {
            self.output.clone()
        } else {
            self.output.with_extension(extension)
        }
    }
}
