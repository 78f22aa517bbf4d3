//! Shared components for CLI commands
//!
//! Logging setup, loader construction, mapping strategy selection and the
//! stdin column prompt used by every subcommand.

use crate::app::adapters::key_store::KeyStore;
use crate::app::services::column_mapper::MappingPrompt;
use crate::app::services::state_reference::StateReference;
use crate::cli::args::{Args, MappingArgs};
use crate::config::Config;
use crate::constants::LOG_FILE_NAME;
use crate::{CanonicalField, ColumnMapping, Error, LoadResult, Loader, MappingStrategy, Result, Source};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Set up structured logging to stderr and the append-only log file
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the program exits.
pub fn setup_logging(args: &Args, config: &Config) -> Result<WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tradeflow={}", log_level)));

    let log_path = config.log_path();
    let log_dir = log_path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(log_dir).map_err(|e| {
        Error::io(format!("Failed to create log directory {}", log_dir.display()), e)
    })?;
    let file_name = log_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| LOG_FILE_NAME.into());

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    debug!("Logging initialized at level: {}", log_level);
    Ok(guard)
}

/// Build a loader from configuration
///
/// Loads the state reference (falling back to the built-in table) and, when
/// identifiers are keyed, the encryption key, creating it on first use.
pub fn build_loader(config: &Config) -> Result<Loader> {
    let states = Arc::new(StateReference::load_or_builtin(config.state_reference.as_deref())?);
    debug!("Using {} state codes", states.len());

    let key = if config.keyed_ids {
        Some(KeyStore::load_or_create(&config.key_path())?)
    } else {
        None
    };

    Loader::from_config(config, states, key.as_ref())
}

/// Read a preset mapping from a TOML file of `"column" = "Field"` entries
pub fn read_mapping_file(path: &Path) -> Result<ColumnMapping> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read mapping file {}", path.display()), e))?;
    toml::from_str(&text).map_err(|e| {
        Error::configuration(format!("Invalid mapping file {}: {}", path.display(), e))
    })
}

/// Load `source_arg` with the mapping mode chosen on the command line
///
/// Without an explicit mode, a `[mapping]` from configuration is used as a
/// preset, otherwise columns are matched automatically.
pub fn load_source(
    config: &Config,
    source_arg: &str,
    mapping: &MappingArgs,
    show_progress: bool,
) -> Result<LoadResult> {
    let loader = build_loader(config)?;
    let source = Source::from_arg(source_arg)?;

    let mut prompt = StdinPrompt::new(io::stdin().lock());
    let strategy = if mapping.interactive {
        MappingStrategy::Interactive(&mut prompt)
    } else if let Some(path) = &mapping.mapping_file {
        MappingStrategy::Preset(read_mapping_file(path)?)
    } else if mapping.auto {
        MappingStrategy::Automatic
    } else if let Some(preset) = &config.mapping {
        MappingStrategy::Preset(preset.clone())
    } else {
        MappingStrategy::Automatic
    };
    info!("Loading {} with {} mapping", source.describe(), strategy.name());

    // Prompts write to stdout, so no spinner while they are active
    let spinner = (show_progress && !mapping.interactive)
        .then(|| create_spinner(&format!("Loading {}", source.describe())));

    let result = loader.load(&source, strategy);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result
}

/// Create a spinner for work of unknown length
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format a quantity with thousands separators and up to two decimals
pub fn format_quantity(quantity: f64) -> String {
    let rounded = format!("{:.2}", quantity);
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", whole),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction == "00" {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction.trim_end_matches('0'))
    }
}

/// Column prompt over a line-oriented reader and stdout
pub struct StdinPrompt<R> {
    input: R,
}

impl<R: BufRead> StdinPrompt<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read column choice: {}", e);
                None
            }
        }
    }
}

/// Interpret one answer; `Err` means the answer was not understood
fn parse_choice(
    answer: &str,
    candidates: &[String],
    suggestion: Option<&str>,
) -> std::result::Result<Option<String>, ()> {
    if answer.is_empty() {
        return Ok(suggestion.map(str::to_string));
    }
    if answer == "0" || answer == "-" {
        return Ok(None);
    }
    if let Ok(number) = answer.parse::<usize>() {
        return candidates.get(number.wrapping_sub(1)).cloned().map(Some).ok_or(());
    }
    candidates
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(answer))
        .cloned()
        .map(Some)
        .ok_or(())
}

impl<R: BufRead> MappingPrompt for StdinPrompt<R> {
    fn choose(
        &mut self,
        field: CanonicalField,
        candidates: &[String],
        suggestion: Option<&str>,
    ) -> Option<String> {
        println!();
        println!("{}", format!("Source column for {}:", field.label()).bright_green().bold());
        for (i, candidate) in candidates.iter().enumerate() {
            let marker = if Some(candidate.as_str()) == suggestion { " (suggested)" } else { "" };
            println!(
                "  {}. {}{}",
                (i + 1).to_string().bright_yellow().bold(),
                candidate.bright_cyan(),
                marker.bright_black()
            );
        }

        loop {
            print!(
                "{}",
                format!(
                    "Column number or name (Enter = {}, 0 = none): ",
                    suggestion.unwrap_or("none")
                )
                .bright_white()
            );
            if let Err(e) = io::stdout().flush() {
                warn!("Failed to flush prompt: {}", e);
            }

            let answer = self.read_answer()?;
            match parse_choice(&answer, candidates, suggestion) {
                Ok(choice) => return choice,
                Err(()) => println!("{}", format!("'{}' is not one of the columns", answer).red()),
            }
        }
    }
}
