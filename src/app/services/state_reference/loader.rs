//! State reference loading from CSV files
//!
//! Reference files are plain CSV with a header row. The `code` and `name`
//! columns are located by header (case-insensitive); files without those
//! headers are read positionally from their first two columns.

use super::{ReferenceOrigin, StateReference};
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Statistics about loading a state reference file
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Data rows read from the file
    pub rows_read: usize,

    /// Codes loaded into the table
    pub codes_loaded: usize,

    /// Rows skipped because the code or name was blank
    pub rows_skipped: usize,

    /// Codes that appeared more than once (last occurrence kept)
    pub duplicate_codes: Vec<String>,

    /// Time taken to load the file
    pub load_duration: std::time::Duration,
}

impl LoadStats {
    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} state codes from {} rows ({} skipped, {} duplicates) in {:.3}s",
            self.codes_loaded,
            self.rows_read,
            self.rows_skipped,
            self.duplicate_codes.len(),
            self.load_duration.as_secs_f64()
        )
    }
}

impl StateReference {
    /// Load the table from a reference file, or fall back to the built-in table
    ///
    /// A configured path that does not exist falls back with a warning; a file
    /// that exists but cannot be parsed is an error.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No state reference file configured, using built-in table");
            return Ok(Self::builtin());
        };

        if !path.exists() {
            warn!(
                "State reference file not found at {}, using built-in table",
                path.display()
            );
            return Ok(Self::builtin());
        }

        let (reference, stats) = Self::load_from_file(path)?;
        info!("{}", stats.summary());
        Ok(reference)
    }

    /// Load the table from a CSV reference file
    ///
    /// # Errors
    /// * Returns `Error::CsvParsing` for unreadable or malformed files
    /// * Returns `Error::Configuration` if the file yields no codes
    pub fn load_from_file(path: &Path) -> Result<(Self, LoadStats)> {
        let start_time = Instant::now();
        let file_name = path.display().to_string();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| {
                Error::csv_parsing(&file_name, "Failed to open state reference file", Some(e))
            })?;

        let headers = reader
            .headers()
            .map_err(|e| Error::csv_parsing(&file_name, "Failed to read header row", Some(e)))?
            .clone();
        let (code_index, name_index) = locate_columns(&headers);
        debug!(
            "State reference columns in {}: code={}, name={}",
            file_name, code_index, name_index
        );

        let mut names_by_code = HashMap::new();
        let mut stats = LoadStats::default();

        for record in reader.records() {
            let record = record.map_err(|e| {
                Error::csv_parsing(&file_name, "Malformed state reference row", Some(e))
            })?;
            stats.rows_read += 1;

            let code = record.get(code_index).unwrap_or("").trim().to_uppercase();
            let name = record.get(name_index).unwrap_or("").trim();
            if code.is_empty() || name.is_empty() {
                stats.rows_skipped += 1;
                continue;
            }

            if names_by_code.insert(code.clone(), name.to_string()).is_some() {
                warn!("Duplicate state code '{}' in {}, keeping last", code, file_name);
                stats.duplicate_codes.push(code);
            }
        }

        if names_by_code.is_empty() {
            return Err(Error::configuration(format!(
                "State reference file {} contains no codes",
                file_name
            )));
        }

        stats.codes_loaded = names_by_code.len();
        stats.load_duration = start_time.elapsed();

        let reference = Self {
            names_by_code,
            origin: ReferenceOrigin::File(path.to_path_buf()),
        };

        Ok((reference, stats))
    }
}

/// Find the code and name column indices, defaulting to the first two columns
fn locate_columns(headers: &StringRecord) -> (usize, usize) {
    let find = |wanted: &str| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(wanted))
    };

    match (find("code"), find("name")) {
        (Some(code), Some(name)) => (code, name),
        _ => (0, 1),
    }
}
