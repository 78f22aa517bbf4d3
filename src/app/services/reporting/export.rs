//! Dataset export to CSV and Parquet

use crate::app::models::CanonicalDataset;
use crate::{Error, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// Snappy-compressed Parquet
    Parquet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}

/// Write `dataset` as CSV to any writer
pub fn write_csv<W: Write>(dataset: &CanonicalDataset, writer: W) -> Result<()> {
    let mut df = dataset.to_dataframe()?;
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| Error::polars("Failed to write CSV", e))
}

/// Write `dataset` to `path`, creating parent directories, and return the row count
pub fn export_dataset(dataset: &CanonicalDataset, path: &Path, format: ExportFormat) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io(format!("Failed to create output directory {}", parent.display()), e)
        })?;
    }

    let file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;

    match format {
        ExportFormat::Csv => write_csv(dataset, file)?,
        ExportFormat::Parquet => {
            let mut df = dataset.to_dataframe()?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| Error::polars("Failed to write Parquet", e))?;
        }
    }

    info!(
        "Exported {} rows to {} ({})",
        dataset.len(),
        path.display(),
        format.extension()
    );
    Ok(dataset.len())
}
