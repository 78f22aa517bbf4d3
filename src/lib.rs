//! Tradeflow Library
//!
//! A Rust library for turning trade-shipment spreadsheets (CSV, Excel workbooks
//! and published Google Sheets) into a clean, schema-conformant dataset.
//!
//! This library provides tools for:
//! - Resolving arbitrary source column names onto the canonical shipment schema
//! - Normalizing quantities and dates, deriving calendar fields and dropping invalid rows
//! - Generating stable surrogate identifiers for importers and exporters
//! - Expanding state codes against a reference table
//! - Validating mapping completeness and schema conformance with actionable errors
//! - Filtering the canonical dataset and computing KPIs, trends, alerts and exports

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod column_mapper;
        pub mod filter;
        pub mod loader;
        pub mod normalizer;
        pub mod reporting;
        pub mod schema_registry;
        pub mod state_reference;
        pub mod validator;
    }
    pub mod adapters {
        pub mod key_store;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CanonicalDataset, RawTable, ShipmentRecord};
pub use app::services::column_mapper::{ColumnMapper, ColumnMapping, MappingStrategy};
pub use app::services::filter::{FilterCriteria, filter};
pub use app::services::loader::{LoadResult, Loader, Source};
pub use app::services::schema_registry::CanonicalField;
pub use config::Config;

/// Result type alias for tradeflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for loading, mapping, normalizing and reporting on shipment data
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Uploaded file has an extension no reader handles
    #[error("Unsupported file format '{extension}': expected .csv or .xlsx")]
    UnsupportedFormat { extension: String },

    /// Spreadsheet URL is malformed or points at the wrong host
    #[error("Invalid spreadsheet source '{source_url}': {reason}")]
    InvalidSource { source_url: String, reason: String },

    /// One or more required fields are not the target of any mapping entry
    #[error("Column mapping incomplete, no source column chosen for: {}", .missing.join(", "))]
    MappingIncomplete { missing: Vec<String> },

    /// One or more required columns are absent from the table
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// Every row was dropped during normalization
    #[error("No valid rows remain after normalization ({rows_dropped} of {rows_read} rows dropped)")]
    EmptyResult { rows_read: usize, rows_dropped: usize },

    /// Filter criterion cannot be applied
    #[error("Invalid filter on '{column}': {reason}")]
    Filter { column: String, reason: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Excel workbook could not be read
    #[error("Workbook error in '{file}': {message}")]
    Workbook {
        file: String,
        message: String,
        #[source]
        source: Option<calamine::XlsxError>,
    },

    /// Spreadsheet export could not be fetched
    #[error("Failed to fetch '{url}': {message}")]
    Fetch {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Tabular conversion or export failed
    #[error("Polars error: {message}")]
    Polars {
        message: String,
        #[source]
        source: polars::error::PolarsError,
    },
}

impl Error {
    /// Create an unsupported format error
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create an invalid source error
    pub fn invalid_source(source_url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            source_url: source_url.into(),
            reason: reason.into(),
        }
    }

    /// Create a mapping incomplete error
    pub fn mapping_incomplete(missing: Vec<String>) -> Self {
        Self::MappingIncomplete { missing }
    }

    /// Create a schema error naming every missing column
    pub fn schema(missing: Vec<String>) -> Self {
        Self::Schema { missing }
    }

    /// Create an empty result error
    pub fn empty_result(rows_read: usize, rows_dropped: usize) -> Self {
        Self::EmptyResult {
            rows_read,
            rows_dropped,
        }
    }

    /// Create a filter error
    pub fn filter(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Filter {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a workbook error with context
    pub fn workbook(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<calamine::XlsxError>,
    ) -> Self {
        Self::Workbook {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a fetch error with context
    pub fn fetch(
        url: impl Into<String>,
        message: impl Into<String>,
        source: Option<reqwest::Error>,
    ) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a polars error with context
    pub fn polars(message: impl Into<String>, source: polars::error::PolarsError) -> Self {
        Self::Polars {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<calamine::XlsxError> for Error {
    fn from(error: calamine::XlsxError) -> Self {
        Self::Workbook {
            file: "unknown".to_string(),
            message: "Workbook parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Fetch {
            url: error.url().map(|url| url.to_string()).unwrap_or_default(),
            message: "HTTP request failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::Polars {
            message: "DataFrame operation failed".to_string(),
            source: error,
        }
    }
}
