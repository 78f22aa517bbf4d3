//! Application constants for tradeflow
//!
//! This module contains canonical column names, default file locations,
//! source-format constants and the built-in state reference table.

// =============================================================================
// Canonical Column Names
// =============================================================================

/// Canonical column names as they appear in the normalized dataset
pub mod columns {
    pub const QUANTITY: &str = "Quantity";
    pub const DATE: &str = "Date";
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const CONSIGNEE_NAME: &str = "Consignee Name";
    pub const EXPORTER_NAME: &str = "Exporter Name";
    pub const STATE: &str = "State";
    pub const IMPORTER_ID: &str = "Importer ID";
    pub const EXPORTER_ID: &str = "Exporter ID";
}

/// Month names indexed by zero-based month
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// =============================================================================
// Source Formats
// =============================================================================

/// Extension accepted for comma-separated uploads
pub const CSV_EXTENSION: &str = "csv";

/// Extension accepted for Excel workbook uploads
pub const XLSX_EXTENSION: &str = "xlsx";

/// Host serving published spreadsheets
pub const DEFAULT_SHEETS_HOST: &str = "docs.google.com";

/// Path segment preceding the spreadsheet identifier in a sheet URL
pub const SHEET_ID_MARKER: &str = "d";

/// Default timeout for fetching a published spreadsheet
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Column name given to headers left blank in the source
pub const UNNAMED_COLUMN_PREFIX: &str = "Unnamed: ";

// =============================================================================
// Identity Derivation
// =============================================================================

/// Prefix of generated importer identifiers
pub const IMPORTER_ID_PREFIX: &str = "IMP";

/// Prefix of generated exporter identifiers
pub const EXPORTER_ID_PREFIX: &str = "EXP";

/// Number of digest bytes kept in a surrogate identifier (64 bits)
pub const SURROGATE_ID_BYTES: usize = 8;

/// Length in bytes of the process encryption key
pub const KEY_LENGTH_BYTES: usize = 32;

// =============================================================================
// Default File Locations
// =============================================================================

/// Application directory name under the platform data/config directories
pub const APP_DIR_NAME: &str = "tradeflow";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default encryption key file name
pub const KEY_FILE_NAME: &str = "encryption_key.key";

/// Default append-only log file name
pub const LOG_FILE_NAME: &str = "tradeflow.log";

// =============================================================================
// Reporting
// =============================================================================

/// State value used for shipments without a specific state
pub const NATIONAL_STATE_NAME: &str = "India";

/// Filter value meaning "do not filter on this criterion"
pub const FILTER_ALL: &str = "All";

/// Importers and exporters listed in a report
pub const DEFAULT_TOP_N: usize = 10;

/// Rows shown by `tradeflow load`
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Default alert thresholds
pub mod alert_thresholds {
    /// Shipments below this quantity count as low imports
    pub const LOW_QUANTITY: f64 = 1000.0;

    /// Year-over-year growth above this percentage is flagged
    pub const HIGH_GROWTH_PERCENT: f64 = 30.0;

    /// Year-over-year growth below this percentage is flagged as a decline
    pub const DECLINE_PERCENT: f64 = -20.0;

    /// Month-over-month change below this quantity is flagged as a sudden drop
    pub const SUDDEN_DROP_QUANTITY: f64 = -10_000.0;
}

// =============================================================================
// State Reference Table
// =============================================================================

/// Built-in state code table used when no reference file is configured
pub const DEFAULT_STATE_CODES: &[(&str, &str)] = &[
    ("AP", "Andhra Pradesh"),
    ("AR", "Arunachal Pradesh"),
    ("AS", "Assam"),
    ("BR", "Bihar"),
    ("CT", "Chhattisgarh"),
    ("GA", "Goa"),
    ("GJ", "Gujarat"),
    ("HR", "Haryana"),
    ("HP", "Himachal Pradesh"),
    ("JH", "Jharkhand"),
    ("KA", "Karnataka"),
    ("KL", "Kerala"),
    ("MP", "Madhya Pradesh"),
    ("MH", "Maharashtra"),
    ("MN", "Manipur"),
    ("ML", "Meghalaya"),
    ("MZ", "Mizoram"),
    ("NL", "Nagaland"),
    ("OR", "Odisha"),
    ("PB", "Punjab"),
    ("RJ", "Rajasthan"),
    ("SK", "Sikkim"),
    ("TN", "Tamil Nadu"),
    ("TG", "Telangana"),
    ("TR", "Tripura"),
    ("UP", "Uttar Pradesh"),
    ("UK", "Uttarakhand"),
    ("WB", "West Bengal"),
    ("JK", "Jammu & Kashmir"),
    ("LD", "Lakshadweep"),
    ("PY", "Puducherry"),
    ("CH", "Chandigarh"),
    ("AN", "Andaman & Nicobar Islands"),
    ("DN", "Dadra & Nagar Haveli"),
    ("DL", "Delhi"),
    ("INDIA", "India"),
];
