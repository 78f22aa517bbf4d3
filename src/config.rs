//! Configuration management and validation.
//!
//! Configuration is read from a TOML file: the path given on the command
//! line, else `<config dir>/tradeflow/config.toml`, else built-in defaults.
//! Every field is optional in the file.
//!
//! ```toml
//! data_dir = "/var/lib/tradeflow"
//! state_reference = "states.csv"
//! day_first = true
//!
//! [alerts]
//! low_quantity = 500.0
//!
//! [mapping]
//! "Qty" = "Quantity"
//! ```

use crate::app::services::column_mapper::ColumnMapping;
use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_SHEETS_HOST, KEY_FILE_NAME,
    LOG_FILE_NAME, alert_thresholds,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Thresholds for smart alerts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Shipments below this quantity are reported as low imports
    pub low_quantity: f64,

    /// Year-over-year growth above this percentage is reported
    pub high_growth_percent: f64,

    /// Year-over-year growth below this percentage is reported as a decline
    pub decline_percent: f64,

    /// Month-over-month change below this quantity is reported as a sudden drop
    pub sudden_drop_quantity: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_quantity: alert_thresholds::LOW_QUANTITY,
            high_growth_percent: alert_thresholds::HIGH_GROWTH_PERCENT,
            decline_percent: alert_thresholds::DECLINE_PERCENT,
            sudden_drop_quantity: alert_thresholds::SUDDEN_DROP_QUANTITY,
        }
    }
}

/// Global configuration for tradeflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the key file and log file unless overridden
    pub data_dir: PathBuf,

    /// Encryption key file (default: `<data_dir>/encryption_key.key`)
    pub key_file: Option<PathBuf>,

    /// Append-only log file (default: `<data_dir>/tradeflow.log`)
    pub log_file: Option<PathBuf>,

    /// CSV file of state codes; the built-in table is used when unset or absent
    pub state_reference: Option<PathBuf>,

    /// Host allowed to serve published spreadsheets
    pub sheets_host: String,

    /// Timeout for fetching a published spreadsheet, in seconds
    pub fetch_timeout_secs: u64,

    /// Read numeric dates day-first (`05/01/2023` = 5 January)
    pub day_first: bool,

    /// Key surrogate identifiers with the encryption key
    pub keyed_ids: bool,

    /// Smart alert thresholds
    pub alerts: AlertThresholds,

    /// Preset column mapping used instead of automatic matching
    pub mapping: Option<ColumnMapping>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key_file: None,
            log_file: None,
            state_reference: None,
            sheets_host: DEFAULT_SHEETS_HOST.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            day_first: true,
            keyed_ids: true,
            alerts: AlertThresholds::default(),
            mapping: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Default configuration file location, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load configuration from `path`, the default location, or defaults
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read configuration {}", path.display()), e)
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text).map_err(|e| match e {
            Error::Configuration { message } => {
                Error::configuration(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::configuration(e.to_string()))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let host = self.sheets_host.trim();
        if host.is_empty() || host.contains('/') {
            return Err(Error::configuration(format!(
                "sheets_host must be a bare host name, got '{}'",
                self.sheets_host
            )));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(Error::configuration("fetch_timeout_secs must be greater than zero"));
        }

        if self.alerts.low_quantity < 0.0 {
            return Err(Error::configuration("alerts.low_quantity must not be negative"));
        }

        if self.alerts.decline_percent >= self.alerts.high_growth_percent {
            return Err(Error::configuration(
                "alerts.decline_percent must be below alerts.high_growth_percent",
            ));
        }

        Ok(())
    }

    pub fn key_path(&self) -> PathBuf {
        self.key_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(KEY_FILE_NAME))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_FILE_NAME))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_state_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_reference = Some(path.into());
        self
    }

    pub fn with_sheets_host(mut self, host: impl Into<String>) -> Self {
        self.sheets_host = host.into();
        self
    }

    /// Read numeric dates month-first instead of day-first
    pub fn with_month_first_dates(mut self) -> Self {
        self.day_first = false;
        self
    }

    /// Derive identifiers from names alone, without the key
    pub fn without_keyed_ids(mut self) -> Self {
        self.keyed_ids = false;
        self
    }

    pub fn with_alerts(mut self, alerts: AlertThresholds) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }
}
