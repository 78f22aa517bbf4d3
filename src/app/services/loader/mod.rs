//! Loading shipment data from uploads and published spreadsheets
//!
//! The loader drives one load from start to finish:
//!
//! 1. **Acquire** the raw table ([`readers`] for files, [`fetch`] for URLs)
//! 2. **Resolve** the column mapping ([`ColumnMapper`])
//! 3. **Validate** the mapping and the renamed headers
//! 4. **Normalize** into the canonical dataset ([`Normalizer`])
//! 5. **Validate** the dataset's columns and reject an empty result
//!
//! Any failure aborts the load; no partial dataset is returned.

pub mod fetch;
pub mod readers;
pub mod source;

#[cfg(test)]
pub mod tests;

pub use fetch::{HttpFetcher, SheetFetcher};
pub use source::{FileFormat, SheetUrl, Source};

use crate::app::adapters::key_store::EncryptionKey;
use crate::app::models::{CanonicalDataset, RawTable};
use crate::app::services::column_mapper::{ColumnMapper, ColumnMapping, MappingStrategy};
use crate::app::services::normalizer::{NormalizeStats, Normalizer, SurrogateIdGenerator};
use crate::app::services::state_reference::StateReference;
use crate::app::services::validator::{Stage, validate, validate_mapping};
use crate::config::Config;
use crate::constants::DEFAULT_SHEETS_HOST;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of a successful load
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub dataset: CanonicalDataset,
    /// Mapping the dataset was normalized with
    pub mapping: ColumnMapping,
    pub stats: NormalizeStats,
}

/// Runs the load pipeline for one source at a time
pub struct Loader {
    normalizer: Normalizer,
    fetcher: Box<dyn SheetFetcher>,
    sheets_host: String,
}

impl Loader {
    /// Create a loader with an explicit fetcher
    pub fn new(
        states: Arc<StateReference>,
        ids: SurrogateIdGenerator,
        fetcher: Box<dyn SheetFetcher>,
    ) -> Self {
        Self {
            normalizer: Normalizer::new(states, ids),
            fetcher,
            sheets_host: DEFAULT_SHEETS_HOST.to_string(),
        }
    }

    /// Create a loader from configuration, fetching over HTTP
    ///
    /// Identifiers are keyed with `key` when configuration asks for it.
    pub fn from_config(
        config: &Config,
        states: Arc<StateReference>,
        key: Option<&EncryptionKey>,
    ) -> Result<Self> {
        let ids = match key {
            Some(key) if config.keyed_ids => SurrogateIdGenerator::keyed(key),
            _ => SurrogateIdGenerator::new(),
        };
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;

        Ok(Self::new(states, ids, Box::new(fetcher))
            .with_sheets_host(config.sheets_host.clone())
            .with_day_first(config.day_first))
    }

    pub fn with_sheets_host(mut self, host: impl Into<String>) -> Self {
        self.sheets_host = host.into();
        self
    }

    pub fn with_day_first(mut self, day_first: bool) -> Self {
        self.normalizer = self.normalizer.with_day_first(day_first);
        self
    }

    /// Load `source` into a canonical dataset
    ///
    /// # Errors
    /// * `UnsupportedFormat` / `InvalidSource` for unusable sources
    /// * `CsvParsing`, `Workbook`, `Fetch` when the raw table cannot be read
    /// * `MappingIncomplete` when a sourced field has no column
    /// * `Schema` when required columns are missing
    /// * `EmptyResult` when every row is dropped
    pub fn load(&self, source: &Source, strategy: MappingStrategy<'_>) -> Result<LoadResult> {
        self.run(source, strategy).inspect_err(|e| {
            error!("Load of {} failed: {}", source.describe(), e);
        })
    }

    /// Acquire the raw table of `source` without mapping or normalizing it
    pub fn read_raw(&self, source: &Source) -> Result<RawTable> {
        match source {
            Source::File { name, bytes } => match FileFormat::from_name(name)? {
                FileFormat::Csv => readers::read_csv(name, bytes),
                FileFormat::Xlsx => readers::read_xlsx(name, bytes),
            },
            Source::Url(url) => {
                let sheet = SheetUrl::parse(url, &self.sheets_host)?;
                let bytes = self.fetcher.fetch(&sheet.export_url())?;
                readers::read_csv(url, &bytes)
            }
        }
    }

    fn run(&self, source: &Source, strategy: MappingStrategy<'_>) -> Result<LoadResult> {
        let table = self.read_raw(source)?;
        info!(
            "Read {} rows with {} columns from {}",
            table.row_count(),
            table.headers().len(),
            source.describe()
        );

        let mapping = ColumnMapper::resolve(table.headers(), strategy);
        validate_mapping(&mapping)?;
        validate(&mapping.rename_plan(table.headers()).renamed_columns(), Stage::PreNormalize)?;

        let result = self.normalizer.normalize(&table, &mapping)?;
        validate(&result.dataset.column_names(), Stage::Final)?;

        if result.dataset.is_empty() {
            return Err(Error::empty_result(
                result.stats.rows_read,
                result.stats.rows_dropped(),
            ));
        }

        info!(
            "Loaded {} shipments from {}",
            result.dataset.len(),
            source.describe()
        );

        Ok(LoadResult {
            dataset: result.dataset,
            mapping,
            stats: result.stats,
        })
    }
}
