//! Normalization of raw shipment tables into the canonical dataset
//!
//! # Architecture
//!
//! - [`processor`] - the [`Normalizer`] and per-row pipeline
//! - [`field_parsers`] - cell access, quantity extraction and date parsing
//! - [`identity`] - surrogate importer/exporter identifiers
//! - [`stats`] - row issues, statistics and the normalization result
//!
//! # Pipeline
//!
//! 1. **Rename**: the column mapping becomes a rename plan; unmapped columns
//!    are kept as extras unless they collide with a canonical name
//! 2. **Type**: quantity and date are parsed; year and month follow from the date
//! 3. **Filter**: rows missing any sourced field are dropped and recorded
//! 4. **Identify**: importer and exporter identifiers are derived from names
//! 5. **Resolve**: state codes are expanded against the reference table
//!
//! Normalizing a dataset's own [`to_raw_table`](crate::CanonicalDataset::to_raw_table)
//! output with [`ColumnMapping::identity`](crate::ColumnMapping::identity)
//! reproduces the dataset.

pub mod field_parsers;
pub mod identity;
pub mod processor;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use field_parsers::DateParser;
pub use identity::{PartyKind, SurrogateIdGenerator};
pub use processor::Normalizer;
pub use stats::{NormalizeResult, NormalizeStats, RowIssue, RowIssueKind};
