//! Column mapping from arbitrary source headers onto the canonical schema
//!
//! The mapper turns the header row of an uploaded table into a
//! [`ColumnMapping`] using one of three strategies:
//!
//! - [`MappingStrategy::Automatic`] - label and alias matching, see [`matcher`]
//! - [`MappingStrategy::Interactive`] - a [`MappingPrompt`] decides each field,
//!   with the automatic suggestion as default
//! - [`MappingStrategy::Preset`] - a mapping loaded from configuration
//!
//! Resolution never fails and never touches the raw table; an incomplete
//! mapping is reported by the validator.
//!
//! ```rust
//! use tradeflow::app::services::column_mapper::{ColumnMapper, MappingStrategy};
//! use tradeflow::CanonicalField;
//!
//! let columns: Vec<String> = ["Qty", "Date", "Consignee", "Exporter", "Consignee State"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let mapping = ColumnMapper::resolve(&columns, MappingStrategy::Automatic);
//! assert_eq!(mapping.target("Consignee"), Some(CanonicalField::ConsigneeName));
//! assert_eq!(mapping.target("Consignee State"), Some(CanonicalField::State));
//! ```

pub mod mapping;
pub mod matcher;
pub mod prompt;

#[cfg(test)]
pub mod tests;

pub use mapping::{ColumnMapping, RenameAction, RenamePlan};
pub use matcher::{MatchOutcome, suggest_all};
pub use prompt::{MappingPrompt, MappingStrategy};

use tracing::{debug, info, warn};

/// Resolves raw column names to canonical fields
pub struct ColumnMapper;

impl ColumnMapper {
    /// Produce a column mapping for `raw_columns` using `strategy`
    pub fn resolve(raw_columns: &[String], strategy: MappingStrategy<'_>) -> ColumnMapping {
        debug!(
            "Resolving {} columns with {} strategy",
            raw_columns.len(),
            strategy.name()
        );

        let mapping = match strategy {
            MappingStrategy::Automatic => Self::automatic(raw_columns),
            MappingStrategy::Interactive(prompt) => Self::interactive(raw_columns, prompt),
            MappingStrategy::Preset(mapping) => {
                for (source, _) in mapping.entries() {
                    if !raw_columns.iter().any(|column| column == source) {
                        debug!("Preset mapping names absent column '{}'", source);
                    }
                }
                mapping
            }
        };

        info!(
            "Mapped {} of {} columns",
            mapping
                .entries()
                .filter(|(source, _)| raw_columns.iter().any(|column| column == source))
                .count(),
            raw_columns.len()
        );
        mapping
    }

    fn automatic(raw_columns: &[String]) -> ColumnMapping {
        suggest_all(raw_columns)
            .into_iter()
            .filter_map(|(field, suggestion)| suggestion.map(|column| (column, field)))
            .collect()
    }

    fn interactive(raw_columns: &[String], prompt: &mut dyn MappingPrompt) -> ColumnMapping {
        let mut mapping = ColumnMapping::new();

        for (field, suggestion) in suggest_all(raw_columns) {
            let Some(choice) = prompt.choose(field, raw_columns, suggestion.as_deref()) else {
                debug!("No column chosen for '{}'", field);
                continue;
            };

            if !raw_columns.contains(&choice) {
                warn!(
                    "Chosen column '{}' for '{}' is not in the table, ignoring it",
                    choice, field
                );
                continue;
            }

            if let Some(previous) = mapping.insert(choice.clone(), field) {
                warn!(
                    "Column '{}' remapped from '{}' to '{}'",
                    choice, previous, field
                );
            }
        }

        mapping
    }
}
