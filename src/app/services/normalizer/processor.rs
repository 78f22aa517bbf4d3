//! Normalizer implementation
//!
//! Applies a column mapping to a raw table and produces the typed canonical
//! dataset. The raw table is only read.

use super::field_parsers::{DateParser, clean_text, get_optional_field, get_required_field, parse_quantity};
use super::identity::SurrogateIdGenerator;
use super::stats::{NormalizeResult, NormalizeStats, RowIssueKind};
use crate::app::models::{CanonicalDataset, RawTable, ShipmentRecord};
use crate::app::services::column_mapper::{ColumnMapping, RenamePlan};
use crate::app::services::schema_registry::CanonicalField;
use crate::app::services::state_reference::StateReference;
use crate::app::services::validator::{Stage, validate};
use crate::Result;
use csv::StringRecord;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns raw tables into canonical datasets
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use csv::StringRecord;
/// use tradeflow::app::services::normalizer::{Normalizer, SurrogateIdGenerator};
/// use tradeflow::app::services::state_reference::StateReference;
/// use tradeflow::{ColumnMapping, RawTable};
///
/// let table = RawTable::new(
///     "upload.csv",
///     ["Quantity", "Date", "Consignee Name", "Exporter Name", "State"]
///         .iter().map(|s| s.to_string()).collect(),
///     vec![StringRecord::from(vec!["350 KG", "2024-03-15", "Acme", "Global", "MH"])],
/// );
///
/// let normalizer = Normalizer::new(Arc::new(StateReference::builtin()), SurrogateIdGenerator::new());
/// let result = normalizer.normalize(&table, &ColumnMapping::identity()).unwrap();
///
/// let record = &result.dataset.records()[0];
/// assert_eq!(record.quantity, 350.0);
/// assert_eq!(record.month(), "March");
/// assert_eq!(record.state, "Maharashtra");
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    states: Arc<StateReference>,
    ids: SurrogateIdGenerator,
    dates: DateParser,
}

/// Raw column indices feeding the sourced fields
struct SourceIndices {
    quantity: Option<usize>,
    date: Option<usize>,
    consignee: Option<usize>,
    exporter: Option<usize>,
    state: Option<usize>,
}

impl SourceIndices {
    fn from_plan(plan: &RenamePlan) -> Self {
        Self {
            quantity: plan.index_of(CanonicalField::Quantity),
            date: plan.index_of(CanonicalField::Date),
            consignee: plan.index_of(CanonicalField::ConsigneeName),
            exporter: plan.index_of(CanonicalField::ExporterName),
            state: plan.index_of(CanonicalField::State),
        }
    }
}

impl Normalizer {
    /// Create a normalizer reading numeric dates day-first
    pub fn new(states: Arc<StateReference>, ids: SurrogateIdGenerator) -> Self {
        Self {
            states,
            ids,
            dates: DateParser::default(),
        }
    }

    /// Choose day-first (`05/01/2023` = 5 January) or month-first numeric dates
    pub fn with_day_first(mut self, day_first: bool) -> Self {
        self.dates = DateParser::new(day_first);
        self
    }

    pub fn states(&self) -> &Arc<StateReference> {
        &self.states
    }

    /// Normalize `table` according to `mapping`
    ///
    /// Rows that cannot be typed are dropped and recorded in the returned
    /// statistics. The dataset may be empty; the caller decides whether that
    /// is an error.
    ///
    /// # Errors
    /// Returns `Error::Schema` if the renamed table lacks a sourced field.
    pub fn normalize(&self, table: &RawTable, mapping: &ColumnMapping) -> Result<NormalizeResult> {
        let plan = mapping.rename_plan(table.headers());
        validate(&plan.renamed_columns(), Stage::PreNormalize)?;

        let indices = SourceIndices::from_plan(&plan);
        let extras = plan.extras();
        let extra_columns: Vec<String> = extras.iter().map(|(_, name)| name.to_string()).collect();

        let mut stats = NormalizeStats::new();
        stats.rows_read = table.row_count();
        stats.columns_dropped = plan.dropped_count();
        stats.extra_columns = extra_columns.len();

        debug!(
            "Normalizing {} rows from '{}' ({} extra columns, {} dropped)",
            table.row_count(),
            table.source_name(),
            stats.extra_columns,
            stats.columns_dropped
        );

        let mut records = Vec::with_capacity(table.row_count());
        for (index, row) in table.rows().iter().enumerate() {
            match self.normalize_row(row, &indices, &extras, &mut stats) {
                Ok(record) => records.push(record),
                Err(kind) => {
                    debug!("Dropping row {}: {}", index + 1, kind);
                    stats.add_issue(index + 1, kind);
                }
            }
        }
        stats.rows_kept = records.len();

        if !stats.unresolved_states.is_empty() {
            warn!(
                "{} rows carry state values not in the reference table: {}",
                stats.unresolved_state_rows(),
                stats
                    .unresolved_states
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        info!("{}", stats.summary());

        let dataset = CanonicalDataset::new(records, extra_columns, Arc::clone(&self.states));
        Ok(NormalizeResult { dataset, stats })
    }

    fn normalize_row(
        &self,
        row: &StringRecord,
        indices: &SourceIndices,
        extras: &[(usize, &str)],
        stats: &mut NormalizeStats,
    ) -> std::result::Result<ShipmentRecord, RowIssueKind> {
        let required = |index: Option<usize>, field: CanonicalField| {
            get_required_field(row, index).ok_or(RowIssueKind::MissingValue(field))
        };

        let quantity_text = required(indices.quantity, CanonicalField::Quantity)?;
        let quantity = parse_quantity(quantity_text)
            .ok_or_else(|| RowIssueKind::InvalidQuantity(quantity_text.to_string()))?;

        let date_text = required(indices.date, CanonicalField::Date)?;
        let date = self
            .dates
            .parse(date_text)
            .ok_or_else(|| RowIssueKind::InvalidDate(date_text.to_string()))?;

        let consignee_name = clean_text(required(indices.consignee, CanonicalField::ConsigneeName)?);
        let exporter_name = clean_text(required(indices.exporter, CanonicalField::ExporterName)?);
        let state = self.resolve_state(required(indices.state, CanonicalField::State)?, stats);

        Ok(ShipmentRecord {
            quantity,
            date,
            importer_id: self.ids.importer_id(&consignee_name),
            exporter_id: self.ids.exporter_id(&exporter_name),
            consignee_name,
            exporter_name,
            state,
            extras: extras
                .iter()
                .map(|(index, _)| get_optional_field(row, *index).to_string())
                .collect(),
        })
    }

    fn resolve_state(&self, value: &str, stats: &mut NormalizeStats) -> String {
        match self.states.resolve(value) {
            Some(name) => name.to_string(),
            None => {
                let value = clean_text(value);
                if !self.states.is_known_name(&value) {
                    stats.add_unresolved_state(&value);
                }
                value
            }
        }
    }
}
