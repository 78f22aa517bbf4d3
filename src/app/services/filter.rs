//! Criteria-based selection over a canonical dataset
//!
//! Every criterion is optional; `None` or `"All"` leaves the dataset
//! unfiltered on that criterion. Filtering never mutates its input.

use crate::app::models::{CanonicalDataset, ShipmentRecord};
use crate::app::services::normalizer::identity::normalize_party_name;
use crate::constants::FILTER_ALL;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Selection criteria for [`filter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// State code or full name
    pub state: Option<String>,
    /// English month name, any case
    pub month: Option<String>,
    /// Calendar year
    pub year: Option<String>,
    /// Importer name or identifier
    pub importer: Option<String>,
    /// Exporter name or identifier
    pub exporter: Option<String>,
    /// Exact-match criteria on retained extra columns
    pub columns: Vec<(String, String)>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_importer(mut self, importer: impl Into<String>) -> Self {
        self.importer = Some(importer.into());
        self
    }

    pub fn with_exporter(mut self, exporter: impl Into<String>) -> Self {
        self.exporter = Some(exporter.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.push((column.into(), value.into()));
        self
    }

    /// Whether no criterion restricts the selection
    pub fn is_unrestricted(&self) -> bool {
        [&self.state, &self.month, &self.year, &self.importer, &self.exporter]
            .into_iter()
            .all(|criterion| active(criterion).is_none())
            && self.columns.is_empty()
    }
}

/// Criterion value, unless absent, blank or "All"
fn active(criterion: &Option<String>) -> Option<&str> {
    criterion
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(FILTER_ALL))
}

/// Select the records of `dataset` matching `criteria`
///
/// # Errors
/// Returns `Error::Filter` when the year is not an integer or a column
/// criterion names a column the dataset does not retain.
pub fn filter(dataset: &CanonicalDataset, criteria: &FilterCriteria) -> Result<CanonicalDataset> {
    let year = active(&criteria.year)
        .map(|year| {
            year.parse::<i32>()
                .map_err(|_| Error::filter("Year", format!("'{}' is not a year", year)))
        })
        .transpose()?;

    let columns = criteria
        .columns
        .iter()
        .map(|(column, value)| {
            dataset
                .extra_index(column)
                .map(|index| (index, value.trim()))
                .ok_or_else(|| Error::filter(column.as_str(), "no such column in the dataset"))
        })
        .collect::<Result<Vec<_>>>()?;

    let state = active(&criteria.state);
    let month = active(&criteria.month);
    let importer = active(&criteria.importer);
    let exporter = active(&criteria.exporter);

    let matches = |record: &ShipmentRecord| {
        state.is_none_or(|state| dataset.states().matches(&record.state, state))
            && month.is_none_or(|month| record.month().eq_ignore_ascii_case(month))
            && year.is_none_or(|year| record.year() == year)
            && importer.is_none_or(|importer| {
                party_matches(&record.consignee_name, &record.importer_id, importer)
            })
            && exporter.is_none_or(|exporter| {
                party_matches(&record.exporter_name, &record.exporter_id, exporter)
            })
            && columns.iter().all(|(index, value)| {
                record
                    .extras
                    .get(*index)
                    .is_some_and(|cell| cell.trim() == *value)
            })
    };

    let records: Vec<ShipmentRecord> = dataset
        .records()
        .iter()
        .filter(|record| matches(record))
        .cloned()
        .collect();

    debug!("Filter kept {} of {} records", records.len(), dataset.len());
    Ok(dataset.with_records(records))
}

/// Names compare in the form surrogate identifiers are derived from
fn party_matches(name: &str, id: &str, criterion: &str) -> bool {
    normalize_party_name(name) == normalize_party_name(criterion)
        || id.eq_ignore_ascii_case(criterion.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::state_reference::StateReference;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn record(state: &str, date: (i32, u32, u32), consignee: &str, port: &str) -> ShipmentRecord {
        ShipmentRecord {
            quantity: 100.0,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            consignee_name: consignee.to_string(),
            exporter_name: "Global Ltd".to_string(),
            state: state.to_string(),
            importer_id: format!("IMP-{}", consignee.to_lowercase()),
            exporter_id: "EXP-global".to_string(),
            extras: vec![port.to_string()],
        }
    }

    fn create_test_dataset() -> CanonicalDataset {
        CanonicalDataset::new(
            vec![
                record("MH", (2023, 1, 5), "Acme", "Nhava Sheva"),
                record("Maharashtra", (2023, 2, 5), "Beta", "Mundra"),
                record("Gujarat", (2024, 1, 5), "Acme", "Mundra"),
            ],
            vec!["Port".to_string()],
            Arc::new(StateReference::builtin()),
        )
    }

    #[test]
    fn test_all_is_identity() {
        let dataset = create_test_dataset();
        let criteria = FilterCriteria::new()
            .with_state("All")
            .with_month("all")
            .with_year("All");

        assert!(criteria.is_unrestricted());
        assert_eq!(filter(&dataset, &criteria).unwrap(), dataset);
        assert_eq!(filter(&dataset, &FilterCriteria::default()).unwrap(), dataset);
    }

    #[test]
    fn test_state_matches_code_and_name() {
        let dataset = create_test_dataset();

        let by_code = filter(&dataset, &FilterCriteria::new().with_state("MH")).unwrap();
        assert_eq!(by_code.len(), 2);

        let by_name = filter(&dataset, &FilterCriteria::new().with_state("maharashtra")).unwrap();
        assert_eq!(by_name, by_code);
    }

    #[test]
    fn test_month_and_year() {
        let dataset = create_test_dataset();
        let criteria = FilterCriteria::new().with_month("january").with_year("2023");

        let filtered = filter(&dataset, &criteria).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records()[0].consignee_name, "Acme");
    }

    #[test]
    fn test_invalid_year_is_error() {
        let dataset = create_test_dataset();
        match filter(&dataset, &FilterCriteria::new().with_year("twenty")) {
            Err(Error::Filter { column, .. }) => assert_eq!(column, "Year"),
            other => panic!("Expected Filter error, got {:?}", other.map(|d| d.len())),
        }
    }

    #[test]
    fn test_importer_by_name_or_id() {
        let dataset = create_test_dataset();

        let by_name = filter(&dataset, &FilterCriteria::new().with_importer(" ACME ")).unwrap();
        assert_eq!(by_name.len(), 2);

        let by_id = filter(&dataset, &FilterCriteria::new().with_importer("IMP-beta")).unwrap();
        assert_eq!(by_id.len(), 1);

        let exporter = filter(&dataset, &FilterCriteria::new().with_exporter("global ltd")).unwrap();
        assert_eq!(exporter.len(), 3);
    }

    #[test]
    fn test_party_name_whitespace_is_collapsed() {
        let dataset = create_test_dataset();

        let exporter = filter(&dataset, &FilterCriteria::new().with_exporter("Global   LTD")).unwrap();
        assert_eq!(exporter.len(), 3);

        assert!(party_matches("Acme  Co", "IMP-x", " acme co "));
        assert!(!party_matches("Acme Co", "IMP-x", "Acme"));
    }

    #[test]
    fn test_extra_column_criteria() {
        let dataset = create_test_dataset();

        let filtered = filter(&dataset, &FilterCriteria::new().with_column("Port", "Mundra")).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.extra_columns(), dataset.extra_columns());

        assert!(matches!(
            filter(&dataset, &FilterCriteria::new().with_column("Vessel", "X")),
            Err(Error::Filter { .. })
        ));
    }

    #[test]
    fn test_input_untouched() {
        let dataset = create_test_dataset();
        let before = dataset.clone();
        let _ = filter(&dataset, &FilterCriteria::new().with_state("GJ")).unwrap();
        assert_eq!(dataset, before);
    }
}
