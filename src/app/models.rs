//! Core data structures for shipment ingestion.
//!
//! Defines the raw table produced by the source readers, the typed
//! [`ShipmentRecord`] rows of the normalized dataset, and the
//! [`CanonicalDataset`] handed to filtering and reporting.

use crate::app::services::schema_registry::CanonicalField;
use crate::app::services::state_reference::StateReference;
use crate::constants::{MONTH_NAMES, UNNAMED_COLUMN_PREFIX};
use crate::Result;
use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use polars::prelude::{Column, DataFrame};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Untyped table as read from an uploaded file or fetched sheet
///
/// Header names are made unique on construction: blank headers become
/// `Unnamed: <index>` and repeated headers get `.1`, `.2`, ... suffixes, so
/// every column can be addressed by name.
#[derive(Debug, Clone)]
pub struct RawTable {
    source_name: String,
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(source_name: impl Into<String>, headers: Vec<String>, rows: Vec<StringRecord>) -> Self {
        Self {
            source_name: source_name.into(),
            headers: unique_headers(headers),
            rows,
        }
    }

    /// Name of the file or URL the table was read from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(headers.len());

    for (index, header) in headers.into_iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("{}{}", UNNAMED_COLUMN_PREFIX, index)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(candidate.clone());
        unique.push(candidate);
    }

    unique
}

/// One normalized shipment
///
/// Year and month are computed from `date`, so they can never disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRecord {
    /// Shipped quantity, never negative
    pub quantity: f64,
    pub date: NaiveDate,
    pub consignee_name: String,
    pub exporter_name: String,
    /// State name, expanded from its code when the reference table knows it
    pub state: String,
    pub importer_id: String,
    pub exporter_id: String,
    /// Values of retained source columns, aligned with [`CanonicalDataset::extra_columns`]
    pub extras: Vec<String>,
}

impl ShipmentRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// English month name of the shipment date
    pub fn month(&self) -> &'static str {
        MONTH_NAMES[self.date.month0() as usize]
    }

    /// Month of the shipment date, 1-based
    pub fn month_number(&self) -> u32 {
        self.date.month()
    }

    /// Value of a canonical field rendered as text
    pub fn field_text(&self, field: CanonicalField) -> String {
        match field {
            CanonicalField::Quantity => self.quantity.to_string(),
            CanonicalField::Date => self.date.format("%Y-%m-%d").to_string(),
            CanonicalField::Year => self.year().to_string(),
            CanonicalField::Month => self.month().to_string(),
            CanonicalField::ConsigneeName => self.consignee_name.clone(),
            CanonicalField::ExporterName => self.exporter_name.clone(),
            CanonicalField::State => self.state.clone(),
            CanonicalField::ImporterId => self.importer_id.clone(),
            CanonicalField::ExporterId => self.exporter_id.clone(),
        }
    }
}

/// Fully normalized, validated dataset produced by one load
///
/// Consumers never mutate a dataset; filtering produces a new one that shares
/// the same extra columns and state reference table.
#[derive(Debug, Clone)]
pub struct CanonicalDataset {
    records: Vec<ShipmentRecord>,
    extra_columns: Vec<String>,
    states: Arc<StateReference>,
}

impl PartialEq for CanonicalDataset {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records && self.extra_columns == other.extra_columns
    }
}

impl CanonicalDataset {
    pub fn new(
        records: Vec<ShipmentRecord>,
        extra_columns: Vec<String>,
        states: Arc<StateReference>,
    ) -> Self {
        Self {
            records,
            extra_columns,
            states,
        }
    }

    pub fn records(&self) -> &[ShipmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names of the retained source columns, in source order
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// State reference table the dataset was resolved with
    pub fn states(&self) -> &StateReference {
        &self.states
    }

    /// Every column of the dataset: canonical fields first, then extras
    pub fn column_names(&self) -> Vec<String> {
        CanonicalField::ALL
            .iter()
            .map(|field| field.label().to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// Index of a retained source column
    pub fn extra_index(&self, column: &str) -> Option<usize> {
        self.extra_columns.iter().position(|name| name == column)
    }

    /// New dataset with the same columns and state table but other records
    pub fn with_records(&self, records: Vec<ShipmentRecord>) -> Self {
        Self {
            records,
            extra_columns: self.extra_columns.clone(),
            states: Arc::clone(&self.states),
        }
    }

    /// Render the dataset back into an untyped table with canonical headers
    pub fn to_raw_table(&self) -> RawTable {
        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut values: Vec<String> = CanonicalField::ALL
                    .iter()
                    .map(|field| record.field_text(*field))
                    .collect();
                values.extend(record.extras.iter().cloned());
                StringRecord::from(values)
            })
            .collect();

        RawTable::new("canonical dataset", self.column_names(), rows)
    }

    /// Convert to a polars DataFrame for tabular consumers and export
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let records = &self.records;

        let mut frame_columns = vec![
            Column::new(
                CanonicalField::Quantity.label().into(),
                records.iter().map(|r| r.quantity).collect::<Vec<f64>>(),
            ),
            Column::new(
                CanonicalField::Date.label().into(),
                records.iter().map(|r| r.date).collect::<Vec<NaiveDate>>(),
            ),
            Column::new(
                CanonicalField::Year.label().into(),
                records.iter().map(|r| r.year()).collect::<Vec<i32>>(),
            ),
            Column::new(
                CanonicalField::Month.label().into(),
                records.iter().map(|r| r.month()).collect::<Vec<&str>>(),
            ),
            Column::new(
                CanonicalField::ConsigneeName.label().into(),
                records
                    .iter()
                    .map(|r| r.consignee_name.as_str())
                    .collect::<Vec<&str>>(),
            ),
            Column::new(
                CanonicalField::ExporterName.label().into(),
                records
                    .iter()
                    .map(|r| r.exporter_name.as_str())
                    .collect::<Vec<&str>>(),
            ),
            Column::new(
                CanonicalField::State.label().into(),
                records.iter().map(|r| r.state.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                CanonicalField::ImporterId.label().into(),
                records
                    .iter()
                    .map(|r| r.importer_id.as_str())
                    .collect::<Vec<&str>>(),
            ),
            Column::new(
                CanonicalField::ExporterId.label().into(),
                records
                    .iter()
                    .map(|r| r.exporter_id.as_str())
                    .collect::<Vec<&str>>(),
            ),
        ];

        for (index, name) in self.extra_columns.iter().enumerate() {
            let values: Vec<&str> = records
                .iter()
                .map(|r| r.extras.get(index).map(String::as_str).unwrap_or(""))
                .collect();
            frame_columns.push(Column::new(name.as_str().into(), values));
        }

        DataFrame::new(frame_columns)
            .map_err(|e| crate::Error::polars("Failed to build dataset DataFrame", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(date: NaiveDate) -> ShipmentRecord {
        ShipmentRecord {
            quantity: 350.0,
            date,
            consignee_name: "Acme Co".to_string(),
            exporter_name: "Global Ltd".to_string(),
            state: "Maharashtra".to_string(),
            importer_id: "IMP-0000000000000001".to_string(),
            exporter_id: "EXP-0000000000000001".to_string(),
            extras: vec!["Nhava Sheva".to_string()],
        }
    }

    #[test]
    fn test_unique_headers() {
        let headers = vec![
            "Name".to_string(),
            " ".to_string(),
            "Name".to_string(),
            "Name".to_string(),
        ];
        assert_eq!(
            unique_headers(headers),
            vec!["Name", "Unnamed: 1", "Name.1", "Name.2"]
        );
    }

    #[test]
    fn test_record_derives_calendar_fields() {
        let record = sample_record(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(record.year(), 2024);
        assert_eq!(record.month(), "March");
        assert_eq!(record.month_number(), 3);
        assert_eq!(record.field_text(CanonicalField::Date), "2024-03-15");
        assert_eq!(record.field_text(CanonicalField::Quantity), "350");
    }

    #[test]
    fn test_dataset_columns_and_raw_table() {
        let record = sample_record(NaiveDate::from_ymd_opt(2023, 1, 10).unwrap());
        let dataset = CanonicalDataset::new(
            vec![record],
            vec!["Port".to_string()],
            Arc::new(StateReference::builtin()),
        );

        let columns = dataset.column_names();
        assert_eq!(columns.len(), 10);
        assert_eq!(columns[0], "Quantity");
        assert_eq!(columns[9], "Port");
        assert_eq!(dataset.extra_index("Port"), Some(0));

        let raw = dataset.to_raw_table();
        assert_eq!(raw.headers(), columns.as_slice());
        assert_eq!(raw.row_count(), 1);
        assert_eq!(raw.rows()[0].get(3), Some("January"));
        assert_eq!(raw.rows()[0].get(9), Some("Nhava Sheva"));
    }

    #[test]
    fn test_to_dataframe() {
        let record = sample_record(NaiveDate::from_ymd_opt(2023, 1, 10).unwrap());
        let dataset = CanonicalDataset::new(
            vec![record.clone(), record],
            vec!["Port".to_string()],
            Arc::new(StateReference::builtin()),
        );

        let df = dataset.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 10);
        let total: f64 = df.column("Quantity").unwrap().f64().unwrap().into_iter().flatten().sum();
        assert_eq!(total, 700.0);
    }
}
