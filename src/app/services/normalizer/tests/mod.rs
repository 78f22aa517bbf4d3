//! Shared test utilities and fixtures for normalizer tests

use crate::app::models::RawTable;
use crate::app::services::normalizer::{Normalizer, SurrogateIdGenerator};
use crate::app::services::state_reference::StateReference;
use csv::StringRecord;
use std::sync::Arc;


pub const CANONICAL_HEADERS: [&str; 5] =
    ["Quantity", "Date", "Consignee Name", "Exporter Name", "State"];

/// Build a raw table from string rows
pub fn create_test_table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        "test.csv",
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter().map(|row| StringRecord::from(row.to_vec())).collect(),
    )
}

/// Normalizer over the built-in state table, unkeyed identifiers
pub fn create_test_normalizer() -> Normalizer {
    Normalizer::new(Arc::new(StateReference::builtin()), SurrogateIdGenerator::new())
}
