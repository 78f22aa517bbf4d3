//! Shared fixtures for reporting tests

use crate::app::models::{CanonicalDataset, ShipmentRecord};
use crate::app::services::state_reference::StateReference;
use chrono::NaiveDate;
use std::sync::Arc;

pub mod kpis_tests;

pub fn shipment(quantity: f64, date: (i32, u32, u32), importer: &str, exporter: &str, state: &str) -> ShipmentRecord {
    ShipmentRecord {
        quantity,
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        consignee_name: importer.to_string(),
        exporter_name: exporter.to_string(),
        state: state.to_string(),
        importer_id: format!("IMP-{}", importer.to_lowercase()),
        exporter_id: format!("EXP-{}", exporter.to_lowercase()),
        extras: Vec::new(),
    }
}

pub fn dataset(records: Vec<ShipmentRecord>) -> CanonicalDataset {
    CanonicalDataset::new(records, Vec::new(), Arc::new(StateReference::builtin()))
}

/// Two years of shipments across three states
pub fn create_test_dataset() -> CanonicalDataset {
    dataset(vec![
        shipment(2_000.0, (2023, 1, 10), "Acme", "Global", "Maharashtra"),
        shipment(3_000.0, (2023, 2, 10), "Beta", "Global", "Gujarat"),
        shipment(5_000.0, (2023, 2, 20), "Acme", "Orient", "India"),
        shipment(6_000.0, (2024, 1, 10), "Acme", "Orient", "Maharashtra"),
        shipment(500.0, (2024, 3, 10), "Beta", "Global", "Karnataka"),
    ])
}
