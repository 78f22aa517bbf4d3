//! Tests for key metrics

use super::*;
use crate::app::services::reporting::KeyMetrics;

#[test]
fn test_key_metrics() {
    let metrics = KeyMetrics::calculate(&create_test_dataset());

    assert_eq!(metrics.total_quantity, 16_500.0);
    assert_eq!(metrics.shipments, 5);
    assert_eq!(metrics.unique_importers, 2);
    assert_eq!(metrics.unique_exporters, 2);
    assert_eq!(metrics.unique_states, 4);
    assert_eq!(metrics.yoy_growth, -35.0);
    // 2024-01 (6000) -> 2024-03 (500)
    assert_eq!(metrics.mom_growth, -91.67);
    assert_eq!(metrics.top_importer.as_deref(), Some("Acme"));
    assert_eq!(metrics.top_exporter.as_deref(), Some("Orient"));
    assert_eq!(metrics.top_state.as_deref(), Some("Maharashtra"));
}

#[test]
fn test_single_period_has_no_growth() {
    let metrics = KeyMetrics::calculate(&dataset(vec![shipment(
        10.0,
        (2024, 5, 1),
        "Acme",
        "Global",
        "Goa",
    )]));

    assert_eq!(metrics.yoy_growth, 0.0);
    assert_eq!(metrics.mom_growth, 0.0);
}

#[test]
fn test_empty_dataset_metrics() {
    let metrics = KeyMetrics::calculate(&dataset(Vec::new()));

    assert_eq!(metrics.total_quantity, 0.0);
    assert_eq!(metrics.shipments, 0);
    assert_eq!(metrics.top_importer, None);
    assert_eq!(metrics.top_state, None);
}
