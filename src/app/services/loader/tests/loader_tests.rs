//! Tests for the load pipeline

use super::*;
use crate::app::services::column_mapper::{ColumnMapping, MappingStrategy};
use crate::app::services::loader::Source;
use crate::app::services::schema_registry::CanonicalField;

#[test]
fn test_load_csv_upload() {
    let (loader, _) = create_test_loader(None);
    let source = Source::file("shipments.csv", SAMPLE_CSV);

    let result = loader.load(&source, MappingStrategy::Automatic).unwrap();

    assert_eq!(result.dataset.len(), 1);
    assert_eq!(result.dataset.records()[0].quantity, 500.0);
    assert_eq!(result.dataset.extra_columns(), &["Port".to_string()]);
    assert_eq!(result.mapping.target("Qty"), Some(CanonicalField::Quantity));
    assert_eq!(result.stats.rows_dropped(), 1);
}

#[test]
fn test_unsupported_extension() {
    let (loader, _) = create_test_loader(None);
    let source = Source::file("report.txt", SAMPLE_CSV);

    match loader.load(&source, MappingStrategy::Automatic) {
        Err(Error::UnsupportedFormat { extension }) => assert_eq!(extension, "txt"),
        other => panic!("Expected UnsupportedFormat, got {:?}", other.map(|r| r.stats)),
    }
}

#[test]
fn test_uppercase_extension_is_accepted() {
    let (loader, _) = create_test_loader(None);
    let source = Source::file("SHIPMENTS.CSV", SAMPLE_CSV);
    assert!(loader.load(&source, MappingStrategy::Automatic).is_ok());
}

#[test]
fn test_url_without_identifier_is_rejected_before_fetching() {
    let (loader, requested) = create_test_loader(Some(SAMPLE_CSV));
    let source = Source::Url("https://docs.google.com/spreadsheets/edit".to_string());

    assert!(matches!(
        loader.load(&source, MappingStrategy::Automatic),
        Err(Error::InvalidSource { .. })
    ));
    assert!(requested.borrow().is_empty());
}

#[test]
fn test_url_is_fetched_from_export_endpoint() {
    let (loader, requested) = create_test_loader(Some(SAMPLE_CSV));
    let source =
        Source::Url("https://docs.google.com/spreadsheets/d/abc123/edit#gid=7".to_string());

    let result = loader.load(&source, MappingStrategy::Automatic).unwrap();

    assert_eq!(result.dataset.len(), 1);
    assert_eq!(
        requested.borrow().as_slice(),
        &["https://docs.google.com/spreadsheets/d/abc123/export?format=csv&gid=7".to_string()]
    );
}

#[test]
fn test_custom_sheets_host() {
    let (loader, _) = create_test_loader(Some(SAMPLE_CSV));
    let loader = loader.with_sheets_host("sheets.internal");

    let google = Source::Url("https://docs.google.com/spreadsheets/d/abc/".to_string());
    assert!(matches!(
        loader.load(&google, MappingStrategy::Automatic),
        Err(Error::InvalidSource { .. })
    ));

    let internal = Source::Url("https://sheets.internal/spreadsheets/d/abc/".to_string());
    assert!(loader.load(&internal, MappingStrategy::Automatic).is_ok());
}

#[test]
fn test_fetch_failure_propagates() {
    let (loader, _) = create_test_loader(None);
    let source = Source::Url("https://docs.google.com/spreadsheets/d/abc123/".to_string());

    assert!(matches!(
        loader.load(&source, MappingStrategy::Automatic),
        Err(Error::Fetch { .. })
    ));
}

#[test]
fn test_incomplete_mapping_lists_every_field() {
    let (loader, _) = create_test_loader(None);
    let source = Source::file("partial.csv", "Weight,When,Buyer\n1,2023-01-01,Acme\n");

    match loader.load(&source, MappingStrategy::Automatic) {
        Err(Error::MappingIncomplete { missing }) => assert_eq!(
            missing,
            vec!["Quantity", "Date", "Exporter Name", "State"]
        ),
        other => panic!("Expected MappingIncomplete, got {:?}", other.map(|r| r.stats)),
    }
}

#[test]
fn test_preset_mapping_to_absent_column_is_schema_error() {
    let (loader, _) = create_test_loader(None);
    let source = Source::file("shipments.csv", SAMPLE_CSV);

    let mut preset = ColumnMapping::new();
    preset.insert("Qty", CanonicalField::Quantity);
    preset.insert("Date", CanonicalField::Date);
    preset.insert("Consignee", CanonicalField::ConsigneeName);
    preset.insert("Exporter", CanonicalField::ExporterName);
    preset.insert("Province", CanonicalField::State);

    match loader.load(&source, MappingStrategy::Preset(preset)) {
        Err(Error::Schema { missing }) => assert_eq!(missing, vec!["State"]),
        other => panic!("Expected Schema error, got {:?}", other.map(|r| r.stats)),
    }
}

#[test]
fn test_all_rows_dropped_is_empty_result() {
    let (loader, _) = create_test_loader(None);
    let source = Source::file(
        "bad.csv",
        "Quantity,Date,Consignee Name,Exporter Name,State\nN/A,2023-01-01,A,B,MH\n",
    );

    match loader.load(&source, MappingStrategy::Automatic) {
        Err(Error::EmptyResult {
            rows_read,
            rows_dropped,
        }) => {
            assert_eq!(rows_read, 1);
            assert_eq!(rows_dropped, 1);
        }
        other => panic!("Expected EmptyResult, got {:?}", other.map(|r| r.stats)),
    }
}
