//! Tests for the mapping value and rename plans

use super::*;
use crate::app::services::column_mapper::{ColumnMapping, RenameAction};

#[test]
fn test_insert_is_last_wins() {
    let mut mapping = ColumnMapping::new();
    assert_eq!(mapping.insert("Name", CanonicalField::ConsigneeName), None);
    assert_eq!(
        mapping.insert("Name", CanonicalField::ExporterName),
        Some(CanonicalField::ConsigneeName)
    );

    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.target("Name"), Some(CanonicalField::ExporterName));
}

#[test]
fn test_identity_maps_sourced_labels() {
    let mapping = ColumnMapping::identity();
    assert_eq!(mapping.len(), 5);
    assert_eq!(mapping.target("Quantity"), Some(CanonicalField::Quantity));
    assert_eq!(mapping.target("Year"), None);
}

#[test]
fn test_rename_plan_keeps_extras_and_drops_collisions() {
    let headers = columns(&["Qty", "Port", "Year", "Date"]);
    let mut mapping = ColumnMapping::new();
    mapping.insert("Qty", CanonicalField::Quantity);
    mapping.insert("Date", CanonicalField::Date);

    let plan = mapping.rename_plan(&headers);

    assert_eq!(
        plan.actions(),
        &[
            RenameAction::Canonical(CanonicalField::Quantity),
            RenameAction::Extra("Port".to_string()),
            RenameAction::Dropped,
            RenameAction::Canonical(CanonicalField::Date),
        ]
    );
    assert_eq!(plan.index_of(CanonicalField::Date), Some(3));
    assert_eq!(plan.extras(), vec![(1, "Port")]);
    assert_eq!(plan.renamed_columns(), columns(&["Quantity", "Port", "Date"]));
    assert_eq!(plan.dropped_count(), 1);
}

#[test]
fn test_rename_plan_first_duplicate_target_wins() {
    let headers = columns(&["Buyer", "Importer"]);
    let mut mapping = ColumnMapping::new();
    mapping.insert("Importer", CanonicalField::ConsigneeName);
    mapping.insert("Buyer", CanonicalField::ConsigneeName);

    let plan = mapping.rename_plan(&headers);

    assert_eq!(plan.index_of(CanonicalField::ConsigneeName), Some(0));
    assert_eq!(plan.actions()[1], RenameAction::Dropped);
}

#[test]
fn test_rename_plan_drops_derived_targets() {
    let headers = columns(&["Yr"]);
    let mut mapping = ColumnMapping::new();
    mapping.insert("Yr", CanonicalField::Year);

    let plan = mapping.rename_plan(&headers);
    assert_eq!(plan.actions(), &[RenameAction::Dropped]);
}

#[test]
fn test_mapping_toml_round_trip() {
    let text = r#"
        "Qty" = "Quantity"
        "Consignee" = "Consignee Name"
    "#;
    let mapping: ColumnMapping = toml::from_str(text).unwrap();

    assert_eq!(mapping.target("Qty"), Some(CanonicalField::Quantity));
    assert_eq!(mapping.target("Consignee"), Some(CanonicalField::ConsigneeName));
    assert_eq!(mapping.sources_for(CanonicalField::Quantity), vec!["Qty"]);
}
