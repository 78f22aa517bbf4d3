//! Tests for state reference loading

use super::*;
use crate::app::services::state_reference::{ReferenceOrigin, StateReference};
use tempfile::TempDir;

#[test]
fn test_load_from_file_locates_columns_by_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_reference_file(
        temp_dir.path(),
        "states.csv",
        create_test_reference_content(),
    );

    let (reference, stats) = StateReference::load_from_file(&path).unwrap();

    assert_eq!(reference.len(), 3);
    assert_eq!(stats.rows_read, 3);
    assert_eq!(stats.codes_loaded, 3);
    assert_eq!(reference.resolve("GJ"), Some("Gujarat"));
    assert_eq!(reference.origin(), &ReferenceOrigin::File(path));
}

#[test]
fn test_load_from_file_positional_columns() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_reference_file(
        temp_dir.path(),
        "states.csv",
        "abbr,full\nTN,Tamil Nadu\nKL,Kerala\n",
    );

    let (reference, _) = StateReference::load_from_file(&path).unwrap();

    assert_eq!(reference.resolve("tn"), Some("Tamil Nadu"));
    assert_eq!(reference.resolve("KL"), Some("Kerala"));
}

#[test]
fn test_load_from_file_skips_blank_rows_and_tracks_duplicates() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_reference_file(
        temp_dir.path(),
        "states.csv",
        "code,name\nMH,Maharashtra\n,Nowhere\nDL,\nMH,Maharashtra State\n",
    );

    let (reference, stats) = StateReference::load_from_file(&path).unwrap();

    assert_eq!(reference.len(), 1);
    assert_eq!(stats.rows_skipped, 2);
    assert_eq!(stats.duplicate_codes, vec!["MH".to_string()]);
    assert_eq!(reference.resolve("MH"), Some("Maharashtra State"));
}

#[test]
fn test_load_from_file_without_codes_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_reference_file(temp_dir.path(), "states.csv", "code,name\n");

    let result = StateReference::load_from_file(&path);
    assert!(matches!(result, Err(crate::Error::Configuration { .. })));
}

#[test]
fn test_load_or_builtin_falls_back() {
    let reference = StateReference::load_or_builtin(None).unwrap();
    assert_eq!(reference.origin(), &ReferenceOrigin::Builtin);

    let missing = std::path::Path::new("/nonexistent/states.csv");
    let reference = StateReference::load_or_builtin(Some(missing)).unwrap();
    assert_eq!(reference.origin(), &ReferenceOrigin::Builtin);
    assert_eq!(reference.resolve("MH"), Some("Maharashtra"));
}

#[test]
fn test_load_or_builtin_prefers_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_reference_file(temp_dir.path(), "states.csv", "code,name\nXX,Test State\n");

    let reference = StateReference::load_or_builtin(Some(&path)).unwrap();
    assert_eq!(reference.len(), 1);
    assert_eq!(reference.resolve("MH"), None);
}
