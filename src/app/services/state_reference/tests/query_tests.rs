//! Tests for state code resolution and matching

use crate::app::services::state_reference::StateReference;

#[test]
fn test_builtin_table() {
    let reference = StateReference::builtin();

    assert_eq!(reference.len(), 36);
    assert_eq!(reference.resolve("MH"), Some("Maharashtra"));
    assert_eq!(reference.resolve(" dl "), Some("Delhi"));
    assert_eq!(reference.resolve("INDIA"), Some("India"));
    assert_eq!(reference.resolve("ZZ"), None);
}

#[test]
fn test_expand_passes_unknown_values_through() {
    let reference = StateReference::builtin();

    assert_eq!(reference.expand("KA"), "Karnataka");
    assert_eq!(reference.expand(" Maharashtra "), "Maharashtra");
    assert_eq!(reference.expand("Unknown Province"), "Unknown Province");
}

#[test]
fn test_matches_code_or_name() {
    let reference = StateReference::builtin();

    assert!(reference.matches("Maharashtra", "MH"));
    assert!(reference.matches("MH", "MH"));
    assert!(reference.matches("MH", "Maharashtra"));
    assert!(reference.matches("Maharashtra", "maharashtra"));
    assert!(!reference.matches("Gujarat", "MH"));
    assert!(!reference.matches("Unknown", "MH"));
}

#[test]
fn test_is_known_name() {
    let reference = StateReference::builtin();

    assert!(reference.is_known_name("Maharashtra"));
    assert!(reference.is_known_name(" tamil nadu "));
    assert!(!reference.is_known_name("MH"));
    assert!(!reference.is_known_name("Atlantis"));
}

#[test]
fn test_codes_sorted() {
    let reference = StateReference::from_entries(
        [("KA", "Karnataka"), ("AP", "Andhra Pradesh")],
        crate::app::services::state_reference::ReferenceOrigin::Builtin,
    );

    assert_eq!(reference.codes(), vec!["AP", "KA"]);
}
