//! Automatic column matching
//!
//! Each sourced field is matched against the raw columns in three tiers:
//! the exact label, the label compared by [`column_key`], then the field's
//! aliases. The first tier with any hit decides; more than one hit in that
//! tier makes the field ambiguous and it is left unmapped.

use crate::app::services::schema_registry::{CanonicalField, column_key, required_source_fields};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Outcome of matching one field against the raw columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched(String),
    Ambiguous(Vec<String>),
    NotFound,
}

/// Match one field, ignoring columns already claimed by other fields
pub fn match_field(
    field: CanonicalField,
    raw_columns: &[String],
    claimed: &HashSet<String>,
) -> MatchOutcome {
    let available: Vec<&String> = raw_columns
        .iter()
        .filter(|column| !claimed.contains(*column))
        .collect();

    let label = field.label();
    let label_key = column_key(label);
    let aliases = field.spec().aliases;

    let tiers: [&dyn Fn(&str) -> bool; 3] = [
        &|column: &str| column.trim() == label,
        &|column: &str| column_key(column) == label_key,
        &|column: &str| aliases.contains(&column_key(column).as_str()),
    ];

    for tier in tiers {
        let mut hits: Vec<String> = available
            .iter()
            .filter(|column| tier(column.as_str()))
            .map(|column| (*column).clone())
            .collect();

        match hits.len() {
            0 => continue,
            1 => return MatchOutcome::Matched(hits.swap_remove(0)),
            _ => return MatchOutcome::Ambiguous(hits),
        }
    }

    MatchOutcome::NotFound
}

/// Best automatic suggestion for every sourced field
///
/// Returns `(field, suggestion)` pairs in schema order. Ambiguous and
/// unmatched fields carry `None`.
pub fn suggest_all(raw_columns: &[String]) -> Vec<(CanonicalField, Option<String>)> {
    let mut claimed = HashSet::new();
    let mut suggestions = Vec::new();

    for field in required_source_fields() {
        let suggestion = match match_field(field, raw_columns, &claimed) {
            MatchOutcome::Matched(column) => {
                debug!("Auto-matched column '{}' to '{}'", column, field);
                claimed.insert(column.clone());
                Some(column)
            }
            MatchOutcome::Ambiguous(columns) => {
                warn!(
                    "Field '{}' matches several columns ({}), leaving it unmapped",
                    field,
                    columns.join(", ")
                );
                None
            }
            MatchOutcome::NotFound => {
                debug!("No column matches '{}'", field);
                None
            }
        };
        suggestions.push((field, suggestion));
    }

    suggestions
}
