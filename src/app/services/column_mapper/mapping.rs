//! Column mapping value and the per-column rename plan derived from it

use crate::app::services::schema_registry::{CanonicalField, is_canonical_name};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Source column name → canonical field
///
/// A source maps to at most one field; inserting a source again replaces its
/// target. Serializes as a plain table so a mapping can be kept in the
/// configuration file:
///
/// ```toml
/// [mapping]
/// "Qty" = "Quantity"
/// "Consignee" = "Consignee Name"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<String, CanonicalField>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping every sourced canonical label onto itself
    ///
    /// Used to re-normalize a dataset that already carries canonical headers.
    pub fn identity() -> Self {
        CanonicalField::ALL
            .into_iter()
            .filter(|field| field.is_sourced())
            .map(|field| (field.label().to_string(), field))
            .collect()
    }

    /// Map `source` to `field`, returning the field it previously mapped to
    pub fn insert(&mut self, source: impl Into<String>, field: CanonicalField) -> Option<CanonicalField> {
        self.entries.insert(source.into(), field)
    }

    pub fn remove(&mut self, source: &str) -> Option<CanonicalField> {
        self.entries.remove(source)
    }

    /// Field a source column is mapped to
    pub fn target(&self, source: &str) -> Option<CanonicalField> {
        self.entries.get(source).copied()
    }

    /// Source columns mapped to `field`, in name order
    pub fn sources_for(&self, field: CanonicalField) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, target)| **target == field)
            .map(|(source, _)| source.as_str())
            .collect()
    }

    /// Every field targeted by at least one entry
    pub fn targeted_fields(&self) -> HashSet<CanonicalField> {
        self.entries.values().copied().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.entries
            .iter()
            .map(|(source, field)| (source.as_str(), *field))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decide what happens to every raw column during normalization
    ///
    /// * Mapped columns become their canonical field. When several columns
    ///   target the same field the first in `headers` order wins and the rest
    ///   are dropped.
    /// * Columns mapped to a derived field are dropped; derived values are
    ///   always recomputed.
    /// * Unmapped columns are kept as extras unless their name collides with a
    ///   canonical label.
    pub fn rename_plan(&self, headers: &[String]) -> RenamePlan {
        let mut claimed = HashSet::new();
        let mut actions = Vec::with_capacity(headers.len());

        for header in headers {
            let action = match self.target(header) {
                Some(field) if !field.is_sourced() => {
                    warn!(
                        "Column '{}' is mapped to derived field '{}', dropping it",
                        header, field
                    );
                    RenameAction::Dropped
                }
                Some(field) if !claimed.insert(field) => {
                    warn!(
                        "Column '{}' also maps to '{}', keeping the earlier column",
                        header, field
                    );
                    RenameAction::Dropped
                }
                Some(field) => RenameAction::Canonical(field),
                None if is_canonical_name(header) => {
                    debug!("Unmapped column '{}' collides with a canonical name, dropping it", header);
                    RenameAction::Dropped
                }
                None => RenameAction::Extra(header.clone()),
            };
            actions.push(action);
        }

        RenamePlan { actions }
    }
}

impl FromIterator<(String, CanonicalField)> for ColumnMapping {
    fn from_iter<T: IntoIterator<Item = (String, CanonicalField)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// What happens to one raw column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameAction {
    /// Renamed to a canonical field
    Canonical(CanonicalField),
    /// Retained under its own name
    Extra(String),
    Dropped,
}

/// Rename actions aligned with the raw table's headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    actions: Vec<RenameAction>,
}

impl RenamePlan {
    pub fn actions(&self) -> &[RenameAction] {
        &self.actions
    }

    /// Raw column index feeding a canonical field
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.actions
            .iter()
            .position(|action| *action == RenameAction::Canonical(field))
    }

    /// Raw column indices and names of the retained extras, in source order
    pub fn extras(&self) -> Vec<(usize, &str)> {
        self.actions
            .iter()
            .enumerate()
            .filter_map(|(index, action)| match action {
                RenameAction::Extra(name) => Some((index, name.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Column names of the table after renaming
    pub fn renamed_columns(&self) -> Vec<String> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                RenameAction::Canonical(field) => Some(field.label().to_string()),
                RenameAction::Extra(name) => Some(name.clone()),
                RenameAction::Dropped => None,
            })
            .collect()
    }

    pub fn dropped_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| **action == RenameAction::Dropped)
            .count()
    }
}
