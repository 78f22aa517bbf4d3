//! State reference table for expanding state codes
//!
//! This module provides an immutable code → full-name lookup used to resolve
//! short state codes in shipment data. The table is loaded once at process
//! start from an optional CSV file and falls back to a built-in table of
//! Indian state codes when no file is configured or the file is absent.

use crate::constants::DEFAULT_STATE_CODES;
use std::collections::HashMap;
use std::path::PathBuf;

pub mod loader;
pub mod query;

#[cfg(test)]
pub mod tests;

pub use loader::LoadStats;

/// Where the entries of a state reference table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceOrigin {
    /// Built-in table compiled into the binary
    Builtin,
    /// External reference file
    File(PathBuf),
}

/// Immutable state code → full name table
///
/// Codes are stored uppercased; lookups trim and uppercase their input.
#[derive(Debug, Clone)]
pub struct StateReference {
    /// Full state names indexed by uppercase code
    pub(crate) names_by_code: HashMap<String, String>,

    /// Source of the entries
    pub(crate) origin: ReferenceOrigin,
}

impl StateReference {
    /// Create a table from explicit entries
    pub fn from_entries<I, C, N>(entries: I, origin: ReferenceOrigin) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: AsRef<str>,
        N: Into<String>,
    {
        let names_by_code = entries
            .into_iter()
            .map(|(code, name)| (code.as_ref().trim().to_uppercase(), name.into()))
            .collect();

        Self {
            names_by_code,
            origin,
        }
    }

    /// Built-in fallback table
    pub fn builtin() -> Self {
        Self::from_entries(DEFAULT_STATE_CODES.iter().copied(), ReferenceOrigin::Builtin)
    }

    /// Number of codes in the table
    pub fn len(&self) -> usize {
        self.names_by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_code.is_empty()
    }

    pub fn origin(&self) -> &ReferenceOrigin {
        &self.origin
    }
}

impl Default for StateReference {
    fn default() -> Self {
        Self::builtin()
    }
}
