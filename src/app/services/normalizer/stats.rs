//! Normalization statistics and result structures
//!
//! Row-level problems never fail a load; they are recorded here as
//! [`RowIssue`] values so callers can report what was dropped and why.

use crate::app::models::CanonicalDataset;
use crate::app::services::schema_registry::CanonicalField;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a raw row was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowIssueKind {
    /// Required cell blank or absent
    MissingValue(CanonicalField),
    /// Quantity cell without a usable number
    InvalidQuantity(String),
    /// Date cell matching none of the accepted formats
    InvalidDate(String),
}

impl fmt::Display for RowIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue(field) => write!(f, "missing {}", field),
            Self::InvalidQuantity(value) => write!(f, "invalid quantity '{}'", value),
            Self::InvalidDate(value) => write!(f, "invalid date '{}'", value),
        }
    }
}

/// A dropped row and the first problem found in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based data row number in the source table
    pub row: usize,
    pub kind: RowIssueKind,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.kind)
    }
}

/// Statistics for one normalization run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeStats {
    /// Data rows in the raw table
    pub rows_read: usize,
    /// Rows that became records
    pub rows_kept: usize,
    /// Rows dropped, one issue each
    pub issues: Vec<RowIssue>,
    /// Raw columns dropped by the rename plan
    pub columns_dropped: usize,
    /// Raw columns retained as extras
    pub extra_columns: usize,
    /// State values not found in the reference table, with occurrence counts
    pub unresolved_states: BTreeMap<String, usize>,
}

impl NormalizeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, row: usize, kind: RowIssueKind) {
        self.issues.push(RowIssue { row, kind });
    }

    pub fn rows_dropped(&self) -> usize {
        self.issues.len()
    }

    pub fn add_unresolved_state(&mut self, value: &str) {
        *self.unresolved_states.entry(value.to_string()).or_insert(0) += 1;
    }

    /// Rows carrying a state the reference table could not resolve
    pub fn unresolved_state_rows(&self) -> usize {
        self.unresolved_states.values().sum()
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.rows_kept as f64 / self.rows_read as f64) * 100.0
        }
    }

    /// Issue counts grouped by kind label
    pub fn issue_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            let label = match issue.kind {
                RowIssueKind::MissingValue(_) => "missing value",
                RowIssueKind::InvalidQuantity(_) => "invalid quantity",
                RowIssueKind::InvalidDate(_) => "invalid date",
            };
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> String {
        format!(
            "Normalized {} -> {} rows ({:.1}% kept) | Dropped: {} | Extra columns: {} | Unresolved states: {}",
            self.rows_read,
            self.rows_kept,
            self.success_rate(),
            self.rows_dropped(),
            self.extra_columns,
            self.unresolved_state_rows()
        )
    }
}

/// Dataset produced by normalization together with its statistics
#[derive(Debug, Clone)]
pub struct NormalizeResult {
    pub dataset: CanonicalDataset,
    pub stats: NormalizeStats,
}
