//! Mapping completeness and schema conformance checks
//!
//! Both checks collect every missing field before failing so the user can fix
//! the mapping or the upload in one pass.

use crate::app::services::column_mapper::ColumnMapping;
use crate::app::services::schema_registry::{CanonicalField, required_fields, required_source_fields};
use crate::{Error, Result};
use tracing::debug;

/// Point in the load pipeline at which columns are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Renamed raw headers, before normalization; only sourced fields are required
    PreNormalize,
    /// Columns of the finished dataset; every canonical field is required
    Final,
}

impl Stage {
    fn required(self) -> Vec<CanonicalField> {
        match self {
            Stage::PreNormalize => required_source_fields().collect(),
            Stage::Final => required_fields().to_vec(),
        }
    }
}

/// Check that every sourced field is the target of some mapping entry
///
/// # Errors
/// Returns `Error::MappingIncomplete` naming every untargeted field, in schema order.
pub fn validate_mapping(mapping: &ColumnMapping) -> Result<()> {
    let targeted = mapping.targeted_fields();
    let missing: Vec<String> = required_source_fields()
        .filter(|field| !targeted.contains(field))
        .map(|field| field.label().to_string())
        .collect();

    if missing.is_empty() {
        debug!("Mapping covers all {} sourced fields", targeted.len());
        Ok(())
    } else {
        Err(Error::mapping_incomplete(missing))
    }
}

/// Check that `columns` contains every field required at `stage`
///
/// # Errors
/// Returns `Error::Schema` naming every absent field, in schema order.
pub fn validate<S: AsRef<str>>(columns: &[S], stage: Stage) -> Result<()> {
    let missing: Vec<String> = stage
        .required()
        .into_iter()
        .map(CanonicalField::label)
        .filter(|label| !columns.iter().any(|column| column.as_ref() == *label))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        debug!("{:?} validation passed for {} columns", stage, columns.len());
        Ok(())
    } else {
        Err(Error::schema(missing))
    }
}
