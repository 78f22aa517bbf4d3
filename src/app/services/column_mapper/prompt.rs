//! Mapping strategies and the interactive prompt seam

use super::mapping::ColumnMapping;
use crate::app::services::schema_registry::CanonicalField;

/// Asks a user which raw column feeds a canonical field
///
/// Implementations present the choice however they like (the CLI uses
/// stdin/stdout). Returning `None` declines the field, which later fails
/// mapping validation. Presentation failures should be reported as `None`.
pub trait MappingPrompt {
    fn choose(
        &mut self,
        field: CanonicalField,
        candidates: &[String],
        suggestion: Option<&str>,
    ) -> Option<String>;
}

/// How a column mapping is produced
pub enum MappingStrategy<'a> {
    /// Best-effort match on labels and aliases
    Automatic,
    /// One prompt per sourced field, defaulting to the automatic suggestion
    Interactive(&'a mut dyn MappingPrompt),
    /// A mapping collected elsewhere, used as-is
    Preset(ColumnMapping),
}

impl MappingStrategy<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Interactive(_) => "interactive",
            Self::Preset(_) => "preset",
        }
    }
}

impl std::fmt::Debug for MappingStrategy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preset(mapping) => f.debug_tuple("Preset").field(mapping).finish(),
            other => f.write_str(other.name()),
        }
    }
}
