//! Shared test utilities for column mapper tests

use crate::app::services::column_mapper::MappingPrompt;
use crate::app::services::schema_registry::CanonicalField;
use std::collections::HashMap;

pub mod mapping_tests;

/// Build owned column names
pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Headers of a typical customs export
pub fn create_test_columns() -> Vec<String> {
    columns(&["Qty", "Date", "Consignee", "Exporter", "Consignee State", "Port"])
}

/// Prompt answering from a script, falling back to the suggestion
#[derive(Default)]
pub struct ScriptedPrompt {
    pub answers: HashMap<CanonicalField, Option<String>>,
    pub asked: Vec<(CanonicalField, Option<String>)>,
}

impl ScriptedPrompt {
    pub fn answer(mut self, field: CanonicalField, column: Option<&str>) -> Self {
        self.answers.insert(field, column.map(str::to_string));
        self
    }
}

impl MappingPrompt for ScriptedPrompt {
    fn choose(
        &mut self,
        field: CanonicalField,
        _candidates: &[String],
        suggestion: Option<&str>,
    ) -> Option<String> {
        self.asked.push((field, suggestion.map(str::to_string)));
        match self.answers.get(&field) {
            Some(answer) => answer.clone(),
            None => suggestion.map(str::to_string),
        }
    }
}
