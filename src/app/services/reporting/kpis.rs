//! Headline figures for a (filtered) dataset

use super::trends::{growth_percent, monthly_totals, party_contributions, yearly_totals};
use crate::app::models::CanonicalDataset;
use crate::app::services::normalizer::PartyKind;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Key performance indicators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_quantity: f64,
    pub shipments: usize,
    pub unique_importers: usize,
    pub unique_exporters: usize,
    pub unique_states: usize,
    /// Growth of the last year over the one before, in percent
    pub yoy_growth: f64,
    /// Growth of the last month over the one before, in percent
    pub mom_growth: f64,
    pub top_importer: Option<String>,
    pub top_exporter: Option<String>,
    pub top_state: Option<String>,
}

impl KeyMetrics {
    /// Calculate the indicators of `dataset`
    ///
    /// Growth figures are `0.0` when fewer than two periods exist or the
    /// earlier period shipped nothing.
    pub fn calculate(dataset: &CanonicalDataset) -> Self {
        let records = dataset.records();

        let yearly = yearly_totals(dataset);
        let yoy_growth = match yearly.as_slice() {
            [.., previous, last] => growth_percent(previous.quantity, last.quantity),
            _ => 0.0,
        };

        let monthly = monthly_totals(dataset);
        let mom_growth = match monthly.as_slice() {
            [.., previous, last] => growth_percent(previous.quantity, last.quantity),
            _ => 0.0,
        };

        let mut state_quantities: HashMap<&str, f64> = HashMap::new();
        for record in records {
            *state_quantities.entry(record.state.as_str()).or_insert(0.0) += record.quantity;
        }
        let top_state = state_quantities
            .into_iter()
            .max_by(|(a_state, a), (b_state, b)| a.total_cmp(b).then_with(|| b_state.cmp(a_state)))
            .map(|(state, _)| state.to_string());

        Self {
            total_quantity: records.iter().map(|r| r.quantity).sum(),
            shipments: records.len(),
            unique_importers: records.iter().map(|r| &r.importer_id).collect::<HashSet<_>>().len(),
            unique_exporters: records.iter().map(|r| &r.exporter_id).collect::<HashSet<_>>().len(),
            unique_states: records.iter().map(|r| &r.state).collect::<HashSet<_>>().len(),
            yoy_growth,
            mom_growth,
            top_importer: party_contributions(dataset, PartyKind::Importer)
                .into_iter()
                .next()
                .map(|party| party.name),
            top_exporter: party_contributions(dataset, PartyKind::Exporter)
                .into_iter()
                .next()
                .map(|party| party.name),
            top_state,
        }
    }
}
