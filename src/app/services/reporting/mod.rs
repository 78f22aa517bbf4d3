//! Reporting over canonical datasets
//!
//! - [`kpis`] - headline figures and growth rates
//! - [`trends`] - monthly, yearly, state and party aggregates
//! - [`alerts`] - threshold-based smart alerts
//! - [`export`] - CSV and Parquet export
//!
//! Reports are computed from a dataset that has usually been narrowed with
//! [`filter`](crate::filter) first.

pub mod alerts;
pub mod export;
pub mod kpis;
pub mod trends;

#[cfg(test)]
pub mod tests;

pub use alerts::{SmartAlert, smart_alerts};
pub use export::{ExportFormat, export_dataset, write_csv};
pub use kpis::KeyMetrics;
pub use trends::{
    MonthlyTotal, PartyTotal, StateTotal, YearProfile, YearlyTotal, growth_percent,
    monthly_totals, party_contributions, state_totals, year_profiles, yearly_totals,
};

use crate::app::models::CanonicalDataset;
use crate::app::services::normalizer::PartyKind;
use crate::config::AlertThresholds;
use serde::Serialize;

/// Everything a report view shows for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub metrics: KeyMetrics,
    pub monthly: Vec<MonthlyTotal>,
    pub yearly: Vec<YearlyTotal>,
    pub states: Vec<StateTotal>,
    pub top_importers: Vec<PartyTotal>,
    pub top_exporters: Vec<PartyTotal>,
    pub year_profiles: Vec<YearProfile>,
    pub alerts: Vec<SmartAlert>,
}

impl Report {
    /// Build a report, keeping the `top_n` largest importers and exporters
    pub fn build(dataset: &CanonicalDataset, thresholds: &AlertThresholds, top_n: usize) -> Self {
        let top = |kind| {
            let mut parties = party_contributions(dataset, kind);
            parties.truncate(top_n);
            parties
        };

        Self {
            metrics: KeyMetrics::calculate(dataset),
            monthly: monthly_totals(dataset),
            yearly: yearly_totals(dataset),
            states: state_totals(dataset),
            top_importers: top(PartyKind::Importer),
            top_exporters: top(PartyKind::Exporter),
            year_profiles: year_profiles(dataset),
            alerts: smart_alerts(dataset, thresholds),
        }
    }
}
