//! Trend aggregates over a canonical dataset
//!
//! All aggregates are plain sums of quantity with shipment counts, ordered
//! so they can be rendered without further sorting.

use crate::app::models::{CanonicalDataset, ShipmentRecord};
use crate::app::services::normalizer::PartyKind;
use crate::constants::{MONTH_NAMES, NATIONAL_STATE_NAME};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Quantity shipped in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    pub month_name: &'static str,
    pub quantity: f64,
    pub shipments: usize,
}

impl MonthlyTotal {
    /// `YYYY-MM` label
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Quantity shipped in one year, with growth over the previous year present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTotal {
    pub year: i32,
    pub quantity: f64,
    pub shipments: usize,
    /// Growth over the previous year in the data, in percent
    pub growth_percent: Option<f64>,
}

/// Quantity shipped to one state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTotal {
    pub state: String,
    pub quantity: f64,
    pub shipments: usize,
}

/// Contribution of one importer or exporter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyTotal {
    pub id: String,
    /// Name as first seen in the data
    pub name: String,
    pub quantity: f64,
    pub shipments: usize,
    /// Share of the dataset's total quantity, in percent
    pub share_percent: f64,
}

/// Month-by-month quantities of one year, for year-on-year comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearProfile {
    pub year: i32,
    /// Quantity per month, January first
    pub months: [f64; 12],
}

/// Percentage change from `previous` to `current`, rounded to two decimals
///
/// Zero when there is no previous quantity to compare against.
pub fn growth_percent(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        round2((current - previous) / previous * 100.0)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Totals per calendar month, in chronological order
pub fn monthly_totals(dataset: &CanonicalDataset) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for record in dataset.records() {
        let entry = totals
            .entry((record.year(), record.month_number()))
            .or_insert((0.0, 0));
        entry.0 += record.quantity;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|((year, month), (quantity, shipments))| MonthlyTotal {
            year,
            month,
            month_name: MONTH_NAMES[(month - 1) as usize],
            quantity,
            shipments,
        })
        .collect()
}

/// Totals per year in ascending order, each with growth over the year before it
pub fn yearly_totals(dataset: &CanonicalDataset) -> Vec<YearlyTotal> {
    let mut totals: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for record in dataset.records() {
        let entry = totals.entry(record.year()).or_insert((0.0, 0));
        entry.0 += record.quantity;
        entry.1 += 1;
    }

    let mut previous: Option<f64> = None;
    totals
        .into_iter()
        .map(|(year, (quantity, shipments))| {
            let growth = previous.map(|prev| growth_percent(prev, quantity));
            previous = Some(quantity);
            YearlyTotal {
                year,
                quantity,
                shipments,
                growth_percent: growth,
            }
        })
        .collect()
}

/// Totals per state, largest first, without the national pseudo-state
pub fn state_totals(dataset: &CanonicalDataset) -> Vec<StateTotal> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for record in dataset.records() {
        if record.state.eq_ignore_ascii_case(NATIONAL_STATE_NAME) {
            continue;
        }
        let entry = totals.entry(record.state.as_str()).or_insert((0.0, 0));
        entry.0 += record.quantity;
        entry.1 += 1;
    }

    let mut states: Vec<StateTotal> = totals
        .into_iter()
        .map(|(state, (quantity, shipments))| StateTotal {
            state: state.to_string(),
            quantity,
            shipments,
        })
        .collect();
    states.sort_by(|a, b| b.quantity.total_cmp(&a.quantity).then_with(|| a.state.cmp(&b.state)));
    states
}

/// Contributions per importer or exporter, largest first
///
/// Parties are grouped by identifier, so spelling variants that normalize to
/// the same name are counted together.
pub fn party_contributions(dataset: &CanonicalDataset, kind: PartyKind) -> Vec<PartyTotal> {
    let party = |record: &ShipmentRecord| -> (String, String) {
        match kind {
            PartyKind::Importer => (record.importer_id.clone(), record.consignee_name.clone()),
            PartyKind::Exporter => (record.exporter_id.clone(), record.exporter_name.clone()),
        }
    };

    let grand_total: f64 = dataset.records().iter().map(|r| r.quantity).sum();
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, PartyTotal> = HashMap::new();

    for record in dataset.records() {
        let (id, name) = party(record);
        let entry = totals.entry(id.clone()).or_insert_with(|| {
            order.push(id.clone());
            PartyTotal {
                id,
                name,
                quantity: 0.0,
                shipments: 0,
                share_percent: 0.0,
            }
        });
        entry.quantity += record.quantity;
        entry.shipments += 1;
    }

    let mut parties: Vec<PartyTotal> = order
        .into_iter()
        .filter_map(|id| totals.remove(&id))
        .map(|mut party| {
            party.share_percent = if grand_total > 0.0 {
                round2(party.quantity / grand_total * 100.0)
            } else {
                0.0
            };
            party
        })
        .collect();
    parties.sort_by(|a, b| b.quantity.total_cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    parties
}

/// Month-by-month quantities for every year, for comparing seasonal shape
pub fn year_profiles(dataset: &CanonicalDataset) -> Vec<YearProfile> {
    let mut profiles: BTreeMap<i32, [f64; 12]> = BTreeMap::new();
    for record in dataset.records() {
        let months = profiles.entry(record.year()).or_insert([0.0; 12]);
        months[(record.month_number() - 1) as usize] += record.quantity;
    }

    profiles
        .into_iter()
        .map(|(year, months)| YearProfile { year, months })
        .collect()
}
