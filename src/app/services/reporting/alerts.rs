//! Rule-based alerts on shipment volumes

use super::trends::{monthly_totals, round2, yearly_totals};
use crate::app::models::CanonicalDataset;
use crate::config::AlertThresholds;
use serde::Serialize;
use std::fmt;

/// A condition worth a user's attention
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmartAlert {
    /// Shipments below the low-quantity threshold
    LowQuantity { shipments: usize, threshold: f64 },
    /// Years whose growth over the previous year exceeds the threshold
    HighGrowth { years: Vec<i32>, threshold: f64 },
    /// Years whose growth over the previous year is below the decline threshold
    Decline { years: Vec<i32>, threshold: f64 },
    /// Months whose quantity fell by more than the threshold from the month before
    SuddenDrop { months: Vec<String>, threshold: f64 },
    /// Nothing to report
    AllClear,
}

impl fmt::Display for SmartAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join_years = |years: &[i32]| {
            years
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        match self {
            Self::LowQuantity { shipments, threshold } => write!(
                f,
                "Low import quantities (< {}) in {} shipments. Check products or suppliers.",
                threshold, shipments
            ),
            Self::HighGrowth { years, threshold } => write!(
                f,
                "Year-over-year growth above {}% in {}. Review market demand.",
                threshold,
                join_years(years)
            ),
            Self::Decline { years, threshold } => write!(
                f,
                "Imports declined by more than {}% in {}. Investigate reasons.",
                threshold.abs(),
                join_years(years)
            ),
            Self::SuddenDrop { months, threshold } => write!(
                f,
                "Monthly imports dropped by more than {} in {}. Review data.",
                threshold.abs(),
                months.join(", ")
            ),
            Self::AllClear => f.write_str("No critical alerts detected."),
        }
    }
}

/// Evaluate every alert rule against `dataset`
///
/// Returns `[SmartAlert::AllClear]` when no rule fires.
pub fn smart_alerts(dataset: &CanonicalDataset, thresholds: &AlertThresholds) -> Vec<SmartAlert> {
    let mut alerts = Vec::new();

    let low = dataset
        .records()
        .iter()
        .filter(|record| record.quantity < thresholds.low_quantity)
        .count();
    if low > 0 {
        alerts.push(SmartAlert::LowQuantity {
            shipments: low,
            threshold: thresholds.low_quantity,
        });
    }

    let yearly = yearly_totals(dataset);
    let years_where = |predicate: &dyn Fn(f64) -> bool| -> Vec<i32> {
        yearly
            .iter()
            .filter(|total| total.growth_percent.is_some_and(predicate))
            .map(|total| total.year)
            .collect()
    };

    let growing = years_where(&|growth| growth > thresholds.high_growth_percent);
    if !growing.is_empty() {
        alerts.push(SmartAlert::HighGrowth {
            years: growing,
            threshold: thresholds.high_growth_percent,
        });
    }

    let declining = years_where(&|growth| growth < thresholds.decline_percent);
    if !declining.is_empty() {
        alerts.push(SmartAlert::Decline {
            years: declining,
            threshold: thresholds.decline_percent,
        });
    }

    let monthly = monthly_totals(dataset);
    let drops: Vec<String> = monthly
        .windows(2)
        .filter(|pair| round2(pair[1].quantity - pair[0].quantity) < thresholds.sudden_drop_quantity)
        .map(|pair| pair[1].label())
        .collect();
    if !drops.is_empty() {
        alerts.push(SmartAlert::SuddenDrop {
            months: drops,
            threshold: thresholds.sudden_drop_quantity,
        });
    }

    if alerts.is_empty() {
        alerts.push(SmartAlert::AllClear);
    }
    alerts
}
