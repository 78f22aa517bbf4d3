//! Report command: KPIs, trends and alerts for a filtered dataset

use super::shared::{format_quantity, load_source};
use crate::app::services::reporting::{PartyTotal, Report, SmartAlert};
use crate::cli::args::{ReportArgs, ReportFormat};
use crate::config::Config;
use crate::constants::MONTH_NAMES;
use crate::{Error, Result, filter};
use colored::*;
use std::io::Write;
use tracing::{info, warn};

/// Run the report command
pub fn run_report(args: &ReportArgs, config: &Config, show_progress: bool) -> Result<()> {
    let result = load_source(config, &args.source, &args.mapping, show_progress)?;

    let criteria = args.filters.to_criteria();
    let dataset = filter(&result.dataset, &criteria)?;
    info!("{} of {} records match the filters", dataset.len(), result.dataset.len());
    if dataset.is_empty() {
        warn!("No records match the filters");
    }

    let report = Report::build(&dataset, &config.alerts, args.top);

    match args.format {
        ReportFormat::Json => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &report)
                .map_err(|e| Error::io("Failed to write report", e.into()))?;
            writeln!(stdout).map_err(|e| Error::io("Failed to write report", e))?;
        }
        ReportFormat::Text => print_report(&report),
    }

    Ok(())
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bright_green().bold());
}

fn print_report(report: &Report) {
    let metrics = &report.metrics;

    heading("Key metrics");
    println!("  Total quantity:    {}", format_quantity(metrics.total_quantity).bright_white().bold());
    println!("  Shipments:         {}", metrics.shipments);
    println!("  Unique importers:  {}", metrics.unique_importers);
    println!("  Unique exporters:  {}", metrics.unique_exporters);
    println!("  States:            {}", metrics.unique_states);
    println!("  YoY growth:        {}", colored_percent(metrics.yoy_growth));
    println!("  MoM growth:        {}", colored_percent(metrics.mom_growth));
    let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    println!("  Top importer:      {}", or_dash(&metrics.top_importer).bright_cyan());
    println!("  Top exporter:      {}", or_dash(&metrics.top_exporter).bright_cyan());
    println!("  Top state:         {}", or_dash(&metrics.top_state).bright_cyan());

    heading("Yearly totals");
    for year in &report.yearly {
        let growth = year
            .growth_percent
            .map(colored_percent)
            .unwrap_or_else(|| "-".bright_black().to_string());
        println!(
            "  {}  {:>14}  {:>6} shipments  {}",
            year.year,
            format_quantity(year.quantity),
            year.shipments,
            growth
        );
    }

    heading("Monthly totals");
    for month in &report.monthly {
        println!(
            "  {}  {:<9}  {:>14}  {:>6} shipments",
            month.label(),
            month.month_name,
            format_quantity(month.quantity),
            month.shipments
        );
    }

    if report.year_profiles.len() > 1 {
        heading("Year-on-year by month");
        let years: Vec<String> = report.year_profiles.iter().map(|p| format!("{:>12}", p.year)).collect();
        println!("  {:<9}{}", "", years.join(""));
        for (index, name) in MONTH_NAMES.iter().enumerate() {
            let values: Vec<String> = report
                .year_profiles
                .iter()
                .map(|p| format!("{:>12}", format_quantity(p.months[index])))
                .collect();
            println!("  {:<9}{}", name, values.join(""));
        }
    }

    heading("States");
    for state in &report.states {
        println!(
            "  {:<24}  {:>14}  {:>6} shipments",
            state.state,
            format_quantity(state.quantity),
            state.shipments
        );
    }

    heading("Top importers");
    print_parties(&report.top_importers);
    heading("Top exporters");
    print_parties(&report.top_exporters);

    heading("Alerts");
    for alert in &report.alerts {
        let line = alert.to_string();
        match alert {
            SmartAlert::AllClear => println!("  {}", line.green()),
            SmartAlert::HighGrowth { .. } => println!("  {}", line.bright_blue()),
            _ => println!("  {}", line.yellow()),
        }
    }
}

fn print_parties(parties: &[PartyTotal]) {
    for (rank, party) in parties.iter().enumerate() {
        println!(
            "  {:>2}. {:<28}  {:>14}  {:>6.2}%  {}",
            rank + 1,
            party.name,
            format_quantity(party.quantity),
            party.share_percent,
            party.id.bright_black()
        );
    }
}

fn colored_percent(value: f64) -> String {
    let text = format!("{:+.2}%", value);
    if value > 0.0 {
        text.green().to_string()
    } else if value < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}
