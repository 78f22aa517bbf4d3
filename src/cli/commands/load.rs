//! Load command: show how a source maps onto the shipment schema

use super::shared::{format_quantity, load_source};
use crate::Result;
use crate::app::models::ShipmentRecord;
use crate::app::services::normalizer::NormalizeStats;
use crate::cli::args::LoadArgs;
use crate::config::Config;
use crate::{CanonicalField, ColumnMapping};
use colored::*;

/// Run the load command
pub fn run_load(args: &LoadArgs, config: &Config, show_progress: bool) -> Result<()> {
    let result = load_source(config, &args.source, &args.mapping, show_progress)?;

    print_mapping(&result.mapping);
    print_stats(&result.stats, args.show_issues);

    if args.preview > 0 {
        let records = result.dataset.records();
        println!();
        println!(
            "{}",
            format!("Preview ({} of {} records)", records.len().min(args.preview), records.len())
                .bright_green()
                .bold()
        );
        print_preview(&records[..records.len().min(args.preview)]);
    }

    Ok(())
}

fn print_mapping(mapping: &ColumnMapping) {
    println!("{}", "Column mapping".bright_green().bold());
    for field in CanonicalField::ALL.iter().filter(|field| field.is_sourced()) {
        let sources = mapping.sources_for(*field);
        let source = match sources.as_slice() {
            [] => "(none)".bright_black().to_string(),
            sources => sources.join(", ").bright_cyan().to_string(),
        };
        println!("  {:<16} <- {}", field.label(), source);
    }
}

fn print_stats(stats: &NormalizeStats, show_issues: bool) {
    println!();
    println!("{}", "Rows".bright_green().bold());
    println!("  Read:     {}", stats.rows_read);
    println!("  Kept:     {} ({:.1}%)", stats.rows_kept, stats.success_rate());
    println!("  Dropped:  {}", stats.rows_dropped());

    for (kind, count) in stats.issue_counts() {
        println!("    {:<18} {}", kind, count.to_string().yellow());
    }
    if show_issues {
        for issue in &stats.issues {
            println!("    {}", issue.to_string().bright_black());
        }
    }

    if stats.extra_columns > 0 || stats.columns_dropped > 0 {
        println!(
            "  Columns:  {} extra kept, {} dropped",
            stats.extra_columns, stats.columns_dropped
        );
    }

    if !stats.unresolved_states.is_empty() {
        println!(
            "  {} {}",
            "Unresolved states:".yellow(),
            stats
                .unresolved_states
                .iter()
                .map(|(state, count)| format!("{} ({})", state, count))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

fn print_preview(records: &[ShipmentRecord]) {
    println!(
        "  {:<10}  {:>12}  {:<24}  {:<24}  {:<16}  {}",
        "Date", "Quantity", "Consignee", "Exporter", "State", "Importer ID"
    );
    for record in records {
        println!(
            "  {:<10}  {:>12}  {:<24}  {:<24}  {:<16}  {}",
            record.date.format("%Y-%m-%d"),
            format_quantity(record.quantity),
            truncate(&record.consignee_name, 24),
            truncate(&record.exporter_name, 24),
            truncate(&record.state, 16),
            record.importer_id.bright_black()
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("Acme Trading Company", 8), "Acme Tr…");
        assert_eq!(truncate("", 3), "");
    }
}
