//! CLI command implementations for Martlens reports.
//!
//! Provides subcommand handlers for:
//! - `martlens summary` — KPI overview of the filtered selection
//! - `martlens revenue --by <dimension>` — revenue broken down by one dimension
//! - `martlens top products|customers` — revenue rankings
//! - `martlens channels` — transaction counts per sales channel
//! - `martlens sample` — a readable sample of matching rows
//! - `martlens export` — matching rows as CSV, to stdout or a file
//! - `martlens stores` — the store directory
//! - `martlens config show|init|set|reset` — configuration management
//!
//! Every report command accepts the same filter flags (`--from`, `--to`,
//! `--store`, `--channel`, `--category`) and builds its own filter
//! specification, so two invocations never share state.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::aggregate::Dimension;
use crate::config;
use crate::config::schema::ReportConfig;
use crate::data::{self, SalesTable};
use crate::filter::FilterSpec;
use crate::rank::{RankedCustomer, RankedEntry};
use crate::report::{self, SampleRow, Summary};

pub mod menu;

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Shared inputs for report commands: where the data lives, which rows are
/// in scope, and the report settings from the effective configuration.
pub struct ReportContext {
    pub data: PathBuf,
    pub spec: FilterSpec,
    pub report: ReportConfig,
}

impl ReportContext {
    fn table(&self) -> Result<SalesTable> {
        Ok(data::load(&self.data)?)
    }
}

// ---------------------------------------------------------------------------
// martlens summary
// ---------------------------------------------------------------------------

/// Show the KPI summary for the filtered selection.
pub fn run_summary(ctx: &ReportContext, format: OutputFormat) -> Result<()> {
    let table = ctx.table()?;
    let summary = report::summary(&table, &ctx.spec)?;

    match format {
        OutputFormat::Json => print_summary_json(&summary)?,
        OutputFormat::Csv => print_summary_csv(&summary),
        OutputFormat::Table => print_summary_table(&summary, &ctx.report),
    }

    Ok(())
}

fn print_summary_table(summary: &Summary, report: &ReportConfig) {
    println!("{}", "Martlens Sales Summary".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!(
        "  {} {}",
        "Total revenue:   ".bold(),
        format_money(summary.total_revenue, &report.currency)
    );
    println!(
        "  {} {}",
        "Transactions:    ".bold(),
        format_number(summary.transactions)
    );
    match summary.mean_revenue {
        Some(mean) => println!(
            "  {} {}",
            "Mean transaction:".bold(),
            format_money(mean, &report.currency)
        ),
        None => println!("  {} {}", "Mean transaction:".bold(), "no data".dimmed()),
    }
    println!(
        "  {} {}",
        "Unique customers:".bold(),
        format_number(summary.unique_customers)
    );
    println!(
        "  {} {}",
        "Unique products: ".bold(),
        format_number(summary.unique_products)
    );

    println!();
    println!(
        "  {}",
        format!(
            "{} of {} rows in scope",
            format_number(summary.transactions),
            format_number(summary.total_rows)
        )
        .dimmed()
    );
}

fn print_summary_json(summary: &Summary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn print_summary_csv(summary: &Summary) {
    println!("total_revenue,transactions,mean_revenue,unique_customers,unique_products,total_rows");
    let mean = summary
        .mean_revenue
        .map(|m| format!("{m:.2}"))
        .unwrap_or_default();
    println!(
        "{:.2},{},{},{},{},{}",
        summary.total_revenue,
        summary.transactions,
        mean,
        summary.unique_customers,
        summary.unique_products,
        summary.total_rows,
    );
}

// ---------------------------------------------------------------------------
// martlens revenue
// ---------------------------------------------------------------------------

/// Show revenue broken down by one grouping dimension.
pub fn run_revenue(ctx: &ReportContext, by: &str, format: OutputFormat) -> Result<()> {
    let Some(dim) = Dimension::parse(by) else {
        bail!(
            "unknown dimension {:?} (expected one of: {})",
            by,
            Dimension::ALL.map(|d| d.as_str()).join(", ")
        );
    };

    let table = ctx.table()?;
    let rows = report::revenue_breakdown(&table, &ctx.spec, dim)?;

    // Machine formats still get an empty document when nothing matches.
    if rows.is_empty() && format == OutputFormat::Table {
        println!("{}", "No transactions match the current filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_revenue_json(&rows)?,
        OutputFormat::Csv => print_revenue_csv(&rows),
        OutputFormat::Table => print_revenue_table(&rows, dim, &ctx.report),
    }

    Ok(())
}

fn print_revenue_table(rows: &[(String, f64)], dim: Dimension, report: &ReportConfig) {
    let total: f64 = rows.iter().map(|(_, value)| value).sum();

    println!(
        "{}",
        format!("Revenue by {}", dimension_title(dim)).bold().cyan()
    );
    println!("{}", "=".repeat(60));
    println!(
        "  {:<28} {:>14} {:>8}",
        dimension_title(dim),
        "Revenue",
        "Share"
    );
    println!("  {}", "-".repeat(58));

    for (i, (key, value)) in rows.iter().enumerate() {
        let share = if total == 0.0 {
            0.0
        } else {
            value / total * 100.0
        };
        let line = format!(
            "  {:<28} {:>14} {:>7.1}%",
            truncate(key, 28),
            format_money(*value, &report.currency),
            share,
        );

        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_revenue_json(rows: &[(String, f64)]) -> Result<()> {
    let values: Vec<_> = rows
        .iter()
        .map(|(key, value)| serde_json::json!({ "key": key, "revenue": value }))
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_revenue_csv(rows: &[(String, f64)]) {
    println!("key,revenue");
    for (key, value) in rows {
        println!("{},{:.2}", csv_field(key), value);
    }
}

// ---------------------------------------------------------------------------
// martlens top products | customers
// ---------------------------------------------------------------------------

/// Show the top products by revenue.
pub fn run_top_products(ctx: &ReportContext, n: usize, format: OutputFormat) -> Result<()> {
    let table = ctx.table()?;
    let entries = report::top_products(&table, &ctx.spec, n)?;

    if entries.is_empty() && format == OutputFormat::Table {
        println!("{}", "No transactions match the current filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_product_json(&entries)?,
        OutputFormat::Csv => print_product_csv(&entries),
        OutputFormat::Table => print_product_table(&entries, &ctx.report),
    }

    Ok(())
}

/// Show the top customers by revenue.
pub fn run_top_customers(ctx: &ReportContext, n: usize, format: OutputFormat) -> Result<()> {
    let table = ctx.table()?;
    let entries = report::top_customers(&table, &ctx.spec, n)?;

    if entries.is_empty() && format == OutputFormat::Table {
        println!("{}", "No transactions match the current filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_customer_json(&entries)?,
        OutputFormat::Csv => print_customer_csv(&entries),
        OutputFormat::Table => print_customer_table(&entries, &ctx.report),
    }

    Ok(())
}

fn print_product_table(entries: &[RankedEntry], report: &ReportConfig) {
    println!("{}", "Top Products by Revenue".bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {:>4} {:<32} {:>14}", "Rank", "Product", "Revenue");
    println!("  {}", "-".repeat(58));

    for entry in entries {
        println!(
            "  {:>4} {:<32} {:>14}",
            entry.rank,
            truncate(&entry.key, 32),
            format_money(entry.value, &report.currency),
        );
    }
}

fn print_product_json(entries: &[RankedEntry]) -> Result<()> {
    let values: Vec<_> = entries
        .iter()
        .map(|e| {
            serde_json::json!({
                "rank": e.rank,
                "product": e.key,
                "revenue": e.value,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_product_csv(entries: &[RankedEntry]) {
    println!("rank,product,revenue");
    for e in entries {
        println!("{},{},{:.2}", e.rank, csv_field(&e.key), e.value);
    }
}

fn print_customer_table(entries: &[RankedCustomer], report: &ReportConfig) {
    println!("{}", "Top Customers by Revenue".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {:>4} {:<16} {:<16} {:>14}",
        "Rank", "Customer", "Segment", "Revenue"
    );
    println!("  {}", "-".repeat(58));

    for entry in entries {
        println!(
            "  {:>4} {:<16} {:<16} {:>14}",
            entry.rank,
            truncate(&entry.customer_id, 16),
            truncate(&entry.segment, 16),
            format_money(entry.revenue, &report.currency),
        );
    }
}

fn print_customer_json(entries: &[RankedCustomer]) -> Result<()> {
    let values: Vec<_> = entries
        .iter()
        .map(|e| {
            serde_json::json!({
                "rank": e.rank,
                "customer_id": e.customer_id,
                "segment": e.segment,
                "revenue": e.revenue,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_customer_csv(entries: &[RankedCustomer]) {
    println!("rank,customer_id,segment,revenue");
    for e in entries {
        println!(
            "{},{},{},{:.2}",
            e.rank,
            csv_field(&e.customer_id),
            csv_field(&e.segment),
            e.revenue,
        );
    }
}

// ---------------------------------------------------------------------------
// martlens channels
// ---------------------------------------------------------------------------

/// Show transaction counts per sales channel.
pub fn run_channels(ctx: &ReportContext, format: OutputFormat) -> Result<()> {
    let table = ctx.table()?;
    let counts = report::channel_counts(&table, &ctx.spec)?;

    if counts.is_empty() && format == OutputFormat::Table {
        println!("{}", "No transactions match the current filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_channel_json(&counts)?,
        OutputFormat::Csv => print_channel_csv(&counts),
        OutputFormat::Table => print_channel_table(&counts),
    }

    Ok(())
}

fn print_channel_table(counts: &[(String, u64)]) {
    let total: u64 = counts.iter().map(|(_, count)| count).sum();

    println!("{}", "Transactions by Channel".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  {:<12} {:>12} {:>8}", "Channel", "Transactions", "Share");
    println!("  {}", "-".repeat(38));

    for (channel, count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        println!(
            "  {:<12} {:>12} {:>7.1}%",
            channel,
            format_number(*count as usize),
            share,
        );
    }
}

fn print_channel_json(counts: &[(String, u64)]) -> Result<()> {
    let values: Vec<_> = counts
        .iter()
        .map(|(channel, count)| serde_json::json!({ "channel": channel, "transactions": count }))
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_channel_csv(counts: &[(String, u64)]) {
    println!("channel,transactions");
    for (channel, count) in counts {
        println!("{},{}", channel, count);
    }
}

// ---------------------------------------------------------------------------
// martlens sample
// ---------------------------------------------------------------------------

/// Show a readable sample of the rows that pass the current filters.
pub fn run_sample(ctx: &ReportContext, rows: usize, format: OutputFormat) -> Result<()> {
    let table = ctx.table()?;
    let sample = report::sample(&table, &ctx.spec, rows);

    if sample.is_empty() && format == OutputFormat::Table {
        println!("{}", "No transactions match the current filters.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_sample_json(&sample)?,
        OutputFormat::Csv => print_sample_csv(&sample),
        OutputFormat::Table => print_sample_table(&sample, &ctx.report),
    }

    Ok(())
}

fn print_sample_table(rows: &[SampleRow], report: &ReportConfig) {
    println!("{}", "Sample Transactions".bold().cyan());
    println!("{}", "=".repeat(90));
    println!(
        "  {:<12} {:<12} {:<14} {:<9} {:<22} {:>4} {:>12}",
        "Date", "Transaction", "Store", "Channel", "Product", "Qty", "Revenue"
    );
    println!("  {}", "-".repeat(88));

    for (i, row) in rows.iter().enumerate() {
        let line = format!(
            "  {:<12} {:<12} {:<14} {:<9} {:<22} {:>4} {:>12}",
            row.date,
            truncate(&row.transaction_id, 12),
            truncate(&row.store_location, 14),
            row.channel,
            truncate(&row.product_name, 22),
            row.quantity,
            format_money(row.line_revenue, &report.currency),
        );

        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_sample_json(rows: &[SampleRow]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

fn print_sample_csv(rows: &[SampleRow]) {
    println!("date,transaction_id,store_location,channel,product_name,quantity,line_revenue");
    for row in rows {
        println!(
            "{},{},{},{},{},{},{:.2}",
            row.date,
            csv_field(&row.transaction_id),
            csv_field(&row.store_location),
            row.channel,
            csv_field(&row.product_name),
            row.quantity,
            row.line_revenue,
        );
    }
}

// ---------------------------------------------------------------------------
// martlens export
// ---------------------------------------------------------------------------

/// Export the rows that pass the current filters as CSV, either to stdout
/// or to a file. The output reloads cleanly through `martlens --data`.
pub fn run_export(ctx: &ReportContext, out: Option<&Path>) -> Result<()> {
    let table = ctx.table()?;
    let csv = report::export(&table, &ctx.spec)?;

    match out {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            let rows = csv.lines().count().saturating_sub(1);
            println!(
                "{} Exported {} rows to {}",
                "✓".green().bold(),
                format_number(rows),
                path.display()
            );
        }
        None => print!("{csv}"),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// martlens stores
// ---------------------------------------------------------------------------

/// List the store directory observed in the data.
pub fn run_stores(ctx: &ReportContext, format: OutputFormat) -> Result<()> {
    let table = ctx.table()?;
    let directory = table.store_directory();

    if directory.is_empty() && format == OutputFormat::Table {
        println!("{}", "No stores found in the data.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let values: Vec<_> = directory
                .iter()
                .map(|(id, location)| {
                    serde_json::json!({ "store_id": id, "location": location })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Csv => {
            println!("store_id,location");
            for (id, location) in directory {
                println!("{},{}", csv_field(id), csv_field(location));
            }
        }
        OutputFormat::Table => {
            println!("{}", "Store Directory".bold().cyan());
            println!("{}", "=".repeat(40));
            println!("  {:<12} Location", "Store");
            println!("  {}", "-".repeat(38));
            for (id, location) in directory {
                println!("  {:<12} {}", id, location);
            }

            let locations: HashSet<&str> = directory.values().map(String::as_str).collect();
            println!();
            println!(
                "  {}",
                format!("{} stores across {} locations", directory.len(), locations.len())
                    .dimmed()
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// martlens config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Martlens Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.martlens/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.martlens/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".martlens.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".martlens.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "MARTLENS_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.martlens/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point Martlens at your sales data.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Title-case label for a grouping dimension.
fn dimension_title(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Category => "Category",
        Dimension::Store => "Store",
        Dimension::Channel => "Channel",
        Dimension::Date => "Date",
        Dimension::Product => "Product",
        Dimension::Customer => "Customer",
        Dimension::PaymentMethod => "Payment Method",
        Dimension::Segment => "Segment",
        Dimension::Weekday => "Day of Week",
    }
}

/// Format a count with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Format a monetary amount: currency symbol, comma separators, two
/// decimal places. Negative amounts keep the sign in front of the symbol.
fn format_money(amount: f64, currency: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = whole
        .parse::<usize>()
        .map(format_number)
        .unwrap_or_else(|_| whole.to_string());
    format!("{sign}{currency}{grouped}.{cents}")
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
/// Counts characters rather than bytes, the same unit `{:<width}` pads by.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
