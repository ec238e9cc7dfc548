//! Interactive report menu.
//!
//! A small numbered loop over the most common reports, for people who do
//! not want to remember subcommand flags. Reads one choice per line from
//! stdin and prints the matching report as a table. Filter flags passed on
//! the command line apply to every report chosen from the menu.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use crate::report;

use super::{OutputFormat, ReportContext, format_money};

pub fn run(ctx: &ReportContext) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let choice = line?;
        println!();

        match choice.trim() {
            "1" => print_total_revenue(ctx)?,
            "2" => super::run_revenue(ctx, "store", OutputFormat::Table)?,
            "3" => super::run_top_products(ctx, ctx.report.top_n, OutputFormat::Table)?,
            "4" => super::run_summary(ctx, OutputFormat::Table)?,
            "5" | "q" => break,
            "" => continue,
            other => println!("{}", format!("Unknown choice {other:?} — enter 1-5.").yellow()),
        }

        println!();
    }

    Ok(())
}

fn print_menu() {
    println!("{}", "Martlens Reports".bold().cyan());
    println!("  1. Total revenue");
    println!("  2. Revenue by store");
    println!("  3. Top products");
    println!("  4. Summary statistics");
    println!("  5. Exit");
}

fn print_total_revenue(ctx: &ReportContext) -> Result<()> {
    let table = ctx.table()?;
    let summary = report::summary(&table, &ctx.spec)?;
    println!(
        "  {} {}",
        "Total revenue:".bold(),
        format_money(summary.total_revenue, &ctx.report.currency)
    );
    Ok(())
}
