use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{CodeLevel, HazardLevel, SubstanceReport};

/// Render a colored terminal report.
pub fn render(reports: &[SubstanceReport], verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        for report in reports {
            println!("{}", summary_line(report));
        }
        return Ok(());
    }

    println!("\n {} v{}\n", "ghs-checkr".bold(), env!("CARGO_PKG_VERSION"));

    for report in reports {
        render_substance(report, verbose);
    }

    render_summary(reports);
    Ok(())
}

fn render_substance(report: &SubstanceReport, verbose: bool) {
    if let Some(error) = &report.error {
        println!(" {} {}  {}\n", "✗".red(), report.query.bold(), error.red());
        return;
    }

    let origin = match (&report.cid, &report.source) {
        (Some(cid), Some(source)) => format!("CID {}, {}", cid, source),
        (None, Some(source)) => source.to_string(),
        _ => String::new(),
    };
    println!(
        " {} {}  {}  {}",
        "→".cyan(),
        report.query.bold(),
        origin.dimmed(),
        colorize(report.level)
    );

    if report.codes.is_empty() {
        println!("   No GHS hazard statements found\n");
        return;
    }

    let shown: Vec<&CodeLevel> = report
        .codes
        .iter()
        .filter(|c| verbose || c.level.is_some())
        .collect();
    if !shown.is_empty() {
        render_table(&shown);
    }

    if !verbose {
        let unclassified: Vec<String> = report
            .codes
            .iter()
            .filter(|c| c.level.is_none())
            .map(|c| c.code.to_string())
            .collect();
        if !unclassified.is_empty() {
            println!(
                "   {} without a classification rule: {}",
                unclassified.len(),
                unclassified.join(", ").dimmed()
            );
        }
    }
    println!();
}

fn render_table(codes: &[&CodeLevel]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Code").add_attribute(Attribute::Bold),
            Cell::new("Level").add_attribute(Attribute::Bold),
        ]);

    for entry in codes {
        let level_cell = match entry.level {
            Some(level) => Cell::new(level.to_string()).fg(level_color(level)),
            None => Cell::new("unclassified").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(entry.code.as_str()),
            level_cell.set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn render_summary(reports: &[SubstanceReport]) {
    let failed = reports.iter().filter(|r| r.is_failed()).count();
    let worst = reports
        .iter()
        .filter(|r| !r.is_failed())
        .map(|r| r.level)
        .max()
        .unwrap_or_default();

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Substances         : {}", reports.len()));
    println!(" │  {:<48} │", format!("Lookups failed     : {}", failed));
    println!(" │  {:<48} │", format!("Highest level      : {}", worst));
    println!(" └────────────────────────────────────────────────────┘\n");
}

fn summary_line(report: &SubstanceReport) -> String {
    match &report.error {
        Some(error) => format!("{}: {}", report.query, error.red()),
        None => {
            let codes: Vec<&str> = report.codes.iter().map(|c| c.code.as_str()).collect();
            format!(
                "{}: {} [{}]",
                report.query,
                colorize(report.level),
                codes.join(", ")
            )
        }
    }
}

fn colorize(level: HazardLevel) -> ColoredString {
    let text = level.to_string();
    match level {
        HazardLevel::None => text.dimmed(),
        HazardLevel::Low => text.green(),
        HazardLevel::Moderate => text.yellow(),
        HazardLevel::High => text.bright_red(),
        HazardLevel::Severe => text.red().bold(),
        HazardLevel::Critical => text.magenta().bold(),
    }
}

fn level_color(level: HazardLevel) -> Color {
    match level {
        HazardLevel::None => Color::DarkGrey,
        HazardLevel::Low => Color::Green,
        HazardLevel::Moderate => Color::Yellow,
        HazardLevel::High => Color::Red,
        HazardLevel::Severe => Color::DarkRed,
        HazardLevel::Critical => Color::Magenta,
    }
}
