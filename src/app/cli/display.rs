//! CLI display utilities for formatting output

use crate::config::Configuration;
use crate::core::styles::StyleRole;
use crate::scanner::{ScanOutcome, ScanStatus};
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::path::Path;

// style_spec replaces any earlier spec, so layout and colour go in together
fn styled_cell(text: &str, role: StyleRole, layout: &str, use_color: bool) -> Cell {
    let mut spec = layout.to_string();
    if use_color {
        if let Some(color) = role.to_prettytable_spec() {
            spec.push_str(&color);
        }
    }
    Cell::new(text).style_spec(&spec)
}

fn header_row(titles: &[&str], use_color: bool) -> Row {
    Row::new(
        titles
            .iter()
            .map(|title| styled_cell(title, StyleRole::Header, "b", use_color))
            .collect(),
    )
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table
}

/// One line describing how a scan ended
pub fn status_line(outcome: &ScanOutcome, use_color: bool) -> String {
    let status =
        StyleRole::for_status(outcome.status).paint(&outcome.status.to_string(), use_color);
    let detail = match outcome.status {
        ScanStatus::Completed => format!(
            "{} qualifying files in {:.1}s",
            outcome.total_matches(),
            outcome.stats.scan_duration.as_secs_f64()
        ),
        ScanStatus::Cancelled => format!(
            "stopped early after {:.1}s; counts are partial",
            outcome.stats.scan_duration.as_secs_f64()
        ),
        ScanStatus::Failed => outcome
            .failure
            .clone()
            .unwrap_or_else(|| "scan worker stopped unexpectedly".to_string()),
        _ => String::new(),
    };
    format!("Scan {}: {} ({})", outcome.scan_id, status, detail)
}

/// Per-extension counts followed by a total
pub fn outcome_table(outcome: &ScanOutcome, use_color: bool) -> String {
    let mut table = new_table();
    table.set_titles(header_row(&["Extension", "Files"], use_color));

    for (extension, count) in &outcome.counts {
        let role = if *count > 0 {
            StyleRole::Count
        } else {
            StyleRole::Dim
        };
        table.add_row(Row::new(vec![
            Cell::new(extension),
            styled_cell(&count.to_string(), role, "r", use_color),
        ]));
    }
    table.add_row(Row::new(vec![
        styled_cell("total", StyleRole::Key, "", use_color),
        Cell::new(&outcome.total_matches().to_string()).style_spec("r"),
    ]));

    table.to_string()
}

/// Walk statistics on one line
pub fn stats_summary(outcome: &ScanOutcome, use_color: bool) -> String {
    let stats = &outcome.stats;
    [
        ("examined", stats.files_examined),
        ("matched", stats.files_matched),
        ("skipped", stats.entries_skipped),
    ]
    .iter()
    .map(|(key, value)| format!("{} {}", StyleRole::Dim.paint(key, use_color), value))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Human-readable configuration listing
pub fn configuration_table(config: &Configuration, source: &Path, use_color: bool) -> String {
    let mut table = new_table();
    table.set_titles(header_row(&["Setting", "Value"], use_color));

    let roots = config
        .roots()
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>();
    let rows = [
        ("file", source.display().to_string()),
        ("extensions", config.extensions().join("\n")),
        ("excluded-folders", config.excluded_folders().join("\n")),
        ("min-age-days", config.min_age_days().to_string()),
        ("min-size-bytes", config.min_size_bytes().to_string()),
        ("roots", roots.join("\n")),
    ];
    for (key, value) in rows {
        table.add_row(Row::new(vec![
            styled_cell(key, StyleRole::Key, "", use_color),
            Cell::new(&value),
        ]));
    }

    table.to_string()
}

/// Pretty JSON for `--json` output
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
