use std::cmp::Reverse;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use scrub_cli::logging::redact_value;
use scrub_cli::types::{CheckResult, RunResult};
use scrub_model::{QualityReport, Severity};

pub fn print_run_summary(result: &RunResult) {
    println!("Project: {}", result.project);
    if result.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if let Some(path) = &result.lineage {
        println!("Lineage: {}", path.display());
    }
    if let Some(path) = &result.quality_report {
        println!("Quality report: {}", path.display());
    }
    println!("Rules fingerprint: {}", result.rules_fingerprint);
    if !result.sources.is_empty() {
        let sources: Vec<String> = result
            .sources
            .iter()
            .map(|(label, count)| format!("{label}={count}"))
            .collect();
        println!("Sources: {}", sources.join(", "));
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Original"),
        header_cell("Cleaned"),
        header_cell("Removed"),
        header_cell("Steps"),
        header_cell("Files"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut total_original = 0usize;
    let mut total_cleaned = 0usize;
    for summary in &result.tables {
        let cleaned = &summary.cleaned;
        total_original += cleaned.original_rows;
        total_cleaned += cleaned.table.len();
        let (errors, warnings) = match &summary.quality {
            Some(report) => (Some(report.error_count()), Some(report.warning_count())),
            None => (None, None),
        };
        table.add_row(vec![
            Cell::new(summary.kind.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(cleaned.original_rows),
            Cell::new(cleaned.table.len()),
            count_cell(Some(cleaned.removed_rows()), Color::Yellow),
            Cell::new(cleaned.lineage.len()),
            Cell::new(summary.outputs.len()),
            count_cell(errors, Color::Red),
            count_cell(warnings, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_original).add_attribute(Attribute::Bold),
        Cell::new(total_cleaned).add_attribute(Attribute::Bold),
        Cell::new(total_original.saturating_sub(total_cleaned)).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    let reports: Vec<&QualityReport> = result
        .tables
        .iter()
        .filter_map(|summary| summary.quality.as_ref())
        .collect();
    print_issue_table(&reports);
}

pub fn print_check_summary(result: &CheckResult) {
    println!("Project: {}", result.project);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Records"),
        header_cell("Duplicates"),
        header_cell("Missing"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for report in &result.reports {
        table.add_row(vec![
            Cell::new(&report.table_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(report.total_records),
            count_cell(Some(report.duplicate_records), Color::Yellow),
            count_cell(Some(report.total_missing()), Color::Yellow),
            count_cell(Some(report.error_count()), Color::Red),
            count_cell(Some(report.warning_count()), Color::Yellow),
        ]);
    }
    println!("{table}");
    let reports: Vec<&QualityReport> = result.reports.iter().collect();
    print_issue_table(&reports);
}

fn print_issue_table(reports: &[&QualityReport]) {
    let mut issues: Vec<_> = reports
        .iter()
        .flat_map(|report| {
            report
                .issues
                .iter()
                .map(move |issue| (report.table_name.as_str(), issue))
        })
        .collect();
    if issues.is_empty() {
        return;
    }
    issues.sort_by_key(|(table, issue)| {
        (
            severity_rank(issue.severity),
            *table,
            Reverse(issue.count),
        )
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Rule"),
        header_cell("Count"),
        header_cell("Message"),
        header_cell("Examples"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for (table_name, issue) in issues {
        table.add_row(vec![
            Cell::new(table_name).fg(Color::Blue),
            severity_cell(issue.severity),
            Cell::new(issue.field.as_deref().unwrap_or("-")),
            Cell::new(&issue.rule_id),
            Cell::new(issue.count).fg(severity_color(issue.severity)),
            Cell::new(&issue.message),
            example_cell(&issue.samples),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(180);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Fixed(32)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn example_cell(samples: &[String]) -> Cell {
    if samples.is_empty() {
        return dim_cell("-");
    }
    let shown: Vec<&str> = samples.iter().map(|sample| redact_value(sample)).collect();
    Cell::new(shown.join(", "))
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
