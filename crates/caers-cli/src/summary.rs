use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use caers_model::{FieldKind, RejectionReport, Schema};
use caers_report::{
    BinCount, CrossTab, GroupCount, LagSummary, PeriodCount, ValueCount, month_name,
};
use caers_transform::Normalized;

use crate::types::{ExploreResult, NormalizeResult};

pub fn print_normalize_summary(result: &NormalizeResult, max_rejections: usize) {
    println!("Input: {} ({} columns)", result.input.display(), result.columns);
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    println!("{}", summary_table(&result.normalized));
    let rejections = &result.normalized.rejections;
    if rejections.is_empty() || max_rejections == 0 {
        return;
    }
    print_section("Rejections", &rejection_table(rejections, max_rejections));
    if rejections.len() > max_rejections {
        println!("... and {} more", rejections.len() - max_rejections);
    }
}

pub fn print_exploration(result: &ExploreResult) {
    let view = &result.exploration;
    println!("Input: {}", result.input.display());
    println!(
        "Records: {} read, {} kept, {} rejected",
        result.input_count, view.records, result.rejected
    );
    print_section(
        "Reports per year",
        &year_table(&view.created_by_year, &view.started_by_year),
    );
    print_section(
        "Top brands by product role",
        &group_count_table(&["Brand/Product", "Role"], &view.brand_roles),
    );
    print_section("Top symptoms", &value_count_table("Symptom", &view.top_symptoms));
    print_section("Top outcomes", &value_count_table("Outcome", &view.top_outcomes));
    print_section("Age (years)", &bin_table(&view.age_bins));
    print_section("Gender", &value_count_table("Gender", &view.genders));
    print_section(
        "FDA industry",
        &group_count_table(&["Code", "Industry"], &view.industries),
    );
    print_section(
        "Outcomes by product role",
        &crosstab_table("Role", &view.outcomes_by_role),
    );
    print_section(
        "Days from event start to report",
        &lag_table(view.report_lag_summary.as_ref()),
    );
    if !view.lag_histogram.is_empty() {
        print_section("Report lag histogram (days)", &histogram_table(&view.lag_histogram));
    }
    print_section("Event start month", &month_table(&view.event_months));
}

pub fn print_schema(schema: &Schema) {
    println!("{}", schema_table(schema));
    println!(
        "Units: {} (canonical {})",
        schema
            .units()
            .units()
            .map(|(unit, divisor)| format!("{unit}={divisor}"))
            .collect::<Vec<_>>()
            .join(", "),
        schema.units().canonical()
    );
}

fn print_section(title: &str, table: &Table) {
    println!();
    println!("{title}:");
    println!("{table}");
}

/// Input, kept and rejected counts with one row per rejection reason.
pub fn summary_table(normalized: &Normalized) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Records"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Input"), Cell::new(normalized.input_count)]);
    table.add_row(vec![
        Cell::new("Kept").fg(Color::Green),
        Cell::new(normalized.kept()).fg(Color::Green),
    ]);
    for (code, count) in normalized.rejections.counts_by_code() {
        table.add_row(vec![
            Cell::new(format!("  {code}")).fg(Color::DarkGrey),
            count_cell(count, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("Rejected")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(normalized.rejected(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    table
}

/// The first `limit` rejections in record order.
pub fn rejection_table(report: &RejectionReport, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Reason"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for rejection in report.iter().take(limit) {
        table.add_row(vec![
            Cell::new(rejection.record),
            Cell::new(&rejection.reason).fg(Color::Yellow),
            Cell::new(rejection.reason.detail()),
        ]);
    }
    table
}

pub fn value_count_table(label: &str, counts: &[ValueCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(label), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for count in counts {
        table.add_row(vec![Cell::new(&count.value), Cell::new(count.count)]);
    }
    table
}

pub fn group_count_table(labels: &[&str], counts: &[GroupCount]) -> Table {
    let mut table = Table::new();
    let mut header: Vec<Cell> = labels.iter().map(|label| header_cell(label)).collect();
    header.push(header_cell("Count"));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, labels.len(), CellAlignment::Right);
    for count in counts {
        let mut row: Vec<Cell> = count.values.iter().map(Cell::new).collect();
        row.push(Cell::new(count.count));
        table.add_row(row);
    }
    table
}

/// Created and event-start counts side by side, one row per year.
pub fn year_table(created: &[PeriodCount], started: &[PeriodCount]) -> Table {
    let mut years: BTreeMap<i32, (Option<usize>, Option<usize>)> = BTreeMap::new();
    for year in created {
        years.entry(year.period).or_default().0 = Some(year.count);
    }
    for year in started {
        years.entry(year.period).or_default().1 = Some(year.count);
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Created"),
        header_cell("Event start"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (year, (created, started)) in years {
        table.add_row(vec![
            Cell::new(year),
            optional_cell(created),
            optional_cell(started),
        ]);
    }
    table
}

pub fn bin_table(bins: &[BinCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Bin"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for bin in bins {
        table.add_row(vec![Cell::new(&bin.label), Cell::new(bin.count)]);
    }
    table
}

pub fn month_table(months: &[PeriodCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Month"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for month in months {
        let name = month_name(month.period).map_or_else(|| month.period.to_string(), str::to_string);
        table.add_row(vec![Cell::new(name), Cell::new(month.count)]);
    }
    table
}

pub fn crosstab_table(row_label: &str, crosstab: &CrossTab) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell(row_label)];
    header.extend(crosstab.columns.iter().map(|column| header_cell(column)));
    header.push(header_cell("Total"));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=crosstab.columns.len() + 1 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in &crosstab.rows {
        let mut cells = vec![Cell::new(row)];
        cells.extend(
            crosstab
                .columns
                .iter()
                .map(|column| zero_dim_cell(crosstab.get(row, column))),
        );
        cells.push(Cell::new(crosstab.row_total(row)).add_attribute(Attribute::Bold));
        table.add_row(cells);
    }
    table
}

pub fn lag_table(summary: Option<&LagSummary>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Reports"),
        header_cell("Min"),
        header_cell("Median"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    match summary {
        Some(summary) => table.add_row(vec![
            Cell::new(summary.count),
            Cell::new(summary.min),
            Cell::new(summary.median),
            Cell::new(summary.max),
        ]),
        None => table.add_row(vec![
            dim_cell(0),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]),
    };
    table
}

/// Width of the longest bar in [`histogram_table`].
const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Bins with their counts and a bar scaled to the largest count.
pub fn histogram_table(bins: &[BinCount]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Days"),
        header_cell("Count"),
        header_cell(""),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let largest = bins.iter().map(|bin| bin.count).max().unwrap_or(0).max(1);
    for bin in bins {
        let bar = "█".repeat((bin.count * HISTOGRAM_BAR_WIDTH).div_ceil(largest));
        table.add_row(vec![
            Cell::new(&bin.label),
            zero_dim_cell(bin.count),
            Cell::new(bar).fg(Color::Blue),
        ]);
    }
    table
}

pub fn schema_table(schema: &Schema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Required"),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for spec in schema.fields() {
        let mut details = match &spec.kind {
            FieldKind::MultiValued { delimiter } => vec![format!("delimiter {delimiter:?}")],
            FieldKind::Date { formats } => vec![formats.join(" | ")],
            FieldKind::UnitTagged { unit_field } => vec![format!("unit from '{unit_field}'")],
            FieldKind::Numeric | FieldKind::Categorical => Vec::new(),
        };
        if let Some(bins) = &spec.bins {
            details.push(format!("bins {}", bins.labels().join(" ")));
        }
        let required = if spec.required {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        let details = if details.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(details.join("; "))
        };
        table.add_row(vec![
            Cell::new(&spec.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(spec.kind.name()),
            required,
            details,
        ]);
    }
    table
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn zero_dim_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(count: Option<usize>) -> Cell {
    match count {
        Some(count) => Cell::new(count),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
