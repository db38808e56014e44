use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use abis_model::{ErrorKind, Task, ValidationError};

use crate::commands::ValidateResult;

/// Rows shown in the error table; the JSON report keeps the rest.
const MAX_ERROR_ROWS: usize = 200;

pub fn print_summary(result: &ValidateResult) {
    println!("Data: {}", result.data.display());
    if let Some(path) = &result.report_path {
        println!("Validation report: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Resource"),
        header_cell("Rows"),
        header_cell("Fields"),
        header_cell("Errors"),
        header_cell("By kind"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    let mut total_rows = 0usize;
    for task in &result.report.tasks {
        total_rows += task.stats.rows;
        table.add_row(vec![
            Cell::new(&task.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(task.stats.rows),
            Cell::new(task.stats.fields),
            count_cell(task.error_count(), Color::Red),
            by_kind_cell(task),
            status_cell(task.valid()),
        ]);
    }
    if result.report.tasks.len() > 1 {
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(total_rows).add_attribute(Attribute::Bold),
            dim_cell("-"),
            count_cell(result.report.error_count(), Color::Red).add_attribute(Attribute::Bold),
            dim_cell("-"),
            status_cell(result.report.valid()),
        ]);
    }
    println!("{table}");
    print_error_table(result);
}

fn print_error_table(result: &ValidateResult) {
    let total = result.report.error_count();
    if total == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Resource"),
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Check"),
        header_cell("Message"),
    ]);
    apply_error_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let errors = result
        .report
        .tasks
        .iter()
        .flat_map(|task| task.errors.iter().map(move |error| (task.name.as_str(), error)));
    for (resource, error) in errors.take(MAX_ERROR_ROWS) {
        table.add_row(error_row(resource, error));
    }
    println!();
    println!("Errors:");
    println!("{table}");
    if total > MAX_ERROR_ROWS {
        println!(
            "{} more error(s) not shown; use --report-dir for the full list.",
            total - MAX_ERROR_ROWS
        );
    }
}

fn error_row(resource: &str, error: &ValidationError) -> Vec<Cell> {
    vec![
        Cell::new(resource),
        optional_cell(error.row_number),
        match (&error.field_name, error.field_number) {
            (Some(name), _) => Cell::new(name),
            (None, Some(number)) => Cell::new(format!("#{number}")),
            (None, None) => dim_cell("-"),
        },
        kind_cell(error.kind),
        match &error.check {
            Some(check) => Cell::new(check),
            None => dim_cell("-"),
        },
        Cell::new(&error.note),
    ]
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 3 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn apply_error_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn by_kind_cell(task: &Task) -> Cell {
    if task.stats.by_kind.is_empty() {
        return dim_cell("-");
    }
    let parts: Vec<String> = task
        .stats
        .by_kind
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect();
    Cell::new(parts.join(", "))
}

fn kind_cell(kind: ErrorKind) -> Cell {
    let color = match kind {
        ErrorKind::Source | ErrorKind::Check => Color::Magenta,
        ErrorKind::Type | ErrorKind::MissingCell | ErrorKind::ExtraCell => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(kind.code()).fg(color)
}

fn status_cell(valid: bool) -> Cell {
    if valid {
        Cell::new("VALID")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("INVALID")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<usize>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
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
