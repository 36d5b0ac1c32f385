use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Report: {}", result.output.display());
    println!("Respondents: {}", result.respondents);
    println!(
        "Segments ({}): {}",
        result.segment_field,
        if result.segments.is_empty() {
            "none".to_string()
        } else {
            result.segments.join(", ")
        }
    );
    println!("{}", summary_table(result));
}

pub fn summary_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Questions"),
        header_cell("Blocks"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_questions = 0usize;
    for summary in &result.questions {
        total_questions += summary.questions;
        table.add_row(vec![
            Cell::new(summary.question_type.as_str()),
            Cell::new(summary.questions),
            Cell::new(summary.blocks),
        ]);
    }
    if result.derived_variables > 0 {
        table.add_row(vec![
            dim_cell("derived buckets"),
            dim_cell(result.derived_variables),
            dim_cell("-"),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_questions).add_attribute(Attribute::Bold),
        Cell::new(result.blocks).add_attribute(Attribute::Bold),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
