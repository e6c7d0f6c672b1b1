use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use manifest_core::{ContentError, ProvenanceError, ReconcileReport, SharedState};
use manifest_model::{ManifestSchema, MappingResult, StructuredContent};

pub fn print_mapping(schema: &ManifestSchema, mapping: &MappingResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Header"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for pair in &mapping.matched {
        table.add_row(vec![
            Cell::new(&pair.expected),
            dim_cell(schema.friendly_name(&pair.expected)),
            Cell::new(&pair.observed).fg(Color::Green),
            flag_cell(schema.is_required(&pair.expected)),
        ]);
    }
    for field in &mapping.expected {
        table.add_row(vec![
            Cell::new(field),
            dim_cell(schema.friendly_name(field)),
            missing_cell(schema.is_required(field)),
            flag_cell(schema.is_required(field)),
        ]);
    }
    println!("{table}");
    if !mapping.observed.is_empty() {
        println!("Unmatched headers: {}", mapping.observed.join(", "));
    }
    println!(
        "Mapping is {}{}",
        if mapping.valid { "valid" } else { "invalid" },
        if mapping.shown {
            "; manual review needed"
        } else {
            ""
        }
    );
}

pub fn print_report(state: &SharedState, report: &ReconcileReport) {
    println!("Manifest: {}", state.manifest_id);
    if let Some(content) = state.structured() {
        print_content(content);
    }
    let outcome = match (report.valid, report.persisted) {
        (true, true) => "saved",
        (true, false) => "valid, not saved",
        (false, _) => "mapping incomplete, not saved",
    };
    println!("Result: {outcome}");
}

pub fn print_failure(error: &ProvenanceError) {
    eprintln!("error: {error}");
    if let Some(content) = error.as_content() {
        print_content_hint(content);
    }
}

fn print_content_hint(error: &ContentError) {
    eprintln!("hint: {}", error.suggestion());
}

fn print_content(content: &StructuredContent) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Labware"),
        header_cell("Positions"),
        header_cell("Issues"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for labware in &content.labwares {
        let issues = content.issues_for(labware.position).count();
        table.add_row(vec![
            Cell::new(labware.position),
            Cell::new(&labware.labware_id),
            Cell::new(labware.addresses.len()),
            count_cell(issues, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(content.address_count()).add_attribute(Attribute::Bold),
        count_cell(content.issues.len(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    for issue in &content.issues {
        println!(
            "- labware {} {}: {}",
            issue.labware(),
            issue.address(),
            issue.message()
        );
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("yes").add_attribute(Attribute::Bold)
    } else {
        dim_cell("no")
    }
}

fn missing_cell(required: bool) -> Cell {
    let color = if required { Color::Red } else { Color::Yellow };
    Cell::new("(unmatched)").fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
