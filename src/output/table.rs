//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a rounded table, or a notice when there is nothing to show
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Format key/value pairs as a two-column table without a header
pub fn format_details(rows: &[(&str, String)]) -> String {
    let mut builder = tabled::builder::Builder::default();
    for (key, value) in rows {
        builder.push_record([key.to_string(), value.clone()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
