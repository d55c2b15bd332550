//! CSV and printable HTML renderings of a record collection.
//!
//! Both renderers refuse an empty collection with [`ReportError::NoData`] and
//! never produce partial output.

use crate::domain::model::{ColumnDescriptor, CsvExport, Record, Value};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::borrow::Cow;

const CSV_LIST_SEPARATOR: &str = "; ";
const PRINT_LIST_SEPARATOR: &str = ", ";

const PRINT_STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; margin-bottom: 4px; }
.meta { color: #666; font-size: 12px; margin: 2px 0; }
table { width: 100%; border-collapse: collapse; margin-top: 16px; font-size: 12px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; font-weight: bold; }
tr:nth-child(even) { background-color: #f9f9f9; }
@media print { body { margin: 0; } }";

/// Maps a record to the row actually printed.
pub type RowTransform<'a> = &'a dyn Fn(&Record) -> Record;

/// Exports `records` as CSV, naming the file after today's UTC date.
pub fn export_csv(
    records: &[Record],
    columns: &[ColumnDescriptor],
    base_filename: &str,
) -> Result<CsvExport> {
    export_csv_on(records, columns, base_filename, Utc::now().date_naive())
}

pub fn export_csv_on(
    records: &[Record],
    columns: &[ColumnDescriptor],
    base_filename: &str,
    export_date: NaiveDate,
) -> Result<CsvExport> {
    if records.is_empty() {
        tracing::warn!("No data to export for '{}'", base_filename);
        return Err(ReportError::no_data("export"));
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|column| column.label.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| csv_cell(record.get(&column.key)))
            .collect();
        lines.push(cells.join(","));
    }

    let filename = format!("{}_{}.csv", base_filename, export_date.format("%Y-%m-%d"));
    tracing::debug!(
        "Exported {} records x {} columns to {}",
        records.len(),
        columns.len(),
        filename
    );

    Ok(CsvExport {
        filename,
        content: lines.join("\n"),
    })
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::List(items)) => escape_csv(&join_items(items, CSV_LIST_SEPARATOR)),
        Some(plain) if matches!(plain, Value::Number(_) | Value::Bool(_)) => plain.display_string(),
        Some(other) => escape_csv(&other.display_string()),
    }
}

fn escape_csv(raw: &str) -> String {
    let doubled = raw.replace('"', "\"\"");
    if doubled.contains([',', '"', '\n']) {
        format!("\"{}\"", doubled)
    } else {
        doubled
    }
}

fn join_items(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(Value::display_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Renders `records` as a standalone HTML document ready for print-to-PDF.
///
/// `table_id` is only carried into the table's `id` attribute. When
/// `row_transform` is given, each record is mapped through it before its
/// cells are resolved.
pub fn render_printable_table(
    table_id: &str,
    title: &str,
    columns: &[ColumnDescriptor],
    records: &[Record],
    row_transform: Option<RowTransform<'_>>,
) -> Result<String> {
    render_printable_table_at(table_id, title, columns, records, row_transform, Utc::now())
}

pub fn render_printable_table_at(
    table_id: &str,
    title: &str,
    columns: &[ColumnDescriptor],
    records: &[Record],
    row_transform: Option<RowTransform<'_>>,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    if records.is_empty() {
        tracing::warn!("No data to print for table '{}'", table_id);
        return Err(ReportError::no_data("print"));
    }

    let title = html_escape(title);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(&format!("<style>\n{}\n</style>\n", PRINT_STYLE));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<h1>{}</h1>\n", title));
    html.push_str(&format!(
        "<p class=\"meta\">Generated on: {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Total records: {}</p>\n",
        records.len()
    ));

    html.push_str(&format!("<table id=\"{}\">\n<thead>\n<tr>", html_escape(table_id)));
    for column in columns {
        html.push_str(&format!("<th>{}</th>", html_escape(&column.label)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in records {
        let row: Cow<'_, Record> = match row_transform {
            Some(transform) => Cow::Owned(transform(record)),
            None => Cow::Borrowed(record),
        };
        html.push_str("<tr>");
        for column in columns {
            html.push_str(&format!(
                "<td>{}</td>",
                html_escape(&print_cell(row.get(&column.key)))
            ));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");

    tracing::debug!(
        "Rendered printable table '{}' with {} rows",
        table_id,
        records.len()
    );
    Ok(html)
}

fn print_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::List(items)) => join_items(items, PRINT_LIST_SEPARATOR),
        Some(other) => other.display_string(),
    }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
