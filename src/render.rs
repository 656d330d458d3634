use crate::catalog::{PropertyRecord, FIELD_NAMES};
use crate::query::QueryResult;

use std::fmt::Write;

/// Placeholder of the result page template replaced by the table.
pub const TABLE_PLACEHOLDER: &str = "@TABLE@";

const MISSING_VALUE: &str = "NaN";

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn text_cell(value: Option<&str>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_owned(), escape_html)
}

fn degrees_cell(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_owned(), |degrees| degrees.to_string())
}

fn record_cells(record: &PropertyRecord) -> [String; 9] {
    [
        escape_html(&record.project_key),
        escape_html(&record.name),
        text_cell(record.owners.as_deref()),
        text_cell(record.royalty_holders.as_deref()),
        text_cell(record.development_stage.as_deref()),
        text_cell(record.activity_status.as_deref()),
        degrees_cell(record.latitude),
        degrees_cell(record.longitude),
        text_cell(record.coordinate_accuracy.as_deref()),
    ]
}

/// HTML table of a query result, one row per property plus an `is_target` column.
pub fn render_table(result: &QueryResult) -> String {
    let mut html = String::from("<table border=\"1\" class=\"dataframe\">\n");

    if let Some(bbox) = &result.bbox {
        // Writing into a String does not fail.
        let _ = writeln!(
            html,
            "  <caption>latitude {:.4} to {:.4}, longitude {:.4} to {:.4}</caption>",
            bbox.min_latitude(),
            bbox.max_latitude(),
            bbox.min_longitude(),
            bbox.max_longitude()
        );
    }

    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for field in FIELD_NAMES.iter().chain(["is_target"].iter()) {
        let _ = writeln!(html, "      <th>{}</th>", field);
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for row in &result.rows {
        if row.is_target {
            html.push_str("    <tr class=\"target\">\n");
        } else {
            html.push_str("    <tr>\n");
        }
        for cell in record_cells(row.record).iter() {
            let _ = writeln!(html, "      <td>{}</td>", cell);
        }
        let _ = writeln!(
            html,
            "      <td>{}</td>",
            if row.is_target { "True" } else { "False" }
        );
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>");
    html
}

pub fn fill_template(template: &str, table: &str) -> String {
    template.replace(TABLE_PLACEHOLDER, table)
}
