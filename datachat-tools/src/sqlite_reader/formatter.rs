//! Query result formatting
//!
//! Two renderings of the same rows:
//!
//! - [`format_table`] aligns columns for terminal output, with a 1-based row
//!   number column and a trailing summary when rows are cut off.
//! - [`format_markdown_preview`] renders the leading rows as a markdown table
//!   for model prompts.
//!
//! ```text
//! # | name   | total
//! --+--------+------
//! 1 | Laptop | 42
//! 2 | Mouse  | 17
//! ```

use serde_json::Value;

const MAX_CELL_CHARS: usize = 50;

pub fn format_table(columns: &[String], rows: &[Vec<Value>], max_rows: usize) -> String {
    if rows.is_empty() {
        return "Query executed successfully but returned no rows.".to_string();
    }

    let index_width = rows.len().min(max_rows).to_string().len().max(1);
    let mut col_widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();

    for row in rows.iter().take(max_rows) {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(format_cell_value(cell).chars().count());
            }
        }
    }

    let mut output = String::new();

    let mut header_row = vec![format!("{:<width$}", "#", width = index_width)];
    header_row.extend(
        columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{:<width$}", col, width = col_widths[i])),
    );
    output.push_str(header_row.join(" | ").trim_end());
    output.push('\n');

    let separator: Vec<String> = std::iter::once(index_width)
        .chain(col_widths.iter().copied())
        .map(|width| "-".repeat(width))
        .collect();
    output.push_str(&separator.join("-+-"));
    output.push('\n');

    for (n, row) in rows.iter().take(max_rows).enumerate() {
        let mut formatted_row = vec![format!("{:<width$}", n + 1, width = index_width)];
        formatted_row.extend(row.iter().enumerate().map(|(i, cell)| {
            let width = col_widths.get(i).copied().unwrap_or(0);
            format!("{:<width$}", format_cell_value(cell), width = width)
        }));
        output.push_str(formatted_row.join(" | ").trim_end());
        output.push('\n');
    }

    if rows.len() > max_rows {
        output.push_str(&format!("\n... and {} more rows\n", rows.len() - max_rows));
    }

    output
}

/// Markdown table of at most `max_rows` rows, cells untruncated
pub fn format_markdown_preview(columns: &[String], rows: &[Vec<Value>], max_rows: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("| {} |\n", columns.join(" | ")));
    output.push_str(&format!(
        "|{}|\n",
        columns.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    ));

    for row in rows.iter().take(max_rows) {
        let cells: Vec<String> = row.iter().map(plain_cell_value).collect();
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    output
}

fn plain_cell_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.replace('|', "\\|"),
        _ => value.to_string(),
    }
}

pub fn format_cell_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => {
            if s.chars().count() > MAX_CELL_CHARS {
                let head: String = s.chars().take(MAX_CELL_CHARS - 3).collect();
                format!("{}...", head)
            } else {
                s.clone()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => value.to_string(),
    }
}
