use crate::types::Turn;
use datachat_tools::sqlite_reader::formatter::format_markdown_preview;

const EXPORT_MAX_ROWS: usize = 50;

/// Render the transcript as a markdown document
pub fn transcript_to_markdown(turns: &[Turn]) -> String {
    let mut output = String::from("# Datachat transcript\n");

    for turn in turns {
        match turn {
            Turn::User(text) => {
                output.push_str(&format!("\n## {}\n\n", text));
            }
            Turn::GeneratedSql(sql) => {
                output.push_str(&format!("```sql\n{}\n```\n\n", sql));
            }
            Turn::Result { rows, columns } => {
                if rows.is_empty() {
                    output.push_str("_No rows returned._\n\n");
                } else {
                    output.push_str(&format_markdown_preview(columns, rows, EXPORT_MAX_ROWS));
                    if rows.len() > EXPORT_MAX_ROWS {
                        output.push_str(&format!(
                            "\n_{} more rows not shown._\n",
                            rows.len() - EXPORT_MAX_ROWS
                        ));
                    }
                    output.push('\n');
                }
            }
            Turn::Error(message) => {
                output.push_str(&format!("> **Error:** {}\n\n", message));
            }
            Turn::Insight(text) => {
                output.push_str(&format!("**Insight:** {}\n\n", text));
            }
            Turn::ChartSpec(viz) => {
                if let (Some(x), Some(y)) = (&viz.x_column, &viz.y_column) {
                    if !viz.is_none() {
                        output.push_str(&format!("Chart: {} of `{}` by `{}`\n\n", viz.chart_type, y, x));
                    }
                }
            }
        }
    }

    output
}
