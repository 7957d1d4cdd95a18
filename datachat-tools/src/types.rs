use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows and ordered column names returned by a read query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Result of an accepted statement that is not a read query
    pub fn no_op() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<String>,
}

/// Table name to ordered column names, tables sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub tables: Vec<TableSchema>,
}

impl SchemaDescription {
    pub fn columns_of(&self, table: &str) -> Option<&[String]> {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .map(|t| t.columns.as_slice())
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Compact prompt form, one `- table(col1, col2)` line per table
    pub fn render(&self) -> String {
        self.tables
            .iter()
            .map(|t| format!("- {}({})", t.name, t.columns.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
