//! Read-only SQLite access for the analytics pipeline
//!
//! # Layers
//!
//! ## 1. Keyword denylist
//!
//! [`guard::QuerySafetyFilter`] inspects the raw model output before anything
//! reaches the database. Any of `DROP`, `DELETE`, `UPDATE`, `INSERT`, `ALTER`
//! or `TRUNCATE` anywhere in the text rejects it, and only the first statement
//! is kept. This is a best-effort filter, not a SQL parser.
//!
//! ## 2. Read-only connections
//!
//! [`ReadOnlyExecutor`] opens the file with `SQLITE_OPEN_READ_ONLY`, so a write
//! that slips past the denylist still fails at the driver. The driver message
//! comes back as [`ToolError::ExecutionError`].
//!
//! ## 3. Path validation
//!
//! Database paths must be non-empty and point at an existing regular file.
//! Opening a missing path never creates an empty database.
//!
//! ## 4. Connection isolation
//!
//! Every call opens its own connection and drops it on return. Schema text is
//! recomputed per request and never cached.
//!
//! # Example
//!
//! ```rust,no_run
//! use datachat_tools::{QuerySafetyFilter, ReadOnlyExecutor, SchemaIntrospector};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Path::new("ecommerce.db");
//! println!("{}", SchemaIntrospector::schema_text(db));
//!
//! let filtered = QuerySafetyFilter::filter("SELECT name FROM products LIMIT 5;")?;
//! let result = ReadOnlyExecutor::open(db, 5000)?.execute(&filtered.sql)?;
//! println!("{} rows", result.row_count);
//! # Ok(())
//! # }
//! ```

use crate::tool_error::ToolError;
use crate::types::{SchemaDescription, TableSchema};
use std::path::Path;

pub mod executor;
pub mod formatter;
pub mod guard;

pub use executor::ReadOnlyExecutor;

/// Prompt text used when the schema cannot be read
pub const SCHEMA_NOT_FOUND: &str = "Schema not found.";

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

const TABLE_NAMES_QUERY: &str =
    "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name";

/// Reads table and column metadata from a live database.
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    pub fn get_table_names(db_path: &Path) -> Result<Vec<String>, ToolError> {
        let executor = ReadOnlyExecutor::open(db_path, DEFAULT_TIMEOUT_MS)?;
        table_names(&executor)
    }

    pub fn describe(db_path: &Path) -> Result<SchemaDescription, ToolError> {
        let executor = ReadOnlyExecutor::open(db_path, DEFAULT_TIMEOUT_MS)?;

        let mut tables = Vec::new();
        for name in table_names(&executor)? {
            let columns = table_columns(&executor, &name)?;
            tables.push(TableSchema { name, columns });
        }

        Ok(SchemaDescription { tables })
    }

    /// Schema rendered for prompt injection, or [`SCHEMA_NOT_FOUND`] when the
    /// database cannot be introspected.
    pub fn schema_text(db_path: &Path) -> String {
        match Self::describe(db_path) {
            Ok(schema) => schema.render(),
            Err(e) => {
                tracing::warn!(
                    db_path = %db_path.display(),
                    error = %e,
                    "Schema introspection failed"
                );
                SCHEMA_NOT_FOUND.to_string()
            }
        }
    }

    /// Row count of every user table, in table-name order
    pub fn table_row_counts(db_path: &Path) -> Result<Vec<(String, i64)>, ToolError> {
        let executor = ReadOnlyExecutor::open(db_path, DEFAULT_TIMEOUT_MS)?;

        let mut counts = Vec::new();
        for name in table_names(&executor)? {
            let count = executor.query_count(&format!(
                "SELECT COUNT(*) FROM {}",
                quote_identifier(&name)
            ))?;
            counts.push((name, count));
        }

        Ok(counts)
    }
}

fn table_names(executor: &ReadOnlyExecutor) -> Result<Vec<String>, ToolError> {
    let result = executor
        .execute(TABLE_NAMES_QUERY)
        .map_err(|e| ToolError::ExecutionError(format!("Failed to get table names: {}", e)))?;

    let table_names: Vec<String> = result
        .rows
        .iter()
        .filter_map(|row| {
            if let Some(serde_json::Value::String(name)) = row.first() {
                Some(name.clone())
            } else {
                None
            }
        })
        .collect();

    Ok(table_names)
}

fn table_columns(executor: &ReadOnlyExecutor, table: &str) -> Result<Vec<String>, ToolError> {
    let mut stmt = executor
        .connection()
        .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;

    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(columns)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn validate_db_path(db_path: &Path) -> Result<(), ToolError> {
    if db_path.as_os_str().is_empty() {
        return Err(ToolError::InvalidInput(
            "Database path cannot be empty".to_string(),
        ));
    }

    if !db_path.exists() {
        return Err(ToolError::InvalidInput(format!(
            "Database file not found: {}",
            db_path.display()
        )));
    }

    if !db_path.is_file() {
        return Err(ToolError::InvalidInput(format!(
            "Path is not a file: {}",
            db_path.display()
        )));
    }

    Ok(())
}
