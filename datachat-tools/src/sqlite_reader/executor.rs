//! Read-only statement execution.
//!
//! Every [`ReadOnlyExecutor`] owns one connection opened with
//! `SQLITE_OPEN_READ_ONLY`; writes fail at the driver even if they get past
//! the keyword filter. Callers open an executor per request and drop it when
//! done, so no connection or transaction outlives a single statement.

use crate::tool_error::ToolError;
use crate::types::QueryResult;
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, Instant};

pub struct ReadOnlyExecutor {
    conn: Connection,
}

impl ReadOnlyExecutor {
    pub fn open(db_path: &Path, timeout_ms: u64) -> Result<Self, ToolError> {
        super::validate_db_path(db_path)?;

        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_millis(timeout_ms))?;

        Ok(Self { conn })
    }

    /// Run exactly one statement.
    ///
    /// Statements starting with `SELECT` return every row with the ordered
    /// column names. Anything else is run for its effect and yields an empty
    /// result.
    pub fn execute(&self, sql: &str) -> Result<QueryResult, ToolError> {
        let start_time = Instant::now();
        let mut stmt = self.conn.prepare(sql)?;

        if !is_read_query(sql) {
            let mut rows = stmt.query([])?;
            while rows.next()?.is_some() {}
            tracing::debug!("Executed non-SELECT statement, returning empty result");
            return Ok(QueryResult::no_op());
        }

        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|&name| name.to_string())
            .collect();

        let rows = stmt.query_map([], |row| {
            let mut values = Vec::with_capacity(row.as_ref().column_count());
            for i in 0..row.as_ref().column_count() {
                values.push(to_json(row.get_ref(i)?));
            }
            Ok(values)
        })?;

        let rows = rows.collect::<Result<Vec<_>, _>>()?;
        let row_count = rows.len();

        Ok(QueryResult {
            columns,
            rows,
            row_count,
            execution_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Run a query expected to yield a single integer, such as `COUNT(*)`
    pub fn query_count(&self, sql: &str) -> Result<i64, ToolError> {
        Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

pub fn is_read_query(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}

fn to_json(value: rusqlite::types::ValueRef<'_>) -> Value {
    use rusqlite::types::ValueRef;

    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(serde_json::Number::from(i)),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(_) => Value::String("<BLOB>".to_string()),
    }
}
