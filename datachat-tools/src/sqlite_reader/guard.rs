//! Keyword denylist applied to model-generated SQL before execution.
//!
//! This is a substring check, not a parser. It over-rejects (a column named
//! `updated_at` trips `UPDATE`) and it cannot see anything the statement text
//! does not literally contain. The read-only connection opened by
//! [`super::ReadOnlyExecutor`] is the second line.

/// Mutating keywords; the first one found (in this order) is reported
pub const DENYLIST: [&str; 6] = ["DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "TRUNCATE"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafetyRejection {
    #[error("Command '{keyword}' is not allowed (read-only mode)")]
    ForbiddenKeyword { keyword: String },
    #[error("Query is empty")]
    EmptyStatement,
}

impl SafetyRejection {
    pub fn keyword(&self) -> Option<&str> {
        match self {
            SafetyRejection::ForbiddenKeyword { keyword } => Some(keyword),
            SafetyRejection::EmptyStatement => None,
        }
    }
}

/// A candidate that passed the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredQuery {
    /// First non-empty statement of the candidate, without the separator
    pub sql: String,
    /// Statements after the first that were dropped
    pub discarded_statements: usize,
}

pub struct QuerySafetyFilter;

impl QuerySafetyFilter {
    /// Validate and normalize an untrusted SQL candidate.
    ///
    /// The denylist is matched case-insensitively against the whole trimmed
    /// candidate, including text after the first `;`, before any truncation.
    pub fn filter(candidate: &str) -> Result<FilteredQuery, SafetyRejection> {
        let trimmed = candidate.trim();

        if let Some(keyword) = Self::find_forbidden_keyword(trimmed) {
            tracing::warn!(keyword, "Rejected SQL candidate containing denylisted keyword");
            return Err(SafetyRejection::ForbiddenKeyword {
                keyword: keyword.to_string(),
            });
        }

        let (sql, discarded_statements) = Self::first_statement(trimmed);
        if sql.is_empty() {
            return Err(SafetyRejection::EmptyStatement);
        }

        if discarded_statements > 0 {
            tracing::debug!(
                discarded_statements,
                "Dropped trailing statements from SQL candidate"
            );
        }

        Ok(FilteredQuery {
            sql,
            discarded_statements,
        })
    }

    pub fn find_forbidden_keyword(sql: &str) -> Option<&'static str> {
        let upper = sql.to_uppercase();
        DENYLIST.into_iter().find(|keyword| upper.contains(keyword))
    }

    fn first_statement(sql: &str) -> (String, usize) {
        if !sql.contains(';') {
            return (sql.to_string(), 0);
        }

        let mut parts = sql.split(';').map(str::trim).filter(|p| !p.is_empty());
        match parts.next() {
            Some(first) => (first.to_string(), parts.count()),
            None => (String::new(), 0),
        }
    }
}
