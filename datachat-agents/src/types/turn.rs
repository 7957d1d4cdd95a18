use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the conversation transcript. Turns are appended and never
/// edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Turn {
    User(String),
    GeneratedSql(String),
    Result {
        rows: Vec<Vec<Value>>,
        columns: Vec<String>,
    },
    Error(String),
    Insight(String),
    ChartSpec(VizRecommendation),
}

impl Turn {
    pub fn is_user(&self) -> bool {
        matches!(self, Turn::User(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Turn::User(_) => "user",
            Turn::GeneratedSql(_) => "generated_sql",
            Turn::Result { .. } => "result",
            Turn::Error(_) => "error",
            Turn::Insight(_) => "insight",
            Turn::ChartSpec(_) => "chart_spec",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    #[default]
    None,
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartType::Bar => write!(f, "bar"),
            ChartType::Line => write!(f, "line"),
            ChartType::Pie => write!(f, "pie"),
            ChartType::None => write!(f, "none"),
        }
    }
}

/// Chart suggested for a result set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VizRecommendation {
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
}

impl VizRecommendation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.chart_type == ChartType::None
    }

    /// Match `x_column` and `y_column` case-insensitively against the actual
    /// result columns and return the real names. `None` when there is no
    /// chart or either column is missing.
    pub fn resolve_columns<'a>(&self, columns: &'a [String]) -> Option<(&'a str, &'a str)> {
        if self.is_none() {
            return None;
        }

        let find = |wanted: &Option<String>| {
            let wanted = wanted.as_deref()?.trim();
            columns
                .iter()
                .find(|c| c.eq_ignore_ascii_case(wanted))
                .map(String::as_str)
        };

        Some((find(&self.x_column)?, find(&self.y_column)?))
    }
}

/// Progress of the latest user turn, derived from what follows it in the
/// transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Question recorded, nothing produced yet
    Pending,
    /// SQL produced, no result or error yet
    Generating,
    /// Non-empty result recorded, advice not finished
    Executed,
    Completed,
    Failed,
}

impl TurnState {
    pub fn from_responses(responses: &[Turn]) -> Self {
        if responses.is_empty() {
            return TurnState::Pending;
        }

        if responses.iter().any(|t| matches!(t, Turn::ChartSpec(_))) {
            return TurnState::Completed;
        }

        let result_rows = responses.iter().find_map(|t| match t {
            Turn::Result { rows, .. } => Some(rows.len()),
            _ => None,
        });

        match result_rows {
            Some(0) => TurnState::Completed,
            // an insight failure after a result does not fail the turn
            Some(_) => TurnState::Executed,
            None if responses.iter().any(|t| matches!(t, Turn::Error(_))) => TurnState::Failed,
            None => TurnState::Generating,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Completed | TurnState::Failed)
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnState::Pending => "pending",
            TurnState::Generating => "generating",
            TurnState::Executed => "executed",
            TurnState::Completed => "completed",
            TurnState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
