//! In-memory transcript and the history window fed back into SQL prompts

use crate::types::{Turn, TurnState};

/// Turns included in the prompt history by default
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    turns: Vec<Turn>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// History text of the last `max_turns` turns, oldest first
    pub fn recent_history_text(&self, max_turns: usize) -> String {
        format_history(&self.turns, max_turns)
    }

    /// Text of the final turn when it is a user question with no response yet
    pub fn last_user_turn_if_unanswered(&self) -> Option<&str> {
        match self.turns.last() {
            Some(Turn::User(text)) => Some(text),
            _ => None,
        }
    }

    /// State of the latest user turn, `None` when nothing has been asked
    pub fn current_state(&self) -> Option<TurnState> {
        let last_user = self.turns.iter().rposition(Turn::is_user)?;
        Some(TurnState::from_responses(&self.turns[last_user + 1..]))
    }
}

/// Render the window of the last `max_turns` turns. Only questions and
/// generated SQL are written out; results, errors, insights and charts in the
/// window are skipped.
pub fn format_history(turns: &[Turn], max_turns: usize) -> String {
    let start = turns.len().saturating_sub(max_turns);

    turns[start..]
        .iter()
        .filter_map(|turn| match turn {
            Turn::User(text) => Some(format!("User: {}\n", text)),
            Turn::GeneratedSql(sql) => Some(format!("Assistant (SQL): {}\n", sql)),
            _ => None,
        })
        .collect()
}
