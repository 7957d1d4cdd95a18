use crate::advisor::InsightAndVizAdvisor;
use crate::context::{format_history, DEFAULT_HISTORY_WINDOW};
use crate::error::TurnError;
use crate::query_generator::QueryGenerator;
use crate::session::Session;
use crate::types::{Turn, TurnState};
use datachat_llm_sdk::client::LlmClient;
use datachat_tools::sqlite_reader::DEFAULT_TIMEOUT_MS;
use datachat_tools::{QueryResult, QuerySafetyFilter, ReadOnlyExecutor, SchemaIntrospector};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs one question through generation, filtering, execution and advice,
/// recording every artifact in the session as it is produced.
///
/// Turns are processed one at a time; nothing runs in the background.
pub struct DataAnalyst {
    generator: QueryGenerator,
    advisor: InsightAndVizAdvisor,
    db_path: PathBuf,
    history_window: usize,
}

impl DataAnalyst {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, db_path: impl Into<PathBuf>) -> Self {
        let model = model.into();
        Self {
            generator: QueryGenerator::new(client.clone(), model.clone()),
            advisor: InsightAndVizAdvisor::new(client, model),
            db_path: db_path.into(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Record a new question and answer it
    pub async fn ask(&self, session: &mut Session, question: &str) -> anyhow::Result<TurnState> {
        let question = question.trim();
        if question.is_empty() {
            anyhow::bail!("Question cannot be empty");
        }

        session.record(Turn::User(question.to_string())).await;
        Ok(self.process(session).await)
    }

    /// Answer a trailing question left unanswered by an earlier run.
    ///
    /// Returns `None` when the latest question already has a response. A turn
    /// that stopped half-way (SQL recorded but no result) is reported and not
    /// re-run.
    pub async fn resume(&self, session: &mut Session) -> Option<TurnState> {
        match session.context().current_state() {
            Some(TurnState::Pending) => {
                tracing::info!("Resuming unanswered question");
                Some(self.process(session).await)
            }
            Some(state) if !state.is_terminal() => {
                tracing::warn!(state = %state, "Latest turn was interrupted and will not be re-run");
                None
            }
            _ => None,
        }
    }

    async fn process(&self, session: &mut Session) -> TurnState {
        let Some(question) = session
            .context()
            .last_user_turn_if_unanswered()
            .map(str::to_string)
        else {
            return session.context().current_state().unwrap_or(TurnState::Pending);
        };

        let turns = session.turns();
        let history = format_history(&turns[..turns.len() - 1], self.history_window);
        let schema = SchemaIntrospector::schema_text(&self.db_path);

        tracing::info!(question = %question, "Processing question");

        if let Err(e) = self.run(session, &question, &schema, &history).await {
            tracing::warn!(error = %e, "Turn failed");
            session.record(Turn::Error(e.to_string())).await;
        }

        let state = session.context().current_state().unwrap_or(TurnState::Pending);
        tracing::info!(state = %state, "Turn finished");
        state
    }

    async fn run(
        &self,
        session: &mut Session,
        question: &str,
        schema: &str,
        history: &str,
    ) -> Result<(), TurnError> {
        let candidate = self.generator.generate(question, schema, history).await?;
        session.record(Turn::GeneratedSql(candidate.clone())).await;

        let filtered = QuerySafetyFilter::filter(&candidate)?;
        let result = self.execute(&filtered.sql)?;
        tracing::info!(
            rows = result.row_count,
            execution_time_ms = result.execution_time_ms,
            "Query executed"
        );

        let QueryResult { columns, rows, .. } = result;
        session
            .record(Turn::Result {
                rows: rows.clone(),
                columns: columns.clone(),
            })
            .await;

        if rows.is_empty() {
            return Ok(());
        }

        match self.advisor.insight(question, &columns, &rows).await {
            Ok(insight) => session.record(Turn::Insight(insight)).await,
            Err(e) => {
                tracing::warn!(error = %e, "Insight generation failed");
                session
                    .record(Turn::Error(format!("Insight generation failed: {}", e)))
                    .await;
            }
        }

        let viz = self.advisor.viz_recommendation(question, &columns, &rows).await;
        session.record(Turn::ChartSpec(viz)).await;

        Ok(())
    }

    fn execute(&self, sql: &str) -> Result<QueryResult, TurnError> {
        let executor = ReadOnlyExecutor::open(&self.db_path, DEFAULT_TIMEOUT_MS)?;
        Ok(executor.execute(sql)?)
    }
}
