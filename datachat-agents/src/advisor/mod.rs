//! Insight text and chart recommendation for a result set.
//!
//! The two operations are independent single model calls. Chart advice never
//! fails: anything unusable becomes [`VizRecommendation::none`].

use crate::types::VizRecommendation;
use datachat_llm_sdk::client::LlmClient;
use datachat_llm_sdk::error::LlmError;
use datachat_llm_sdk::types::{CompletionRequest, ResponseFormat};
use datachat_tools::sqlite_reader::formatter::format_markdown_preview;
use serde_json::Value;
use std::sync::Arc;


const INSIGHT_TEMPERATURE: f32 = 0.5;
const VIZ_TEMPERATURE: f32 = 0.0;

pub const INSIGHT_PREVIEW_ROWS: usize = 10;
pub const VIZ_PREVIEW_ROWS: usize = 5;

/// Results with fewer rows than this get no chart
pub const VIZ_MIN_ROWS: usize = 2;
/// Results with more columns than this get no chart
pub const VIZ_MAX_COLUMNS: usize = 5;

pub struct InsightAndVizAdvisor {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl InsightAndVizAdvisor {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Short business reading of the first rows of a result
    pub async fn insight(
        &self,
        question: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> Result<String, LlmError> {
        let preview = format_markdown_preview(columns, rows, INSIGHT_PREVIEW_ROWS);
        let request = CompletionRequest::prompt(&self.model, build_insight_prompt(question, &preview))
            .with_temperature(INSIGHT_TEMPERATURE);

        let response = self.client.complete(request).await?;
        Ok(response.text().trim().to_string())
    }

    pub async fn viz_recommendation(
        &self,
        question: &str,
        columns: &[String],
        rows: &[Vec<Value>],
    ) -> VizRecommendation {
        if rows.len() < VIZ_MIN_ROWS || columns.len() > VIZ_MAX_COLUMNS {
            tracing::debug!(
                rows = rows.len(),
                columns = columns.len(),
                "Result not suitable for a chart"
            );
            return VizRecommendation::none();
        }

        let preview = format_markdown_preview(columns, rows, VIZ_PREVIEW_ROWS);
        let request = CompletionRequest::prompt(
            &self.model,
            build_viz_prompt(question, &columns.join(", "), &preview),
        )
        .with_temperature(VIZ_TEMPERATURE)
        .with_response_format(ResponseFormat::JsonObject);

        let text = match self.client.complete(request).await {
            Ok(response) => response.text(),
            Err(e) => {
                tracing::warn!(error = %e, "Chart recommendation call failed");
                return VizRecommendation::none();
            }
        };

        match parse_viz_recommendation(&text) {
            Some(viz) => viz,
            None => {
                tracing::warn!(response = %text, "Unusable chart recommendation");
                VizRecommendation::none()
            }
        }
    }
}

/// Parse a recommendation out of model output, tolerating code fences and
/// text around the JSON object.
pub fn parse_viz_recommendation(text: &str) -> Option<VizRecommendation> {
    let trimmed = strip_code_fence(text.trim());

    if let Ok(viz) = serde_json::from_str::<VizRecommendation>(trimmed) {
        return Some(viz);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn build_insight_prompt(question: &str, preview: &str) -> String {
    format!(
        r#"Anda adalah Senior Data Analyst. Tugas Anda adalah memberikan insight singkat
berdasarkan data yang ditemukan untuk menjawab pertanyaan user.

Pertanyaan User: {question}

Data Hasil Query (Preview):
{preview}
Instruksi:
1. Jelaskan apa arti data tersebut dalam konteks bisnis (maksimal 2-3 kalimat).
2. Jika ada tren atau angka yang mencolok (tertinggi/terendah), sebutkan.
3. Gunakan Bahasa Indonesia yang profesional dan luwes.
4. Jangan mengulang isi tabel mentah-mentah, berikan kesimpulan.

Insight Singkat:
"#
    )
}

fn build_viz_prompt(question: &str, columns_list: &str, preview: &str) -> String {
    format!(
        r#"You are a Data Visualization Expert. Your task is to recommend the BEST type of chart
to visualize the provided data, based on the user's intent.

User Question: {question}
Available Columns: {columns_list}
Data Preview:
{preview}
Rules:
1. Analyze the user intent. If they ask for trend over time -> 'line'. Comparison between categories -> 'bar'. Composition/Percentage -> 'pie'.
2. If the data is NOT suitable for visualization (e.g., just a list of names), return 'none'.
3. Select the most appropriate column for the X-axis (usually categorical or date) and Y-axis (must be numeric).
4. Ensure the chosen Y-column is actually numeric in the data preview.

Output MUST be a strictly valid JSON object with these keys only:
- "chart_type": one of ["bar", "line", "pie", "none"]
- "x_column": "name of column for X axis (or category for pie)"
- "y_column": "name of column for Y axis (or values for pie)"
"#
    )
}
