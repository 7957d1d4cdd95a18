use chrono::NaiveDate;
use datachat_llm_sdk::client::LlmClient;
use datachat_llm_sdk::error::LlmError;
use datachat_llm_sdk::types::CompletionRequest;
use std::sync::Arc;


const SQL_TEMPERATURE: f32 = 0.0;
const SQL_MAX_TOKENS: u32 = 1024;

/// Turns a question into one SQLite statement with a single model call.
///
/// The output is only trimmed. Fences, prose or extra statements the model
/// adds are left for [`datachat_tools::QuerySafetyFilter`] and the executor
/// to deal with.
pub struct QueryGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl QueryGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub async fn generate(
        &self,
        question: &str,
        schema_text: &str,
        history_text: &str,
    ) -> Result<String, LlmError> {
        let today = chrono::Local::now().date_naive();
        self.generate_on(question, schema_text, history_text, today)
            .await
    }

    pub async fn generate_on(
        &self,
        question: &str,
        schema_text: &str,
        history_text: &str,
        current_date: NaiveDate,
    ) -> Result<String, LlmError> {
        let prompt = build_sql_prompt(question, schema_text, history_text, current_date);

        let request = CompletionRequest::prompt(&self.model, prompt)
            .with_temperature(SQL_TEMPERATURE)
            .with_max_tokens(SQL_MAX_TOKENS);

        let response = self.client.complete(request).await?;
        let sql = response.text().trim().to_string();

        tracing::info!(sql = %sql, "Generated SQL candidate");
        Ok(sql)
    }
}

pub fn build_sql_prompt(
    question: &str,
    schema_text: &str,
    history_text: &str,
    current_date: NaiveDate,
) -> String {
    let history = if history_text.trim().is_empty() {
        "(no previous questions)"
    } else {
        history_text.trim_end()
    };

    format!(
        r#"You are an expert SQLite Data Analyst for an E-Commerce company.
Your task is to convert the user's natural language question into a valid SQLite query.

### Context:
- Current Date: {current_date}
- Database Schema:
{schema_text}

### Conversation History:
{history}

### LIMITATION RULES (CRITICAL):
1. **DEFAULT:** If the user DOES NOT specify a quantity, use `LIMIT 10` to keep the interface clean.
2. **EXCEPTION:** If the user explicitly asks for "all", "semua", "seluruh", "total", or "list of all", **DO NOT USE LIMIT**.
3. If the user specifies a number (e.g., "top 5"), use that specific LIMIT.

### EXAMPLE BEHAVIOR:
User: "Tampilkan produk" -> SELECT * FROM products LIMIT 10
User: "Tampilkan 5 produk" -> SELECT * FROM products LIMIT 5
User: "Tampilkan SELURUH produk" -> SELECT * FROM products (NO LIMIT)
User: "List semua pelanggan" -> SELECT * FROM customers (NO LIMIT)

### CRITICAL INSTRUCTIONS FOR FOLLOW-UP QUESTIONS:
1. Check the 'Conversation History' CAREFULLY.
2. If the user asks a short follow-up question (e.g., "How about Jakarta?", "And in 2024?", "What about electronics?"), you MUST maintain the context of the **IMMEDIATELY PRECEDING SQL QUERY**.
3. **DO NOT** create a simple "SELECT * FROM table" query if the previous topic was specific (like "best selling products" or "total revenue").
4. **REUSE** the same tables, joins, and logic from the previous SQL query, and ONLY change the filter condition (e.g., change WHERE city = 'Kendari' to WHERE city = 'Jakarta').

### Strict Rules:
1. Output ONLY the SQL query. No markdown, no explanations, no ```sql fences.
2. Use 'single quotes' for string literals (e.g., city = 'Bandung').
3. Use "double quotes" for column names if they contain spaces or special chars.
4. For date filtering, use SQLite functions like strftime() or date().
5. If the user asks about "sales" or "revenue", calculate using SUM(total_amount) or SUM(subtotal).
6. LIMIT the results to 10 unless the user asks for more (to keep UI clean).
7. The user may ask in INDONESIAN language. Translate the intent accurately to SQL.

### User Question:
{question}

### SQL Query:
"#,
        current_date = current_date.format("%Y-%m-%d"),
    )
}
