#![allow(dead_code)]

use datachat_llm_sdk::client::LlmClient;
use datachat_llm_sdk::error::LlmError;
use datachat_llm_sdk::types::{CompletionRequest, CompletionResponse};
use rusqlite::Connection;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// LLM client answering from a queue of scripted replies
pub struct MockLlmClient {
    pub responses: Arc<Mutex<VecDeque<Result<CompletionResponse, LlmError>>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_replies(replies: &[&str]) -> Self {
        let client = Self::new();
        for reply in replies {
            client.push_reply(reply);
        }
        client
    }

    pub fn push_reply(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(CompletionResponse::assistant_text(text)));
    }

    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn prompt(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].prompt_text()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        self.requests.lock().unwrap().push(request);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::internal("MockLlmClient has no scripted reply left")))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Seeded e-commerce database: ten products priced 100..1000, customers in
/// Kendari and Jakarta, and their orders.
pub fn setup_ecommerce_db() -> anyhow::Result<NamedTempFile> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;

    conn.execute_batch(
        r#"
        CREATE TABLE products (
            product_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            price REAL NOT NULL,
            stock INTEGER NOT NULL
        );
        CREATE TABLE customers (
            customer_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            city TEXT NOT NULL
        );
        CREATE TABLE orders (
            order_id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL,
            order_date TEXT NOT NULL,
            total_amount REAL NOT NULL
        );
    "#,
    )?;

    for i in 1..=10 {
        conn.execute(
            "INSERT INTO products (name, category, price, stock) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                format!("Produk {}", i),
                if i % 2 == 0 { "Elektronik" } else { "Fashion" },
                (i * 100) as f64,
                i * 5
            ],
        )?;
    }

    conn.execute_batch(
        r#"
        INSERT INTO customers (name, city) VALUES
            ('Andi', 'Kendari'), ('Budi', 'Kendari'), ('Citra', 'Jakarta');
        INSERT INTO orders (customer_id, order_date, total_amount) VALUES
            (1, '2026-01-05', 250.0),
            (2, '2026-01-06', 150.0),
            (3, '2026-01-06', 900.0),
            (3, '2026-02-01', 100.0);
    "#,
    )?;

    Ok(temp_file)
}
