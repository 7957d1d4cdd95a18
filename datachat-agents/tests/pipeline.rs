mod common;

use common::{setup_ecommerce_db, MockLlmClient};
use datachat_agents::storage::{InMemoryStore, JsonFileStore, TranscriptStore};
use datachat_agents::{ChartType, DataAnalyst, Session, Turn, TurnState, VizRecommendation};
use datachat_llm_sdk::error::LlmError;
use serde_json::{json, Value};
use std::sync::Arc;

async fn new_session() -> Session {
    Session::load(Arc::new(InMemoryStore::new())).await.unwrap()
}

fn kinds(turns: &[Turn]) -> Vec<&'static str> {
    turns.iter().map(Turn::label).collect()
}

#[tokio::test]
async fn top_products_question_runs_end_to_end() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::with_replies(&[
        "SELECT name, price FROM products ORDER BY price DESC LIMIT 5",
        "Produk 10 adalah produk termahal.",
        r#"{"chart_type": "bar", "x_column": "name", "y_column": "price"}"#,
    ]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    let state = analyst
        .ask(&mut session, "Tampilkan 5 produk dengan harga termahal")
        .await?;

    assert_eq!(state, TurnState::Completed);
    assert_eq!(
        kinds(session.turns()),
        vec!["user", "generated_sql", "result", "insight", "chart_spec"]
    );

    let Turn::GeneratedSql(sql) = &session.turns()[1] else {
        panic!("expected generated SQL");
    };
    assert!(sql.contains("LIMIT 5"));
    assert!(sql.contains("ORDER BY price DESC"));

    let Turn::Result { rows, columns } = &session.turns()[2] else {
        panic!("expected result");
    };
    assert_eq!(columns, &vec!["name".to_string(), "price".to_string()]);
    let prices: Vec<&Value> = rows.iter().map(|r| &r[1]).collect();
    assert_eq!(
        prices,
        vec![&json!(1000.0), &json!(900.0), &json!(800.0), &json!(700.0), &json!(600.0)]
    );

    assert_eq!(
        session.turns()[4],
        Turn::ChartSpec(VizRecommendation {
            chart_type: ChartType::Bar,
            x_column: Some("name".to_string()),
            y_column: Some("price".to_string()),
        })
    );

    assert_eq!(client.get_call_count(), 3);
    let sql_prompt = client.prompt(0);
    assert!(sql_prompt.contains("Tampilkan 5 produk dengan harga termahal"));
    assert!(sql_prompt.contains("- products(product_id, name, category, price, stock)"));
    assert!(client.prompt(1).contains("| Produk 10 | 1000.0 |"));
    Ok(())
}

#[tokio::test]
async fn denylisted_sql_is_rejected_before_execution() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::with_replies(&["DROP TABLE products; SELECT 1"]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    let state = analyst.ask(&mut session, "Hapus tabel produk").await?;

    assert_eq!(state, TurnState::Failed);
    assert_eq!(kinds(session.turns()), vec!["user", "generated_sql", "error"]);
    let Turn::Error(message) = &session.turns()[2] else {
        panic!("expected error");
    };
    assert!(message.contains("'DROP'"));

    // no insight or chart calls
    assert_eq!(client.get_call_count(), 1);
    let counts = datachat_tools::SchemaIntrospector::table_row_counts(db.path())?;
    assert!(counts.contains(&("products".to_string(), 10)));
    Ok(())
}

#[tokio::test]
async fn only_first_statement_reaches_database() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::with_replies(&[
        "SELECT COUNT(*) AS total FROM customers; SELECT * FROM orders;",
        "Ada 3 pelanggan.",
    ]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    let state = analyst.ask(&mut session, "Berapa jumlah pelanggan?").await?;

    // a single row gets an insight but no chart call
    assert_eq!(state, TurnState::Completed);
    assert_eq!(
        session.turns()[2],
        Turn::Result {
            rows: vec![vec![json!(3)]],
            columns: vec!["total".to_string()],
        }
    );
    assert_eq!(client.get_call_count(), 2);
    assert_eq!(
        session.turns()[4],
        Turn::ChartSpec(VizRecommendation::none())
    );
    Ok(())
}

#[tokio::test]
async fn follow_up_prompt_carries_previous_sql() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let kendari_sql = "SELECT c.city, SUM(o.total_amount) AS revenue FROM orders o \
                       JOIN customers c ON c.customer_id = o.customer_id \
                       WHERE c.city = 'Kendari' GROUP BY c.city";
    let jakarta_sql = kendari_sql.replace("'Kendari'", "'Jakarta'");

    let client = Arc::new(MockLlmClient::with_replies(&[
        kendari_sql,
        "Kendari: 400.",
        jakarta_sql.as_str(),
        "Jakarta: 1000.",
    ]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    analyst
        .ask(&mut session, "Berapa total pendapatan di Kendari?")
        .await?;
    analyst.ask(&mut session, "Bagaimana dengan Jakarta?").await?;

    let follow_up_prompt = client.prompt(2);
    assert!(follow_up_prompt.contains(&format!(
        "User: Berapa total pendapatan di Kendari?\nAssistant (SQL): {}\n",
        kendari_sql
    )));
    assert!(!follow_up_prompt.contains("User: Bagaimana dengan Jakarta?\n"));
    assert!(follow_up_prompt.ends_with("Bagaimana dengan Jakarta?\n\n### SQL Query:\n"));

    let Turn::Result { rows, .. } = &session.turns()[7] else {
        panic!("expected result, got {:?}", session.turns()[7]);
    };
    assert_eq!(rows, &vec![vec![json!("Jakarta"), json!(1000.0)]]);
    Ok(())
}

#[tokio::test]
async fn database_error_is_recorded() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::with_replies(&["SELECT revenue FROM invoices"]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    let state = analyst.ask(&mut session, "Pendapatan invoice?").await?;

    assert_eq!(state, TurnState::Failed);
    assert_eq!(
        session.turns()[2],
        Turn::Error("SQL Error: no such table: invoices".to_string())
    );
    assert_eq!(client.get_call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_result_skips_advice() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::with_replies(&[
        "SELECT name FROM products WHERE stock < 0",
    ]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    let state = analyst.ask(&mut session, "Produk stok minus?").await?;

    assert_eq!(state, TurnState::Completed);
    assert_eq!(kinds(session.turns()), vec!["user", "generated_sql", "result"]);
    assert_eq!(client.get_call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn model_failure_during_generation_ends_turn() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::new());
    client.push_error(LlmError::authentication("Invalid API key"));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    let state = analyst.ask(&mut session, "Apa saja kategori produk?").await?;

    assert_eq!(state, TurnState::Failed);
    assert_eq!(kinds(session.turns()), vec!["user", "error"]);
    let Turn::Error(message) = &session.turns()[1] else {
        panic!("expected error");
    };
    assert!(message.starts_with("System Error: "));
    assert!(message.contains("Invalid API key"));
    Ok(())
}

#[tokio::test]
async fn insight_failure_does_not_stop_chart() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::new());
    client.push_reply("SELECT category, SUM(stock) AS stock FROM products GROUP BY category");
    client.push_error(LlmError::rate_limit("Too many requests", None));
    client.push_reply(r#"{"chart_type": "pie", "x_column": "category", "y_column": "stock"}"#);
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    let state = analyst.ask(&mut session, "Komposisi stok per kategori").await?;

    assert_eq!(state, TurnState::Completed);
    assert_eq!(
        kinds(session.turns()),
        vec!["user", "generated_sql", "result", "error", "chart_spec"]
    );
    let Turn::Error(message) = &session.turns()[3] else {
        panic!("expected error");
    };
    assert!(message.starts_with("Insight generation failed"));
    Ok(())
}

#[tokio::test]
async fn wide_or_single_row_results_never_ask_for_a_chart() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::with_replies(&[
        "SELECT p.*, 1 AS extra FROM products p LIMIT 3",
        "Tiga produk pertama.",
    ]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    analyst.ask(&mut session, "Tampilkan 3 produk").await?;

    // six columns: generation and insight only
    assert_eq!(client.get_call_count(), 2);
    assert_eq!(
        session.turns().last(),
        Some(&Turn::ChartSpec(VizRecommendation::none()))
    );
    Ok(())
}

#[tokio::test]
async fn blank_question_is_rejected() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let client = Arc::new(MockLlmClient::new());
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());
    let mut session = new_session().await;

    assert!(analyst.ask(&mut session, "   ").await.is_err());
    assert!(session.turns().is_empty());
    assert_eq!(client.get_call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn unanswered_question_is_resumed_exactly_once() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let dir = tempfile::tempdir()?;
    let store: Arc<dyn TranscriptStore> = Arc::new(JsonFileStore::new(dir.path().join("history.json")));

    // an earlier run recorded the question and stopped
    store
        .save(&[Turn::User("Berapa jumlah produk?".to_string())])
        .await?;

    let client = Arc::new(MockLlmClient::with_replies(&[
        "SELECT COUNT(*) AS total FROM products",
        "Ada 10 produk.",
    ]));
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());

    let mut session = Session::load(store.clone()).await?;
    assert_eq!(analyst.resume(&mut session).await, Some(TurnState::Completed));
    assert_eq!(client.get_call_count(), 2);

    // reloading after completion does not re-run
    let mut reloaded = Session::load(store.clone()).await?;
    assert_eq!(reloaded.turns(), session.turns());
    assert_eq!(analyst.resume(&mut reloaded).await, None);
    assert_eq!(client.get_call_count(), 2);

    let user_turns = reloaded.turns().iter().filter(|t| t.is_user()).count();
    assert_eq!(user_turns, 1);
    Ok(())
}

#[tokio::test]
async fn interrupted_turn_is_not_re_run() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let store = Arc::new(InMemoryStore::with_turns(vec![
        Turn::User("Berapa jumlah produk?".to_string()),
        Turn::GeneratedSql("SELECT COUNT(*) FROM products".to_string()),
    ]));
    let client = Arc::new(MockLlmClient::new());
    let analyst = DataAnalyst::new(client.clone(), "mock-model", db.path());

    let mut session = Session::load(store).await?;
    assert_eq!(session.context().current_state(), Some(TurnState::Generating));
    assert_eq!(analyst.resume(&mut session).await, None);
    assert_eq!(client.get_call_count(), 0);
    assert_eq!(session.turns().len(), 2);

    // result and insight recorded, chart never reached
    let executed = Arc::new(InMemoryStore::with_turns(vec![
        Turn::User("Pendapatan per kota".to_string()),
        Turn::GeneratedSql("SELECT city, SUM(total_amount) FROM orders GROUP BY city".to_string()),
        Turn::Result {
            rows: vec![vec![json!("Jakarta"), json!(1000.0)], vec![json!("Kendari"), json!(400.0)]],
            columns: vec!["city".to_string(), "revenue".to_string()],
        },
        Turn::Insight("Jakarta memimpin pendapatan.".to_string()),
    ]));
    let mut session = Session::load(executed.clone()).await?;
    assert_eq!(session.context().current_state(), Some(TurnState::Executed));
    assert_eq!(analyst.resume(&mut session).await, None);
    assert_eq!(client.get_call_count(), 0);
    assert_eq!(session.turns().len(), 4);
    assert_eq!(executed.load().await?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn transcript_persists_and_clears() -> anyhow::Result<()> {
    let db = setup_ecommerce_db()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("history.json");
    let store: Arc<dyn TranscriptStore> = Arc::new(JsonFileStore::new(&path));

    let client = Arc::new(MockLlmClient::with_replies(&[
        "SELECT city, COUNT(*) AS n FROM customers GROUP BY city ORDER BY city",
        "Kendari punya pelanggan terbanyak.",
        r#"{"chart_type": "bar", "x_column": "CITY", "y_column": "n"}"#,
    ]));
    let analyst = DataAnalyst::new(client, "mock-model", db.path());

    let mut session = Session::load(store.clone()).await?;
    analyst.ask(&mut session, "Pelanggan per kota").await?;

    let reloaded = store.load().await?;
    assert_eq!(reloaded, session.turns());
    assert_eq!(reloaded.len(), 5);

    session.reset().await?;
    assert!(store.load().await?.is_empty());
    assert!(!path.exists());
    Ok(())
}
