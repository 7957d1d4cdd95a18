use crate::analyst::DataAnalyst;
use crate::config::AppConfig;
use crate::session::Session;
use crate::storage::{JsonFileStore, TranscriptStore};
use datachat_llm_sdk::client::LlmClient;
use datachat_llm_sdk::groq::GroqClient;
use std::sync::Arc;

/// Create the Groq client described by the configuration
///
/// # Examples
/// ```rust,no_run
/// let config = datachat_agents::config::AppConfig::load(None)?;
/// let client = datachat_agents::factory::create_llm_client(&config)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn create_llm_client(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmClient>> {
    let mut client = GroqClient::new(config.api_key()?)?.with_model(&config.llm.model);
    if let Some(base_url) = &config.llm.base_url {
        client = client.with_base_url(base_url);
    }

    tracing::debug!(
        base_url = client.base_url(),
        model = %config.llm.model,
        "Created Groq client"
    );
    Ok(Arc::new(client))
}

pub fn create_analyst(config: &AppConfig, client: Arc<dyn LlmClient>) -> DataAnalyst {
    DataAnalyst::new(client, &config.llm.model, &config.database.path)
        .with_history_window(config.history.window)
}

/// Load the persisted transcript named by the configuration
pub async fn open_session(config: &AppConfig) -> anyhow::Result<Session> {
    let store: Arc<dyn TranscriptStore> = Arc::new(JsonFileStore::new(&config.history.path));
    Ok(Session::load(store).await?)
}
