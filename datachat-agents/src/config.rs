use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub window: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from("ecommerce.db"),
            },
            llm: LlmConfig {
                api_key: None,
                model: datachat_llm_sdk::models::groq::DEFAULT_MODEL.to_string(),
                base_url: None,
            },
            history: HistoryConfig {
                path: PathBuf::from("history_sql.json"),
                window: crate::context::DEFAULT_HISTORY_WINDOW,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration, lowest precedence first:
    ///
    /// 1. built-in defaults
    /// 2. TOML file, `explicit_path` or `<config dir>/datachat/config.toml`
    /// 3. `DATACHAT__SECTION__KEY` environment variables
    /// 4. `GROQ_API_KEY`, `MODEL_NAME` and `DATABASE_PATH`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let file = match explicit_path {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::from(get_config_path()).required(false),
        };

        let builder = Config::builder()
            .set_default("database.path", defaults.database.path.to_string_lossy().to_string())?
            .set_default("llm.model", defaults.llm.model)?
            .set_default("history.path", defaults.history.path.to_string_lossy().to_string())?
            .set_default("history.window", defaults.history.window as i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("DATACHAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("llm.api_key", non_empty_var("GROQ_API_KEY"))?
            .set_override_option("llm.model", non_empty_var("MODEL_NAME"))?
            .set_override_option("database.path", non_empty_var("DATABASE_PATH"))?
            .build()?;

        let mut config: AppConfig = builder.try_deserialize()?;
        config.database.path = expand_tilde(&config.database.path);
        config.history.path = expand_tilde(&config.history.path);

        Ok(config)
    }

    pub fn api_key(&self) -> anyhow::Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Groq API key not found. Set GROQ_API_KEY or llm.api_key in {}",
                    get_config_path().display()
                )
            })
    }
}

pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("datachat")
        .join("config.toml")
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
