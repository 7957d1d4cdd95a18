//! # Datachat LLM SDK
//!
//! The text-completion boundary used by the analyst pipeline: a provider-agnostic
//! [`client::LlmClient`] trait plus a Groq implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use datachat_llm_sdk::groq::GroqClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GroqClient::new("your-groq-api-key")?;
//!     let response = client
//!         .message_builder()
//!         .model("llama-3.3-70b-versatile")
//!         .max_tokens(256)
//!         .temperature(0.0)
//!         .user_message("SELECT 1 -- explain this query")
//!         .send()
//!         .await?;
//!
//!     println!("Response: {}", response.choices[0].message.content);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod groq;
pub mod models;
pub mod providers;
pub mod types;
