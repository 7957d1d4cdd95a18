//! Model constants for supported LLM providers

/// Groq-hosted model constants
pub mod groq {
    /// Llama 3.3 70B - default for SQL generation and analysis
    pub const LLAMA_3_3_70B_ID: &str = "llama-3.3-70b-versatile";
    pub const LLAMA_3_3_70B_NAME: &str = "Llama 3.3 70B Versatile";

    /// Llama 3.1 8B - fast, cheaper model
    pub const LLAMA_3_1_8B_ID: &str = "llama-3.1-8b-instant";
    pub const LLAMA_3_1_8B_NAME: &str = "Llama 3.1 8B Instant";

    pub const DEFAULT_MODEL: &str = LLAMA_3_3_70B_ID;
}
