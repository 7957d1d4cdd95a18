//! Provider name constants

/// Groq (OpenAI-compatible chat completions)
pub const GROQ: &str = "groq";
