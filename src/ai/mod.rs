//! LLM client layer
//!
//! Backs the `llm` analysis provider. Supports several chat backends
//! (Anthropic, OpenAI, OpenRouter, DeepInfra, Ollama) with a BYOK
//! (bring your own key) model: each hosted backend reads its key from
//! `<BACKEND>_API_KEY` or the matching entry of the user config.
//!
//! # Example
//!
//! ```rust,ignore
//! use essayspark::ai::{AiClient, Message};
//! use essayspark::config::UserConfig;
//!
//! let client = AiClient::from_user_config(&UserConfig::load())?;
//! let reply = client.generate(vec![Message::user("Hello")], None)?;
//! ```

mod client;
mod prompts;

pub use client::{AiClient, ClientConfig, LlmBackend, Message, Role};
pub use prompts::{extract_json_block, EssayPromptBuilder, SYSTEM_PROMPT};

use thiserror::Error;

/// Errors that can occur in the AI module
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type AiResult<T> = Result<T, AiError>;
