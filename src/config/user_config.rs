//! Per-user settings for the `llm` analysis provider
//!
//! Lives in `<config dir>/essayspark/config.toml`, next to nothing else.
//! Credentials resolve per backend: the backend's environment variable
//! first, then the matching `*_api_key` entry of the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::ai::{AiResult, LlmBackend};

/// Overrides `ai.backend`
const BACKEND_ENV: &str = "ESSAYSPARK_AI_BACKEND";
/// Overrides `ai.ollama_model`
const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";

const DEFAULT_BACKEND: &str = "anthropic";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

const EXAMPLE_USER_CONFIG: &str = r#"# EssaySpark user settings (used by `--provider llm`)

[ai]
# anthropic, openai, openrouter, deepinfra or ollama
# backend = "anthropic"

# Keys may also come from ANTHROPIC_API_KEY, OPENAI_API_KEY,
# OPENROUTER_API_KEY or DEEPINFRA_API_KEY, which take priority.
# anthropic_api_key = "sk-ant-..."
# openai_api_key = "sk-..."
# openrouter_api_key = "sk-or-..."
# deepinfra_api_key = "..."

# Model for hosted backends (default depends on the backend)
# model = "claude-sonnet-4-20250514"

# Local Ollama server, no key needed
# ollama_url = "http://localhost:11434"
# ollama_model = "llama3.1"
"#;

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    pub backend: Option<String>,
    pub model: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub deepinfra_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub ollama_model: Option<String>,
}

impl AiConfig {
    /// Keys accepted by `essayspark config set` (without the `ai.` prefix)
    pub const FIELDS: [&'static str; 8] = [
        "backend",
        "model",
        "anthropic_api_key",
        "openai_api_key",
        "openrouter_api_key",
        "deepinfra_api_key",
        "ollama_url",
        "ollama_model",
    ];

    /// Name of the file entry holding a backend's key
    pub fn key_field(backend: LlmBackend) -> Option<&'static str> {
        match backend {
            LlmBackend::Anthropic => Some("anthropic_api_key"),
            LlmBackend::OpenAi => Some("openai_api_key"),
            LlmBackend::OpenRouter => Some("openrouter_api_key"),
            LlmBackend::Deepinfra => Some("deepinfra_api_key"),
            LlmBackend::Ollama => None,
        }
    }

    fn stored_key(&self, backend: LlmBackend) -> Option<&str> {
        let key = match backend {
            LlmBackend::Anthropic => &self.anthropic_api_key,
            LlmBackend::OpenAi => &self.openai_api_key,
            LlmBackend::OpenRouter => &self.openrouter_api_key,
            LlmBackend::Deepinfra => &self.deepinfra_api_key,
            LlmBackend::Ollama => return None,
        };
        key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Where a backend credential was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    ConfigFile,
    NotRequired,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Environment => write!(f, "environment"),
            KeySource::ConfigFile => write!(f, "config file"),
            KeySource::NotRequired => write!(f, "not required"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub value: String,
    pub source: KeySource,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl UserConfig {
    /// Load the user file (if any) and apply environment overrides.
    ///
    /// An unreadable or malformed file is logged and ignored.
    pub fn load() -> Self {
        let mut config = match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring user config: {:#}", e);
                UserConfig::default()
            }),
            _ => UserConfig::default(),
        };

        if let Some(backend) = env_value(BACKEND_ENV) {
            config.ai.backend = Some(backend);
        }
        if let Some(model) = env_value(OLLAMA_MODEL_ENV) {
            config.ai.ollama_model = Some(model);
        }
        config
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?;
        debug!("Loaded user config from {}", path.display());
        Ok(config)
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("essayspark").join("config.toml"))
    }

    /// Configured backend name, unvalidated
    pub fn backend_name(&self) -> &str {
        self.ai.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    pub fn backend(&self) -> AiResult<LlmBackend> {
        LlmBackend::from_name(self.backend_name())
    }

    /// Model the client will request from `backend`
    pub fn model(&self, backend: LlmBackend) -> &str {
        match backend {
            LlmBackend::Ollama => self
                .ai
                .ollama_model
                .as_deref()
                .unwrap_or(backend.default_model()),
            _ => self
                .ai
                .model
                .as_deref()
                .unwrap_or(backend.default_model()),
        }
    }

    pub fn ollama_url(&self) -> &str {
        self.ai.ollama_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL)
    }

    /// Credential for `backend` from the process environment or the file
    pub fn api_key(&self, backend: LlmBackend) -> Option<ApiKey> {
        self.api_key_with(backend, env_value)
    }

    /// Same as [`api_key`](Self::api_key) with an explicit environment lookup
    pub fn api_key_with(
        &self,
        backend: LlmBackend,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<ApiKey> {
        if !backend.requires_api_key() {
            return Some(ApiKey {
                value: String::new(),
                source: KeySource::NotRequired,
            });
        }
        if let Some(value) = env(backend.env_key()) {
            return Some(ApiKey {
                value,
                source: KeySource::Environment,
            });
        }
        self.ai.stored_key(backend).map(|value| ApiKey {
            value: value.to_string(),
            source: KeySource::ConfigFile,
        })
    }

    /// Create the user config file with commented examples if it is missing
    pub fn init_user_config() -> Result<PathBuf> {
        let path = Self::user_config_path()
            .context("Could not determine the user config directory")?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        if !path.exists() {
            std::fs::write(&path, EXAMPLE_USER_CONFIG)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(path)
    }
}
