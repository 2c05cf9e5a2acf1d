//! Replay CLI configuration.
//!
//! The chat endpoint is configured from `PARLEY_`-prefixed environment
//! variables (`PARLEY_CHAT__BASE_URL`, `PARLEY_CHAT__MODEL`,
//! `PARLEY_CHAT__API_KEY`), defaulting to a local Ollama instance.

use serde::Deserialize;

/// Replay process configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayConfig {
    /// Chat endpoint configuration.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Chat endpoint section.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key, if the endpoint requires one.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:11434/v1".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
        }
    }
}

impl ReplayConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if present configuration values are invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("PARLEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
