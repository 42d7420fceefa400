//! Configuration loading and validation for thoughtloop.
//!
//! Loads configuration from `~/.thoughtloop/config.toml` (or the file named
//! by `THOUGHTLOOP_CONFIG`), then applies environment overrides. A `.env`
//! file in the working directory is read first; variables already present
//! in the environment win over it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the completion endpoint base URL.
pub const ENV_BASE_URL: &str = "BASE_URL";
/// Environment variable holding the model identifier.
pub const ENV_MODEL_ID: &str = "MODEL_ID";
/// Environment variable holding the (optional) API key.
pub const ENV_API_KEY: &str = "API_KEY";
/// Environment variable selecting the completion transport.
pub const ENV_TRANSPORT: &str = "THOUGHTLOOP_TRANSPORT";
/// Environment variable pointing at an alternative config file.
pub const ENV_CONFIG_PATH: &str = "THOUGHTLOOP_CONFIG";

/// The root configuration structure.
///
/// Maps directly to `~/.thoughtloop/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion endpoint base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model identifier sent with every completion request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    /// API key; local endpoints often need none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Which wire protocol the endpoint speaks
    #[serde(default)]
    pub transport: Transport,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Maximum model turns per run
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// What to do with a model reply that carries no directive
    #[serde(default)]
    pub freeform_reply: FreeformReply,
}

fn default_max_turns() -> u32 {
    10
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// The completion wire protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// OpenAI-compatible `/chat/completions`
    #[default]
    ChatCompletions,
    /// OpenAI Responses API (`/responses`)
    Responses,
    /// LlamaStack's OpenAI-compatible chat endpoint
    LlamaStack,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::ChatCompletions => "chat_completions",
            Transport::Responses => "responses",
            Transport::LlamaStack => "llama_stack",
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "chat_completions" | "chat" | "openai" => Ok(Transport::ChatCompletions),
            "responses" => Ok(Transport::Responses),
            "llama_stack" | "llamastack" => Ok(Transport::LlamaStack),
            other => Err(ConfigError::ValidationError(format!(
                "unknown transport '{other}' (expected chat_completions, responses or llama_stack)"
            ))),
        }
    }
}

/// Handling of a model reply that contains neither `Answer:` nor an `Action:` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeformReply {
    /// The whole reply is the final answer
    #[default]
    Answer,
    /// Ask the model again; the run ends at the turn ceiling if it never complies
    Reprompt,
}

/// The resolved endpoint required to talk to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub model_id: String,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("api_key", &redact(&self.api_key))
            .field("transport", &self.transport)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_turns", &self.max_turns)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("freeform_reply", &self.freeform_reply)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path, `.env`, and the environment.
    ///
    /// Environment overrides (highest priority):
    /// - `BASE_URL`, `MODEL_ID`, `API_KEY`
    /// - `THOUGHTLOOP_TRANSPORT`
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_path());
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(env_value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(model) = lookup(ENV_MODEL_ID) {
            self.model_id = Some(model);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(transport) = lookup(ENV_TRANSPORT) {
            self.transport = transport.parse()?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".thoughtloop")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "max_turns must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// The base URL and model id, or an error naming the variable to set.
    pub fn require_endpoint(&self) -> Result<Endpoint, ConfigError> {
        let base_url = self
            .base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let model_id = self
            .model_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_MODEL_ID))?;
        Ok(Endpoint { base_url, model_id })
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// A copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "[REDACTED]".to_string()),
            ..self.clone()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model_id: None,
            api_key: None,
            transport: Transport::default(),
            temperature: 0.0,
            max_tokens: None,
            max_turns: default_max_turns(),
            request_timeout_secs: default_request_timeout_secs(),
            freeform_reply: FreeformReply::default(),
        }
    }
}

/// Read an environment variable, trimmed; blank counts as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Environment variable `{0}` is not set")]
    Missing(&'static str),
}
