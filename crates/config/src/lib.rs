//! Configuration loading and validation for typescout.
//!
//! Loads configuration from `~/.typescout/config.toml` with environment
//! variable overrides. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.typescout/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the reasoning provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// `openai`, `openrouter`, `ollama`, or any name paired with `api_url`
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL override for the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Catalog file loaded at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}

/// How questions are answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// `simple` or `iterative`
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Per-call limit on the reasoning service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_secs: Option<u64>,

    #[serde(default = "default_thinking_temperature")]
    pub thinking_temperature: f32,

    #[serde(default = "default_thinking_max_tokens")]
    pub thinking_max_tokens: u32,

    #[serde(default = "default_answer_temperature")]
    pub answer_temperature: f32,

    #[serde(default = "default_answer_max_tokens")]
    pub answer_max_tokens: u32,
}

fn default_mode() -> String {
    "simple".into()
}
fn default_max_iterations() -> usize {
    5
}
fn default_thinking_temperature() -> f32 {
    0.3
}
fn default_thinking_max_tokens() -> u32 {
    1000
}
fn default_answer_temperature() -> f32 {
    0.7
}
fn default_answer_max_tokens() -> u32 {
    2000
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            max_iterations: default_max_iterations(),
            call_timeout_secs: None,
            thinking_temperature: default_thinking_temperature(),
            thinking_max_tokens: default_thinking_max_tokens(),
            answer_temperature: default_answer_temperature(),
            answer_max_tokens: default_answer_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default `limit` of the `search_types` tool
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// How many ranked types feed a simple answer
    #[serde(default = "default_rank_limit")]
    pub rank_limit: usize,

    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

fn default_limit() -> usize {
    5
}
fn default_rank_limit() -> usize {
    10
}
fn default_max_keywords() -> usize {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            rank_limit: default_rank_limit(),
            max_keywords: default_max_keywords(),
        }
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("catalog", &self.catalog)
            .field("agent", &self.agent)
            .field("search", &self.search)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.typescout/config.toml),
    /// then apply environment overrides.
    ///
    /// - `TYPESCOUT_API_KEY`, else `OPENAI_API_KEY`, else `OPENROUTER_API_KEY`
    ///   (only when the file has no key)
    /// - `TYPESCOUT_PROVIDER`, `TYPESCOUT_MODEL`, `TYPESCOUT_CATALOG`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path())
    }

    /// Like [`load`](Self::load), from a specific file.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
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

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = set("TYPESCOUT_API_KEY")
                .or_else(|| set("OPENAI_API_KEY"))
                .or_else(|| set("OPENROUTER_API_KEY"));
        }
        if let Some(provider) = set("TYPESCOUT_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = set("TYPESCOUT_MODEL") {
            self.model = model;
        }
        if let Some(catalog) = set("TYPESCOUT_CATALOG") {
            self.catalog = Some(PathBuf::from(catalog));
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs_home().join(".typescout")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("agent.thinking_temperature", self.agent.thinking_temperature),
            ("agent.answer_temperature", self.agent.answer_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }

        for (name, value) in [
            ("agent.max_iterations", self.agent.max_iterations),
            ("search.default_limit", self.search.default_limit),
            ("search.rank_limit", self.search.rank_limit),
            ("search.max_keywords", self.search.max_keywords),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be at least 1"
                )));
            }
        }

        if !matches!(self.agent.mode.as_str(), "simple" | "iterative") {
            return Err(ConfigError::ValidationError(format!(
                "agent.mode must be 'simple' or 'iterative', got '{}'",
                self.agent.mode
            )));
        }

        if self.agent.call_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "agent.call_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Whether a reasoning provider can be built without further input.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some() || self.provider == "ollama"
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            catalog: None,
            agent: AgentConfig::default(),
            search: SearchConfig::default(),
        }
    }
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
}
