//! Builds the configured provider and reasoning service.

use crate::openai_compat::OpenAiCompatProvider;
use std::sync::Arc;
use tracing::{debug, warn};
use typescout_config::AppConfig;
use typescout_core::provider::Provider;
use typescout_core::reasoning::{ChatSettings, ReasoningService};

/// The configured provider, or `None` when it cannot be reached without
/// more configuration (no API key, or an unknown provider without
/// `api_url`).
pub fn build_from_config(config: &AppConfig) -> Option<Arc<dyn Provider>> {
    let name = config.provider.as_str();
    let base_url = config
        .api_url
        .clone()
        .or_else(|| default_base_url(name).map(String::from));
    let Some(base_url) = base_url else {
        warn!(provider = name, "Unknown provider without api_url, reasoning disabled");
        return None;
    };

    let api_key = match (&config.api_key, name) {
        (Some(key), _) => key.clone(),
        (None, "ollama") => "ollama".to_string(),
        (None, _) => {
            debug!(provider = name, "No API key configured, reasoning disabled");
            return None;
        }
    };

    Some(Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)))
}

/// The chat reasoning service described by `config`, if a provider can be
/// built.
pub fn reasoning_from_config(config: &AppConfig) -> Option<ReasoningService> {
    let provider = build_from_config(config)?;
    let settings = ChatSettings::new(&config.model)
        .with_thinking(
            config.agent.thinking_temperature,
            config.agent.thinking_max_tokens,
        )
        .with_answer(
            config.agent.answer_temperature,
            config.agent.answer_max_tokens,
        );
    Some(ReasoningService::chat(provider, settings))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        _ => None,
    }
}
