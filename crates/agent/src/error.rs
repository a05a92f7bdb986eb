use thiserror::Error;
use typescout_core::error::ProviderError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("No reasoning service configured. Set an API key or attach a completer to ask questions.")]
    NoReasoningClient,

    #[error("Another question is still being processed")]
    Busy,

    #[error(transparent)]
    Reasoning(#[from] ProviderError),
}
