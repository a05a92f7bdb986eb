//! Reasoning-service contract.
//!
//! The agent talks to exactly one reasoning backend, picked when the service
//! is constructed:
//!
//! - [`ReasoningService::Chat`]: a [`Provider`] driven with role-tagged
//!   messages and per-mode sampling settings.
//! - [`ReasoningService::Callable`]: a [`PromptCompleter`] taking a prompt and
//!   an optional context string, returning text or a stream of fragments.
//!
//! Both shapes are flattened to `respond()` (one string) and
//! `respond_stream()` (string fragments) so callers never branch on the
//! backend.

use crate::error::ProviderError;
use crate::message::{Message, render_transcript};
use crate::provider::{Provider, ProviderRequest};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// What the caller wants out of a reasoning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Short, focused step inside the exploration loop.
    Thinking,
    /// A user-facing answer.
    Answer,
}

/// Sampling parameters for one response mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Model and per-mode sampling for chat-style backends.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub thinking: SamplingSettings,
    pub answer: SamplingSettings,
}

impl ChatSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            thinking: SamplingSettings {
                temperature: 0.3,
                max_tokens: 1000,
            },
            answer: SamplingSettings {
                temperature: 0.7,
                max_tokens: 2000,
            },
        }
    }

    pub fn with_thinking(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.thinking = SamplingSettings {
            temperature,
            max_tokens,
        };
        self
    }

    pub fn with_answer(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.answer = SamplingSettings {
            temperature,
            max_tokens,
        };
        self
    }

    /// Sampling settings for the given mode.
    pub fn sampling(&self, mode: ResponseMode) -> SamplingSettings {
        match mode {
            ResponseMode::Thinking => self.thinking,
            ResponseMode::Answer => self.answer,
        }
    }
}

/// Output of a [`PromptCompleter`].
pub enum Completion {
    /// The whole response at once.
    Text(String),
    /// Incremental fragments, concatenated in order.
    Fragments(BoxStream<'static, String>),
}

impl Completion {
    /// Concatenate the completion into a single string.
    pub async fn collect(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Fragments(fragments) => fragments.collect::<Vec<_>>().await.concat(),
        }
    }

    fn into_stream(self) -> BoxStream<'static, Result<String, ProviderError>> {
        match self {
            Self::Text(text) => stream::once(async move { Ok(text) }).boxed(),
            Self::Fragments(fragments) => fragments.map(Ok).boxed(),
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Fragments(_) => f.write_str("Fragments(..)"),
        }
    }
}

/// A plain `(prompt, context) -> text` reasoning backend.
#[async_trait]
pub trait PromptCompleter: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<Completion, ProviderError>;
}

/// Adapts a synchronous closure into a [`PromptCompleter`].
pub struct FnCompleter<F> {
    func: F,
}

impl<F> FnCompleter<F>
where
    F: Fn(&str, Option<&str>) -> Result<Completion, ProviderError> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> PromptCompleter for FnCompleter<F>
where
    F: Fn(&str, Option<&str>) -> Result<Completion, ProviderError> + Send + Sync,
{
    async fn complete(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<Completion, ProviderError> {
        (self.func)(prompt, context)
    }
}

/// The reasoning backend used by the agents.
#[derive(Clone)]
pub enum ReasoningService {
    Chat {
        provider: Arc<dyn Provider>,
        settings: ChatSettings,
    },
    Callable(Arc<dyn PromptCompleter>),
}

impl ReasoningService {
    pub fn chat(provider: Arc<dyn Provider>, settings: ChatSettings) -> Self {
        Self::Chat { provider, settings }
    }

    pub fn callable(completer: impl PromptCompleter + 'static) -> Self {
        Self::Callable(Arc::new(completer))
    }

    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Chat { provider, settings } => {
                format!("chat:{}/{}", provider.name(), settings.model)
            }
            Self::Callable(_) => "callable".to_string(),
        }
    }

    /// Get one complete response for the transcript.
    pub async fn respond(
        &self,
        messages: &[Message],
        mode: ResponseMode,
    ) -> Result<String, ProviderError> {
        match self {
            Self::Chat { provider, settings } => {
                let request = chat_request(settings, messages, mode, false);
                debug!(
                    provider = provider.name(),
                    messages = messages.len(),
                    ?mode,
                    "Chat completion"
                );
                let response = provider.complete(request).await?;
                Ok(response.message.content)
            }
            Self::Callable(completer) => {
                let (prompt, context) = split_prompt(messages);
                let completion = completer.complete(&prompt, context.as_deref()).await?;
                Ok(completion.collect().await)
            }
        }
    }

    /// Like [`respond`](Self::respond), bounded by an optional timeout.
    pub async fn respond_within(
        &self,
        messages: &[Message],
        mode: ResponseMode,
        timeout: Option<Duration>,
    ) -> Result<String, ProviderError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.respond(messages, mode))
                .await
                .map_err(|_| {
                    ProviderError::Timeout(format!("no response after {}s", limit.as_secs_f32()))
                })?,
            None => self.respond(messages, mode).await,
        }
    }

    /// Get the response as a stream of text fragments.
    pub async fn respond_stream(
        &self,
        messages: &[Message],
        mode: ResponseMode,
    ) -> Result<BoxStream<'static, Result<String, ProviderError>>, ProviderError> {
        match self {
            Self::Chat { provider, settings } => {
                let request = chat_request(settings, messages, mode, true);
                let rx = provider.stream(request).await?;
                let fragments = ReceiverStream::new(rx).filter_map(|chunk| async move {
                    match chunk {
                        Ok(chunk) => chunk.content.filter(|c| !c.is_empty()).map(Ok),
                        Err(e) => Some(Err(e)),
                    }
                });
                Ok(fragments.boxed())
            }
            Self::Callable(completer) => {
                let (prompt, context) = split_prompt(messages);
                let completion = completer.complete(&prompt, context.as_deref()).await?;
                Ok(completion.into_stream())
            }
        }
    }
}

impl std::fmt::Debug for ReasoningService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReasoningService({})", self.describe())
    }
}

fn chat_request(
    settings: &ChatSettings,
    messages: &[Message],
    mode: ResponseMode,
    stream: bool,
) -> ProviderRequest {
    let sampling = settings.sampling(mode);
    ProviderRequest {
        model: settings.model.clone(),
        messages: messages.to_vec(),
        temperature: sampling.temperature,
        max_tokens: Some(sampling.max_tokens),
        stream,
        stop: vec![],
    }
}

/// The last message is the prompt; everything before it becomes context.
fn split_prompt(messages: &[Message]) -> (String, Option<String>) {
    match messages.split_last() {
        Some((last, [])) => (last.content.clone(), None),
        Some((last, earlier)) => (last.content.clone(), Some(render_transcript(earlier))),
        None => (String::new(), None),
    }
}
