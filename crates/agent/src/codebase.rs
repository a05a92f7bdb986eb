//! Question answering over the registry.
//!
//! [`CodebaseAgent`] answers in one of two ways:
//!
//! - [`AskMode::Simple`]: extract keywords, rank the registry, render the
//!   best matches as markdown and make a single answer-mode call.
//! - [`AskMode::Iterative`]: hand the question to an
//!   [`IterativeCodebaseAgent`] and return its event trace.
//!
//! One question runs at a time per agent. A second `ask` while the first is
//! in flight fails with [`AgentError::Busy`].

use crate::context::render_context;
use crate::error::AgentError;
use crate::iterative::{DEFAULT_MAX_ITERATIONS, IterativeCodebaseAgent};
use crate::keywords::{MAX_KEYWORDS, extract_keywords};
use crate::prompt;
use crate::status::StatusEvent;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;
use typescout_core::error::ProviderError;
use typescout_core::message::Message;
use typescout_core::reasoning::{ReasoningService, ResponseMode};
use typescout_index::{DEFAULT_RANK_LIMIT, ScoredType, TypeRegistry, rank};
use typescout_tools::AgentTools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskMode {
    #[default]
    Simple,
    Iterative,
}

impl FromStr for AskMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "iterative" => Ok(Self::Iterative),
            other => Err(format!("unknown ask mode '{other}', expected simple or iterative")),
        }
    }
}

impl std::fmt::Display for AskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Simple => "simple",
            Self::Iterative => "iterative",
        })
    }
}

/// Result of [`CodebaseAgent::ask`].
#[derive(Debug, Clone)]
pub struct AskResponse {
    pub mode: AskMode,
    /// Ranked types the answer was grounded in (simple mode).
    pub context: Vec<ScoredType>,
    /// Every event of the run (iterative mode).
    pub trace: Vec<StatusEvent>,
    pub answer: String,
}

/// A streamed simple-mode answer.
pub struct AnswerStream {
    pub context: Vec<ScoredType>,
    pub fragments: BoxStream<'static, Result<String, ProviderError>>,
}

pub struct CodebaseAgent {
    registry: Arc<TypeRegistry>,
    tools: Arc<AgentTools>,
    service: Option<ReasoningService>,
    mode: AskMode,
    max_iterations: usize,
    rank_limit: usize,
    max_keywords: usize,
    call_timeout: Option<Duration>,
    busy: Arc<AtomicBool>,
}

impl CodebaseAgent {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            tools: Arc::new(AgentTools::new(registry.clone())),
            registry,
            service: None,
            mode: AskMode::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            rank_limit: DEFAULT_RANK_LIMIT,
            max_keywords: MAX_KEYWORDS,
            call_timeout: None,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_reasoning(mut self, service: ReasoningService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_mode(mut self, mode: AskMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn with_rank_limit(mut self, limit: usize) -> Self {
        self.rank_limit = limit;
        self
    }

    pub fn with_max_keywords(mut self, max: usize) -> Self {
        self.max_keywords = max;
        self
    }

    /// Default `limit` of the `search_types` tool.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.tools = Arc::new(AgentTools::with_search_limit(self.registry.clone(), limit));
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn tools(&self) -> &Arc<AgentTools> {
        &self.tools
    }

    pub fn mode(&self) -> AskMode {
        self.mode
    }

    pub fn has_reasoning(&self) -> bool {
        self.service.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Types most relevant to `query`, best first.
    pub async fn search_codebase(&self, query: &str) -> Vec<ScoredType> {
        let keywords = extract_keywords(self.service.as_ref(), query, self.max_keywords).await;
        if keywords.is_empty() {
            return Vec::new();
        }
        rank(self.registry.get_all(), &keywords, self.rank_limit)
    }

    /// An iterative agent sharing this agent's tools and settings.
    pub fn iterative_agent(&self) -> Result<IterativeCodebaseAgent, AgentError> {
        let service = self.service.clone().ok_or(AgentError::NoReasoningClient)?;
        let agent = IterativeCodebaseAgent::new(service, self.tools.clone())
            .with_max_iterations(self.max_iterations);
        Ok(match self.call_timeout {
            Some(timeout) => agent.with_call_timeout(timeout),
            None => agent,
        })
    }

    /// Answer `query` using the configured mode.
    pub async fn ask(&self, query: &str) -> Result<AskResponse, AgentError> {
        let service = self.service.as_ref().ok_or(AgentError::NoReasoningClient)?;
        let _guard = BusyGuard::acquire(&self.busy)?;
        info!(mode = %self.mode, service = %service.describe(), "Answering question");

        match self.mode {
            AskMode::Simple => {
                let context = self.search_codebase(query).await;
                let messages = answer_messages(query, &context);
                let answer = service
                    .respond_within(&messages, ResponseMode::Answer, self.call_timeout)
                    .await?;
                Ok(AskResponse {
                    mode: AskMode::Simple,
                    context,
                    trace: Vec::new(),
                    answer,
                })
            }
            AskMode::Iterative => {
                let trace: Vec<StatusEvent> =
                    self.iterative_agent()?.solve(query).collect().await;
                let answer = trace
                    .iter()
                    .rev()
                    .find(|e| e.is_final())
                    .map(|e| e.content.clone())
                    .unwrap_or_default();
                Ok(AskResponse {
                    mode: AskMode::Iterative,
                    context: Vec::new(),
                    trace,
                    answer,
                })
            }
        }
    }

    /// Simple-mode answer delivered as text fragments.
    pub async fn answer_stream(&self, query: &str) -> Result<AnswerStream, AgentError> {
        let service = self.service.as_ref().ok_or(AgentError::NoReasoningClient)?;
        let guard = BusyGuard::acquire(&self.busy)?;
        let context = self.search_codebase(query).await;
        let messages = answer_messages(query, &context);
        let fragments = service
            .respond_stream(&messages, ResponseMode::Answer)
            .await?
            .map(move |fragment| {
                let _held = &guard;
                fragment
            })
            .boxed();
        Ok(AnswerStream { context, fragments })
    }

    /// Iterative exploration as a live event stream.
    ///
    /// The agent stays busy until the stream is finished or dropped.
    pub fn explore(&self, query: &str) -> Result<BoxStream<'static, StatusEvent>, AgentError> {
        let agent = self.iterative_agent()?;
        let guard = BusyGuard::acquire(&self.busy)?;
        Ok(agent
            .solve(query)
            .map(move |event| {
                let _held = &guard;
                event
            })
            .boxed())
    }
}

impl std::fmt::Debug for CodebaseAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodebaseAgent")
            .field("registry", &self.registry)
            .field("service", &self.service)
            .field("mode", &self.mode)
            .field("max_iterations", &self.max_iterations)
            .field("busy", &self.is_busy())
            .finish()
    }
}

fn answer_messages(query: &str, context: &[ScoredType]) -> Vec<Message> {
    let rendered = render_context(context.iter().map(|s| s.registered.as_ref()));
    vec![
        Message::system(prompt::answer_system_prompt(&rendered)),
        Message::user(query),
    ]
}

/// Clears the busy flag when dropped.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, AgentError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AgentError::Busy)?;
        Ok(Self(flag.clone()))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;
    use crate::test_helpers::{ScriptedCompleter, SequentialMockProvider, sample_registry};
    use async_trait::async_trait;
    use tokio::sync::Notify;
    use typescout_core::reasoning::{ChatSettings, Completion, PromptCompleter};

    #[tokio::test]
    async fn search_without_service_uses_local_keywords() {
        let agent = CodebaseAgent::new(sample_registry());
        let ranked = agent.search_codebase("How do I reset a password?").await;
        assert_eq!(ranked[0].registered.name(), "UserService");
    }

    #[tokio::test]
    async fn search_with_only_stop_words_is_empty() {
        let agent = CodebaseAgent::new(sample_registry());
        assert!(agent.search_codebase("how do I").await.is_empty());
    }

    #[tokio::test]
    async fn ask_requires_reasoning() {
        let agent = CodebaseAgent::new(sample_registry());
        assert!(matches!(
            agent.ask("anything").await,
            Err(AgentError::NoReasoningClient)
        ));
        assert!(matches!(
            agent.explore("anything"),
            Err(AgentError::NoReasoningClient)
        ));
    }

    #[tokio::test]
    async fn simple_mode_grounds_answer_in_context() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "email, send",
            "Call EmailService.send(to, body).",
        ]));
        let agent = CodebaseAgent::new(sample_registry()).with_reasoning(ReasoningService::chat(
            provider.clone(),
            ChatSettings::new("mock-model"),
        ));

        let response = agent.ask("How do I send mail?").await.unwrap();
        assert_eq!(response.mode, AskMode::Simple);
        assert_eq!(response.answer, "Call EmailService.send(to, body).");
        assert_eq!(response.context[0].registered.name(), "EmailService");
        assert!(response.trace.is_empty());

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!((requests[0].temperature - 0.3).abs() < f32::EPSILON);
        assert!((requests[1].temperature - 0.7).abs() < f32::EPSILON);
        let system = &requests[1].messages[0].content;
        assert!(system.contains("## app.email.EmailService"));
        assert_eq!(requests[1].messages[1].content, "How do I send mail?");
        assert!(!agent.is_busy());
    }

    #[tokio::test]
    async fn iterative_mode_returns_trace() {
        let completer = Arc::new(ScriptedCompleter::new([
            r#"ACTION: TOOL: get_type_details(type_path="app.auth.AuthService")"#,
            "ACTION: ANSWER: Use AuthService.authenticate.",
        ]));
        let agent = CodebaseAgent::new(sample_registry())
            .with_reasoning(ReasoningService::Callable(completer))
            .with_mode(AskMode::Iterative);

        let response = agent.ask("How do users log in?").await.unwrap();
        assert_eq!(response.answer, "Use AuthService.authenticate.");
        assert!(response.context.is_empty());
        assert_eq!(response.trace.last().unwrap().kind, StatusKind::FinalAnswer);
        let observation = response
            .trace
            .iter()
            .find(|e| e.kind == StatusKind::Observation)
            .unwrap();
        assert!(observation.content.contains("\"authenticate\""));
    }

    struct GatedCompleter {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl PromptCompleter for GatedCompleter {
        async fn complete(
            &self,
            _prompt: &str,
            _context: Option<&str>,
        ) -> Result<Completion, ProviderError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(Completion::Text("ACTION: ANSWER: finally".into()))
        }
    }

    #[tokio::test]
    async fn second_question_while_busy_is_rejected() {
        let gate = Arc::new(GatedCompleter {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let agent = Arc::new(
            CodebaseAgent::new(sample_registry())
                .with_reasoning(ReasoningService::Callable(gate.clone()))
                .with_mode(AskMode::Iterative),
        );

        let first = tokio::spawn({
            let agent = agent.clone();
            async move { agent.ask("first").await }
        });
        gate.entered.notified().await;

        assert!(agent.is_busy());
        assert!(matches!(agent.ask("second").await, Err(AgentError::Busy)));

        gate.release.notify_one();
        let answer = first.await.unwrap().unwrap().answer;
        assert_eq!(answer, "finally");
        assert!(!agent.is_busy());
    }

    #[tokio::test]
    async fn explore_holds_busy_until_dropped() {
        let completer = Arc::new(ScriptedCompleter::new(["ACTION: ANSWER: ok"]));
        let agent = CodebaseAgent::new(sample_registry())
            .with_reasoning(ReasoningService::Callable(completer));

        let events = agent.explore("q").unwrap();
        assert!(agent.is_busy());
        assert!(matches!(agent.explore("again"), Err(AgentError::Busy)));
        drop(events);
        assert!(!agent.is_busy());
    }

    #[tokio::test]
    async fn streamed_answer() {
        let completer = Arc::new(ScriptedCompleter::new(["auth", "Use AuthService."]));
        let agent = CodebaseAgent::new(sample_registry())
            .with_reasoning(ReasoningService::Callable(completer));

        let stream = agent.answer_stream("login?").await.unwrap();
        assert_eq!(stream.context[0].registered.name(), "AuthService");
        let text: Vec<String> = stream.fragments.map(|f| f.unwrap()).collect().await;
        assert_eq!(text.concat(), "Use AuthService.");
        assert!(!agent.is_busy());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Iterative".parse::<AskMode>().unwrap(), AskMode::Iterative);
        assert_eq!("simple".parse::<AskMode>().unwrap(), AskMode::Simple);
        assert!("fast".parse::<AskMode>().is_err());
    }
}
