//! Shared test helpers for agent tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use typescout_core::error::ProviderError;
use typescout_core::message::Message;
use typescout_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use typescout_core::reasoning::{Completion, PromptCompleter};
use typescout_index::{TypeMetadata, TypeRegistry};
use typescout_tools::AgentTools;

/// A completer that replays scripted responses and records every call.
///
/// Panics when the script runs out, unless built with
/// [`repeating`](Self::repeating) or [`failing`](Self::failing).
pub struct ScriptedCompleter {
    responses: Mutex<VecDeque<String>>,
    fallback: Option<Result<String, ProviderError>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedCompleter {
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with the same text.
    pub fn repeating(text: &str) -> Self {
        Self {
            fallback: Some(Ok(text.to_string())),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Fails every call.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            fallback: Some(Err(error)),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// `(prompt, context)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PromptCompleter for ScriptedCompleter {
    async fn complete(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<Completion, ProviderError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((prompt.to_string(), context.map(str::to_string)));
            calls.len()
        };
        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            return Ok(Completion::Text(next));
        }
        match &self.fallback {
            Some(result) => result.clone().map(Completion::Text),
            None => panic!("ScriptedCompleter: no more responses (call #{call})"),
        }
    }
}

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue and
/// records the request. Panics if more calls are made than responses
/// provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| make_text_response(t)).collect())
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let count = requests.len();

        if count >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                count,
                responses.len()
            );
        }

        requests.push(request);
        Ok(responses[count].clone())
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Four types across models, services, auth and email.
pub fn sample_registry() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());
    registry.register(
        TypeMetadata::builder("app.models", "User")
            .docstring("A registered user account")
            .method("save", "(self)", "Persist the user")
            .property("full_name", "First and last name")
            .build(),
        ["model", "database"],
        "",
    );
    registry.register(
        TypeMetadata::builder("app.services", "UserService")
            .docstring("Business logic for accounts")
            .method("create_user", "(self, name, email)", "Create a new account")
            .method("reset_password", "(self, user_id)", "Send a password reset email")
            .build(),
        ["service"],
        "Prefer this over touching User directly",
    );
    registry.register(
        TypeMetadata::builder("app.auth", "AuthService")
            .docstring("Authenticates users and manages sessions")
            .method("authenticate", "(self, username, password)", "Check credentials")
            .method("logout", "(self, session_id)", "End a session")
            .build(),
        ["service", "auth"],
        "",
    );
    registry.register(
        TypeMetadata::builder("app.email", "EmailService")
            .docstring("Sends transactional mail")
            .method("send", "(self, to, body)", "Deliver a message")
            .build(),
        ["service", "util"],
        "",
    );
    registry
}

pub fn sample_tools() -> AgentTools {
    AgentTools::new(sample_registry())
}
