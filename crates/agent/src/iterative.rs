//! Iterative think-act-observe exploration.
//!
//! Each iteration asks the reasoning service for a step, parses its
//! `ACTION:` line and either finishes with the answer or dispatches the
//! named tool and feeds the envelope back as an observation. When the
//! iteration ceiling is reached without an answer, one last call in answer
//! mode synthesizes a final answer from the transcript.
//!
//! Progress is exposed as a lazy stream of [`StatusEvent`]s. Nothing runs
//! until the stream is polled, and dropping it stops the run.

use crate::action::{Action, ToolInvocation, parse_action};
use crate::prompt;
use crate::status::{StatusEvent, StatusKind};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use typescout_core::message::Message;
use typescout_core::reasoning::{ReasoningService, ResponseMode};
use typescout_tools::AgentTools;

pub const DEFAULT_MAX_ITERATIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct IterativeCodebaseAgent {
    service: ReasoningService,
    tools: Arc<AgentTools>,
    max_iterations: usize,
    call_timeout: Option<Duration>,
}

impl IterativeCodebaseAgent {
    pub fn new(service: ReasoningService, tools: Arc<AgentTools>) -> Self {
        Self {
            service,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            call_timeout: None,
        }
    }

    /// Set the iteration ceiling. Values below 1 are raised to 1.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Bound every reasoning call.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn system_prompt(&self) -> String {
        prompt::exploration_system_prompt(&self.tools.describe())
    }

    /// Explore the registry to answer `query`, reporting each step.
    ///
    /// The stream always ends with exactly one `final_answer` event.
    pub fn solve(&self, query: &str) -> BoxStream<'static, StatusEvent> {
        info!(
            service = %self.service.describe(),
            max_iter = self.max_iterations,
            "Exploration loop starting"
        );
        let run = Run {
            transcript: vec![
                Message::system(self.system_prompt()),
                Message::user(prompt::question(query)),
            ],
            agent: self.clone(),
            iteration: 0,
            tool_calls: 0,
            phase: Phase::Start,
        };
        stream::unfold(run, Run::step).boxed()
    }

    /// Run [`solve`](Self::solve) to completion and return the answer text.
    pub async fn answer(&self, query: &str) -> String {
        let mut events = self.solve(query);
        while let Some(event) = events.next().await {
            if event.is_final() {
                return event.content;
            }
        }
        String::new()
    }

    async fn reason(&self, transcript: &[Message], mode: ResponseMode) -> String {
        match self
            .service
            .respond_within(transcript, mode, self.call_timeout)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Reasoning call failed");
                format!("Error calling reasoning service: {e}")
            }
        }
    }
}

enum Phase {
    Start,
    Think,
    Act(String),
    Dispatch {
        invocation: ToolInvocation,
        response: String,
    },
    ForceNotice,
    Forced,
    Done,
}

struct Run {
    agent: IterativeCodebaseAgent,
    transcript: Vec<Message>,
    iteration: usize,
    tool_calls: usize,
    phase: Phase,
}

impl Run {
    async fn step(mut self) -> Option<(StatusEvent, Self)> {
        let phase = std::mem::replace(&mut self.phase, Phase::Done);
        let event = match phase {
            Phase::Done => return None,

            Phase::Start => {
                self.iteration += 1;
                debug!(iteration = self.iteration, "Exploration iteration");
                self.phase = Phase::Think;
                self.event(
                    StatusKind::IterationStart,
                    format!("Iteration {}/{}", self.iteration, self.agent.max_iterations),
                )
            }

            // ── Call the reasoning service ──
            Phase::Think => {
                let response = self
                    .agent
                    .reason(&self.transcript, ResponseMode::Thinking)
                    .await;
                self.phase = Phase::Act(response.clone());
                self.event(StatusKind::Thinking, response)
            }

            // ── Parse the action ──
            Phase::Act(response) => match parse_action(&response) {
                Ok(Action::Answer(answer)) => {
                    info!(
                        iterations = self.iteration,
                        tool_calls = self.tool_calls,
                        "Exploration loop completed"
                    );
                    self.event(StatusKind::FinalAnswer, answer)
                }
                Ok(Action::Tool(invocation)) => {
                    let content = format!(
                        "Using tool: {} with args: {}",
                        invocation.name,
                        invocation.arguments_value()
                    );
                    self.phase = Phase::Dispatch {
                        invocation,
                        response,
                    };
                    self.event(StatusKind::Action, content)
                }
                Err(e) => {
                    warn!(iteration = self.iteration, error = %e, "Unparseable action");
                    self.transcript.push(Message::assistant(response));
                    self.transcript
                        .push(Message::user(prompt::parse_correction(&e.to_string())));
                    self.phase = self.after_iteration();
                    self.event(StatusKind::ParseError, e.to_string())
                }
            },

            // ── Execute the tool ──
            Phase::Dispatch {
                invocation,
                response,
            } => {
                let envelope = self
                    .agent
                    .tools
                    .dispatch(&invocation.name, invocation.arguments_value())
                    .await;
                self.tool_calls += 1;
                self.transcript.push(Message::assistant(response));
                self.transcript
                    .push(Message::user(prompt::observation(&envelope)));
                let content = serde_json::to_string_pretty(&envelope)
                    .unwrap_or_else(|_| envelope.to_string());
                self.phase = self.after_iteration();
                self.event(StatusKind::Observation, content)
            }

            Phase::ForceNotice => {
                warn!(
                    "Exploration: max iterations reached ({})",
                    self.agent.max_iterations
                );
                self.transcript
                    .push(Message::user(prompt::FORCED_SYNTHESIS_REQUEST));
                self.phase = Phase::Forced;
                self.event(StatusKind::Thinking, prompt::FORCED_SYNTHESIS_NOTICE)
            }

            Phase::Forced => {
                let answer = self
                    .agent
                    .reason(&self.transcript, ResponseMode::Answer)
                    .await;
                info!(
                    iterations = self.iteration,
                    tool_calls = self.tool_calls,
                    "Exploration loop completed with forced answer"
                );
                StatusEvent::forced_answer(answer, self.iteration)
            }
        };
        Some((event, self))
    }

    fn after_iteration(&self) -> Phase {
        if self.iteration >= self.agent.max_iterations {
            Phase::ForceNotice
        } else {
            Phase::Start
        }
    }

    fn event(&self, kind: StatusKind, content: impl Into<String>) -> StatusEvent {
        StatusEvent::new(kind, content, self.iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedCompleter, sample_tools};
    use typescout_core::error::ProviderError;

    fn agent(completer: &Arc<ScriptedCompleter>) -> IterativeCodebaseAgent {
        IterativeCodebaseAgent::new(
            ReasoningService::Callable(completer.clone()),
            Arc::new(sample_tools()),
        )
    }

    fn kinds(events: &[StatusEvent]) -> Vec<StatusKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[tokio::test]
    async fn direct_answer() {
        let completer = Arc::new(ScriptedCompleter::new(["THINKING: easy\nACTION: ANSWER: 42"]));
        let events: Vec<_> = agent(&completer).solve("What is it?").collect().await;

        assert_eq!(
            kinds(&events),
            vec![
                StatusKind::IterationStart,
                StatusKind::Thinking,
                StatusKind::FinalAnswer
            ]
        );
        assert_eq!(events[0].content, "Iteration 1/5");
        assert_eq!(events[2].content, "42");
        assert!(!events[2].forced);
    }

    #[tokio::test]
    async fn tool_then_answer() {
        let completer = Arc::new(ScriptedCompleter::new([
            r#"THINKING: search first
ACTION: TOOL: search_types(query="user", limit=2)"#,
            "THINKING: found it\nACTION: ANSWER: Use UserService.create_user",
        ]));
        let agent = agent(&completer);
        let events: Vec<_> = agent.solve("How do I create a user?").collect().await;

        assert_eq!(
            kinds(&events),
            vec![
                StatusKind::IterationStart,
                StatusKind::Thinking,
                StatusKind::Action,
                StatusKind::Observation,
                StatusKind::IterationStart,
                StatusKind::Thinking,
                StatusKind::FinalAnswer
            ]
        );
        assert_eq!(
            events[2].content,
            r#"Using tool: search_types with args: {"limit":2,"query":"user"}"#
        );
        let observation: serde_json::Value = serde_json::from_str(&events[3].content).unwrap();
        assert_eq!(observation["status"], "success");
        assert_eq!(observation["count"], 2);
        assert_eq!(events[6].iteration, 2);

        // Second call sees the raw step and the observation.
        let calls = completer.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].0.starts_with("OBSERVATION: {"));
        let context = calls[1].1.as_deref().unwrap();
        assert!(context.contains("Question: How do I create a user?"));
        assert!(context.contains(r#"ACTION: TOOL: search_types(query="user", limit=2)"#));
        assert!(context.contains("You have access to the following tools:"));
    }

    #[tokio::test]
    async fn forced_synthesis_at_ceiling() {
        let completer = Arc::new(ScriptedCompleter::new([
            "THINKING: look around\nACTION: TOOL: list_all_tags()",
            "Users are created by UserService.",
        ]));
        let events: Vec<_> = agent(&completer)
            .with_max_iterations(1)
            .solve("users?")
            .collect()
            .await;

        assert_eq!(
            kinds(&events),
            vec![
                StatusKind::IterationStart,
                StatusKind::Thinking,
                StatusKind::Action,
                StatusKind::Observation,
                StatusKind::Thinking,
                StatusKind::FinalAnswer
            ]
        );
        assert_eq!(events[4].content, prompt::FORCED_SYNTHESIS_NOTICE);
        let last = events.last().unwrap();
        assert!(last.forced);
        assert_eq!(last.iteration, 1);
        assert_eq!(last.content, "Users are created by UserService.");
        assert_eq!(completer.calls()[1].0, prompt::FORCED_SYNTHESIS_REQUEST);
    }

    #[tokio::test]
    async fn parse_error_then_recovery() {
        let completer = Arc::new(ScriptedCompleter::new([
            "I think the answer is obvious.",
            "THINKING: fixed\nACTION: ANSWER: done",
        ]));
        let events: Vec<_> = agent(&completer).solve("q").collect().await;

        assert_eq!(events[2].kind, StatusKind::ParseError);
        assert!(events[2].content.contains("ACTION:"));
        assert_eq!(events.last().unwrap().content, "done");
        assert!(completer.calls()[1].0.starts_with("Your last response could not be parsed"));
    }

    #[tokio::test]
    async fn unknown_tool_is_observed_not_fatal() {
        let completer = Arc::new(ScriptedCompleter::new([
            "ACTION: TOOL: delete_everything()",
            "ACTION: ANSWER: cannot",
        ]));
        let events: Vec<_> = agent(&completer).solve("q").collect().await;
        assert!(events[3].content.contains("Unknown tool: delete_everything"));
        assert_eq!(events.last().unwrap().content, "cannot");
    }

    #[tokio::test]
    async fn never_answering_service_is_bounded() {
        let completer = Arc::new(ScriptedCompleter::repeating(
            "THINKING: more\nACTION: TOOL: get_type_count()",
        ));
        let events: Vec<_> = agent(&completer)
            .with_max_iterations(3)
            .solve("q")
            .collect()
            .await;

        let starts = events
            .iter()
            .filter(|e| e.kind == StatusKind::IterationStart)
            .count();
        assert_eq!(starts, 3);
        assert_eq!(events.iter().filter(|e| e.is_final()).count(), 1);
        assert!(events.last().unwrap().forced);
        // three steps plus the forced synthesis
        assert_eq!(completer.calls().len(), 4);
    }

    #[tokio::test]
    async fn service_errors_become_content() {
        let completer = Arc::new(ScriptedCompleter::failing(ProviderError::Network(
            "connection refused".into(),
        )));
        let events: Vec<_> = agent(&completer)
            .with_max_iterations(1)
            .solve("q")
            .collect()
            .await;

        assert_eq!(events[1].kind, StatusKind::Thinking);
        assert!(events[1].content.starts_with("Error calling reasoning service: "));
        assert_eq!(events[2].kind, StatusKind::ParseError);
        let last = events.last().unwrap();
        assert!(last.forced);
        assert!(last.content.contains("connection refused"));
    }

    #[tokio::test]
    async fn zero_iterations_clamped() {
        let completer = Arc::new(ScriptedCompleter::new(["ACTION: ANSWER: ok"]));
        let agent = agent(&completer).with_max_iterations(0);
        assert_eq!(agent.max_iterations(), 1);
        assert_eq!(agent.answer("q").await, "ok");
    }

    #[tokio::test]
    async fn lazy_until_polled() {
        let completer = Arc::new(ScriptedCompleter::new(["ACTION: ANSWER: ok"]));
        let mut events = agent(&completer).solve("q");
        assert!(completer.calls().is_empty());
        let first = events.next().await.unwrap();
        assert_eq!(first.kind, StatusKind::IterationStart);
        assert!(completer.calls().is_empty());
        drop(events);
        assert!(completer.calls().is_empty());
    }
}
