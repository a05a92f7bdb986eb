//! Progress events emitted by the iterative agent.
//!
//! A run emits, per iteration, `iteration_start` → `thinking` → one of
//! `action` + `observation`, `parse_error`, or `final_answer`. Every run
//! ends with exactly one `final_answer`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    IterationStart,
    Thinking,
    Action,
    Observation,
    ParseError,
    FinalAnswer,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IterationStart => "iteration_start",
            Self::Thinking => "thinking",
            Self::Action => "action",
            Self::Observation => "observation",
            Self::ParseError => "parse_error",
            Self::FinalAnswer => "final_answer",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    #[serde(rename = "type")]
    pub kind: StatusKind,
    pub content: String,
    /// 1-based iteration the event belongs to.
    pub iteration: usize,
    /// Set on a final answer synthesized after the iteration ceiling.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub forced: bool,
}

impl StatusEvent {
    pub fn new(kind: StatusKind, content: impl Into<String>, iteration: usize) -> Self {
        Self {
            kind,
            content: content.into(),
            iteration,
            forced: false,
        }
    }

    pub fn forced_answer(content: impl Into<String>, iteration: usize) -> Self {
        Self {
            forced: true,
            ..Self::new(StatusKind::FinalAnswer, content, iteration)
        }
    }

    pub fn is_final(&self) -> bool {
        self.kind == StatusKind::FinalAnswer
    }
}
