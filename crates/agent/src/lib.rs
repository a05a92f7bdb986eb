//! Codebase question answering for typescout.
//!
//! - [`IterativeCodebaseAgent`]: think → act → observe over the tool
//!   catalog, reported as a stream of [`StatusEvent`]s
//! - [`CodebaseAgent`]: keyword ranking plus a single grounded answer, or
//!   a delegated iterative run

pub mod action;
pub mod codebase;
pub mod context;
pub mod error;
pub mod iterative;
pub mod keywords;
pub mod prompt;
pub mod status;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use action::{Action, ActionError, ToolInvocation, parse_action};
pub use codebase::{AnswerStream, AskMode, AskResponse, CodebaseAgent};
pub use context::render_context;
pub use error::AgentError;
pub use iterative::{DEFAULT_MAX_ITERATIONS, IterativeCodebaseAgent};
pub use keywords::{MAX_KEYWORDS, extract_keywords};
pub use status::{StatusEvent, StatusKind};
