//! # typescout core
//!
//! Domain types, traits, and error definitions shared by every typescout
//! crate. Nothing here knows about the type registry or the agent loop; it
//! defines the seams they plug into.
//!
//! ## Design Philosophy
//!
//! Every external capability is a trait or a closed enum here:
//! - [`Provider`] for chat-completion backends
//! - [`PromptCompleter`] for plain `(prompt, context) -> text` callables
//! - [`ReasoningService`] choosing between the two once, at construction
//! - [`Tool`] for the named query operations the agent may invoke

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, ToolError};
pub use message::{Message, Role, render_transcript};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
pub use reasoning::{
    ChatSettings, Completion, FnCompleter, PromptCompleter, ReasoningService, ResponseMode,
    SamplingSettings,
};
pub use tool::{
    Envelope, Tool, ToolDefinition, ToolRegistry, ToolResult, error_envelope,
};
