//! Chat-completion providers for typescout.
//!
//! All providers implement the `typescout_core::Provider` trait.
//! [`build_from_config`] picks one from configuration.

pub mod factory;
pub mod openai_compat;

pub use factory::{build_from_config, reasoning_from_config};
pub use openai_compat::OpenAiCompatProvider;
