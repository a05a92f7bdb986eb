//! The agent's tool catalog.
//!
//! Five read-only queries over a shared [`TypeRegistry`], in the order they
//! are presented to the reasoning service:
//!
//! 1. `search_types` — free text + tag search
//! 2. `get_type_details` — everything about one type
//! 3. `search_methods_in_type` — method search inside one type
//! 4. `list_all_tags` — tag usage counts
//! 5. `get_type_count` — registry size by module
//!
//! Every tool answers with an envelope. [`AgentTools::dispatch`] never
//! fails: unknown tools and bad arguments come back as error envelopes.

mod args;
pub mod list_tags;
pub mod search_methods;
pub mod search_types;
pub mod type_count;
pub mod type_details;

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use typescout_core::tool::{ToolDefinition, ToolRegistry};
use typescout_index::TypeRegistry;

pub use list_tags::ListTagsTool;
pub use search_methods::SearchMethodsTool;
pub use search_types::SearchTypesTool;
pub use type_count::TypeCountTool;
pub use type_details::TypeDetailsTool;

/// The fixed tool catalog bound to one registry.
pub struct AgentTools {
    registry: Arc<TypeRegistry>,
    tools: ToolRegistry,
}

impl AgentTools {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_search_limit(registry, search_types::DEFAULT_LIMIT)
    }

    /// Like [`new`](Self::new), with a different default `limit` for
    /// `search_types`.
    pub fn with_search_limit(registry: Arc<TypeRegistry>, limit: usize) -> Self {
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(
            SearchTypesTool::new(registry.clone()).with_default_limit(limit),
        ));
        tools.register(Box::new(TypeDetailsTool::new(registry.clone())));
        tools.register(Box::new(SearchMethodsTool::new(registry.clone())));
        tools.register(Box::new(ListTagsTool::new(registry.clone())));
        tools.register(Box::new(TypeCountTool::new(registry.clone())));
        Self { registry, tools }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.names()
    }

    /// One line per tool: `- name: description (args: ...)`.
    pub fn describe(&self) -> String {
        self.definitions()
            .iter()
            .map(|d| {
                format!(
                    "- {}: {} (args: {})",
                    d.name,
                    d.description,
                    d.argument_summary()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Run a tool by name and return its envelope.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Value {
        debug!(tool = name, %arguments, "Dispatching tool");
        self.tools.dispatch(name, arguments).await
    }
}

impl std::fmt::Debug for AgentTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTools")
            .field("tools", &self.tools.names())
            .field("registry", &self.registry)
            .finish()
    }
}
