//! `list_all_tags` — tag usage across the registry.

use crate::args;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use typescout_core::error::ToolError;
use typescout_core::tool::{Envelope, Tool, ToolResult};
use typescout_index::{Tag, TypeRegistry};

pub struct ListTagsTool {
    registry: Arc<TypeRegistry>,
}

#[derive(Debug, Serialize)]
pub struct TagUsage {
    pub tag: Tag,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TagListing {
    pub total_unique_tags: usize,
    pub tags: Vec<TagUsage>,
}

impl ListTagsTool {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn listing(&self) -> TagListing {
        let tags: Vec<TagUsage> = self
            .registry
            .tag_counts()
            .into_iter()
            .map(|(tag, count)| TagUsage { tag, count })
            .collect();
        TagListing {
            total_unique_tags: tags.len(),
            tags,
        }
    }
}

#[async_trait]
impl Tool for ListTagsTool {
    fn name(&self) -> &str {
        "list_all_tags"
    }

    fn description(&self) -> &str {
        "List all available tags in the codebase with usage counts."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        args::object(&arguments, &[])?;
        Ok(ToolResult::from_envelope(Envelope::Success(self.listing()).to_value()))
    }
}
