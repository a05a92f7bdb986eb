//! `search_methods_in_type` — methods of one type matching a query.

use crate::args;
use crate::type_details::MethodDetail;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use typescout_core::error::ToolError;
use typescout_core::tool::{Envelope, Tool, ToolResult};
use typescout_index::TypeRegistry;

pub struct SearchMethodsTool {
    registry: Arc<TypeRegistry>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct MethodMatches {
    pub type_path: String,
    pub query: String,
    pub count: usize,
    pub methods: Vec<MethodDetail>,
}

impl SearchMethodsTool {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn search(&self, type_path: &str, query: &str) -> Envelope<MethodMatches> {
        let Some(ty) = self.registry.get(type_path) else {
            return Envelope::error(format!("Type '{type_path}' not found"));
        };
        let methods: Vec<MethodDetail> = ty
            .search_methods(query)
            .into_iter()
            .map(|(name, info)| MethodDetail::new(name, info))
            .collect();
        Envelope::Success(MethodMatches {
            type_path: type_path.to_string(),
            query: query.to_string(),
            count: methods.len(),
            methods,
        })
    }
}

#[async_trait]
impl Tool for SearchMethodsTool {
    fn name(&self) -> &str {
        "search_methods_in_type"
    }

    fn description(&self) -> &str {
        "Search for specific methods within a type."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type_path": {
                    "type": "string",
                    "description": "Full path of the type to search in"
                },
                "query": {
                    "type": "string",
                    "description": "Text to match against method names and docstrings"
                }
            },
            "required": ["type_path", "query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&arguments, &["type_path", "query"])?;
        let type_path = args::required_str(args, "type_path")?;
        let query = args::required_str(args, "query")?;
        Ok(ToolResult::from_envelope(self.search(&type_path, &query).to_value()))
    }
}
