//! `get_type_count` — registry size, overall and per module.

use crate::args;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use typescout_core::error::ToolError;
use typescout_core::tool::{Envelope, Tool, ToolResult};
use typescout_index::TypeRegistry;

pub struct TypeCountTool {
    registry: Arc<TypeRegistry>,
}

#[derive(Debug, Serialize)]
pub struct TypeCount {
    pub total_types: usize,
    pub types_by_module: BTreeMap<String, usize>,
}

impl TypeCountTool {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn count(&self) -> TypeCount {
        let types_by_module = self.registry.types_by_module();
        TypeCount {
            total_types: types_by_module.values().sum(),
            types_by_module,
        }
    }
}

#[async_trait]
impl Tool for TypeCountTool {
    fn name(&self) -> &str {
        "get_type_count"
    }

    fn description(&self) -> &str {
        "Get total count of indexed types in the registry."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        args::object(&arguments, &[])?;
        Ok(ToolResult::from_envelope(Envelope::Success(self.count()).to_value()))
    }
}
