//! `get_type_details` — full dump of one registered type.

use crate::args;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use typescout_core::error::ToolError;
use typescout_core::tool::{Envelope, Tool, ToolResult};
use typescout_index::{AttributeInfo, MethodInfo, RegisteredType, Tag, TypeRegistry};

pub struct TypeDetailsTool {
    registry: Arc<TypeRegistry>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct MethodDetail {
    pub name: String,
    pub signature: String,
    pub docstring: String,
    pub is_classmethod: bool,
    pub is_staticmethod: bool,
}

impl MethodDetail {
    pub(crate) fn new(name: &str, info: &MethodInfo) -> Self {
        Self {
            name: name.to_string(),
            signature: info.signature.clone().unwrap_or_else(|| "()".to_string()),
            docstring: info.docstring.clone(),
            is_classmethod: info.is_classmethod,
            is_staticmethod: info.is_staticmethod,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertyDetail {
    pub name: String,
    pub docstring: String,
    pub has_setter: bool,
    pub has_deleter: bool,
}

#[derive(Debug, Serialize)]
pub struct TypeDetails {
    pub name: String,
    pub path: String,
    pub module: String,
    pub docstring: String,
    pub instructions: String,
    pub tags: Vec<Tag>,
    pub bases: Vec<String>,
    pub is_abstract: bool,
    pub methods: Vec<MethodDetail>,
    pub properties: Vec<PropertyDetail>,
    pub attributes: BTreeMap<String, AttributeInfo>,
}

impl From<&RegisteredType> for TypeDetails {
    fn from(ty: &RegisteredType) -> Self {
        Self {
            name: ty.name().to_string(),
            path: ty.path().to_string(),
            module: ty.module().to_string(),
            docstring: ty.docstring().to_string(),
            instructions: ty.instructions().to_string(),
            tags: ty.tags().to_vec(),
            bases: ty.bases().to_vec(),
            is_abstract: ty.is_abstract(),
            methods: ty
                .methods()
                .iter()
                .map(|(name, info)| MethodDetail::new(name, info))
                .collect(),
            properties: ty
                .properties()
                .iter()
                .map(|(name, info)| PropertyDetail {
                    name: name.clone(),
                    docstring: info.docstring.clone(),
                    has_setter: info.has_setter,
                    has_deleter: info.has_deleter,
                })
                .collect(),
            attributes: ty.attributes().clone(),
        }
    }
}

impl TypeDetailsTool {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn details(&self, type_path: &str) -> Envelope<TypeDetails> {
        match self.registry.get(type_path) {
            Some(ty) => Envelope::Success(TypeDetails::from(ty.as_ref())),
            None => Envelope::error(format!("Type '{type_path}' not found in registry")),
        }
    }
}

#[async_trait]
impl Tool for TypeDetailsTool {
    fn name(&self) -> &str {
        "get_type_details"
    }

    fn description(&self) -> &str {
        "Get complete details about a specific type including all methods and properties."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type_path": {
                    "type": "string",
                    "description": "Full path of the type, e.g. \"app.models.User\""
                }
            },
            "required": ["type_path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&arguments, &["type_path"])?;
        let type_path = args::required_str(args, "type_path")?;
        Ok(ToolResult::from_envelope(self.details(&type_path).to_value()))
    }
}
