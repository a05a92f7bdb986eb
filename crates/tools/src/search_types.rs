//! `search_types` — find types by free text and tags.

use crate::args;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use typescout_core::error::ToolError;
use typescout_core::tool::{Envelope, Tool, ToolResult};
use typescout_index::{RegisteredType, Tag, TypeRegistry};

pub const DEFAULT_LIMIT: usize = 5;
const DOCSTRING_PREVIEW_CHARS: usize = 200;

pub struct SearchTypesTool {
    registry: Arc<TypeRegistry>,
    default_limit: usize,
}

#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub path: String,
    pub module: String,
    pub docstring: String,
    pub tags: Vec<Tag>,
    pub method_count: usize,
    pub property_count: usize,
}

impl TypeSummary {
    fn from_registered(ty: &RegisteredType) -> Self {
        Self {
            name: ty.name().to_string(),
            path: ty.path().to_string(),
            module: ty.module().to_string(),
            docstring: preview(ty.docstring()),
            tags: ty.tags().to_vec(),
            method_count: ty.methods().len(),
            property_count: ty.properties().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchTypesOutput {
    pub count: usize,
    pub results: Vec<TypeSummary>,
    pub query: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn preview(docstring: &str) -> String {
    if docstring.chars().count() > DOCSTRING_PREVIEW_CHARS {
        let head: String = docstring.chars().take(DOCSTRING_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        docstring.to_string()
    }
}

impl SearchTypesTool {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// Map each requested tag onto a tag present in the registry: exact
    /// text first, then ignoring case. Tags with no counterpart are dropped;
    /// if none resolve, the search runs without a tag filter.
    fn resolve_tags(&self, requested: &[String]) -> Vec<Tag> {
        let known: Vec<Tag> = self
            .registry
            .tag_counts()
            .into_iter()
            .map(|(tag, _)| tag)
            .collect();
        requested
            .iter()
            .filter_map(|wanted| {
                known
                    .iter()
                    .find(|t| t.as_str() == wanted)
                    .or_else(|| known.iter().find(|t| t.as_str().eq_ignore_ascii_case(wanted)))
                    .cloned()
            })
            .collect()
    }

    pub fn search(
        &self,
        query: Option<String>,
        tags: Option<Vec<String>>,
        limit: Option<usize>,
    ) -> SearchTypesOutput {
        let resolved = self.resolve_tags(tags.as_deref().unwrap_or_default());
        let results: Vec<TypeSummary> = self
            .registry
            .search(query.as_deref(), &resolved, false)
            .iter()
            .take(limit.unwrap_or(self.default_limit))
            .map(|t| TypeSummary::from_registered(t))
            .collect();

        SearchTypesOutput {
            count: results.len(),
            results,
            query,
            tags,
        }
    }
}

#[async_trait]
impl Tool for SearchTypesTool {
    fn name(&self) -> &str {
        "search_types"
    }

    fn description(&self) -> &str {
        "Search for types by query text or tags. Use this to find relevant classes."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Text to look for in type names, docstrings, instructions and modules"
                },
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only return types carrying at least one of these tags"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results",
                    "default": self.default_limit
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args = args::object(&arguments, &["query", "tags", "limit"])?;
        let query = args::optional_str(args, "query")?;
        let tags = args::optional_str_list(args, "tags")?;
        let limit = args::optional_count(args, "limit")?;

        let output = self.search(query, tags, limit);
        Ok(ToolResult::from_envelope(Envelope::Success(output).to_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typescout_index::TypeMetadata;

    fn registry() -> Arc<TypeRegistry> {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(
            TypeMetadata::builder("app.auth", "AuthService")
                .docstring("Handles authentication")
                .method("login", "(self, username, password)", "")
                .build(),
            ["Service", "auth"],
            "",
        );
        registry.register(
            TypeMetadata::builder("app.auth", "Token")
                .docstring(&"x".repeat(250))
                .property("expires_at", "")
                .build(),
            ["auth"],
            "",
        );
        registry.register(
            TypeMetadata::builder("app.mail", "Mailer").build(),
            ["service"],
            "",
        );
        registry
    }

    #[tokio::test]
    async fn limit_truncates_results() {
        let tool = SearchTypesTool::new(registry());
        let result = tool
            .execute(json!({"query": "app", "limit": 2}))
            .await
            .unwrap();
        let data = result.data.unwrap();
        assert!(result.success);
        assert_eq!(data["status"], "success");
        assert_eq!(data["count"], 2);
        assert_eq!(data["query"], "app");
        assert!(data["tags"].is_null());
    }

    #[tokio::test]
    async fn summaries_are_trimmed() {
        let tool = SearchTypesTool::new(registry());
        let data = tool
            .execute(json!({"query": "token"}))
            .await
            .unwrap()
            .data
            .unwrap();
        let summary = &data["results"][0];
        assert_eq!(summary["path"], "app.auth.Token");
        assert_eq!(summary["docstring"].as_str().unwrap().len(), 203);
        assert!(summary["docstring"].as_str().unwrap().ends_with("..."));
        assert_eq!(summary["property_count"], 1);
        assert_eq!(summary["method_count"], 0);
    }

    #[test]
    fn tags_resolve_exact_then_case_insensitive() {
        let tool = SearchTypesTool::new(registry());
        let resolved = tool.resolve_tags(&["service".into(), "AUTH".into(), "ghost".into()]);
        assert_eq!(resolved, vec![Tag::new("service"), Tag::new("auth")]);

        let resolved = tool.resolve_tags(&["SERVICE".into()]);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0] == "Service" || resolved[0] == "service");
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let tool = SearchTypesTool::new(registry());
        let output = tool.search(None, Some(vec!["ghost".into()]), Some(10));
        assert_eq!(output.count, 3);
        assert_eq!(output.tags, Some(vec!["ghost".to_string()]));

        let output = tool.search(None, Some(vec!["ghost".into(), "service".into()]), Some(10));
        let names: Vec<&str> = output.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Mailer"]);
    }

    #[test]
    fn tag_filter_is_any_match() {
        let tool = SearchTypesTool::new(registry());
        let output = tool.search(None, Some(vec!["Service".into(), "auth".into()]), Some(10));
        let names: Vec<&str> = output.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["AuthService", "Token"]);
    }

    #[tokio::test]
    async fn limit_as_string_is_accepted() {
        let tool = SearchTypesTool::new(registry());
        let data = tool
            .execute(json!({"limit": "1", "tags": "auth"}))
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(data["count"], 1);
        assert_eq!(data["tags"], json!(["auth"]));
    }

    #[tokio::test]
    async fn bad_limit_is_an_error() {
        let tool = SearchTypesTool::new(registry());
        let err = tool.execute(json!({"limit": "many"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
