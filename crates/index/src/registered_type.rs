//! Immutable registry entries.

use crate::metadata::{AttributeInfo, MethodInfo, PropertyInfo, TypeMetadata};
use crate::tag::Tag;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A registered type: extracted metadata plus caller-supplied tags and
/// instructions. Never mutated once built; re-registering a path replaces
/// the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredType {
    #[serde(flatten)]
    metadata: TypeMetadata,
    tags: Vec<Tag>,
    instructions: String,
}

impl RegisteredType {
    /// Build a snapshot. Duplicate tags are dropped, first appearance wins.
    pub fn new<T: Into<Tag>>(
        metadata: TypeMetadata,
        tags: impl IntoIterator<Item = T>,
        instructions: impl Into<String>,
    ) -> Self {
        let mut unique: Vec<Tag> = Vec::new();
        for tag in tags.into_iter().map(Into::into) {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self {
            metadata,
            tags: unique,
            instructions: instructions.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.metadata.path
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn qualname(&self) -> &str {
        &self.metadata.qualname
    }

    pub fn module(&self) -> &str {
        &self.metadata.module
    }

    pub fn docstring(&self) -> &str {
        &self.metadata.docstring
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn bases(&self) -> &[String] {
        &self.metadata.bases
    }

    pub fn methods(&self) -> &BTreeMap<String, MethodInfo> {
        &self.metadata.methods
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyInfo> {
        &self.metadata.properties
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeInfo> {
        &self.metadata.attributes
    }

    pub fn is_abstract(&self) -> bool {
        self.metadata.is_abstract
    }

    pub fn metadata(&self) -> &TypeMetadata {
        &self.metadata
    }

    pub fn has_tag(&self, tag: impl AsRef<str>) -> bool {
        let wanted = tag.as_ref();
        self.tags.iter().any(|t| t.as_str() == wanted)
    }

    /// False for an empty list.
    pub fn has_any_tag<T: AsRef<str>>(&self, tags: &[T]) -> bool {
        tags.iter().any(|t| self.has_tag(t))
    }

    /// True for an empty list.
    pub fn has_all_tags<T: AsRef<str>>(&self, tags: &[T]) -> bool {
        tags.iter().all(|t| self.has_tag(t))
    }

    /// Methods whose name or docstring contains `query`, ignoring case.
    pub fn search_methods(&self, query: &str) -> BTreeMap<&str, &MethodInfo> {
        let needle = query.to_lowercase();
        self.metadata
            .methods
            .iter()
            .filter(|(name, info)| matches_member(name, &info.docstring, &needle))
            .map(|(name, info)| (name.as_str(), info))
            .collect()
    }

    /// Properties whose name or docstring contains `query`, ignoring case.
    pub fn search_properties(&self, query: &str) -> BTreeMap<&str, &PropertyInfo> {
        let needle = query.to_lowercase();
        self.metadata
            .properties
            .iter()
            .filter(|(name, info)| matches_member(name, &info.docstring, &needle))
            .map(|(name, info)| (name.as_str(), info))
            .collect()
    }

    /// Full JSON dump, tags and instructions included.
    pub fn to_summary(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn matches_member(name: &str, docstring: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle) || docstring.to_lowercase().contains(needle)
}

impl fmt::Display for RegisteredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.module())
    }
}
