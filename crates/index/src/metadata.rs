//! Type metadata and the extractor contract.
//!
//! [`TypeMetadata`] is the fixed schema every registered type is reduced to.
//! How it is produced is up to the caller: implement [`MetadataExtractor`]
//! for some source representation, implement [`Indexable`] on a Rust type, or
//! describe types in a catalog file. Names starting with `_` are private and
//! never make it into the metadata.

use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub is_classmethod: bool,
    #[serde(default)]
    pub is_staticmethod: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub has_setter: bool,
    #[serde(default)]
    pub has_deleter: bool,
}

/// A class-level constant or field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    /// Rendered value (e.g. `"'admin'"`, `"30"`).
    pub value: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// Everything the registry knows about one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetadata {
    /// `"{module}.{qualname}"`, the registry key.
    pub path: String,
    pub name: String,
    pub qualname: String,
    pub module: String,
    pub docstring: String,
    /// Paths of base types.
    pub bases: Vec<String>,
    pub methods: BTreeMap<String, MethodInfo>,
    pub properties: BTreeMap<String, PropertyInfo>,
    pub attributes: BTreeMap<String, AttributeInfo>,
    pub is_abstract: bool,
}

impl TypeMetadata {
    pub fn builder(module: impl Into<String>, name: impl Into<String>) -> TypeMetadataBuilder {
        TypeMetadataBuilder::new(module, name)
    }

    /// Join a module and qualified name into a registry path.
    pub fn path_of(module: &str, qualname: &str) -> String {
        if module.is_empty() {
            qualname.to_string()
        } else {
            format!("{module}.{qualname}")
        }
    }
}

fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}

/// Fluent construction of [`TypeMetadata`].
#[derive(Debug, Clone)]
pub struct TypeMetadataBuilder {
    module: String,
    name: String,
    qualname: Option<String>,
    docstring: String,
    bases: Vec<String>,
    methods: BTreeMap<String, MethodInfo>,
    properties: BTreeMap<String, PropertyInfo>,
    attributes: BTreeMap<String, AttributeInfo>,
    is_abstract: bool,
}

impl TypeMetadataBuilder {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            qualname: None,
            docstring: String::new(),
            bases: Vec::new(),
            methods: BTreeMap::new(),
            properties: BTreeMap::new(),
            attributes: BTreeMap::new(),
            is_abstract: false,
        }
    }

    /// Override the qualified name (defaults to the simple name).
    pub fn qualname(mut self, qualname: impl Into<String>) -> Self {
        self.qualname = Some(qualname.into());
        self
    }

    pub fn docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = docstring.into();
        self
    }

    pub fn base(mut self, path: impl Into<String>) -> Self {
        self.bases.push(path.into());
        self
    }

    pub fn is_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn method(self, name: &str, signature: &str, docstring: &str) -> Self {
        self.method_info(
            name,
            MethodInfo {
                docstring: docstring.to_string(),
                signature: Some(signature.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn classmethod(self, name: &str, signature: &str, docstring: &str) -> Self {
        self.method_info(
            name,
            MethodInfo {
                docstring: docstring.to_string(),
                signature: Some(signature.to_string()),
                is_classmethod: true,
                is_staticmethod: false,
            },
        )
    }

    pub fn staticmethod(self, name: &str, signature: &str, docstring: &str) -> Self {
        self.method_info(
            name,
            MethodInfo {
                docstring: docstring.to_string(),
                signature: Some(signature.to_string()),
                is_classmethod: false,
                is_staticmethod: true,
            },
        )
    }

    pub fn method_info(mut self, name: &str, info: MethodInfo) -> Self {
        if is_public(name) {
            self.methods.insert(name.to_string(), info);
        }
        self
    }

    /// A read-only property.
    pub fn property(self, name: &str, docstring: &str) -> Self {
        self.property_info(
            name,
            PropertyInfo {
                docstring: docstring.to_string(),
                ..Default::default()
            },
        )
    }

    pub fn property_info(mut self, name: &str, info: PropertyInfo) -> Self {
        if is_public(name) {
            self.properties.insert(name.to_string(), info);
        }
        self
    }

    pub fn attribute(mut self, name: &str, value: &str, type_hint: Option<&str>) -> Self {
        if is_public(name) {
            self.attributes.insert(
                name.to_string(),
                AttributeInfo {
                    value: value.to_string(),
                    type_hint: type_hint.map(str::to_string),
                },
            );
        }
        self
    }

    pub fn build(self) -> TypeMetadata {
        let qualname = self.qualname.unwrap_or_else(|| self.name.clone());
        TypeMetadata {
            path: TypeMetadata::path_of(&self.module, &qualname),
            name: self.name,
            qualname,
            module: self.module,
            docstring: self.docstring,
            bases: self.bases,
            methods: self.methods,
            properties: self.properties,
            attributes: self.attributes,
            is_abstract: self.is_abstract,
        }
    }
}

/// Produces [`TypeMetadata`] from some representation of a type.
pub trait MetadataExtractor {
    type Source: ?Sized;

    fn extract(&self, source: &Self::Source) -> Result<TypeMetadata, IndexError>;
}

/// A Rust type that describes itself for the registry.
pub trait Indexable {
    fn type_metadata() -> TypeMetadata;

    fn type_path() -> String {
        Self::type_metadata().path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_computes_path() {
        let meta = TypeMetadata::builder("app.models", "User")
            .docstring("User model")
            .build();
        assert_eq!(meta.path, "app.models.User");
        assert_eq!(meta.qualname, "User");

        let nested = TypeMetadata::builder("app.models", "Meta")
            .qualname("User.Meta")
            .build();
        assert_eq!(nested.path, "app.models.User.Meta");
        assert_eq!(nested.name, "Meta");
    }

    #[test]
    fn builder_skips_private_members() {
        let meta = TypeMetadata::builder("app", "Cache")
            .method("get", "(self, key)", "Fetch a value")
            .method("_evict", "(self)", "internal")
            .property("size", "Entries held")
            .property("__dict__", "")
            .attribute("MAX", "100", Some("int"))
            .attribute("_lock", "<lock>", None)
            .build();

        assert_eq!(meta.methods.len(), 1);
        assert!(meta.methods.contains_key("get"));
        assert_eq!(meta.properties.len(), 1);
        assert_eq!(meta.attributes.len(), 1);
        assert_eq!(meta.attributes["MAX"].type_hint.as_deref(), Some("int"));
    }

    #[test]
    fn method_kinds() {
        let meta = TypeMetadata::builder("app", "User")
            .classmethod("from_dict", "(cls, data)", "")
            .staticmethod("validate_email", "(email)", "")
            .build();
        assert!(meta.methods["from_dict"].is_classmethod);
        assert!(meta.methods["validate_email"].is_staticmethod);
        assert!(!meta.methods["validate_email"].is_classmethod);
    }

    #[test]
    fn empty_module_path_is_qualname() {
        assert_eq!(TypeMetadata::path_of("", "Loose"), "Loose");
    }

    struct Probe;

    impl Indexable for Probe {
        fn type_metadata() -> TypeMetadata {
            TypeMetadata::builder("tests", "Probe").build()
        }
    }

    #[test]
    fn indexable_type_path() {
        assert_eq!(Probe::type_path(), "tests.Probe");
    }
}
