//! Catalog files.
//!
//! A catalog describes types declaratively so a codebase can be indexed
//! without any reflection. TOML and JSON are both accepted; the format is
//! picked from the file extension (`.json` → JSON, anything else → TOML).
//!
//! ```toml
//! name = "shop"
//!
//! [[types]]
//! module = "shop.models"
//! name = "User"
//! docstring = "User model"
//! tags = ["model", "database"]
//!
//! [types.methods.save]
//! signature = "(self)"
//! docstring = "Persist the user"
//! ```

use crate::error::IndexError;
use crate::metadata::{AttributeInfo, MetadataExtractor, MethodInfo, PropertyInfo, TypeMetadata};
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// One type as written in a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub qualname: Option<String>,
    #[serde(default)]
    pub docstring: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub methods: BTreeMap<String, MethodInfo>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyInfo>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeInfo>,
}

/// Turns [`TypeDescriptor`]s into metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorExtractor;

impl MetadataExtractor for DescriptorExtractor {
    type Source = TypeDescriptor;

    fn extract(&self, source: &TypeDescriptor) -> Result<TypeMetadata, IndexError> {
        if !is_identifier(&source.name) {
            return Err(IndexError::InvalidDescriptor(format!(
                "'{}' in module '{}' is not a valid type name",
                source.name, source.module
            )));
        }

        let mut builder = TypeMetadata::builder(&source.module, &source.name)
            .docstring(&source.docstring)
            .is_abstract(source.is_abstract);
        if let Some(qualname) = &source.qualname {
            builder = builder.qualname(qualname);
        }
        for base in &source.bases {
            builder = builder.base(base);
        }
        for (name, info) in &source.methods {
            builder = builder.method_info(name, info.clone());
        }
        for (name, info) in &source.properties {
            builder = builder.property_info(name, info.clone());
        }
        for (name, info) in &source.attributes {
            builder = builder.attribute(name, &info.value, info.type_hint.as_deref());
        }
        Ok(builder.build())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl Catalog {
    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = std::fs::read_to_string(path).map_err(|e| IndexError::CatalogRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        parsed.map_err(|reason| IndexError::CatalogParse {
            path: path.display().to_string(),
            reason,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_json_str(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Register every descriptor. Nothing is registered if any descriptor
    /// is invalid.
    pub fn register_all(&self, registry: &TypeRegistry) -> Result<usize, IndexError> {
        let extractor = DescriptorExtractor;
        let extracted = self
            .types
            .iter()
            .map(|d| extractor.extract(d).map(|meta| (meta, d)))
            .collect::<Result<Vec<_>, _>>()?;

        for (metadata, descriptor) in extracted {
            registry.register(
                metadata,
                descriptor.tags.iter().map(String::as_str),
                descriptor.instructions.as_str(),
            );
        }

        info!(
            catalog = self.name.as_deref().unwrap_or("unnamed"),
            types = self.types.len(),
            "Registered catalog"
        );
        Ok(self.types.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
name = "shop"

[[types]]
module = "shop.models"
name = "User"
docstring = "User model"
tags = ["model", "database"]
bases = ["shop.models.Base"]

[types.methods.save]
signature = "(self)"
docstring = "Persist the user"

[types.methods._validate]
signature = "(self)"

[types.properties.full_name]
docstring = "First and last name"

[types.attributes.TABLE]
value = "'users'"
type = "str"

[[types]]
module = "shop.services"
name = "UserService"
instructions = "Entry point for account management"
tags = ["service"]
"#;

    #[test]
    fn parses_toml_catalog() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.name.as_deref(), Some("shop"));
        assert_eq!(catalog.types.len(), 2);
        assert_eq!(catalog.types[0].methods["save"].signature.as_deref(), Some("(self)"));
        assert_eq!(
            catalog.types[0].attributes["TABLE"].type_hint.as_deref(),
            Some("str")
        );
    }

    #[test]
    fn registers_all_descriptors() {
        let registry = TypeRegistry::new();
        let count = Catalog::from_toml_str(SAMPLE)
            .unwrap()
            .register_all(&registry)
            .unwrap();
        assert_eq!(count, 2);

        let user = registry.get("shop.models.User").unwrap();
        assert!(user.has_all_tags(&["model", "database"]));
        assert_eq!(user.bases(), &["shop.models.Base".to_string()]);
        // private members are filtered
        assert_eq!(user.methods().len(), 1);
        assert_eq!(user.properties()["full_name"].docstring, "First and last name");

        let service = registry.get("shop.services.UserService").unwrap();
        assert_eq!(service.instructions(), "Entry point for account management");
    }

    #[test]
    fn invalid_descriptor_registers_nothing() {
        let catalog = Catalog {
            name: None,
            types: vec![
                TypeDescriptor {
                    module: "ok".into(),
                    name: "Fine".into(),
                    ..Default::default()
                },
                TypeDescriptor {
                    module: "bad".into(),
                    name: "not a name".into(),
                    ..Default::default()
                },
            ],
        };
        let registry = TypeRegistry::new();
        let err = catalog.register_all(&registry).unwrap_err();
        assert!(matches!(err, IndexError::InvalidDescriptor(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn loads_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"types": [{{"module": "m", "name": "T", "tags": ["util"]}}]}}"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.types[0].name, "T");
        assert_eq!(catalog.types[0].tags, vec!["util"]);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let missing = Catalog::load(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(missing, IndexError::CatalogRead { .. }));

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[[types]]\nname = 3").unwrap();
        let malformed = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(malformed, IndexError::CatalogParse { .. }));
    }

    #[test]
    fn demo_catalog_registers() {
        let catalog =
            Catalog::from_toml_str(include_str!("../../../demos/sample_catalog.toml")).unwrap();
        let registry = TypeRegistry::new();
        assert_eq!(catalog.register_all(&registry).unwrap(), 8);

        let user = registry.get("app.models.User").unwrap();
        assert!(user.has_all_tags(&["model", "auth"]));
        assert_eq!(user.bases(), ["app.models.BaseModel"]);
        assert_eq!(user.attributes()["TABLE"].type_hint.as_deref(), Some("str"));
        assert!(registry.get("app.models.BaseModel").unwrap().methods()["get"].is_classmethod);
    }
}
