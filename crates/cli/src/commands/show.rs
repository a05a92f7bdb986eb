//! `typescout show` — everything about one type.

use super::Session;
use crate::GlobalArgs;
use typescout_core::tool::Envelope;
use typescout_tools::TypeDetailsTool;
use typescout_tools::type_details::TypeDetails;

pub async fn run(global: &GlobalArgs, path: String) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(global)?;
    match TypeDetailsTool::new(session.registry.clone()).details(&path) {
        Envelope::Success(details) => {
            print!("{}", render(&details));
            Ok(())
        }
        Envelope::Error { message } => Err(message.into()),
    }
}

fn render(details: &TypeDetails) -> String {
    let mut out = format!("{}\n", details.path);
    let tags: Vec<&str> = details.tags.iter().map(|t| t.as_str()).collect();
    out.push_str(&format!("  tags: {}\n", tags.join(", ")));
    if !details.bases.is_empty() {
        out.push_str(&format!("  bases: {}\n", details.bases.join(", ")));
    }
    if details.is_abstract {
        out.push_str("  abstract\n");
    }
    if !details.docstring.is_empty() {
        out.push_str(&format!("\n  {}\n", details.docstring));
    }
    if !details.instructions.is_empty() {
        out.push_str(&format!("\n  Notes: {}\n", details.instructions));
    }

    if !details.methods.is_empty() {
        out.push_str("\nMethods:\n");
        for m in &details.methods {
            let kind = if m.is_classmethod {
                "@classmethod "
            } else if m.is_staticmethod {
                "@staticmethod "
            } else {
                ""
            };
            out.push_str(&format!("  {kind}{}{}\n", m.name, m.signature));
            if !m.docstring.is_empty() {
                out.push_str(&format!("      {}\n", m.docstring));
            }
        }
    }

    if !details.properties.is_empty() {
        out.push_str("\nProperties:\n");
        for p in &details.properties {
            let access = if p.has_setter { "rw" } else { "ro" };
            out.push_str(&format!("  {} ({access})  {}\n", p.name, p.docstring));
        }
    }

    if !details.attributes.is_empty() {
        out.push_str("\nAttributes:\n");
        for (name, attr) in &details.attributes {
            match &attr.type_hint {
                Some(hint) => out.push_str(&format!("  {name}: {hint} = {}\n", attr.value)),
                None => out.push_str(&format!("  {name} = {}\n", attr.value)),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use typescout_index::{TypeMetadata, TypeRegistry};
    use std::sync::Arc;

    #[test]
    fn renders_members() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(
            TypeMetadata::builder("app.models", "User")
                .docstring("A registered user account")
                .classmethod("from_row", "(cls, row)", "Build from a database row")
                .property("full_name", "First and last name")
                .attribute("TABLE", "'users'", Some("str"))
                .build(),
            ["model"],
            "",
        );
        let Envelope::Success(details) = TypeDetailsTool::new(registry).details("app.models.User")
        else {
            panic!("expected details");
        };
        let text = render(&details);
        assert!(text.starts_with("app.models.User\n  tags: model\n"));
        assert!(text.contains("  @classmethod from_row(cls, row)\n      Build from a database row\n"));
        assert!(text.contains("  full_name (ro)  First and last name\n"));
        assert!(text.contains("  TABLE: str = 'users'\n"));
    }
}
