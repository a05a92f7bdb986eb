//! Markdown context handed to the one-shot answer prompt.

use std::fmt::Write;
use typescout_index::RegisteredType;

const MAX_METHODS: usize = 5;
const MAX_PROPERTIES: usize = 3;
const METHOD_DOC_CHARS: usize = 100;
const PROPERTY_DOC_CHARS: usize = 80;

pub const NO_CONTEXT: &str = "No relevant code found in the indexed codebase.";

/// Render ranked types as a markdown briefing.
pub fn render_context<'a>(types: impl IntoIterator<Item = &'a RegisteredType>) -> String {
    let mut types = types.into_iter().peekable();
    if types.peek().is_none() {
        return NO_CONTEXT.to_string();
    }

    let mut out = String::from(
        "# Relevant Code from Indexed Codebase\n\n\
         The following types and their methods are relevant to your question:\n\n",
    );

    for ty in types {
        let _ = writeln!(out, "## {}", ty.path());
        let tags: Vec<&str> = ty.tags().iter().map(|t| t.as_str()).collect();
        let _ = writeln!(out, "**Tags:** {}", tags.join(", "));
        if !ty.docstring().is_empty() {
            let _ = writeln!(out, "**Description:** {}", ty.docstring());
        }
        if !ty.instructions().is_empty() {
            let _ = writeln!(out, "**Notes:** {}", ty.instructions());
        }

        if !ty.methods().is_empty() {
            out.push_str("\n### Methods:\n");
            for (name, info) in ty.methods().iter().take(MAX_METHODS) {
                let signature = info.signature.as_deref().unwrap_or("()");
                let _ = write!(out, "- `{name}{signature}`");
                if !info.docstring.is_empty() {
                    let _ = write!(out, ": {}", clip(&info.docstring, METHOD_DOC_CHARS));
                }
                out.push('\n');
            }
        }

        if !ty.properties().is_empty() {
            out.push_str("\n### Properties:\n");
            for (name, info) in ty.properties().iter().take(MAX_PROPERTIES) {
                let _ = writeln!(
                    out,
                    "- `{name}`: {}",
                    clip(&info.docstring, PROPERTY_DOC_CHARS)
                );
            }
        }

        out.push('\n');
    }

    out
}

fn clip(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
