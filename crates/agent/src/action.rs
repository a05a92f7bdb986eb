//! The action grammar.
//!
//! Every reasoning step must contain exactly one action line:
//!
//! ```text
//! THINKING: I should look for authentication types first.
//! ACTION: TOOL: search_types(query="auth", tags=["service", 'api'], limit=3)
//! ```
//!
//! or
//!
//! ```text
//! ACTION: ANSWER: Use `AuthService.authenticate` ...
//! ```
//!
//! The first line whose trimmed text starts with `ACTION:` is used. An
//! answer runs from after `ANSWER:` to the end of the response. A tool call
//! is `name(key=value, ...)`, where the argument list spans the first `(`
//! to the last `)` on the line.
//!
//! Values:
//! - `"text"` or `'text'` (with `\"`, `\'` and `\\` escapes) → string
//! - `true` / `false`, any case → bool
//! - `42`, `-7` → integer
//! - `null` / `none`, any case → null
//! - `[a, "b", 'c']` → list of strings
//! - anything else → the bare text as a string

use serde_json::{Map, Value};
use thiserror::Error;

const ACTION_MARKER: &str = "ACTION:";
const ANSWER_DIRECTIVE: &str = "ANSWER:";
const TOOL_DIRECTIVE: &str = "TOOL:";

/// A parsed action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Answer(String),
    Tool(ToolInvocation),
}

/// A tool name with its typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn arguments_value(&self) -> Value {
        Value::Object(self.arguments.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no line starting with ACTION: was found")]
    MissingAction,

    #[error("unknown action '{0}', expected TOOL: or ANSWER:")]
    UnknownDirective(String),

    #[error("malformed tool call '{0}', expected tool_name(arg=\"value\", ...)")]
    MalformedToolCall(String),

    #[error("malformed argument '{0}', expected name=value")]
    MalformedArgument(String),

    #[error("unterminated quote in '{0}'")]
    UnterminatedQuote(String),

    #[error("unbalanced brackets in '{0}'")]
    UnbalancedBrackets(String),
}

/// Extract the action from a reasoning-service response.
pub fn parse_action(response: &str) -> Result<Action, ActionError> {
    let mut lines = response.lines();
    let action_line = lines
        .by_ref()
        .find(|line| line.trim_start().starts_with(ACTION_MARKER))
        .ok_or(ActionError::MissingAction)?;
    let rest = action_line.trim()[ACTION_MARKER.len()..].trim();

    if let Some(first) = strip_directive(rest, ANSWER_DIRECTIVE) {
        let mut answer = first.to_string();
        for line in lines {
            answer.push('\n');
            answer.push_str(line);
        }
        return Ok(Action::Answer(answer.trim().to_string()));
    }

    if let Some(call) = strip_directive(rest, TOOL_DIRECTIVE) {
        return parse_tool_call(call.trim()).map(Action::Tool);
    }

    Err(ActionError::UnknownDirective(rest.to_string()))
}

fn strip_directive<'a>(text: &'a str, directive: &str) -> Option<&'a str> {
    let head = text.get(..directive.len())?;
    head.eq_ignore_ascii_case(directive)
        .then(|| &text[directive.len()..])
}

/// Parse `name(key=value, ...)`.
pub fn parse_tool_call(call: &str) -> Result<ToolInvocation, ActionError> {
    let malformed = || ActionError::MalformedToolCall(call.to_string());
    let open = call.find('(').ok_or_else(malformed)?;
    let close = call.rfind(')').filter(|&c| c > open).ok_or_else(malformed)?;

    let name = call[..open].trim();
    if !is_identifier(name) {
        return Err(malformed());
    }

    let mut arguments = Map::new();
    for segment in split_top_level(&call[open + 1..close])? {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, raw) = segment
            .split_once('=')
            .ok_or_else(|| ActionError::MalformedArgument(segment.to_string()))?;
        let (key, raw) = (key.trim(), raw.trim());
        if !is_identifier(key) || raw.is_empty() {
            return Err(ActionError::MalformedArgument(segment.to_string()));
        }
        arguments.insert(key.to_string(), parse_value(raw)?);
    }

    Ok(ToolInvocation {
        name: name.to_string(),
        arguments,
    })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Split on commas that sit outside quotes and brackets.
fn split_top_level(input: &str) -> Result<Vec<&str>, ActionError> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth: usize = 0;

    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ActionError::UnbalancedBrackets(input.to_string()))?;
            }
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(ActionError::UnterminatedQuote(input.to_string()));
    }
    if depth != 0 {
        return Err(ActionError::UnbalancedBrackets(input.to_string()));
    }
    parts.push(&input[start..]);
    Ok(parts)
}

fn parse_value(raw: &str) -> Result<Value, ActionError> {
    if raw.starts_with('"') || raw.starts_with('\'') {
        return parse_quoted(raw).map(Value::String);
    }

    if let Some(inner) = raw.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| ActionError::UnbalancedBrackets(raw.to_string()))?;
        let mut items = Vec::new();
        for item in split_top_level(inner)? {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let text = if item.starts_with('"') || item.starts_with('\'') {
                parse_quoted(item)?
            } else {
                item.to_string()
            };
            items.push(Value::String(text));
        }
        return Ok(Value::Array(items));
    }

    let lowered = raw.to_ascii_lowercase();
    match lowered.as_str() {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "null" | "none" => return Ok(Value::Null),
        _ => {}
    }

    if is_integer(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Ok(Value::from(n));
        }
    }

    Ok(Value::String(raw.to_string()))
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Unquote a string literal that must span all of `raw`.
fn parse_quoted(raw: &str) -> Result<String, ActionError> {
    let mut chars = raw.char_indices();
    let Some((_, quote)) = chars.next() else {
        return Err(ActionError::MalformedArgument(raw.to_string()));
    };

    let mut text = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            match c {
                '"' | '\'' | '\\' => text.push(c),
                'n' => text.push('\n'),
                't' => text.push('\t'),
                other => {
                    text.push('\\');
                    text.push(other);
                }
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            if !raw[i + c.len_utf8()..].trim().is_empty() {
                return Err(ActionError::MalformedArgument(raw.to_string()));
            }
            return Ok(text);
        } else {
            text.push(c);
        }
    }
    Err(ActionError::UnterminatedQuote(raw.to_string()))
}
