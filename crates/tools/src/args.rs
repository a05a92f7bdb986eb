//! Lenient argument readers.
//!
//! Arguments arrive from the action grammar or straight from JSON, so the
//! readers accept the shapes a language model plausibly produces: `null`
//! for "not given", numbers written as strings, a single tag instead of a
//! list.

use serde_json::{Map, Value};
use typescout_core::error::ToolError;

/// The argument object. `null` counts as no arguments.
pub(crate) fn object<'a>(
    arguments: &'a Value,
    allowed: &[&str],
) -> Result<Option<&'a Map<String, Value>>, ToolError> {
    let map = match arguments {
        Value::Null => return Ok(None),
        Value::Object(map) => map,
        other => {
            return Err(ToolError::InvalidArguments(format!(
                "arguments must be an object, got {other}"
            )));
        }
    };
    if let Some(unknown) = map.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ToolError::InvalidArguments(format!(
            "unexpected argument '{unknown}'"
        )));
    }
    Ok(Some(map))
}

fn lookup<'a>(args: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    args.and_then(|m| m.get(key)).filter(|v| !v.is_null())
}

pub(crate) fn optional_str(
    args: Option<&Map<String, Value>>,
    key: &str,
) -> Result<Option<String>, ToolError> {
    match lookup(args, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(other) => Err(ToolError::InvalidArguments(format!(
            "'{key}' must be a string, got {other}"
        ))),
    }
}

pub(crate) fn required_str(
    args: Option<&Map<String, Value>>,
    key: &str,
) -> Result<String, ToolError> {
    optional_str(args, key)?
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing required argument '{key}'")))
}

/// A non-negative count, given as an integer or a numeric string.
pub(crate) fn optional_count(
    args: Option<&Map<String, Value>>,
    key: &str,
) -> Result<Option<usize>, ToolError> {
    let invalid = |v: &Value| {
        ToolError::InvalidArguments(format!("'{key}' must be a non-negative integer, got {v}"))
    };
    match lookup(args, key) {
        None => Ok(None),
        Some(v @ Value::Number(n)) => n
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| invalid(v)),
        Some(v @ Value::String(s)) => s
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| invalid(v)),
        Some(other) => Err(invalid(other)),
    }
}

/// A list of strings; a single string is a one-element list.
pub(crate) fn optional_str_list(
    args: Option<&Map<String, Value>>,
    key: &str,
) -> Result<Option<Vec<String>>, ToolError> {
    match lookup(args, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(vec![s.clone()])),
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(ToolError::InvalidArguments(format!(
                    "'{key}' must contain strings, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(ToolError::InvalidArguments(format!(
            "'{key}' must be a list of strings, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_arguments_are_empty() {
        assert!(object(&Value::Null, &["query"]).unwrap().is_none());
        assert!(object(&json!([1]), &["query"]).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = object(&json!({"qeury": "x"}), &["query"]).unwrap_err();
        assert!(err.to_string().contains("unexpected argument 'qeury'"));
    }

    #[test]
    fn counts_accept_numeric_strings() {
        let args = json!({"a": 3, "b": "7", "c": null, "d": -1, "e": "lots"});
        let map = object(&args, &["a", "b", "c", "d", "e"]).unwrap();
        assert_eq!(optional_count(map, "a").unwrap(), Some(3));
        assert_eq!(optional_count(map, "b").unwrap(), Some(7));
        assert_eq!(optional_count(map, "c").unwrap(), None);
        assert_eq!(optional_count(map, "missing").unwrap(), None);
        assert!(optional_count(map, "d").is_err());
        assert!(optional_count(map, "e").is_err());
    }

    #[test]
    fn string_lists_accept_single_strings() {
        let args = json!({"one": "api", "many": ["api", null, "db"], "bad": [1]});
        let map = object(&args, &["one", "many", "bad"]).unwrap();
        assert_eq!(optional_str_list(map, "one").unwrap(), Some(vec!["api".into()]));
        assert_eq!(
            optional_str_list(map, "many").unwrap(),
            Some(vec!["api".into(), "db".into()])
        );
        assert!(optional_str_list(map, "bad").is_err());
    }

    #[test]
    fn required_strings() {
        let args = json!({"type_path": "a.B", "n": 5});
        let map = object(&args, &["type_path", "n", "query"]).unwrap();
        assert_eq!(required_str(map, "type_path").unwrap(), "a.B");
        assert_eq!(required_str(map, "n").unwrap(), "5");
        assert!(required_str(map, "query").is_err());
    }
}
