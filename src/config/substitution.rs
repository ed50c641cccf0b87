//! `${NAME}` placeholder substitution
//!
//! Every string in a document is scanned for `${NAME}` tokens, which are
//! replaced by the value of the process environment variable `NAME`. A single
//! unresolved reference fails the whole substitution.

use crate::domain::errors::ConfigError;
use crate::domain::result::Result;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes placeholders from the process environment
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] naming the first undefined variable.
pub fn substitute_env_vars(document: &Value) -> Result<Value> {
    substitute_with(document, &|name| std::env::var(name).ok())
}

/// Substitutes placeholders using `lookup` to resolve names
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] if `lookup` yields nothing for a
/// referenced name.
pub fn substitute_with<F>(document: &Value, lookup: &F) -> Result<Value>
where
    F: Fn(&str) -> Option<String>,
{
    match document {
        Value::String(s) => substitute_str(s, lookup).map(Value::String),
        Value::Array(items) => items
            .iter()
            .map(|item| substitute_with(item, lookup))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), substitute_with(value, lookup)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

/// Names of every placeholder referenced in `input`
pub fn placeholders(input: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(input)
        .map(|cap| cap[1].to_string())
        .collect()
}

fn substitute_str<F>(input: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(missing) = placeholders(input)
        .into_iter()
        .find(|name| lookup(name).is_none())
    {
        return Err(ConfigError::MissingEnvVar(missing).into());
    }

    let replaced = placeholder_regex().replace_all(input, |cap: &Captures<'_>| {
        lookup(&cap[1]).unwrap_or_default()
    });
    Ok(replaced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::McpError;
    use serde_json::json;

    fn vars(name: &str) -> Option<String> {
        match name {
            "FOO" => Some("bar".to_string()),
            "HOST" => Some("memory.example.com".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_substitutes_whole_string() {
        let doc = json!({"token": "${FOO}"});
        assert_eq!(substitute_with(&doc, &vars).unwrap(), json!({"token": "bar"}));
    }

    #[test]
    fn test_substitutes_inside_string() {
        let doc = json!("https://${HOST}/api?key=${FOO}");
        assert_eq!(
            substitute_with(&doc, &vars).unwrap(),
            json!("https://memory.example.com/api?key=bar")
        );
    }

    #[test]
    fn test_walks_arrays_and_nested_objects() {
        let doc = json!({"servers": {"a": {"headers": {"X": "${FOO}"}}}, "list": ["${FOO}", 1]});
        let out = substitute_with(&doc, &vars).unwrap();
        assert_eq!(out["servers"]["a"]["headers"]["X"], "bar");
        assert_eq!(out["list"], json!(["bar", 1]));
    }

    #[test]
    fn test_non_strings_pass_through() {
        let doc = json!({"n": 5, "b": true, "z": null, "f": 1.5});
        assert_eq!(substitute_with(&doc, &vars).unwrap(), doc);
    }

    #[test]
    fn test_missing_variable_fails_with_name() {
        let doc = json!({"ok": "${FOO}", "bad": "${NOPE_NOT_SET}"});
        let err = substitute_with(&doc, &vars).unwrap_err();
        match err {
            McpError::Config(ConfigError::MissingEnvVar(name)) => {
                assert_eq!(name, "NOPE_NOT_SET")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unmatched_syntax_left_alone() {
        let doc = json!("cost is $5 and {FOO} and ${ not a var }");
        assert_eq!(substitute_with(&doc, &vars).unwrap(), doc);
    }

    #[test]
    fn test_placeholders_lists_names() {
        assert_eq!(
            placeholders("${A}-${B_2}"),
            vec!["A".to_string(), "B_2".to_string()]
        );
    }
}
