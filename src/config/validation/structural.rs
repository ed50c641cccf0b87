//! Structural validation against the declarative schema

use super::schema::{document_schema, Field, FieldSchema};
use super::{child_path, IssueCode, ValidationIssue, ValidationResult};
use serde_json::Value;

/// Checks a whole document against [`document_schema`]
pub fn check_document(document: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_value(document_schema(), document, "", &mut result);
    result
}

/// Checks `value` against `schema`, recording one issue per violation
pub fn check_value(schema: &FieldSchema, value: &Value, path: &str, result: &mut ValidationResult) {
    match schema {
        FieldSchema::String => {
            if !value.is_string() {
                result.push(type_error(path, "a string"));
            }
        }
        FieldSchema::Boolean => {
            if !value.is_boolean() {
                result.push(type_error(path, "a boolean"));
            }
        }
        FieldSchema::Integer { min, max } => check_integer(value, *min, *max, path, result),
        FieldSchema::Number { min } => match value.as_f64() {
            None => result.push(type_error(path, "a number")),
            Some(n) => {
                if let Some(min) = min {
                    if n < *min {
                        result.push(ValidationIssue::error(
                            display_path(path),
                            format!("must be >= {min}, got {n}"),
                            IssueCode::OutOfRange,
                        ));
                    }
                }
            }
        },
        FieldSchema::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => result.push(ValidationIssue::error(
                display_path(path),
                format!("'{s}' must be one of: {}", allowed.join(", ")),
                IssueCode::InvalidEnumValue,
            )),
            None => result.push(type_error(path, "a string")),
        },
        FieldSchema::Array(item) => match value.as_array() {
            Some(items) => {
                for (index, element) in items.iter().enumerate() {
                    check_value(item, element, &format!("{path}/{index}"), result);
                }
            }
            None => result.push(type_error(path, "an array")),
        },
        FieldSchema::Map(entry) => match value.as_object() {
            Some(map) => {
                for (key, element) in map {
                    check_value(entry, element, &child_path(path, key), result);
                }
            }
            None => result.push(type_error(path, "an object")),
        },
        FieldSchema::Object(fields) => check_object(fields, value, path, result),
    }
}

fn check_object(fields: &[Field], value: &Value, path: &str, result: &mut ValidationResult) {
    let Some(map) = value.as_object() else {
        result.push(type_error(path, "an object"));
        return;
    };

    for field in fields {
        let field_path = child_path(path, field.name);
        match map.get(field.name) {
            Some(v) => check_value(&field.schema, v, &field_path, result),
            None if field.required => result.push(ValidationIssue::error(
                field_path,
                format!("'{}' is required", field.name),
                IssueCode::RequiredField,
            )),
            None => {}
        }
    }

    for key in map.keys() {
        if !fields.iter().any(|f| f.name == key) {
            result.push(ValidationIssue::warning(
                child_path(path, key),
                format!("Unknown field '{key}' is ignored"),
                IssueCode::UnknownField,
            ));
        }
    }
}

fn check_integer(
    value: &Value,
    min: Option<i64>,
    max: Option<i64>,
    path: &str,
    result: &mut ValidationResult,
) {
    // u64 values above i64::MAX still satisfy any lower bound we declare
    let n = match (value.as_i64(), value.as_u64()) {
        (Some(n), _) => n,
        (None, Some(_)) => i64::MAX,
        (None, None) => {
            result.push(type_error(path, "an integer"));
            return;
        }
    };

    let below = min.is_some_and(|min| n < min);
    let above = max.is_some_and(|max| n > max);
    if below || above {
        let bounds = match (min, max) {
            (Some(min), Some(max)) => format!("between {min} and {max}"),
            (Some(min), None) => format!(">= {min}"),
            (None, Some(max)) => format!("<= {max}"),
            (None, None) => unreachable!("out of range requires a bound"),
        };
        result.push(ValidationIssue::error(
            display_path(path),
            format!("must be {bounds}, got {n}"),
            IssueCode::OutOfRange,
        ));
    }
}

fn type_error(path: &str, expected: &str) -> ValidationIssue {
    ValidationIssue::error(
        display_path(path),
        format!("must be {expected}"),
        IssueCode::InvalidType,
    )
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_document() -> Value {
        json!({
            "version": "1.0.0",
            "environment": "production",
            "global": {
                "timeoutMs": 30000,
                "retryConfig": {
                    "maxAttempts": 3,
                    "initialDelayMs": 1000,
                    "backoffMultiplier": 2,
                    "maxDelayMs": 30000,
                    "jitter": true
                },
                "logging": {"level": "info", "format": "json", "audit": true}
            },
            "servers": {
                "memory": {
                    "name": "Memory",
                    "connectionType": "https",
                    "url": "https://memory.example.com",
                    "description": "primary",
                    "headers": {"X-Client": "site"},
                    "priority": 10,
                    "healthCheck": {
                        "enabled": true,
                        "intervalMs": 30000,
                        "timeoutMs": 5000,
                        "endpoint": "/health",
                        "expectedStatus": 200
                    },
                    "security": {
                        "allowedOrigins": ["https://example.com"],
                        "rateLimiting": {"enabled": true, "requestsPerMinute": 100},
                        "encryption": {"enabled": true, "algorithm": "aes-256-gcm"}
                    }
                }
            }
        })
    }

    fn codes_at(result: &ValidationResult, path: &str) -> Vec<IssueCode> {
        result
            .errors
            .iter()
            .chain(result.warnings.iter())
            .filter(|i| i.path == path)
            .map(|i| i.code)
            .collect()
    }

    #[test]
    fn test_valid_document_has_no_findings() {
        let result = check_document(&valid_document());
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_missing_required_fields() {
        let result = check_document(&json!({"environment": "staging"}));
        assert_eq!(codes_at(&result, "/version"), vec![IssueCode::RequiredField]);
        assert_eq!(codes_at(&result, "/servers"), vec![IssueCode::RequiredField]);
    }

    #[test]
    fn test_wrong_types_reported_with_paths() {
        let mut doc = valid_document();
        doc["servers"]["memory"]["enabled"] = json!("yes");
        doc["servers"]["memory"]["headers"]["X-Client"] = json!(42);

        let result = check_document(&doc);
        assert_eq!(
            codes_at(&result, "/servers/memory/enabled"),
            vec![IssueCode::InvalidType]
        );
        assert_eq!(
            codes_at(&result, "/servers/memory/headers/X-Client"),
            vec![IssueCode::InvalidType]
        );
    }

    #[test]
    fn test_enum_membership() {
        let mut doc = valid_document();
        doc["servers"]["memory"]["connectionType"] = json!("carrier-pigeon");
        doc["global"]["logging"]["level"] = json!("loud");

        let result = check_document(&doc);
        assert_eq!(
            codes_at(&result, "/servers/memory/connectionType"),
            vec![IssueCode::InvalidEnumValue]
        );
        assert_eq!(
            codes_at(&result, "/global/logging/level"),
            vec![IssueCode::InvalidEnumValue]
        );
    }

    #[test]
    fn test_numeric_bounds() {
        let mut doc = valid_document();
        doc["global"]["retryConfig"]["maxAttempts"] = json!(0);
        doc["global"]["retryConfig"]["backoffMultiplier"] = json!(0.5);
        doc["servers"]["memory"]["healthCheck"]["expectedStatus"] = json!(700);

        let result = check_document(&doc);
        assert_eq!(
            codes_at(&result, "/global/retryConfig/maxAttempts"),
            vec![IssueCode::OutOfRange]
        );
        assert_eq!(
            codes_at(&result, "/global/retryConfig/backoffMultiplier"),
            vec![IssueCode::OutOfRange]
        );
        assert_eq!(
            codes_at(&result, "/servers/memory/healthCheck/expectedStatus"),
            vec![IssueCode::OutOfRange]
        );
    }

    #[test]
    fn test_u32_fields_bounded() {
        let mut doc = valid_document();
        doc["servers"]["memory"]["priority"] = json!(5_000_000_000u64);
        doc["global"]["retryConfig"]["maxAttempts"] = json!(u64::from(u32::MAX) + 1);
        doc["servers"]["memory"]["security"] = json!({
            "rateLimiting": {"enabled": true, "requestsPerMinute": 4_294_967_296u64}
        });

        let result = check_document(&doc);
        for path in [
            "/servers/memory/priority",
            "/global/retryConfig/maxAttempts",
            "/servers/memory/security/rateLimiting/requestsPerMinute",
        ] {
            assert_eq!(codes_at(&result, path), vec![IssueCode::OutOfRange], "{path}");
        }
        assert_eq!(result.errors.len(), 3);

        doc["servers"]["memory"]["priority"] = json!(u32::MAX);
        doc["global"]["retryConfig"]["maxAttempts"] = json!(u32::MAX);
        doc["servers"]["memory"]["security"]["rateLimiting"]["requestsPerMinute"] = json!(1);
        assert!(check_document(&doc).errors.is_empty());
    }

    #[test]
    fn test_fractional_integer_is_type_error() {
        let mut doc = valid_document();
        doc["servers"]["memory"]["priority"] = json!(1.5);
        let result = check_document(&doc);
        assert_eq!(
            codes_at(&result, "/servers/memory/priority"),
            vec![IssueCode::InvalidType]
        );
    }

    #[test]
    fn test_array_items_checked() {
        let mut doc = valid_document();
        doc["servers"]["memory"]["security"]["allowedOrigins"] = json!(["ok", 7]);
        let result = check_document(&doc);
        assert_eq!(
            codes_at(&result, "/servers/memory/security/allowedOrigins/1"),
            vec![IssueCode::InvalidType]
        );
    }

    #[test]
    fn test_unknown_field_is_warning() {
        let mut doc = valid_document();
        doc["servers"]["memory"]["colour"] = json!("blue");
        let result = check_document(&doc);
        assert!(result.is_valid());
        assert_eq!(
            codes_at(&result, "/servers/memory/colour"),
            vec![IssueCode::UnknownField]
        );
    }

    #[test]
    fn test_non_object_root() {
        let result = check_document(&json!([1, 2, 3]));
        assert_eq!(codes_at(&result, "/"), vec![IssueCode::InvalidType]);
    }
}
