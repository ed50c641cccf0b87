//! Business-rule validation
//!
//! These checks look at relationships between fields and at environment
//! policy. They run on the raw document so that they still report useful
//! findings when the structural phase has already failed.

use super::{child_path, IssueCode, ValidationIssue, ValidationResult};
use crate::config::schema::Environment;
use serde_json::{Map, Value};
use url::Url;

/// Fields every server entry must carry as strings before other rules apply
const REQUIRED_SERVER_FIELDS: [&str; 4] = ["name", "connectionType", "url", "description"];

/// Runs every business rule over `document`
pub fn check_business_rules(document: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();

    let environment = document
        .get("environment")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Environment>().ok())
        .unwrap_or_default();

    if let Some(retry) = document.pointer("/global/retryConfig") {
        check_retry_bounds(retry, "/global/retryConfig", &mut result);
    }

    let Some(servers) = document.get("servers").and_then(Value::as_object) else {
        return result;
    };

    let mut well_formed = Vec::with_capacity(servers.len());
    for (key, server) in servers {
        let path = child_path("/servers", key);
        let Some(entry) = minimal_server(server) else {
            result.push(ValidationIssue::error(
                path,
                format!("Invalid server configuration for '{key}'"),
                IssueCode::InvalidServerConfig,
            ));
            continue;
        };

        check_url(entry, environment, &path, &mut result);
        check_fallback(key, entry, servers, &path, &mut result);
        if let Some(retry) = entry.get("retryConfig") {
            check_retry_bounds(retry, &format!("{path}/retryConfig"), &mut result);
        }
        well_formed.push((key, entry, path));
    }

    if environment.is_production() {
        for (key, entry, path) in &well_formed {
            let url = entry.get("url").and_then(Value::as_str).unwrap_or_default();
            if url.contains("localhost") {
                result.push(ValidationIssue::warning(
                    format!("{path}/url"),
                    format!("Server '{key}' points at localhost in production"),
                    IssueCode::LocalhostInProduction,
                ));
            }
        }
    }

    result
}

/// Returns the entry's object when it has all required string fields
fn minimal_server(server: &Value) -> Option<&Map<String, Value>> {
    let entry = server.as_object()?;
    REQUIRED_SERVER_FIELDS
        .iter()
        .all(|field| entry.get(*field).is_some_and(Value::is_string))
        .then_some(entry)
}

fn check_url(
    entry: &Map<String, Value>,
    environment: Environment,
    path: &str,
    result: &mut ValidationResult,
) {
    let url = entry.get("url").and_then(Value::as_str).unwrap_or_default();
    let url_path = format!("{path}/url");

    if Url::parse(url).is_err() {
        result.push(ValidationIssue::error(
            url_path,
            format!("Invalid URL format: '{url}'"),
            IssueCode::InvalidUrl,
        ));
        return;
    }

    if environment.is_production() && url.starts_with("http://") {
        result.push(ValidationIssue::warning(
            url_path,
            "Insecure protocol (http://) used in production",
            IssueCode::InsecureProtocol,
        ));
    }
}

fn check_fallback(
    key: &str,
    entry: &Map<String, Value>,
    servers: &Map<String, Value>,
    path: &str,
    result: &mut ValidationResult,
) {
    let Some(target) = entry
        .get("fallback")
        .and_then(|f| f.get("serverKey"))
        .and_then(Value::as_str)
    else {
        return;
    };

    let target_path = format!("{path}/fallback/serverKey");
    if target == key {
        result.push(ValidationIssue::error(
            target_path,
            format!("Server '{key}' cannot fall back to itself"),
            IssueCode::FallbackSelfReference,
        ));
    } else if !servers.contains_key(target) {
        result.push(ValidationIssue::error(
            target_path,
            format!("Fallback server '{target}' not found"),
            IssueCode::FallbackNotFound,
        ));
    }
}

fn check_retry_bounds(retry: &Value, path: &str, result: &mut ValidationResult) {
    let initial = retry.get("initialDelayMs").and_then(Value::as_u64);
    let max = retry.get("maxDelayMs").and_then(Value::as_u64);
    if let (Some(initial), Some(max)) = (initial, max) {
        if max < initial {
            result.push(ValidationIssue::error(
                format!("{path}/maxDelayMs"),
                format!("maxDelayMs ({max}) must be >= initialDelayMs ({initial})"),
                IssueCode::InvalidRetryConfig,
            ));
        }
    }
}
