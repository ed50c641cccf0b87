//! Detection of secret-like values in legacy entries

use fancy_regex::Regex as FancyRegex;
use regex::Regex;
use std::sync::OnceLock;

/// Header names always treated as carrying credentials (compared lowercase)
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "x-api-key",
    "api-key",
    "apikey",
    "x-auth-token",
    "x-access-token",
    "x-secret",
    "x-client-secret",
    "cookie",
    "set-cookie",
];

/// Placeholder variable used for URLs containing a literal IP address
pub const SERVER_URL_VARIABLE: &str = "MCP_SERVER_URL";

/// Why a header value was considered sensitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitiveReason {
    HeaderName,
    Base64Like,
    ComplexPassword,
    AuthScheme,
}

impl SensitiveReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SensitiveReason::HeaderName => "sensitive header name",
            SensitiveReason::Base64Like => "value looks base64-encoded",
            SensitiveReason::ComplexPassword => "value looks like a password",
            SensitiveReason::AuthScheme => "value carries an auth scheme",
        }
    }
}

fn base64_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9+/]{20,}={0,2}$").expect("valid regex"))
}

fn password_pattern() -> &'static FancyRegex {
    static PATTERN: OnceLock<FancyRegex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        FancyRegex::new(
            r"^(?=.*[a-z])(?=.*[A-Z])(?=.*\d)(?=.*[!@#$%^&*_\-])[A-Za-z\d!@#$%^&*_\-]{12,}$",
        )
        .expect("valid regex")
    })
}

fn ip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").expect("valid regex")
    })
}

/// Classifies a header, returning the first matching reason
pub fn classify_header(name: &str, value: &str) -> Option<SensitiveReason> {
    let lower = name.to_ascii_lowercase();
    if SENSITIVE_HEADERS.contains(&lower.as_str()) {
        return Some(SensitiveReason::HeaderName);
    }
    if value.starts_with("Bearer ") || value.starts_with("Basic ") {
        return Some(SensitiveReason::AuthScheme);
    }
    if base64_pattern().is_match(value) {
        return Some(SensitiveReason::Base64Like);
    }
    // a pattern error here means the backtrack limit was hit; treat as no match
    if password_pattern().is_match(value).unwrap_or(false) {
        return Some(SensitiveReason::ComplexPassword);
    }
    None
}

/// Whether `url` embeds a dotted-quad IP address
pub fn contains_ip_address(url: &str) -> bool {
    ip_pattern().is_match(url)
}

/// Variable name for a header placeholder: `X-Api-Key` → `MCP_X_API_KEY`
pub fn header_variable(name: &str) -> String {
    format!("MCP_{}", name.to_ascii_uppercase().replace('-', "_"))
}

/// Variable name scoped to one server, `MCP_<SERVER>_<SUFFIX>`
///
/// Used when the shared name is already bound to another server's value.
pub fn server_variable(server_key: &str, variable: &str) -> String {
    let key: String = server_key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    let suffix = variable.strip_prefix("MCP_").unwrap_or(variable);
    format!("MCP_{key}_{suffix}")
}

/// `${NAME}` reference to a variable
pub fn placeholder(variable: &str) -> String {
    format!("${{{variable}}}")
}
