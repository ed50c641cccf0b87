//! Two-phase configuration validation
//!
//! The structural phase checks the merged document against the declarative
//! schema in [`schema`]. The business-rule phase in [`rules`] then checks
//! cross-field and environment-dependent policy. Both phases always run and
//! their findings are concatenated.

pub mod rules;
pub mod schema;
pub mod structural;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks loading
    Error,
    /// Logged only
    Warning,
}

/// Machine-readable validation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // Structural
    InvalidType,
    RequiredField,
    InvalidEnumValue,
    OutOfRange,
    UnknownField,

    // Business rules
    InvalidServerConfig,
    InvalidUrl,
    InsecureProtocol,
    FallbackNotFound,
    FallbackSelfReference,
    LocalhostInProduction,
    InvalidRetryConfig,
}

impl IssueCode {
    /// Wire form of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InvalidType => "INVALID_TYPE",
            IssueCode::RequiredField => "REQUIRED_FIELD",
            IssueCode::InvalidEnumValue => "INVALID_ENUM_VALUE",
            IssueCode::OutOfRange => "OUT_OF_RANGE",
            IssueCode::UnknownField => "UNKNOWN_FIELD",
            IssueCode::InvalidServerConfig => "INVALID_SERVER_CONFIG",
            IssueCode::InvalidUrl => "INVALID_URL",
            IssueCode::InsecureProtocol => "INSECURE_PROTOCOL",
            IssueCode::FallbackNotFound => "FALLBACK_NOT_FOUND",
            IssueCode::FallbackSelfReference => "FALLBACK_SELF_REFERENCE",
            IssueCode::LocalhostInProduction => "LOCALHOST_IN_PRODUCTION",
            IssueCode::InvalidRetryConfig => "INVALID_RETRY_CONFIG",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON pointer to the offending field, e.g. `/servers/memory/url`
    pub path: String,

    /// Human-readable description
    pub message: String,

    /// Machine-readable code
    pub code: IssueCode,

    /// Error or warning
    pub severity: Severity,
}

impl ValidationIssue {
    /// Creates an error-severity issue
    pub fn error(path: impl Into<String>, message: impl Into<String>, code: IssueCode) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
            severity: Severity::Error,
        }
    }

    /// Creates a warning-severity issue
    pub fn warning(path: impl Into<String>, message: impl Into<String>, code: IssueCode) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

/// Ordered errors and warnings from one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Findings that block loading
    pub errors: Vec<ValidationIssue>,

    /// Findings that are only reported
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff there are no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records an issue in the list matching its severity
    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    /// Appends another result's findings after this one's
    pub fn extend(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Whether any finding (of either severity) carries `code`
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|issue| issue.code == code)
    }
}

/// Validates a merged, substituted document
///
/// Runs the structural phase then the business-rule phase, unconditionally.
pub fn validate_document(document: &Value) -> ValidationResult {
    let mut result = structural::check_document(document);
    result.extend(rules::check_business_rules(document));

    tracing::debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Configuration validated"
    );
    result
}

/// Escapes one JSON-pointer reference token
pub(crate) fn pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Joins a parent pointer and a child token
pub(crate) fn child_path(parent: &str, token: &str) -> String {
    format!("{parent}/{}", pointer_token(token))
}
