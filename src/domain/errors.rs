//! Domain error types
//!
//! This module defines the error hierarchy for mcp-config. Every error carries a
//! machine-readable code (see [`McpError::code`]) so library callers can branch on
//! the category without parsing messages.

use crate::config::validation::ValidationIssue;
use thiserror::Error;

/// Main mcp-config error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum McpError {
    /// Configuration loading and access errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Legacy migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    /// A single health probe could not complete
    #[error("Probe failed: {0}")]
    Probe(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl McpError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            McpError::Config(e) => e.code(),
            McpError::Migration(e) => e.code(),
            McpError::Probe(_) => "PROBE_FAILED",
            McpError::Serialization(_) => "SERIALIZATION_ERROR",
            McpError::Io(_) => "IO_ERROR",
            McpError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

/// A failed connectivity probe reported by a connection-validating load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionFailure {
    /// Server key in the configuration document
    pub server_key: String,

    /// Reason the probe failed
    pub message: String,
}

impl std::fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.server_key, self.message)
    }
}

/// Errors raised by the configuration pipeline and the config manager
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failure during load that fits no narrower category
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// Structural or business-rule validation produced errors
    #[error("Configuration validation failed with {} error(s): {}", .0.len(), join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// One or more servers failed the connectivity check
    #[error("Connection validation failed for {} server(s): {}", .0.len(), join_failures(.0))]
    Connection(Vec<ConnectionFailure>),

    /// An accessor was used before a successful load
    #[error("Configuration not loaded. Call load() first")]
    NotLoaded,

    /// Unknown server key
    #[error("Server '{0}' not found in configuration")]
    ServerNotFound(String),

    /// A `${NAME}` placeholder references an unset environment variable
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

impl ConfigError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Load(_) => "CONFIG_LOAD_ERROR",
            ConfigError::Validation(_) => "CONFIG_VALIDATION_ERROR",
            ConfigError::Connection(_) => "CONNECTION_ERROR",
            ConfigError::NotLoaded => "CONFIG_NOT_LOADED",
            ConfigError::ServerNotFound(_) => "SERVER_NOT_FOUND",
            ConfigError::MissingEnvVar(_) => "MISSING_ENV_VAR",
        }
    }
}

/// Errors raised by the legacy migrator
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The legacy input could not be read or parsed; nothing was written
    #[error("Cannot read legacy configuration {path}: {reason}")]
    InputUnreadable { path: String, reason: String },

    /// An output file could not be written
    #[error("Failed to write {path}: {reason}")]
    Write { path: String, reason: String },
}

impl MigrationError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            MigrationError::InputUnreadable { .. } => "MIGRATION_INPUT_ERROR",
            MigrationError::Write { .. } => "MIGRATION_WRITE_ERROR",
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} ({})", i.message, i.path))
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_failures(failures: &[ConnectionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Conversion from std::io::Error
impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Serialization(err.to_string())
    }
}
