//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod migrate;
pub mod status;
pub mod validate;

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL};
use crate::domain::errors::{ConfigError, MigrationError};
use crate::domain::McpError;

/// Process exit code for a failed operation
pub fn exit_code_for(error: &McpError) -> i32 {
    match error {
        McpError::Config(ConfigError::Connection(_)) => EXIT_CONNECTION_ERROR,
        McpError::Config(_) => EXIT_CONFIG_ERROR,
        McpError::Migration(MigrationError::InputUnreadable { .. }) => EXIT_CONFIG_ERROR,
        McpError::Probe(_) => EXIT_CONNECTION_ERROR,
        _ => EXIT_FATAL,
    }
}
