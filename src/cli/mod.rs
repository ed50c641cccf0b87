//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for mcp-config using clap.

pub mod commands;

use crate::config::manager::{LoadOptions, DEFAULT_CONFIG_DIR};
use crate::config::schema::{LogFormat, LogLevel};
use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration or input errors
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code for connection errors
pub const EXIT_CONNECTION_ERROR: i32 = 4;
/// Exit code for anything else
pub const EXIT_FATAL: i32 = 5;

/// mcp-config - MCP server configuration tool
#[derive(Parser, Debug)]
#[command(name = "mcp-config")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding config.json and config.<environment>.json
    #[arg(short, long, default_value = DEFAULT_CONFIG_DIR, env = "MCP_CONFIG_DIR")]
    pub config_dir: String,

    /// Environment to load (development, staging, production)
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MCP_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log format (text, json)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load options described by the global flags
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_dir: self.config_dir.clone().into(),
            environment: self.environment.clone(),
            validate_connections: false,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate the configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Probe every enabled server
    Status(commands::status::StatusArgs),

    /// Convert a legacy configuration file
    Migrate(commands::migrate::MigrateArgs),

    /// Write a sample configuration file
    Init(commands::init::InitArgs),
}
