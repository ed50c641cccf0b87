// mcp-config - MCP server configuration tool
// Licensed under the MIT License

//! # mcp-config
//!
//! Loading, validation and migration of MCP server configuration.
//!
//! ## Overview
//!
//! - **Loading** a base `config.json` merged with `config.<environment>.json`
//! - **Substituting** `${NAME}` placeholders from the process environment
//! - **Validating** structure and cross-field rules, with path-addressed issues
//! - **Defaulting** unset optional fields
//! - **Probing** configured servers concurrently
//! - **Migrating** legacy configuration files, extracting embedded secrets
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration schema, load pipeline and [`config::ConfigManager`]
//! - [`health`] - Connection health probes
//! - [`migration`] - Legacy configuration migrator
//! - [`domain`] - Error types
//! - [`logging`] - Structured logging and audit events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcp_config::config::{ConfigManager, LoadOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = ConfigManager::new();
//!     manager.load(&LoadOptions::new("./config")).await?;
//!
//!     for (key, status) in manager.connection_statuses().await? {
//!         println!("{key}: {}", status.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], whose error type
//! [`domain::McpError`] carries a machine-readable code:
//!
//! ```rust,no_run
//! use mcp_config::config::{ConfigManager, LoadOptions};
//!
//! # async fn example() {
//! let manager = ConfigManager::new();
//! if let Err(e) = manager.load(&LoadOptions::default()).await {
//!     eprintln!("{} ({})", e, e.code());
//! }
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod health;
pub mod logging;
pub mod migration;
