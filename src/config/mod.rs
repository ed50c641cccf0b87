//! MCP server configuration
//!
//! Configuration lives in a directory holding a base `config.json` and an
//! optional per-environment overlay `config.<environment>.json`. Loading
//! merges the two, resolves `${NAME}` placeholders from the process
//! environment, validates the result and fills in defaults.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mcp_config::config::{ConfigManager, LoadOptions};
//!
//! # async fn example() -> mcp_config::domain::Result<()> {
//! let manager = ConfigManager::new();
//! manager
//!     .load(&LoadOptions::new("./config").with_environment("production"))
//!     .await?;
//!
//! for (key, server) in manager.enabled_servers()? {
//!     println!("{key}: {} ({})", server.name, server.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "environment": "production",
//!   "servers": {
//!     "memory": {
//!       "name": "Memory Server",
//!       "connectionType": "https",
//!       "url": "https://memory.example.com",
//!       "description": "Shared memory store",
//!       "headers": { "Authorization": "${MCP_AUTHORIZATION}" },
//!       "priority": 10
//!     }
//!   }
//! }
//! ```
//!
//! # Environment
//!
//! The environment is taken from the explicit option, then `MCP_ENV`, then
//! `APP_ENV`, and is `development` otherwise. The resolved environment always
//! overrides the `environment` field of the files.

pub mod defaults;
pub mod environment;
pub mod loader;
pub mod manager;
pub mod schema;
pub mod secret;
pub mod substitution;
pub mod validation;

pub use defaults::apply_defaults;
pub use environment::resolve_environment;
pub use loader::{deep_merge, load_documents};
pub use manager::{ConfigManager, LoadOptions};
pub use schema::{
    ConfigDocument, ConnectionType, EncryptionAlgorithm, EncryptionConfig, Environment,
    FallbackConfig, GlobalConfig, HealthCheckConfig, LogFormat, LogLevel, LoggingConfig,
    RateLimitConfig, RetryConfig, SecurityConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
pub use substitution::substitute_env_vars;
pub use validation::{validate_document, IssueCode, Severity, ValidationIssue, ValidationResult};
