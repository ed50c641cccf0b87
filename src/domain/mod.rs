//! Domain types shared across mcp-config.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, McpError>`]:
//!
//! ```rust,no_run
//! use mcp_config::config::{ConfigManager, LoadOptions};
//! use mcp_config::domain::Result;
//!
//! async fn example() -> Result<()> {
//!     let manager = ConfigManager::new();
//!     let config = manager.load(&LoadOptions::default()).await?;
//!     println!("{} servers", config.servers.len());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{ConfigError, ConnectionFailure, McpError, MigrationError};
pub use result::Result;
