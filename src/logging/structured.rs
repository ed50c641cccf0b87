//! Structured logging setup using tracing
//!
//! Log lines go to stderr through a non-blocking writer so stdout stays free
//! for command output. The format is text or JSON; the level comes from the
//! configuration unless `RUST_LOG` is set.
//!
//! # Example
//!
//! ```no_run
//! use mcp_config::config::LoggingConfig;
//! use mcp_config::logging::init_logging;
//!
//! let _guard = init_logging(&LoggingConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

use crate::config::schema::{LogFormat, LoggingConfig};
use crate::domain::{McpError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Target used for audit events
pub const AUDIT_TARGET: &str = "audit";

/// Guard that must be kept alive for the duration of the program
/// to ensure buffered log lines are flushed
pub struct LoggingGuard {
    _writer_guard: WorkerGuard,
}

/// Filter directives used when `RUST_LOG` is unset
///
/// Audit events use their own target and are only let through when the
/// configuration asks for them.
pub fn default_directives(config: &LoggingConfig) -> String {
    let level = config.level.to_tracing_level().to_string().to_lowercase();
    let mut directives = format!("mcp_config={level}");
    if config.audit {
        directives.push_str(&format!(",{AUDIT_TARGET}=info"));
    }
    directives
}

/// Initialize the logging system
///
/// # Returns
///
/// A `LoggingGuard` that must be kept alive for the duration of the program
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(writer)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| McpError::Other(format!("Failed to initialize logging: {e}")))?;

    Ok(LoggingGuard {
        _writer_guard: guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    #[test]
    fn test_default_directives() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Text,
            audit: false,
        };
        assert_eq!(default_directives(&config), "mcp_config=debug");
    }

    #[test]
    fn test_default_directives_with_audit() {
        let config = LoggingConfig {
            level: LogLevel::Warn,
            format: LogFormat::Json,
            audit: true,
        };
        assert_eq!(default_directives(&config), "mcp_config=warn,audit=info");
    }
}
