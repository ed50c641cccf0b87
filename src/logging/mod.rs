//! Logging and observability
//!
//! Structured logging through `tracing`, with text or JSON output and an
//! optional audit stream for configuration changes.
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

pub mod structured;

pub use structured::{default_directives, init_logging, LoggingGuard, AUDIT_TARGET};

/// Emit an audit event
///
/// Audit events go to the `audit` target and are only shown when
/// `global.logging.audit` is enabled.
///
/// # Example
///
/// ```no_run
/// use mcp_config::audit_event;
///
/// audit_event!("config_loaded", environment = "production", servers = 3);
/// ```
#[macro_export]
macro_rules! audit_event {
    ($event:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            target: "audit",
            event = $event,
            $($($field)+,)?
            "Configuration audit event"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use mcp_config::log_error_with_context;
/// use mcp_config::domain::McpError;
///
/// let error = McpError::Other("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            code = $error.code(),
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::McpError;

    #[test]
    fn test_macros_expand() {
        let error = McpError::Other("boom".to_string());
        crate::log_error_with_context!(&error, "testing");
        crate::audit_event!("tested");
        crate::audit_event!("tested", servers = 2, environment = %"staging");
    }
}
