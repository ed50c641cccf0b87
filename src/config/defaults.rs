//! Defaulting of optional fields after validation
//!
//! Defaults are applied shallowly: a field the document sets wins as a whole,
//! an unset field takes the default. Nothing here can fail.

use super::schema::{ConfigDocument, GlobalConfig, LoggingConfig, RetryConfig, DEFAULT_PRIORITY};

/// Global request timeout used when the document sets none
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// The built-in global defaults block
pub fn default_global() -> GlobalConfig {
    GlobalConfig {
        timeout_ms: Some(DEFAULT_TIMEOUT_MS),
        retry_config: Some(RetryConfig::default()),
        logging: Some(LoggingConfig::default()),
    }
}

/// Fills unset optional fields of a validated document
///
/// - `global` is the built-in defaults overlaid with the document's block
/// - every server gets `enabled = true`, `priority = 50` and
///   `timeoutMs = global.timeoutMs` where it sets none
pub fn apply_defaults(mut document: ConfigDocument) -> ConfigDocument {
    let defaults = default_global();
    let supplied = document.global.take().unwrap_or_default();
    let global = GlobalConfig {
        timeout_ms: supplied.timeout_ms.or(defaults.timeout_ms),
        retry_config: supplied.retry_config.or(defaults.retry_config),
        logging: supplied.logging.or(defaults.logging),
    };

    for server in document.servers.values_mut() {
        server.enabled.get_or_insert(true);
        server.priority.get_or_insert(DEFAULT_PRIORITY);
        if server.timeout_ms.is_none() {
            server.timeout_ms = global.timeout_ms;
        }
    }

    document.global = Some(global);
    document
}
