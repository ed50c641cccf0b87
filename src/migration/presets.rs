//! Per-environment blocks attached to migrated servers

use crate::config::defaults::DEFAULT_TIMEOUT_MS;
use crate::config::schema::{
    EncryptionAlgorithm, EncryptionConfig, Environment, FallbackConfig, GlobalConfig,
    HealthCheckConfig, LogFormat, LogLevel, LoggingConfig, RateLimitConfig, RetryConfig,
    SecurityConfig,
};

/// Cache lifetime for fallback responses
pub const FALLBACK_CACHE_TTL_MS: u64 = 300_000;

pub fn retry_config(environment: Environment) -> RetryConfig {
    match environment {
        Environment::Production => RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
            max_delay_ms: 30000,
            jitter: true,
        },
        Environment::Staging => RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
            max_delay_ms: 15000,
            jitter: true,
        },
        Environment::Development => RetryConfig {
            max_attempts: 2,
            initial_delay_ms: 500,
            backoff_multiplier: 1.5,
            max_delay_ms: 5000,
            jitter: false,
        },
    }
}

pub fn health_check(environment: Environment) -> HealthCheckConfig {
    let (enabled, interval_ms, timeout_ms) = match environment {
        Environment::Production => (true, 30000, 5000),
        Environment::Staging => (true, 60000, 5000),
        Environment::Development => (false, 120_000, 10000),
    };
    HealthCheckConfig {
        enabled,
        interval_ms,
        timeout_ms,
        endpoint: "/health".to_string(),
        expected_status: 200,
    }
}

/// Security block, production only
pub fn security(environment: Environment) -> Option<SecurityConfig> {
    environment.is_production().then(|| SecurityConfig {
        allowed_origins: Some(Vec::new()),
        rate_limiting: Some(RateLimitConfig {
            enabled: true,
            requests_per_minute: 100,
        }),
        encryption: Some(EncryptionConfig {
            enabled: true,
            algorithm: EncryptionAlgorithm::Aes256Gcm,
        }),
    })
}

pub fn fallback(environment: Environment) -> FallbackConfig {
    FallbackConfig {
        enabled: false,
        server_key: None,
        cache_enabled: environment != Environment::Development,
        cache_ttl_ms: Some(FALLBACK_CACHE_TTL_MS),
    }
}

pub fn global(environment: Environment) -> GlobalConfig {
    let logging = if environment.is_production() {
        LoggingConfig {
            level: LogLevel::Info,
            format: LogFormat::Json,
            audit: true,
        }
    } else {
        LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Text,
            audit: false,
        }
    };

    GlobalConfig {
        timeout_ms: Some(DEFAULT_TIMEOUT_MS),
        retry_config: Some(retry_config(environment)),
        logging: Some(logging),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_is_strictest() {
        let prod = retry_config(Environment::Production);
        assert_eq!(prod.max_attempts, 5);
        assert!(prod.jitter);
        assert!(health_check(Environment::Production).enabled);
        assert!(security(Environment::Production).is_some());
        assert!(fallback(Environment::Production).cache_enabled);
        assert!(global(Environment::Production).logging.unwrap().audit);
    }

    #[test]
    fn test_development_is_relaxed() {
        let dev = retry_config(Environment::Development);
        assert_eq!(dev.backoff_multiplier, 1.5);
        assert!(!dev.jitter);
        assert!(!health_check(Environment::Development).enabled);
        assert!(security(Environment::Development).is_none());
        assert!(!fallback(Environment::Development).cache_enabled);

        let logging = global(Environment::Development).logging.unwrap();
        assert_eq!(logging.level, LogLevel::Debug);
        assert_eq!(logging.format, LogFormat::Text);
    }

    #[test]
    fn test_staging_between() {
        assert_eq!(retry_config(Environment::Staging).max_delay_ms, 15000);
        assert_eq!(health_check(Environment::Staging).interval_ms, 60000);
        assert!(security(Environment::Staging).is_none());
        assert!(fallback(Environment::Staging).cache_enabled);
    }

    #[test]
    fn test_presets_respect_retry_bounds() {
        for env in Environment::ALL {
            let retry = retry_config(env);
            assert!(retry.max_delay_ms >= retry.initial_delay_ms);
            assert!(retry.backoff_multiplier >= 1.0);
        }
    }
}
