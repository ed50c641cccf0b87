//! Declarative description of the configuration document shape
//!
//! The schema mirrors the types in [`crate::config::schema`] and is what the
//! structural checker walks. Keep the two in sync when adding fields.

use std::sync::OnceLock;

/// Shape of one JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSchema {
    /// Any string
    String,
    /// `true` or `false`
    Boolean,
    /// Whole number within optional inclusive bounds
    Integer { min: Option<i64>, max: Option<i64> },
    /// Any number with an optional inclusive lower bound
    Number { min: Option<f64> },
    /// String from a closed set
    Enum(&'static [&'static str]),
    /// Array whose items share one shape
    Array(Box<FieldSchema>),
    /// Object with arbitrary keys whose values share one shape
    Map(Box<FieldSchema>),
    /// Object with known fields
    Object(Vec<Field>),
}

/// Named field of an [`FieldSchema::Object`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Wire name
    pub name: &'static str,
    /// Whether absence is an error
    pub required: bool,
    /// Shape of the value
    pub schema: FieldSchema,
}

impl Field {
    /// A field that must be present
    pub fn required(name: &'static str, schema: FieldSchema) -> Self {
        Self {
            name,
            required: true,
            schema,
        }
    }

    /// A field that may be omitted
    pub fn optional(name: &'static str, schema: FieldSchema) -> Self {
        Self {
            name,
            required: false,
            schema,
        }
    }
}

impl FieldSchema {
    fn int_min(min: i64) -> Self {
        FieldSchema::Integer {
            min: Some(min),
            max: None,
        }
    }

    fn int_range(min: i64, max: i64) -> Self {
        FieldSchema::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Integer that must fit the `u32` it decodes into
    fn u32_min(min: i64) -> Self {
        Self::int_range(min, i64::from(u32::MAX))
    }
}

/// Closed set of environment names
pub const ENVIRONMENTS: &[&str] = &["development", "staging", "production"];

/// Closed set of connection types
pub const CONNECTION_TYPES: &[&str] = &["http", "https", "websocket", "stdio"];

/// Closed set of log levels
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Closed set of log formats
pub const LOG_FORMATS: &[&str] = &["json", "text"];

/// Closed set of encryption algorithms
pub const ENCRYPTION_ALGORITHMS: &[&str] = &["aes-256-gcm", "chacha20-poly1305"];

fn retry_schema() -> FieldSchema {
    FieldSchema::Object(vec![
        Field::required("maxAttempts", FieldSchema::u32_min(1)),
        Field::required("initialDelayMs", FieldSchema::int_min(0)),
        Field::required("backoffMultiplier", FieldSchema::Number { min: Some(1.0) }),
        Field::required("maxDelayMs", FieldSchema::int_min(0)),
        Field::required("jitter", FieldSchema::Boolean),
    ])
}

fn logging_schema() -> FieldSchema {
    FieldSchema::Object(vec![
        Field::optional("level", FieldSchema::Enum(LOG_LEVELS)),
        Field::optional("format", FieldSchema::Enum(LOG_FORMATS)),
        Field::optional("audit", FieldSchema::Boolean),
    ])
}

fn global_schema() -> FieldSchema {
    FieldSchema::Object(vec![
        Field::optional("timeoutMs", FieldSchema::int_min(1)),
        Field::optional("retryConfig", retry_schema()),
        Field::optional("logging", logging_schema()),
    ])
}

fn health_check_schema() -> FieldSchema {
    FieldSchema::Object(vec![
        Field::required("enabled", FieldSchema::Boolean),
        Field::required("intervalMs", FieldSchema::int_min(1)),
        Field::required("timeoutMs", FieldSchema::int_min(1)),
        Field::required("endpoint", FieldSchema::String),
        Field::required("expectedStatus", FieldSchema::int_range(100, 599)),
    ])
}

fn fallback_schema() -> FieldSchema {
    FieldSchema::Object(vec![
        Field::required("enabled", FieldSchema::Boolean),
        Field::optional("serverKey", FieldSchema::String),
        Field::required("cacheEnabled", FieldSchema::Boolean),
        Field::optional("cacheTtlMs", FieldSchema::int_min(0)),
    ])
}

fn security_schema() -> FieldSchema {
    FieldSchema::Object(vec![
        Field::optional(
            "allowedOrigins",
            FieldSchema::Array(Box::new(FieldSchema::String)),
        ),
        Field::optional(
            "rateLimiting",
            FieldSchema::Object(vec![
                Field::required("enabled", FieldSchema::Boolean),
                Field::required("requestsPerMinute", FieldSchema::u32_min(1)),
            ]),
        ),
        Field::optional(
            "encryption",
            FieldSchema::Object(vec![
                Field::required("enabled", FieldSchema::Boolean),
                Field::required("algorithm", FieldSchema::Enum(ENCRYPTION_ALGORITHMS)),
            ]),
        ),
    ])
}

fn server_schema() -> FieldSchema {
    FieldSchema::Object(vec![
        Field::required("name", FieldSchema::String),
        Field::required("connectionType", FieldSchema::Enum(CONNECTION_TYPES)),
        Field::required("url", FieldSchema::String),
        Field::required("description", FieldSchema::String),
        Field::optional("headers", FieldSchema::Map(Box::new(FieldSchema::String))),
        Field::optional("timeoutMs", FieldSchema::int_min(1)),
        Field::optional("enabled", FieldSchema::Boolean),
        Field::optional("priority", FieldSchema::u32_min(0)),
        Field::optional("retryConfig", retry_schema()),
        Field::optional("healthCheck", health_check_schema()),
        Field::optional("fallback", fallback_schema()),
        Field::optional("security", security_schema()),
    ])
}

/// Schema of a complete configuration document
pub fn document_schema() -> &'static FieldSchema {
    static SCHEMA: OnceLock<FieldSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FieldSchema::Object(vec![
            Field::required("version", FieldSchema::String),
            Field::required("environment", FieldSchema::Enum(ENVIRONMENTS)),
            Field::optional("global", global_schema()),
            Field::required("servers", FieldSchema::Map(Box::new(server_schema()))),
        ])
    })
}
