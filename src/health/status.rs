//! Per-server connection status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome class of a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Reachable and healthy
    Connected,
    /// Reachable but unhealthy, or refused
    Disconnected,
    /// The probe itself failed
    Error,
    /// Not probed (e.g. stdio transports)
    Unknown,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Error => "error",
            ConnectionState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Status of one server at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// Outcome class
    pub status: ConnectionState,

    /// When the probe finished
    pub last_checked: DateTime<Utc>,

    /// Round-trip time of the probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,

    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    /// A healthy result
    pub fn connected(response_time_ms: u64) -> Self {
        Self {
            status: ConnectionState::Connected,
            last_checked: Utc::now(),
            response_time_ms: Some(response_time_ms),
            error: None,
        }
    }

    /// Server answered but not as expected
    pub fn disconnected(response_time_ms: Option<u64>, reason: impl Into<String>) -> Self {
        Self {
            status: ConnectionState::Disconnected,
            last_checked: Utc::now(),
            response_time_ms,
            error: Some(reason.into()),
        }
    }

    /// The probe raised an error
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ConnectionState::Error,
            last_checked: Utc::now(),
            response_time_ms: None,
            error: Some(message.into()),
        }
    }

    /// Nothing was probed
    pub fn unknown() -> Self {
        Self {
            status: ConnectionState::Unknown,
            last_checked: Utc::now(),
            response_time_ms: None,
            error: None,
        }
    }

    /// Whether this status should fail a connection-validating load
    ///
    /// `unknown` is not a failure: some transports cannot be probed.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            ConnectionState::Disconnected | ConnectionState::Error
        )
    }
}
