//! Legacy configuration shape
//!
//! The legacy format is a flat JSON object mapping a server key to a small
//! record. It has no version, environment or global block.
//!
//! ```json
//! {
//!   "memory": {
//!     "name": "Memory",
//!     "type": "HTTP",
//!     "url": "http://10.0.0.5:8080",
//!     "headers": { "Authorization": "Bearer abc123xyz" },
//!     "timeout": 10000,
//!     "description": "Memory server"
//!   }
//! }
//! ```

use crate::domain::errors::MigrationError;
use crate::domain::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// One entry of a legacy configuration file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyServer {
    pub name: String,

    /// Free-form transport name, matched case-insensitively
    #[serde(rename = "type")]
    pub kind: String,

    pub url: String,

    #[serde(default)]
    pub headers: Option<IndexMap<String, String>>,

    /// Request timeout in milliseconds
    #[serde(default)]
    pub timeout: Option<u64>,

    pub description: String,
}

/// A parsed legacy file, in file order
pub type LegacyDocument = IndexMap<String, LegacyServer>;

/// Reads and parses a legacy configuration file
///
/// # Errors
///
/// [`MigrationError::InputUnreadable`] if the file cannot be read or is not a
/// valid legacy document.
pub fn read_legacy(path: &Path) -> Result<LegacyDocument> {
    let unreadable = |reason: String| MigrationError::InputUnreadable {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    let document: LegacyDocument =
        serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))?;

    tracing::debug!(
        path = %path.display(),
        servers = document.len(),
        "Read legacy configuration"
    );
    Ok(document)
}
