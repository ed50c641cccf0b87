//! Configuration file loading and overlay merging
//!
//! A configuration directory holds an optional base document (`config.json`)
//! and an optional environment overlay (`config.<env>.json`). The overlay is
//! deep-merged over the base.

use super::schema::Environment;
use crate::domain::errors::ConfigError;
use crate::domain::result::Result;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the base configuration file
pub const BASE_FILE_NAME: &str = "config.json";

/// File name of the overlay for `env`
pub fn overlay_file_name(env: Environment) -> String {
    format!("config.{}.json", env.as_str())
}

/// Outcome of reading one optional configuration file
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// The file exists and parsed as JSON
    Loaded { path: PathBuf, document: Value },
    /// The file does not exist; tolerated
    Missing { path: PathBuf },
}

impl FileSource {
    /// The parsed document, if the file was present
    pub fn document(&self) -> Option<&Value> {
        match self {
            FileSource::Loaded { document, .. } => Some(document),
            FileSource::Missing { .. } => None,
        }
    }

    /// Whether the file was present
    pub fn is_loaded(&self) -> bool {
        matches!(self, FileSource::Loaded { .. })
    }
}

/// Reads an optional JSON file
///
/// # Errors
///
/// A missing file is not an error. A file that exists but cannot be read or
/// is not valid JSON is a [`ConfigError::Load`].
pub fn read_optional(path: &Path) -> Result<FileSource> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Optional configuration file not present");
            return Ok(FileSource::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(ConfigError::Load(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
            .into())
        }
    };

    let document: Value = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::Load(format!(
            "Failed to parse JSON in {}: {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %path.display(), "Loaded configuration file");
    Ok(FileSource::Loaded {
        path: path.to_path_buf(),
        document,
    })
}

/// Loads the base document and the overlay for `env`, merged
///
/// Both files may be absent, in which case the result is an empty document
/// carrying only the environment. The `environment` field is always set to
/// `env`, whatever the files declare.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] if a present file cannot be read or parsed.
pub fn load_documents(dir: impl AsRef<Path>, env: Environment) -> Result<Value> {
    let dir = dir.as_ref();
    let base = read_optional(&dir.join(BASE_FILE_NAME))?;
    let overlay = read_optional(&dir.join(overlay_file_name(env)))?;

    tracing::info!(
        config_dir = %dir.display(),
        environment = %env,
        base_loaded = base.is_loaded(),
        overlay_loaded = overlay.is_loaded(),
        "Resolved configuration sources"
    );

    let merged = match (base.document(), overlay.document()) {
        (Some(base), Some(overlay)) => deep_merge(base, overlay),
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => Value::Object(Map::new()),
    };

    Ok(with_environment(merged, env))
}

/// Deep-merges `overlay` over `base`
///
/// Where both sides hold objects the merge recurses; any other value in the
/// overlay (arrays included) replaces the base value wholesale.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}

/// Forces the `environment` field of a document
///
/// A non-object document is replaced by an object so the field can be set;
/// validation reports the lost shape as missing fields.
fn with_environment(document: Value, env: Environment) -> Value {
    let mut map = match document {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    map.insert(
        "environment".to_string(),
        Value::String(env.as_str().to_string()),
    );
    Value::Object(map)
}
