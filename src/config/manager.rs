//! Configuration manager
//!
//! [`ConfigManager`] runs the load pipeline and owns the resulting document
//! for as long as the application keeps the manager. Construct one at the
//! composition root and pass it by reference to whatever needs configuration.

use super::defaults::apply_defaults;
use super::environment::resolve_environment;
use super::loader::load_documents;
use super::schema::{ConfigDocument, Environment, ServerConfig};
use super::substitution::substitute_env_vars;
use super::validation::{validate_document, ValidationResult};
use crate::domain::errors::{ConfigError, ConnectionFailure};
use crate::domain::Result;
use crate::health::{probe_all, ConnectionStatus, HealthProbe, HttpHealthProbe};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Directory searched for configuration files when none is given
pub const DEFAULT_CONFIG_DIR: &str = "./config";

/// Options for [`ConfigManager::load`]
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory holding `config.json` and `config.<env>.json`
    pub config_dir: PathBuf,

    /// Explicit environment name, overriding `MCP_ENV` / `APP_ENV`
    pub environment: Option<String>,

    /// Probe every enabled server and fail the load if any probe fails
    pub validate_connections: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            environment: None,
            validate_connections: false,
        }
    }
}

impl LoadOptions {
    /// Options reading from `config_dir`
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the explicit environment
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Enables connection validation
    pub fn with_connection_validation(mut self) -> Self {
        self.validate_connections = true;
        self
    }
}

struct LoadedState {
    document: Arc<ConfigDocument>,
    validation: ValidationResult,
}

/// Loads, validates and serves the MCP server configuration
pub struct ConfigManager {
    state: RwLock<Option<LoadedState>>,
    probe: Arc<dyn HealthProbe>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Creates a manager probing servers over HTTP/TCP
    pub fn new() -> Self {
        Self::with_probe(Arc::new(HttpHealthProbe::new()))
    }

    /// Creates a manager using a custom probe
    pub fn with_probe(probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            state: RwLock::new(None),
            probe,
        }
    }

    /// Runs the full load pipeline and stores the result
    ///
    /// Pipeline: resolve environment → load and merge files → substitute
    /// `${NAME}` placeholders → validate → apply defaults → optionally probe
    /// every enabled server.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Load`] if a file cannot be read or parsed
    /// - [`ConfigError::MissingEnvVar`] if a placeholder is unresolved
    /// - [`ConfigError::Validation`] if validation reports errors
    /// - [`ConfigError::Connection`] if connection validation was requested
    ///   and at least one probe failed
    ///
    /// On error the previously loaded document, if any, is kept.
    pub async fn load(&self, options: &LoadOptions) -> Result<Arc<ConfigDocument>> {
        let environment = resolve_environment(options.environment.as_deref());
        tracing::info!(
            config_dir = %options.config_dir.display(),
            environment = %environment,
            "Loading configuration"
        );

        let merged = load_documents(&options.config_dir, environment)?;
        let substituted = substitute_env_vars(&merged)?;

        let validation = validate_document(&substituted);
        for warning in &validation.warnings {
            tracing::warn!(path = %warning.path, code = %warning.code, "{}", warning.message);
        }
        if !validation.is_valid() {
            for error in &validation.errors {
                tracing::error!(path = %error.path, code = %error.code, "{}", error.message);
            }
            return Err(ConfigError::Validation(validation.errors).into());
        }

        let document: ConfigDocument = serde_json::from_value(substituted)
            .map_err(|e| ConfigError::Load(format!("Failed to decode configuration: {e}")))?;
        let document = Arc::new(apply_defaults(document));

        if options.validate_connections {
            self.validate_connections(&document).await?;
        }

        audit(&document, environment, "config_loaded");
        tracing::info!(
            environment = %environment,
            servers = document.servers.len(),
            warnings = validation.warnings.len(),
            "Configuration loaded"
        );

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Some(LoadedState {
            document: Arc::clone(&document),
            validation,
        });
        Ok(document)
    }

    /// Discards the loaded document and cached connections, then loads again
    ///
    /// Readers see [`ConfigError::NotLoaded`] until the new load completes.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigManager::load`]; after a failed reload nothing is loaded.
    pub async fn reload(&self, options: &LoadOptions) -> Result<Arc<ConfigDocument>> {
        let previous = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.probe.reset();

        if let Some(previous) = previous {
            audit(&previous.document, previous.document.environment, "config_reloading");
        }
        tracing::info!("Reloading configuration");
        self.load(options).await
    }

    /// The loaded document
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotLoaded`] before a successful load.
    pub fn config(&self) -> Result<Arc<ConfigDocument>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| Arc::clone(&s.document))
            .ok_or_else(|| ConfigError::NotLoaded.into())
    }

    /// Findings of the last successful load (warnings only, by construction)
    pub fn last_validation(&self) -> Option<ValidationResult> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.validation.clone())
    }

    /// One server entry by key
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotLoaded`] or [`ConfigError::ServerNotFound`].
    pub fn server(&self, key: &str) -> Result<ServerConfig> {
        let config = self.config()?;
        config
            .servers
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::ServerNotFound(key.to_string()).into())
    }

    /// Enabled servers sorted by ascending priority
    ///
    /// Servers with equal priority keep their order in the document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotLoaded`] before a successful load.
    pub fn enabled_servers(&self) -> Result<Vec<(String, ServerConfig)>> {
        let config = self.config()?;
        Ok(enabled_sorted(&config))
    }

    /// Probes every enabled server concurrently
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotLoaded`] before a successful load. Probe failures are
    /// reported per server, not as an error.
    pub async fn connection_statuses(&self) -> Result<IndexMap<String, ConnectionStatus>> {
        let servers = self.enabled_servers()?;
        Ok(probe_all(
            self.probe.as_ref(),
            servers.iter().map(|(key, server)| (key.as_str(), server)),
        )
        .await)
    }

    async fn validate_connections(&self, document: &ConfigDocument) -> Result<()> {
        let servers = enabled_sorted(document);
        let statuses = probe_all(
            self.probe.as_ref(),
            servers.iter().map(|(key, server)| (key.as_str(), server)),
        )
        .await;

        let failures: Vec<ConnectionFailure> = statuses
            .into_iter()
            .filter(|(_, status)| status.is_failure())
            .map(|(server_key, status)| ConnectionFailure {
                server_key,
                message: status
                    .error
                    .unwrap_or_else(|| format!("status {}", status.status)),
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Connection(failures).into())
        }
    }
}

fn enabled_sorted(document: &ConfigDocument) -> Vec<(String, ServerConfig)> {
    let mut servers: Vec<(String, ServerConfig)> = document
        .servers
        .iter()
        .filter(|(_, server)| server.is_enabled())
        .map(|(key, server)| (key.clone(), server.clone()))
        .collect();
    // stable: equal priorities keep document order
    servers.sort_by_key(|(_, server)| server.effective_priority());
    servers
}

fn audit(document: &ConfigDocument, environment: Environment, event: &str) {
    let enabled = document
        .global
        .as_ref()
        .and_then(|g| g.logging.as_ref())
        .is_some_and(|l| l.audit);
    if enabled {
        crate::audit_event!(
            event,
            environment = %environment,
            version = %document.version,
            servers = document.servers.len()
        );
    }
}
