//! One-shot migration of a legacy configuration file

use super::convert::Conversion;
use super::legacy::read_legacy;
use super::report::{MigrationReport, REPORT_FILE_NAME};
use crate::config::loader::overlay_file_name;
use crate::config::schema::{ConfigDocument, Environment};
use crate::config::secret::SecretString;
use crate::config::substitution::substitute_with;
use crate::config::validation::validate_document;
use crate::domain::errors::MigrationError;
use crate::domain::Result;
use crate::health::{probe_all, HealthProbe, HttpHealthProbe};
use indexmap::IndexMap;
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory migrated files are written to by default
pub const DEFAULT_OUTPUT_DIR: &str = "./config";

/// Options for a migration run
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Legacy JSON file to read
    pub input_path: PathBuf,

    /// Directory receiving the migrated files, created if missing
    pub output_dir: PathBuf,

    /// Environment the migrated document targets (default: production)
    pub environment: Environment,

    /// Replace secret-like values with `${NAME}` references (default: true)
    pub extract_secrets: bool,

    /// Validate and probe the migrated document after writing it
    pub validate_connections: bool,
}

impl MigrationOptions {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            environment: Environment::Production,
            extract_secrets: true,
            validate_connections: false,
        }
    }
}

/// Files written by a successful run
#[derive(Debug, Clone)]
pub struct MigrationOutcome {
    pub config_path: PathBuf,

    /// `None` when no secrets were extracted
    pub env_path: Option<PathBuf>,

    pub report_path: PathBuf,
    pub report: MigrationReport,
    pub document: ConfigDocument,
}

/// Converts a legacy file into `config.<env>.json`, `.env.<env>` and a report
pub struct Migrator {
    options: MigrationOptions,
    probe: Arc<dyn HealthProbe>,
}

impl Migrator {
    pub fn new(options: MigrationOptions) -> Self {
        Self::with_probe(options, Arc::new(HttpHealthProbe::new()))
    }

    pub fn with_probe(options: MigrationOptions, probe: Arc<dyn HealthProbe>) -> Self {
        Self { options, probe }
    }

    /// Runs the migration
    ///
    /// # Errors
    ///
    /// - [`MigrationError::InputUnreadable`] if the legacy file cannot be read
    ///   or parsed; nothing is written in that case
    /// - [`MigrationError::Write`] if an output file cannot be written
    ///
    /// Problems found by post-migration validation only add warnings.
    pub async fn run(&self) -> Result<MigrationOutcome> {
        let options = &self.options;
        tracing::info!(
            input = %options.input_path.display(),
            output = %options.output_dir.display(),
            environment = %options.environment,
            extract_secrets = options.extract_secrets,
            "Starting legacy configuration migration"
        );

        let legacy = read_legacy(&options.input_path)?;

        let mut conversion = Conversion::new(options.environment, options.extract_secrets);
        let document = conversion.convert_document(&legacy);
        let (secrets, mut warnings) = conversion.into_parts();

        tokio::fs::create_dir_all(&options.output_dir)
            .await
            .map_err(|e| write_error(&options.output_dir, e))?;

        let config_path = options
            .output_dir
            .join(overlay_file_name(options.environment));
        write_json(&config_path, &document).await?;
        tracing::info!(path = %config_path.display(), servers = document.servers.len(), "Wrote migrated configuration");

        let env_path = if secrets.is_empty() {
            None
        } else {
            let path = options
                .output_dir
                .join(format!(".env.{}", options.environment));
            write_file(&path, &render_env_file(&secrets)).await?;
            tracing::warn!(
                path = %path.display(),
                secrets = secrets.len(),
                "Secrets file written; restrict its permissions and add it to .gitignore"
            );
            Some(path)
        };

        if options.validate_connections {
            warnings.extend(self.check_migrated(&document, &secrets).await);
        }

        let report = MigrationReport::new(secrets.len(), warnings);
        let report_path = options.output_dir.join(REPORT_FILE_NAME);
        write_json(&report_path, &report).await?;

        tracing::info!(
            secrets_extracted = report.secrets_extracted,
            warnings = report.warnings.len(),
            "Migration complete"
        );

        Ok(MigrationOutcome {
            config_path,
            env_path,
            report_path,
            report,
            document,
        })
    }

    /// Validates and probes the migrated document, returning problems as warnings
    async fn check_migrated(
        &self,
        document: &ConfigDocument,
        secrets: &IndexMap<String, SecretString>,
    ) -> Vec<String> {
        let mut problems = Vec::new();

        let value = match serde_json::to_value(document) {
            Ok(value) => value,
            Err(e) => {
                problems.push(format!("Validation skipped: {e}"));
                return problems;
            }
        };

        let lookup = |name: &str| {
            secrets
                .get(name)
                .map(|s| s.expose_secret().as_ref().to_string())
                .or_else(|| std::env::var(name).ok())
        };
        let substituted = match substitute_with(&value, &lookup) {
            Ok(substituted) => substituted,
            Err(e) => {
                problems.push(format!("Validation skipped: {e}"));
                return problems;
            }
        };

        let validation = validate_document(&substituted);
        problems.extend(
            validation
                .errors
                .iter()
                .map(|issue| format!("Validation error {issue}")),
        );
        problems.extend(
            validation
                .warnings
                .iter()
                .map(|issue| format!("Validation warning {issue}")),
        );
        if !validation.is_valid() {
            return problems;
        }

        let resolved: ConfigDocument = match serde_json::from_value(substituted) {
            Ok(resolved) => resolved,
            Err(e) => {
                problems.push(format!("Validation skipped: {e}"));
                return problems;
            }
        };

        let statuses = probe_all(
            self.probe.as_ref(),
            resolved.servers.iter().map(|(key, server)| (key.as_str(), server)),
        )
        .await;
        for (key, status) in statuses {
            if status.is_failure() {
                problems.push(format!(
                    "Connection check failed for '{key}': {}",
                    status.error.unwrap_or_else(|| status.status.to_string())
                ));
            }
        }

        for problem in &problems {
            tracing::warn!("{problem}");
        }
        problems
    }
}

/// `NAME=value` lines, one per secret
fn render_env_file(secrets: &IndexMap<String, SecretString>) -> String {
    secrets
        .iter()
        .map(|(name, value)| format!("{name}={}\n", value.expose_secret().as_ref()))
        .collect()
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_file(path, &content).await
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| write_error(path, e).into())
}

fn write_error(path: &Path, e: std::io::Error) -> MigrationError {
    MigrationError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
