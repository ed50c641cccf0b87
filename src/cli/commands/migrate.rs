//! Migrate command implementation
//!
//! This module implements the `migrate` command for converting a legacy
//! configuration file into the current format.

use super::exit_code_for;
use crate::cli::EXIT_OK;
use crate::config::schema::Environment;
use crate::migration::{MigrationOptions, Migrator};
use clap::Args;

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Legacy configuration file
    #[arg(short, long)]
    pub input: String,

    /// Output directory
    #[arg(short, long, default_value = "./config")]
    pub output: String,

    /// Target environment (development, staging, production)
    #[arg(short, long, default_value = "production")]
    pub environment: Environment,

    /// Move secret-like values into a .env file (default)
    #[arg(long, overrides_with = "no_extract_secrets")]
    pub extract_secrets: bool,

    /// Keep secret-like values inline
    #[arg(long, overrides_with = "extract_secrets")]
    pub no_extract_secrets: bool,

    /// Validate the result and probe every server after migrating
    #[arg(long)]
    pub validate: bool,
}

impl MigrateArgs {
    /// Whether secrets are extracted, after flag overrides
    pub fn extract_secrets(&self) -> bool {
        !self.no_extract_secrets
    }

    fn options(&self) -> MigrationOptions {
        MigrationOptions {
            input_path: self.input.clone().into(),
            output_dir: self.output.clone().into(),
            environment: self.environment,
            extract_secrets: self.extract_secrets(),
            validate_connections: self.validate,
        }
    }

    /// Execute the migrate command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, output = %self.output, "Migrating legacy configuration");

        println!("🔄 Migrating {} ({})", self.input, self.environment);
        println!();

        let outcome = match Migrator::new(self.options()).run().await {
            Ok(outcome) => outcome,
            Err(e) => {
                crate::log_error_with_context!(&e, "Migration failed");
                println!("❌ Migration failed");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!(
            "✅ Configuration written: {}",
            outcome.config_path.display()
        );
        if let Some(env_path) = &outcome.env_path {
            println!(
                "🔐 {} secret(s) written to: {}",
                outcome.report.secrets_extracted,
                env_path.display()
            );
            println!("⚠️  Keep this file out of version control (add it to .gitignore)");
        }
        println!("📝 Report written: {}", outcome.report_path.display());

        if !outcome.report.warnings.is_empty() {
            println!();
            println!("⚠️  {} warning(s):", outcome.report.warnings.len());
            for warning in &outcome.report.warnings {
                println!("   - {warning}");
            }
        }

        println!();
        println!("Next steps:");
        for (i, step) in outcome.report.next_steps.iter().enumerate() {
            println!("  {}. {step}", i + 1);
        }
        println!();
        Ok(EXIT_OK)
    }
}
