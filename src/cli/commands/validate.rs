//! Validate config command implementation
//!
//! This module implements the `validate-config` command: run the load
//! pipeline and print a summary of the result.

use super::exit_code_for;
use crate::cli::EXIT_OK;
use crate::config::manager::{ConfigManager, LoadOptions};
use crate::config::schema::ConfigDocument;
use crate::domain::errors::ConfigError;
use crate::domain::McpError;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also probe every enabled server
    #[arg(long)]
    pub check_connections: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, options: &LoadOptions) -> anyhow::Result<i32> {
        tracing::info!(config_dir = %options.config_dir.display(), "Validating configuration");

        println!(
            "🔍 Validating configuration in: {}",
            options.config_dir.display()
        );
        println!();

        let mut options = options.clone();
        options.validate_connections = self.check_connections;

        let manager = ConfigManager::new();
        let document = match manager.load(&options).await {
            Ok(document) => document,
            Err(e) => {
                crate::log_error_with_context!(&e, "Configuration validation failed");
                print_failure(&e);
                return Ok(exit_code_for(&e));
            }
        };

        println!("✅ Configuration is valid");
        if let Some(validation) = manager.last_validation() {
            if !validation.warnings.is_empty() {
                println!();
                println!("⚠️  {} warning(s):", validation.warnings.len());
                for warning in &validation.warnings {
                    println!("   - {warning}");
                }
            }
        }
        println!();
        print_summary(&document);
        Ok(EXIT_OK)
    }
}

fn print_failure(error: &McpError) {
    println!("❌ Configuration validation failed");
    match error {
        McpError::Config(ConfigError::Validation(issues)) => {
            for issue in issues {
                println!("   - {issue}");
            }
        }
        McpError::Config(ConfigError::Connection(failures)) => {
            for failure in failures {
                println!("   - {failure}");
            }
        }
        other => println!("   Error: {other}"),
    }
    println!();
}

fn print_summary(document: &ConfigDocument) {
    println!("Configuration Summary:");
    println!("  Version: {}", document.version);
    println!("  Environment: {}", document.environment);
    println!("  Servers: {}", document.servers.len());
    for (key, server) in &document.servers {
        let state = if server.is_enabled() { "enabled" } else { "disabled" };
        println!(
            "    {key}: {} [{}] priority {} ({state})",
            server.url,
            server.connection_type,
            server.effective_priority()
        );
    }
    println!();
}
