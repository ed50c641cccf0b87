//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration directory.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK};
use crate::config::loader::{overlay_file_name, BASE_FILE_NAME};
use crate::config::schema::Environment;
use clap::Args;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the configuration in
    #[arg(short, long, default_value = "./config")]
    pub output: String,

    /// Also write a production overlay
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration");

        println!("📝 Initializing MCP configuration");
        println!();

        let dir = Path::new(&self.output);
        let mut files: Vec<(PathBuf, Value)> = vec![(dir.join(BASE_FILE_NAME), base_config())];
        if self.with_examples {
            files.push((
                dir.join(overlay_file_name(Environment::Production)),
                production_overlay(),
            ));
        }

        if !self.force {
            for (path, _) in &files {
                if fs::try_exists(path).await? {
                    println!("❌ Configuration file already exists: {}", path.display());
                    println!("   Use --force to overwrite");
                    return Ok(EXIT_CONFIG_ERROR);
                }
            }
        }

        if let Err(e) = fs::create_dir_all(dir).await {
            println!("❌ Failed to create directory {}", dir.display());
            println!("   Error: {e}");
            return Ok(EXIT_FATAL);
        }

        for (path, document) in &files {
            let content = format!("{}\n", serde_json::to_string_pretty(document)?);
            if let Err(e) = fs::write(path, content).await {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
            println!("✅ Configuration file created: {}", path.display());
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your servers", files[0].0.display());
        println!("  2. Put credentials in environment variables and reference them as ${{NAME}}");
        println!("  3. Validate configuration: mcp-config --config-dir {} validate-config", self.output);
        println!("  4. Check connectivity: mcp-config --config-dir {} status", self.output);
        println!();
        Ok(EXIT_OK)
    }
}

/// Sample base document
pub fn base_config() -> Value {
    json!({
        "version": "1.0.0",
        "environment": "development",
        "global": {
            "timeoutMs": 30000,
            "retryConfig": {
                "maxAttempts": 3,
                "initialDelayMs": 1000,
                "backoffMultiplier": 2.0,
                "maxDelayMs": 30000,
                "jitter": true
            },
            "logging": {
                "level": "info",
                "format": "text",
                "audit": false
            }
        },
        "servers": {
            "memory": {
                "name": "Memory Server",
                "connectionType": "http",
                "url": "http://localhost:3000",
                "description": "Local memory server",
                "priority": 10,
                "healthCheck": {
                    "enabled": true,
                    "intervalMs": 60000,
                    "timeoutMs": 5000,
                    "endpoint": "/health",
                    "expectedStatus": 200
                }
            },
            "filesystem": {
                "name": "Filesystem Server",
                "connectionType": "stdio",
                "url": "stdio://filesystem",
                "description": "Local filesystem access",
                "enabled": false
            }
        }
    })
}

/// Sample production overlay
pub fn production_overlay() -> Value {
    json!({
        "global": {
            "logging": {
                "level": "info",
                "format": "json",
                "audit": true
            }
        },
        "servers": {
            "memory": {
                "connectionType": "https",
                "url": "https://memory.example.com",
                "headers": {
                    "Authorization": "${MCP_AUTHORIZATION}"
                }
            }
        }
    })
}
