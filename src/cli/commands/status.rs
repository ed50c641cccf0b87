//! Status command implementation
//!
//! This module implements the `status` command: load the configuration and
//! probe every enabled server.

use super::exit_code_for;
use crate::cli::{EXIT_CONNECTION_ERROR, EXIT_OK};
use crate::config::manager::{ConfigManager, LoadOptions};
use crate::health::{ConnectionState, ConnectionStatus};
use clap::Args;
use indexmap::IndexMap;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print statuses as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, options: &LoadOptions) -> anyhow::Result<i32> {
        self.execute_with(&ConfigManager::new(), options).await
    }

    /// Execute against an existing manager
    pub async fn execute_with(
        &self,
        manager: &ConfigManager,
        options: &LoadOptions,
    ) -> anyhow::Result<i32> {
        tracing::info!("Checking server status");

        if let Err(e) = manager.load(options).await {
            crate::log_error_with_context!(&e, "Failed to load configuration");
            println!("❌ Failed to load configuration");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }

        let statuses = match manager.connection_statuses().await {
            Ok(statuses) => statuses,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to check servers");
                println!("❌ Failed to check servers");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        } else {
            print_table(&statuses);
        }

        let failed = statuses.values().filter(|s| s.is_failure()).count();
        if failed > 0 {
            tracing::warn!(failed, total = statuses.len(), "Some servers are unreachable");
            Ok(EXIT_CONNECTION_ERROR)
        } else {
            Ok(EXIT_OK)
        }
    }
}

fn print_table(statuses: &IndexMap<String, ConnectionStatus>) {
    println!("📊 Server Status");
    println!();

    if statuses.is_empty() {
        println!("No enabled servers configured");
        println!();
        return;
    }

    println!("{:<24} {:<14} {:>10}  Error", "Server", "Status", "Time (ms)");
    println!("{}", "-".repeat(72));
    for (key, status) in statuses {
        let icon = match status.status {
            ConnectionState::Connected => "✅",
            ConnectionState::Unknown => "❔",
            ConnectionState::Disconnected | ConnectionState::Error => "❌",
        };
        let time = status
            .response_time_ms
            .map(|ms| ms.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {icon} {:<11} {:>10}  {}",
            key,
            status.status.to_string(),
            time,
            status.error.as_deref().unwrap_or("")
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ServerConfig;
    use crate::domain::Result;
    use crate::health::HealthProbe;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct FixedProbe(ConnectionState);

    #[async_trait]
    impl HealthProbe for FixedProbe {
        async fn probe(&self, _key: &str, _server: &ServerConfig) -> Result<ConnectionStatus> {
            Ok(match self.0 {
                ConnectionState::Connected => ConnectionStatus::connected(3),
                _ => ConnectionStatus::disconnected(None, "refused"),
            })
        }
    }

    fn config_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"version": "1.0.0", "servers": {"a": {"name": "A", "connectionType": "https", "url": "https://a.example.com", "description": "a"}}}"#,
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_status_all_connected() {
        let dir = config_dir();
        let manager = ConfigManager::with_probe(Arc::new(FixedProbe(ConnectionState::Connected)));
        let options = LoadOptions::new(dir.path()).with_environment("staging");

        let code = StatusArgs { json: false }
            .execute_with(&manager, &options)
            .await
            .unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[tokio::test]
    async fn test_status_failure_is_connection_error() {
        let dir = config_dir();
        let manager =
            ConfigManager::with_probe(Arc::new(FixedProbe(ConnectionState::Disconnected)));
        let options = LoadOptions::new(dir.path()).with_environment("staging");

        let code = StatusArgs { json: true }
            .execute_with(&manager, &options)
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONNECTION_ERROR);
    }
}
