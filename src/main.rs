// mcp-config - MCP server configuration tool
// Licensed under the MIT License

use mcp_config::cli::{Cli, Commands, EXIT_FATAL};
use mcp_config::config::{LogFormat, LogLevel, LoggingConfig};
use mcp_config::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let logging_config = LoggingConfig {
        level: cli.log_level.unwrap_or(LogLevel::Info),
        format: cli.log_format.unwrap_or(LogFormat::Text),
        audit: true,
    };
    let guard = match init_logging(&logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mcp-config");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::ValidateConfig(args) => args.execute(&cli.load_options()).await,
        Commands::Status(args) => args.execute(&cli.load_options()).await,
        Commands::Migrate(args) => args.execute().await,
        Commands::Init(args) => args.execute().await,
    }
}
