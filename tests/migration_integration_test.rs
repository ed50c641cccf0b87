//! Integration tests for the legacy configuration migrator

use mcp_config::config::{ConfigManager, Environment, LoadOptions};
use mcp_config::migration::{MigrationOptions, Migrator};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn write_legacy(dir: &Path, legacy: &Value) -> std::path::PathBuf {
    let path = dir.join("legacy-config.json");
    std::fs::write(&path, serde_json::to_string_pretty(legacy).unwrap()).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn options(input: &Path, output: &Path, environment: Environment) -> MigrationOptions {
    let mut options = MigrationOptions::new(input);
    options.output_dir = output.to_path_buf();
    options.environment = environment;
    options
}

#[tokio::test]
async fn test_migrates_ip_url_and_bearer_token() {
    let dir = TempDir::new().unwrap();
    let input = write_legacy(
        dir.path(),
        &json!({"svc1": {
            "name": "Svc",
            "type": "HTTP",
            "url": "http://10.0.0.5:8080",
            "headers": {"Authorization": "Bearer abc123xyz"},
            "description": "test"
        }}),
    );
    let output = dir.path().join("config");

    let outcome = Migrator::new(options(&input, &output, Environment::Production))
        .run()
        .await
        .unwrap();

    let config = read_json(&output.join("config.production.json"));
    let svc1 = &config["servers"]["svc1"];
    assert_eq!(config["version"], "1.0.0");
    assert_eq!(config["environment"], "production");
    assert_eq!(svc1["connectionType"], "http");
    assert_eq!(svc1["url"], "${MCP_SERVER_URL}");
    assert_eq!(svc1["headers"]["Authorization"], "${MCP_AUTHORIZATION}");
    assert_eq!(svc1["retryConfig"]["maxAttempts"], 5);
    assert_eq!(svc1["healthCheck"]["intervalMs"], 30000);
    assert_eq!(svc1["security"]["encryption"]["algorithm"], "aes-256-gcm");
    assert_eq!(svc1["fallback"]["cacheEnabled"], true);
    assert_eq!(config["global"]["logging"]["audit"], true);

    let env_file = std::fs::read_to_string(output.join(".env.production")).unwrap();
    let lines: Vec<&str> = env_file.lines().collect();
    assert!(lines.contains(&"MCP_SERVER_URL=http://10.0.0.5:8080"));
    assert!(lines.contains(&"MCP_AUTHORIZATION=Bearer abc123xyz"));

    let report = read_json(&output.join("migration-report.json"));
    assert_eq!(report["secretsExtracted"], 2);
    assert_eq!(report["warnings"].as_array().unwrap().len(), 2);
    assert!(!report["nextSteps"].as_array().unwrap().is_empty());
    assert_eq!(outcome.report.secrets_extracted, 2);
}

#[tokio::test]
async fn test_each_server_authorization_gets_its_own_variable() {
    let dir = TempDir::new().unwrap();
    let input = write_legacy(
        dir.path(),
        &json!({
            "a": {
                "name": "A",
                "type": "https",
                "url": "https://a.example.com",
                "headers": {"Authorization": "Bearer tokenA"},
                "description": "a"
            },
            "b": {
                "name": "B",
                "type": "https",
                "url": "https://b.example.com",
                "headers": {"Authorization": "Bearer tokenB"},
                "description": "b"
            }
        }),
    );
    let output = dir.path().join("config");

    let outcome = Migrator::new(options(&input, &output, Environment::Production))
        .run()
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&outcome.config_path).unwrap();
    assert!(!raw.contains("tokenA"));
    assert!(!raw.contains("tokenB"));

    let config: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        config["servers"]["a"]["headers"]["Authorization"],
        "${MCP_AUTHORIZATION}"
    );
    assert_eq!(
        config["servers"]["b"]["headers"]["Authorization"],
        "${MCP_B_AUTHORIZATION}"
    );

    let env_file = std::fs::read_to_string(output.join(".env.production")).unwrap();
    let lines: Vec<&str> = env_file.lines().collect();
    assert!(lines.contains(&"MCP_AUTHORIZATION=Bearer tokenA"));
    assert!(lines.contains(&"MCP_B_AUTHORIZATION=Bearer tokenB"));
    assert_eq!(outcome.report.secrets_extracted, 2);
}

#[tokio::test]
async fn test_unknown_type_becomes_http() {
    let dir = TempDir::new().unwrap();
    let input = write_legacy(
        dir.path(),
        &json!({"bird": {
            "name": "Bird",
            "type": "carrier-pigeon",
            "url": "https://coop.example.com",
            "description": "slow"
        }}),
    );
    let output = dir.path().join("config");

    let outcome = Migrator::new(options(&input, &output, Environment::Development))
        .run()
        .await
        .unwrap();

    assert_eq!(
        read_json(&outcome.config_path)["servers"]["bird"]["connectionType"],
        "http"
    );
    assert!(outcome
        .report
        .warnings
        .iter()
        .any(|w| w.contains("carrier-pigeon")));
    assert!(outcome.env_path.is_none());
    assert!(!output.join(".env.development").exists());
}

#[tokio::test]
async fn test_migrated_output_loads() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let input = write_legacy(
        dir.path(),
        &json!({
            "memory": {
                "name": "Memory",
                "type": "https",
                "url": "https://memory.example.com",
                "headers": {"X-Api-Key": "key-1"},
                "timeout": 8000,
                "description": "memory"
            },
            "local": {"name": "Local", "type": "stdio", "url": "stdio://local", "description": "local"}
        }),
    );
    let output = dir.path().join("config");

    Migrator::new(options(&input, &output, Environment::Staging))
        .run()
        .await
        .unwrap();

    std::env::set_var("MCP_X_API_KEY", "key-1");
    let manager = ConfigManager::new();
    let loaded = manager
        .load(&LoadOptions::new(&output).with_environment("staging"))
        .await;
    std::env::remove_var("MCP_X_API_KEY");

    let document = loaded.unwrap();
    assert_eq!(document.servers["memory"].timeout_ms, Some(8000));
    assert_eq!(
        document.servers["memory"].headers.as_ref().unwrap()["X-Api-Key"],
        "key-1"
    );
    assert!(document.servers["local"].security.is_none());
}

#[tokio::test]
async fn test_validate_probes_migrated_servers() {
    let mut mock_server = mockito::Server::new_async().await;
    let mock = mock_server
        .mock("GET", "/health")
        .match_header("authorization", "Bearer abc123xyz")
        .with_status(200)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_legacy(
        dir.path(),
        &json!({"svc1": {
            "name": "Svc",
            "type": "http",
            "url": mock_server.url(),
            "headers": {"Authorization": "Bearer abc123xyz"},
            "description": "test"
        }}),
    );
    let output = dir.path().join("config");

    let mut opts = options(&input, &output, Environment::Production);
    opts.validate_connections = true;
    let outcome = Migrator::new(opts).run().await.unwrap();

    mock.assert_async().await;
    assert!(!outcome
        .report
        .warnings
        .iter()
        .any(|w| w.contains("Connection check failed")));
    // plain http in production
    assert!(outcome
        .report
        .warnings
        .iter()
        .any(|w| w.contains("INSECURE_PROTOCOL")));
}

#[tokio::test]
async fn test_validate_failure_is_only_a_warning() {
    let mut mock_server = mockito::Server::new_async().await;
    let _mock = mock_server
        .mock("GET", "/health")
        .with_status(503)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_legacy(
        dir.path(),
        &json!({"svc1": {
            "name": "Svc",
            "type": "http",
            "url": mock_server.url(),
            "description": "test"
        }}),
    );
    let output = dir.path().join("config");

    let mut opts = options(&input, &output, Environment::Staging);
    opts.validate_connections = true;
    let outcome = Migrator::new(opts).run().await.unwrap();

    let report = read_json(&outcome.report_path);
    let warnings = report["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap().contains("Connection check failed for 'svc1'")));
    assert!(outcome.config_path.exists());
}

#[tokio::test]
async fn test_unparseable_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("legacy.json");
    std::fs::write(&input, "[1, 2, 3]").unwrap();
    let output = dir.path().join("config");

    let err = Migrator::new(options(&input, &output, Environment::Production))
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MIGRATION_INPUT_ERROR");
    assert!(!output.exists());
}
