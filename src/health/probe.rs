//! Health probes
//!
//! [`HttpHealthProbe`] checks HTTP(S) servers with a GET against their health
//! endpoint and WebSocket servers with a TCP connect. Stdio servers are not
//! probed. Every probe is bounded by a timeout taken from the server's
//! configuration.

use super::status::ConnectionStatus;
use crate::config::schema::{ConnectionType, ServerConfig};
use crate::domain::{McpError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use url::Url;

/// Timeout used when neither the health check nor the server sets one
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;

/// Checks whether a server is reachable
///
/// Returning `Err` means the probe could not complete; callers record that as
/// a status of `error` for the server.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probes one server
    async fn probe(&self, key: &str, server: &ServerConfig) -> Result<ConnectionStatus>;

    /// Drops any cached connections
    fn reset(&self) {}
}

/// Timeout applied to a probe of `server`
///
/// `healthCheck.timeoutMs`, then `timeoutMs`, then [`DEFAULT_PROBE_TIMEOUT_MS`].
pub fn probe_timeout(server: &ServerConfig) -> Duration {
    let ms = server
        .health_check
        .as_ref()
        .map(|hc| hc.timeout_ms)
        .or(server.timeout_ms)
        .unwrap_or(DEFAULT_PROBE_TIMEOUT_MS);
    Duration::from_millis(ms)
}

/// URL requested by an HTTP probe of `server`
pub fn health_url(server: &ServerConfig) -> String {
    match server.health_check.as_ref().filter(|hc| hc.enabled) {
        Some(hc) => {
            let base = server.url.trim_end_matches('/');
            if hc.endpoint.starts_with('/') {
                format!("{base}{}", hc.endpoint)
            } else {
                format!("{base}/{}", hc.endpoint)
            }
        }
        None => server.url.clone(),
    }
}

/// Probe over HTTP(S) and TCP, keeping one client per server key
#[derive(Default)]
pub struct HttpHealthProbe {
    clients: Mutex<HashMap<String, reqwest::Client>>,
}

impl HttpHealthProbe {
    /// Creates a probe with an empty client cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached clients
    pub fn cached_clients(&self) -> usize {
        self.clients.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn client_for(&self, key: &str, timeout: Duration) -> Result<reqwest::Client> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| McpError::Other("Client cache lock poisoned".to_string()))?;

        if let Some(client) = clients.get(key) {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| McpError::Probe(format!("Failed to build HTTP client: {e}")))?;
        clients.insert(key.to_string(), client.clone());
        Ok(client)
    }

    async fn probe_http(&self, key: &str, server: &ServerConfig) -> Result<ConnectionStatus> {
        let timeout = probe_timeout(server);
        let client = self.client_for(key, timeout)?;
        let url = health_url(server);

        let mut request = client.get(&url);
        if let Some(headers) = &server.headers {
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        let started = Instant::now();
        let response = tokio::time::timeout(timeout, request.send())
            .await
            .map_err(|_| McpError::Probe(format!("Timed out after {} ms", timeout.as_millis())))?
            .map_err(|e| McpError::Probe(format!("Request to {url} failed: {e}")))?;
        let elapsed = elapsed_ms(started);

        let status = response.status();
        let healthy = match server.health_check.as_ref().filter(|hc| hc.enabled) {
            Some(hc) => status.as_u16() == hc.expected_status,
            None => status.is_success(),
        };

        if healthy {
            tracing::debug!(server = key, %url, elapsed_ms = elapsed, "Health probe passed");
            Ok(ConnectionStatus::connected(elapsed))
        } else {
            tracing::warn!(server = key, %url, status = status.as_u16(), "Health probe returned unexpected status");
            Ok(ConnectionStatus::disconnected(
                Some(elapsed),
                format!("Unexpected HTTP status {}", status.as_u16()),
            ))
        }
    }

    async fn probe_tcp(&self, key: &str, server: &ServerConfig) -> Result<ConnectionStatus> {
        let url = Url::parse(&server.url)
            .map_err(|e| McpError::Probe(format!("Invalid URL '{}': {e}", server.url)))?;
        let host = url
            .host_str()
            .ok_or_else(|| McpError::Probe(format!("URL '{}' has no host", server.url)))?
            .to_string();
        let port = url
            .port_or_known_default()
            .or(match url.scheme() {
                "ws" => Some(80),
                "wss" => Some(443),
                _ => None,
            })
            .ok_or_else(|| McpError::Probe(format!("URL '{}' has no port", server.url)))?;

        let timeout = probe_timeout(server);
        let started = Instant::now();
        tokio::time::timeout(timeout, tokio::net::TcpStream::connect((host.as_str(), port)))
            .await
            .map_err(|_| McpError::Probe(format!("Timed out after {} ms", timeout.as_millis())))?
            .map_err(|e| McpError::Probe(format!("Connect to {host}:{port} failed: {e}")))?;

        let elapsed = elapsed_ms(started);
        tracing::debug!(server = key, %host, port, elapsed_ms = elapsed, "TCP probe passed");
        Ok(ConnectionStatus::connected(elapsed))
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self, key: &str, server: &ServerConfig) -> Result<ConnectionStatus> {
        match server.connection_type {
            ConnectionType::Http | ConnectionType::Https => self.probe_http(key, server).await,
            ConnectionType::Websocket => self.probe_tcp(key, server).await,
            ConnectionType::Stdio => {
                tracing::debug!(server = key, "Skipping probe for stdio server");
                Ok(ConnectionStatus::unknown())
            }
        }
    }

    fn reset(&self) {
        if let Ok(mut clients) = self.clients.lock() {
            clients.clear();
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
