//! Connection health probing
//!
//! Probes fan out concurrently, one per server, and every outcome is collected
//! whether it succeeded or not. A failing probe never cancels its siblings.
//!
//! # Example
//!
//! ```no_run
//! use mcp_config::health::{probe_all, HttpHealthProbe};
//! # use mcp_config::config::ServerConfig;
//!
//! # async fn example(servers: Vec<(String, ServerConfig)>) {
//! let probe = HttpHealthProbe::new();
//! let statuses = probe_all(&probe, servers.iter().map(|(k, s)| (k.as_str(), s))).await;
//! for (key, status) in &statuses {
//!     println!("{key}: {}", status.status);
//! }
//! # }
//! ```

pub mod probe;
pub mod status;

pub use probe::{HealthProbe, HttpHealthProbe};
pub use status::{ConnectionState, ConnectionStatus};

use crate::config::schema::ServerConfig;
use futures::future::join_all;
use indexmap::IndexMap;

/// Probes every server concurrently and waits for all of them
///
/// A probe returning `Err` is recorded as a status of `error` carrying the
/// error message. Results keep the input order.
pub async fn probe_all<'a, I>(probe: &dyn HealthProbe, servers: I) -> IndexMap<String, ConnectionStatus>
where
    I: IntoIterator<Item = (&'a str, &'a ServerConfig)>,
{
    let checks = servers.into_iter().map(|(key, server)| async move {
        let status = match probe.probe(key, server).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(server = key, error = %e, "Health probe failed");
                ConnectionStatus::error(e.to_string())
            }
        };
        (key.to_string(), status)
    });

    let statuses: IndexMap<String, ConnectionStatus> = join_all(checks).await.into_iter().collect();

    let healthy = statuses
        .values()
        .filter(|s| s.status == ConnectionState::Connected)
        .count();
    tracing::info!(
        healthy,
        total = statuses.len(),
        "Health check complete"
    );
    statuses
}
