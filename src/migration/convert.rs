//! Legacy to current document conversion
//!
//! [`Conversion`] walks a legacy document once. As it goes it collects the
//! secrets lifted out of URLs and headers, plus a warning for everything an
//! operator should look at.

use super::legacy::{LegacyDocument, LegacyServer};
use super::presets;
use super::sensitive::{
    classify_header, contains_ip_address, header_variable, placeholder, server_variable,
    SERVER_URL_VARIABLE,
};
use crate::config::schema::{ConfigDocument, ConnectionType, Environment, ServerConfig};
use crate::config::secret::{same_secret, secret_string, SecretString};
use indexmap::IndexMap;

/// Version written into migrated documents
pub const MIGRATED_VERSION: &str = "1.0.0";

/// Maps a legacy `type` string, case-insensitively
pub fn map_connection_type(kind: &str) -> Option<ConnectionType> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "http" => Some(ConnectionType::Http),
        "https" => Some(ConnectionType::Https),
        "websocket" | "ws" | "wss" => Some(ConnectionType::Websocket),
        "stdio" => Some(ConnectionType::Stdio),
        _ => None,
    }
}

/// Accumulated state of one migration run
pub struct Conversion {
    environment: Environment,
    extract_secrets: bool,
    secrets: IndexMap<String, SecretString>,
    warnings: Vec<String>,
}

impl Conversion {
    pub fn new(environment: Environment, extract_secrets: bool) -> Self {
        Self {
            environment,
            extract_secrets,
            secrets: IndexMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Converts every entry, keeping the legacy key order
    pub fn convert_document(&mut self, legacy: &LegacyDocument) -> ConfigDocument {
        let servers = legacy
            .iter()
            .map(|(key, server)| (key.clone(), self.convert_server(key, server)))
            .collect();

        ConfigDocument {
            version: MIGRATED_VERSION.to_string(),
            environment: self.environment,
            global: Some(presets::global(self.environment)),
            servers,
        }
    }

    pub fn convert_server(&mut self, key: &str, legacy: &LegacyServer) -> ServerConfig {
        let connection_type = map_connection_type(&legacy.kind).unwrap_or_else(|| {
            self.warn(format!(
                "Server '{key}': unknown connection type '{}', defaulting to http",
                legacy.kind
            ));
            ConnectionType::Http
        });

        let url = if contains_ip_address(&legacy.url) {
            self.extract(key, SERVER_URL_VARIABLE.to_string(), &legacy.url, "URL with IP address")
        } else {
            legacy.url.clone()
        };

        let headers: Option<IndexMap<String, String>> = legacy.headers.as_ref().map(|headers| {
            headers
                .iter()
                .map(|(name, value)| {
                    let value = match classify_header(name, value) {
                        Some(reason) => self.extract(
                            key,
                            header_variable(name),
                            value,
                            &format!("header '{name}' ({})", reason.describe()),
                        ),
                        None => value.clone(),
                    };
                    (name.clone(), value)
                })
                .collect()
        });

        ServerConfig {
            name: legacy.name.clone(),
            connection_type,
            url,
            description: legacy.description.clone(),
            headers,
            timeout_ms: legacy.timeout,
            enabled: None,
            priority: None,
            retry_config: Some(presets::retry_config(self.environment)),
            health_check: Some(presets::health_check(self.environment)),
            fallback: Some(presets::fallback(self.environment)),
            security: presets::security(self.environment),
        }
    }

    /// Secrets collected so far, by variable name
    pub fn secrets(&self) -> &IndexMap<String, SecretString> {
        &self.secrets
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_parts(self) -> (IndexMap<String, SecretString>, Vec<String>) {
        (self.secrets, self.warnings)
    }

    /// Returns what to write in place of `value`
    ///
    /// A shared name already bound to a different value falls back to a
    /// server-scoped name, numbered if even that one is taken.
    fn extract(&mut self, key: &str, variable: String, value: &str, what: &str) -> String {
        if !self.extract_secrets {
            self.warn(format!(
                "Server '{key}': sensitive {what} left inline because secret extraction is disabled"
            ));
            return value.to_string();
        }

        let secret = secret_string(value.to_string());
        let variable = if self.is_free_for(&variable, &secret) {
            variable
        } else {
            let scoped = server_variable(key, &variable);
            let unique = std::iter::once(scoped.clone())
                .chain((2..).map(|n| format!("{scoped}_{n}")))
                .find(|candidate| self.is_free_for(candidate, &secret))
                .unwrap_or(scoped);
            self.warn(format!(
                "Server '{key}': {what} differs from the value already extracted into \
                 {variable}; using {unique} instead"
            ));
            unique
        };

        self.secrets.entry(variable.clone()).or_insert(secret);
        self.warn(format!(
            "Server '{key}': extracted {what} into environment variable {variable}"
        ));
        placeholder(&variable)
    }

    /// Whether `variable` is unbound or already holds `secret`
    fn is_free_for(&self, variable: &str, secret: &SecretString) -> bool {
        self.secrets
            .get(variable)
            .map_or(true, |existing| same_secret(existing, secret))
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use test_case::test_case;

    fn legacy(kind: &str, url: &str, headers: &[(&str, &str)]) -> LegacyServer {
        LegacyServer {
            name: "Svc".to_string(),
            kind: kind.to_string(),
            url: url.to_string(),
            headers: (!headers.is_empty()).then(|| {
                headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            }),
            timeout: None,
            description: "test".to_string(),
        }
    }

    fn exposed(conversion: &Conversion, name: &str) -> String {
        conversion.secrets()[name].expose_secret().as_ref().to_string()
    }

    #[test_case("HTTP" => Some(ConnectionType::Http))]
    #[test_case("https" => Some(ConnectionType::Https))]
    #[test_case("ws" => Some(ConnectionType::Websocket))]
    #[test_case("WebSocket" => Some(ConnectionType::Websocket))]
    #[test_case("Stdio" => Some(ConnectionType::Stdio))]
    #[test_case("carrier-pigeon" => None)]
    fn test_map_connection_type(kind: &str) -> Option<ConnectionType> {
        map_connection_type(kind)
    }

    #[test]
    fn test_ip_url_and_bearer_header_extracted() {
        let mut conversion = Conversion::new(Environment::Production, true);
        let server = conversion.convert_server(
            "svc1",
            &legacy(
                "HTTP",
                "http://10.0.0.5:8080",
                &[("Authorization", "Bearer abc123xyz")],
            ),
        );

        assert_eq!(server.connection_type, ConnectionType::Http);
        assert_eq!(server.url, "${MCP_SERVER_URL}");
        assert_eq!(
            server.headers.as_ref().unwrap()["Authorization"],
            "${MCP_AUTHORIZATION}"
        );
        assert_eq!(exposed(&conversion, "MCP_SERVER_URL"), "http://10.0.0.5:8080");
        assert_eq!(exposed(&conversion, "MCP_AUTHORIZATION"), "Bearer abc123xyz");
        assert_eq!(conversion.warnings().len(), 2);
        assert!(server.security.is_some());
    }

    #[test]
    fn test_unknown_type_defaults_to_http_with_warning() {
        let mut conversion = Conversion::new(Environment::Development, true);
        let server =
            conversion.convert_server("bird", &legacy("carrier-pigeon", "https://a.example.com", &[]));

        assert_eq!(server.connection_type, ConnectionType::Http);
        assert_eq!(conversion.warnings().len(), 1);
        assert!(conversion.warnings()[0].contains("carrier-pigeon"));
    }

    #[test]
    fn test_plain_headers_copied() {
        let mut conversion = Conversion::new(Environment::Staging, true);
        let server = conversion.convert_server(
            "a",
            &legacy("http", "https://a.example.com", &[("Content-Type", "application/json")]),
        );

        assert_eq!(
            server.headers.unwrap()["Content-Type"],
            "application/json"
        );
        assert!(conversion.secrets().is_empty());
        assert!(conversion.warnings().is_empty());
    }

    #[test]
    fn test_extraction_disabled_keeps_values_and_warns() {
        let mut conversion = Conversion::new(Environment::Production, false);
        let server = conversion.convert_server(
            "svc1",
            &legacy("http", "http://10.0.0.5", &[("X-Api-Key", "k")]),
        );

        assert_eq!(server.url, "http://10.0.0.5");
        assert_eq!(server.headers.unwrap()["X-Api-Key"], "k");
        assert!(conversion.secrets().is_empty());
        assert_eq!(conversion.warnings().len(), 2);
        assert!(conversion.warnings()[0].contains("left inline"));
    }

    #[test]
    fn test_conflicting_url_gets_server_scoped_variable() {
        let mut conversion = Conversion::new(Environment::Production, true);
        let first = conversion.convert_server("a", &legacy("http", "http://10.0.0.1", &[]));
        let second = conversion.convert_server("b", &legacy("http", "http://10.0.0.2", &[]));
        let third = conversion.convert_server("c", &legacy("http", "http://10.0.0.1", &[]));

        assert_eq!(first.url, "${MCP_SERVER_URL}");
        assert_eq!(second.url, "${MCP_B_SERVER_URL}");
        assert_eq!(third.url, "${MCP_SERVER_URL}");
        assert_eq!(conversion.secrets().len(), 2);
        assert_eq!(exposed(&conversion, "MCP_SERVER_URL"), "http://10.0.0.1");
        assert_eq!(exposed(&conversion, "MCP_B_SERVER_URL"), "http://10.0.0.2");
        assert!(conversion
            .warnings()
            .iter()
            .any(|w| w.contains("using MCP_B_SERVER_URL instead")));
    }

    #[test]
    fn test_per_server_authorization_headers_never_inline() {
        let mut conversion = Conversion::new(Environment::Production, true);
        let a = conversion.convert_server(
            "a",
            &legacy("https", "https://a.example.com", &[("Authorization", "Bearer tokenA")]),
        );
        let b = conversion.convert_server(
            "b",
            &legacy("https", "https://b.example.com", &[("Authorization", "Bearer tokenB")]),
        );

        assert_eq!(a.headers.unwrap()["Authorization"], "${MCP_AUTHORIZATION}");
        assert_eq!(b.headers.unwrap()["Authorization"], "${MCP_B_AUTHORIZATION}");
        assert_eq!(exposed(&conversion, "MCP_AUTHORIZATION"), "Bearer tokenA");
        assert_eq!(exposed(&conversion, "MCP_B_AUTHORIZATION"), "Bearer tokenB");
    }

    #[test]
    fn test_scoped_name_collision_is_numbered() {
        let mut conversion = Conversion::new(Environment::Production, true);
        conversion.convert_server("b", &legacy("http", "http://10.0.0.1", &[]));
        conversion.convert_server("b", &legacy("http", "http://10.0.0.2", &[]));
        let third = conversion.convert_server("b", &legacy("http", "http://10.0.0.3", &[]));

        assert_eq!(third.url, "${MCP_B_SERVER_URL_2}");
        assert_eq!(exposed(&conversion, "MCP_B_SERVER_URL_2"), "http://10.0.0.3");
        assert_eq!(conversion.secrets().len(), 3);
    }

    #[test]
    fn test_convert_document_shape() {
        let mut document = LegacyDocument::new();
        let mut server = legacy("https", "https://a.example.com", &[]);
        server.timeout = Some(15000);
        document.insert("zeta".to_string(), server);
        document.insert("alpha".to_string(), legacy("stdio", "stdio://local", &[]));

        let mut conversion = Conversion::new(Environment::Development, true);
        let converted = conversion.convert_document(&document);

        assert_eq!(converted.version, MIGRATED_VERSION);
        assert_eq!(converted.environment, Environment::Development);
        let keys: Vec<_> = converted.servers.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(converted.servers["zeta"].timeout_ms, Some(15000));
        assert!(converted.servers["zeta"].security.is_none());
        assert!(!converted.servers["zeta"].fallback.as_ref().unwrap().cache_enabled);
    }
}
