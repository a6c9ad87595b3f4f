// Endpoint configuration
// Layered from defaults, an optional config file and GRAPHQL_ENDPOINT__* variables

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::engine::invoker::InvokerOptions;
use crate::{GraphQLEndpointError, Result};

pub const ENV_PREFIX: &str = "GRAPHQL_ENDPOINT";

/// Endpoint server configuration
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
    /// Path the GraphQL endpoint is mounted on
    pub endpoint_path: String,
    pub cors_enabled: bool,
    /// Abandon executions that take longer than this; unset means no limit
    pub execution_timeout_ms: Option<u64>,
    /// JSON file of schema descriptors to publish at startup
    pub schema_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            endpoint_path: "/graphql".to_string(),
            cors_enabled: true,
            execution_timeout_ms: None,
            schema_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl EndpointConfig {
    /// Load defaults, then `path` (if given), then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize::<EndpointConfig>()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.endpoint_path.starts_with('/') {
            return Err(GraphQLEndpointError::Configuration(format!(
                "endpoint_path must start with '/', got '{}'",
                self.endpoint_path
            )));
        }
        if self.endpoint_path == "/health" {
            return Err(GraphQLEndpointError::Configuration(
                "endpoint_path '/health' is reserved for the health check".to_string(),
            ));
        }
        if self.execution_timeout_ms == Some(0) {
            return Err(GraphQLEndpointError::Configuration(
                "execution_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                GraphQLEndpointError::Configuration(format!(
                    "invalid listen address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    pub fn invoker_options(&self) -> InvokerOptions {
        InvokerOptions {
            timeout: self.execution_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = EndpointConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(config, EndpointConfig::default());
        assert_eq!(config.endpoint_path, "/graphql");
        assert_eq!(config.port, 4000);
        assert_eq!(config.invoker_options(), InvokerOptions::default());
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "port = 8080\nendpoint_path = \"/api/graphql\"\nexecution_timeout_ms = 1500"
        )
        .unwrap();

        let config = EndpointConfig::load_with_env(
            Some(file.path()),
            env(&[("GRAPHQL_ENDPOINT__PORT", "9090"), ("GRAPHQL_ENDPOINT__CORS_ENABLED", "false")]),
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.endpoint_path, "/api/graphql");
        assert!(!config.cors_enabled);
        assert_eq!(
            config.invoker_options().timeout,
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result =
            EndpointConfig::load_with_env(Some(Path::new("/nonexistent/endpoint.toml")), env(&[]));
        assert!(matches!(result, Err(GraphQLEndpointError::Configuration(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = EndpointConfig::default();
        config.endpoint_path = "graphql".to_string();
        assert!(config.validate().is_err());

        let mut config = EndpointConfig::default();
        config.endpoint_path = "/health".to_string();
        assert!(config.validate().is_err());

        let mut config = EndpointConfig::default();
        config.execution_timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = EndpointConfig {
            host: "127.0.0.1".to_string(),
            port: 4100,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:4100");

        let config = EndpointConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
