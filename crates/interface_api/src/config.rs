//! API configuration

use std::path::PathBuf;

use serde::Deserialize;

use domain_quote::{QuoteError, RateTable};
use infra_store::StoreConfig;

/// Environment variable prefix, e.g. `QUOTE_API_PORT`
pub const ENV_PREFIX: &str = "QUOTE_API";

/// API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Root directory of the file store
    pub storage_dir: PathBuf,
    /// Keep everything in memory instead of on disk
    pub in_memory: bool,
    /// Log level
    pub log_level: String,
    /// JSON rate table replacing the built-in one
    pub rate_table_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage_dir: PathBuf::from("./data"),
            in_memory: false,
            log_level: "info".to_string(),
            rate_table_path: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `QUOTE_API_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The store the adapters should use
    pub fn store_config(&self) -> StoreConfig {
        if self.in_memory {
            StoreConfig::memory()
        } else {
            StoreConfig::file(self.storage_dir.clone())
        }
    }

    /// The configured rate table, or the built-in one
    pub fn rate_table(&self) -> Result<RateTable, QuoteError> {
        match &self.rate_table_path {
            Some(path) => RateTable::from_path(path),
            None => Ok(RateTable::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infra_store::StoreBackend;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(
            config.store_config().backend,
            StoreBackend::File {
                root: PathBuf::from("./data")
            }
        );
        assert_eq!(config.rate_table().unwrap(), RateTable::default());
    }

    #[test]
    fn test_in_memory_store() {
        let config = ApiConfig {
            in_memory: true,
            ..ApiConfig::default()
        };
        assert_eq!(config.store_config().backend, StoreBackend::Memory);
    }

    #[test]
    fn test_missing_rate_table_is_an_error() {
        let config = ApiConfig {
            rate_table_path: Some(PathBuf::from("/nonexistent/rates.json")),
            ..ApiConfig::default()
        };
        assert!(matches!(
            config.rate_table(),
            Err(QuoteError::InvalidRateTable(_))
        ));
    }
}
