//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

use stockroom_core::RestorePolicy;
use stockroom_db::DbConfig;

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Interface the HTTP server binds to
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Which line items a sale deletion gives back to stock
    pub restore_policy: RestorePolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_path: PathBuf::from("./stockroom.db"),
            max_connections: 5,
            restore_policy: RestorePolicy::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    ///
    /// Missing keys fall back to [`ApiConfig::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            host: lookup("STOCKROOM_HOST").unwrap_or(defaults.host),

            port: match lookup("STOCKROOM_PORT") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("STOCKROOM_PORT".to_string()))?,
                None => defaults.port,
            },

            database_path: lookup("STOCKROOM_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: match lookup("STOCKROOM_DB_MAX_CONNECTIONS") {
                Some(value) => value.trim().parse().map_err(|_| {
                    ConfigError::InvalidValue("STOCKROOM_DB_MAX_CONNECTIONS".to_string())
                })?,
                None => defaults.max_connections,
            },

            restore_policy: match lookup("STOCKROOM_RESTORE_POLICY") {
                Some(value) => value.parse().map_err(|_| {
                    ConfigError::InvalidValue("STOCKROOM_RESTORE_POLICY".to_string())
                })?,
                None => defaults.restore_policy,
            },
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "STOCKROOM_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the bind address string (e.g., "0.0.0.0:3000").
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.restore_policy, RestorePolicy::FirstItem);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOCKROOM_HOST", "127.0.0.1"),
            ("STOCKROOM_PORT", "8080"),
            ("STOCKROOM_DB_PATH", "/tmp/shop.db"),
            ("STOCKROOM_DB_MAX_CONNECTIONS", "2"),
            ("STOCKROOM_RESTORE_POLICY", "all_items"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.database_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.restore_policy, RestorePolicy::AllItems);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("STOCKROOM_PORT", "not-a-port"),
            ("STOCKROOM_PORT", "70000"),
            ("STOCKROOM_DB_MAX_CONNECTIONS", "0"),
            ("STOCKROOM_RESTORE_POLICY", "some_items"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == key));
        }
    }
}
