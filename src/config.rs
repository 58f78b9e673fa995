use std::{collections::HashMap, time::Duration};

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::domain::blocklist::DEFAULT_MAX_ENTRIES;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub blocklist: BlocklistConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single request, in milliseconds.
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocklistConfig {
    /// Addresses blocked at start-up.
    #[serde(default)]
    pub seed: Vec<String>,
    /// Maximum number of distinct blocked addresses.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            seed: Vec::new(),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("server.host", "localhost")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout_ms", 5000)?
            .set_default("blocklist.max_entries", DEFAULT_MAX_ENTRIES as i64)?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Should be in the format APP_SERVER__PORT or APP_BLOCKLIST__SEED=10.0.0.1,::1
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("blocklist.seed"),
            );
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::load().expect("Failed to load config");

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout(), Duration::from_secs(5));
        assert!(config.blocklist.seed.is_empty());
        assert_eq!(config.blocklist.max_entries, 1024);
    }

    #[test]
    fn test_env_config() {
        let mut env_vars = HashMap::new();
        env_vars.insert("server.host".to_string(), "0.0.0.0".to_string());
        env_vars.insert("server.port".to_string(), "8080".to_string());
        env_vars.insert("server.request_timeout_ms".to_string(), "250".to_string());
        env_vars.insert("blocklist.max_entries".to_string(), "16".to_string());

        let config = Config::load_with_sources(Some(env_vars)).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout(), Duration::from_millis(250));
        assert_eq!(config.blocklist.max_entries, 16);
    }

    #[test]
    fn test_partial_env_override() {
        let mut env_vars = HashMap::new();
        // We just override the host
        env_vars.insert("server.host".to_string(), "192.168.1.1".to_string());

        let config = Config::load_with_sources(Some(env_vars)).expect("Failed to load config");

        assert_eq!(config.server.host, "192.168.1.1");
        // The other values should use default
        assert_eq!(config.server.port, 3000);
        assert!(config.blocklist.seed.is_empty());
    }
}
