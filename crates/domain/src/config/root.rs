use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::{LogFormat, LoggingConfig};
use super::resolver::ResolverConfig;
use super::server::ServerConfig;
use crate::upstream_addr::UpstreamAddr;
use crate::upstream_registry::{UpstreamRegistry, BUILTIN_UPSTREAMS};

const LOCAL_CONFIG_PATH: &str = "dnsgate.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dnsgate/config.toml";

/// Main configuration structure for dnsgate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream connection timeouts
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Response cache in front of the lookup routes
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Provider name to `host:port`
    #[serde(default = "default_upstreams")]
    pub upstreams: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            resolver: ResolverConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
            upstreams: default_upstreams(),
        }
    }
}

fn default_upstreams() -> BTreeMap<String, String> {
    BUILTIN_UPSTREAMS
        .iter()
        .map(|(name, addr)| (name.to_string(), addr.to_string()))
        .collect()
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsgate.toml in current directory
    /// 3. /etc/dnsgate/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        if overrides.disable_cache {
            self.cache.enabled = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.web_port == 0 {
            return Err(ConfigError::Validation("Web port cannot be 0".to_string()));
        }

        self.server.socket_addr()?;

        if self.resolver.dial_timeout_secs == 0 || self.resolver.query_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Resolver timeouts must be greater than 0".to_string(),
            ));
        }

        if self.cache.enabled && (self.cache.ttl_ms == 0 || self.cache.max_entries == 0) {
            return Err(ConfigError::Validation(
                "Cache ttl_ms and max_entries must be greater than 0 when the cache is enabled"
                    .to_string(),
            ));
        }

        if self.upstreams.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        for (name, addr) in &self.upstreams {
            addr.parse::<UpstreamAddr>().map_err(|e| {
                ConfigError::Validation(format!("Upstream '{}' has an invalid address: {}", name, e))
            })?;
        }

        Ok(())
    }

    pub fn upstream_registry(&self) -> Result<UpstreamRegistry, ConfigError> {
        UpstreamRegistry::from_entries(
            self.upstreams
                .iter()
                .map(|(name, addr)| (name.clone(), addr.as_str())),
        )
        .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub disable_cache: bool,
}
