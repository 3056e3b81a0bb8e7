use serde::Deserialize;
use std::net::IpAddr;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::rules::RuleSet;
use super::server::ServerConfig;

/// Main configuration structure for Switchyard DNS
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Routing rules in match order; `default` is required
    #[serde(default)]
    pub rules: RuleSet,
}

impl Config {
    /// Load configuration from file.
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. switchyard-dns.toml in current directory
    /// 3. /etc/switchyard-dns/config.toml
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let path = Self::resolve_path(path)?;
        let mut config = Self::from_file(&path)?;

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    /// Picks the config file this process will read (and watch for reloads).
    pub fn resolve_path(explicit: Option<&str>) -> Result<String, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_string());
        }
        for candidate in ["switchyard-dns.toml", "/etc/switchyard-dns/config.toml"] {
            if std::path::Path::new(candidate).exists() {
                return Ok(candidate.to_string());
            }
        }
        Err(ConfigError::Validation(
            "no configuration file found (looked for switchyard-dns.toml and \
             /etc/switchyard-dns/config.toml)"
                .to_string(),
        ))
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(upstreams) = overrides.default_upstreams {
            self.rules.set_default(upstreams);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.bind_address.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "invalid bind address '{}'",
                self.server.bind_address
            )));
        }

        self.rules.validate()
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub default_upstreams: Option<Vec<String>>,
}
