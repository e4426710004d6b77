use serde::{Deserialize, Serialize};

use super::database::DatabaseConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::stub::StubConfig;
use crate::domain_name::{fqdn, is_valid_name};

/// Main configuration structure for stubzone
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Stub-zone discovery and forwarding
    #[serde(default)]
    pub stub: StubConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Service record backend
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. stubzone.toml in current directory
    /// 3. /etc/stubzone/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.stub.domain = fqdn(&config.stub.domain);
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
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(domain) = overrides.domain {
            self.stub.domain = domain;
        }
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.bind_address.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid bind address '{}'",
                self.server.bind_address
            )));
        }

        let domain = fqdn(&self.stub.domain);
        if domain == "." || !is_valid_name(&domain) {
            return Err(ConfigError::Validation(format!(
                "Invalid stub domain '{}'",
                self.stub.domain
            )));
        }

        if self.stub.upstream_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout cannot be 0".to_string(),
            ));
        }

        if self.stub.refresh_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Stub zone refresh interval cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("stubzone.toml").exists() {
            Some("stubzone.toml".to_string())
        } else if std::path::Path::new("/etc/stubzone/config.toml").exists() {
            Some("/etc/stubzone/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub domain: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}
