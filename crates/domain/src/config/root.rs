use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::load::LoadConfig;
use super::logging::LoggingConfig;
use super::resolver::ResolverSettings;
use super::target::TargetConfig;
use crate::{DnsProtocol, RecordType};

const DEFAULT_CONFIG_FILE: &str = "dnsprobe.toml";

/// Main configuration structure for the probe
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Exchange timeouts
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// What to resolve and where
    #[serde(default)]
    pub target: TargetConfig,

    /// Virtual users and iterations
    #[serde(default)]
    pub load: LoadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsprobe.toml in current directory
    /// 3. Default configuration
    ///
    /// Command-line overrides are applied last and the result is validated.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
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
        if let Some(address) = overrides.address {
            self.target.address = address;
        }
        if let Some(domain) = overrides.domain {
            self.target.domain = domain;
        }
        if let Some(record_type) = overrides.record_type {
            self.target.record_type = record_type;
        }
        if let Some(protocol) = overrides.protocol {
            self.target.protocol = protocol;
        }
        if let Some(vus) = overrides.vus {
            self.load.vus = vus;
        }
        if let Some(iterations) = overrides.iterations {
            self.load.iterations = iterations;
        }
        if let Some(timeout) = overrides.dial_timeout {
            self.resolver.dial_timeout = Some(timeout);
        }
        if let Some(timeout) = overrides.read_timeout {
            self.resolver.read_timeout = Some(timeout);
        }
        if let Some(timeout) = overrides.write_timeout {
            self.resolver.write_timeout = Some(timeout);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver
            .to_resolver_config()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        self.target
            .record_type
            .parse::<RecordType>()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        self.target
            .protocol
            .parse::<DnsProtocol>()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.target.address.is_empty() {
            return Err(ConfigError::Validation(
                "Target address cannot be empty".to_string(),
            ));
        }

        if self.load.vus == 0 {
            return Err(ConfigError::Validation(
                "At least one virtual user is required".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub address: Option<String>,
    pub domain: Option<String>,
    pub record_type: Option<String>,
    pub protocol: Option<String>,
    pub vus: Option<usize>,
    pub iterations: Option<usize>,
    pub dial_timeout: Option<String>,
    pub read_timeout: Option<String>,
    pub write_timeout: Option<String>,
    pub log_level: Option<String>,
}
