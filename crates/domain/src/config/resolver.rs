use crate::duration::parse_duration;
use crate::ProbeError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts applied to every exchange. A zero duration disables the bound.
///
/// Setters are meant for setup time; once a resolver is shared between
/// concurrent callers the configuration is only read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    pub dial_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl ResolverConfig {
    pub fn set_dial_timeout(&mut self, value: &str) -> Result<(), ProbeError> {
        self.dial_timeout = parse_duration(value)?;
        Ok(())
    }

    pub fn set_read_timeout(&mut self, value: &str) -> Result<(), ProbeError> {
        self.read_timeout = parse_duration(value)?;
        Ok(())
    }

    pub fn set_write_timeout(&mut self, value: &str) -> Result<(), ProbeError> {
        self.write_timeout = parse_duration(value)?;
        Ok(())
    }
}

/// Timeout strings as written in the configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResolverSettings {
    #[serde(default)]
    pub dial_timeout: Option<String>,

    #[serde(default)]
    pub read_timeout: Option<String>,

    #[serde(default)]
    pub write_timeout: Option<String>,
}

impl ResolverSettings {
    pub fn to_resolver_config(&self) -> Result<ResolverConfig, ProbeError> {
        let mut config = ResolverConfig::default();
        if let Some(value) = &self.dial_timeout {
            config.set_dial_timeout(value)?;
        }
        if let Some(value) = &self.read_timeout {
            config.set_read_timeout(value)?;
        }
        if let Some(value) = &self.write_timeout {
            config.set_write_timeout(value)?;
        }
        Ok(config)
    }
}
