//! Device configuration
//!
//! ```toml
//! device_type = "zkteco"
//! host = "192.168.1.201"
//! # port defaults to 4370 (zkteco) or 80 (suprema)
//! timeout_secs = 5
//! capture_timeout_secs = 30
//! capture_delay_ms = 3000
//! ```

use std::path::Path;
use std::time::Duration;

use biogate_core::constants::{DEFAULT_CAPTURE_DELAY_MS, DEFAULT_CAPTURE_TIMEOUT, DEFAULT_TIMEOUT};
use biogate_types::DeviceEndpoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::FixedDelayCapture;
use crate::manager::DeviceFamily;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Connection settings for one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device family tag, `zkteco` or `suprema`
    pub device_type: String,

    pub host: String,

    /// Family default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Per-exchange timeout in seconds (default: 5)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on the enrollment capture wait (default: 30)
    #[serde(default = "default_capture_timeout_secs")]
    pub capture_timeout_secs: u64,

    /// Fixed capture delay in milliseconds (default: 3000)
    #[serde(default = "default_capture_delay_ms")]
    pub capture_delay_ms: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_capture_timeout_secs() -> u64 {
    DEFAULT_CAPTURE_TIMEOUT
}

fn default_capture_delay_ms() -> u64 {
    DEFAULT_CAPTURE_DELAY_MS
}

impl DeviceConfig {
    pub fn new(device_type: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            host: host.into(),
            port: None,
            timeout_secs: default_timeout_secs(),
            capture_timeout_secs: default_capture_timeout_secs(),
            capture_delay_ms: default_capture_delay_ms(),
        }
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.family()?;

        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation("Device host cannot be empty".to_string()));
        }
        if self.port == Some(0) {
            return Err(ConfigError::Validation("Port must be greater than 0".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Timeout must be at least 1 second".to_string(),
            ));
        }
        if self.capture_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Capture timeout must be at least 1 second".to_string(),
            ));
        }
        if Duration::from_millis(self.capture_delay_ms) > self.capture_timeout() {
            return Err(ConfigError::Validation(
                "Capture delay cannot exceed the capture timeout".to_string(),
            ));
        }
        Ok(())
    }

    pub fn family(&self) -> Result<DeviceFamily, ConfigError> {
        self.device_type
            .parse()
            .map_err(|e: crate::Error| ConfigError::Validation(e.to_string()))
    }

    /// Configured port, or the family default
    pub fn port(&self) -> Result<u16, ConfigError> {
        Ok(self.port.unwrap_or(self.family()?.default_port()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_secs(self.capture_timeout_secs)
    }

    pub fn capture(&self) -> FixedDelayCapture {
        FixedDelayCapture::new(Duration::from_millis(self.capture_delay_ms))
    }

    pub fn endpoint(&self) -> Result<DeviceEndpoint, ConfigError> {
        DeviceEndpoint::new(self.host.as_str(), self.port()?, self.timeout())
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}
