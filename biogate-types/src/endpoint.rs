//! Device addressing

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Where to reach a device, and how long to wait for it
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEndpoint {
    host: String,
    port: u16,
    timeout: Duration,
}

impl DeviceEndpoint {
    /// Build a validated endpoint
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty host, port 0 or a zero
    /// timeout.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Result<Self> {
        let host = host.into();

        if host.trim().is_empty() {
            return Err(Error::Validation("Device host cannot be empty".to_string()));
        }
        if port == 0 {
            return Err(Error::Validation("Device port must be greater than 0".to_string()));
        }
        if timeout.is_zero() {
            return Err(Error::Validation("Device timeout must be greater than 0".to_string()));
        }

        Ok(Self {
            host: host.trim().to_string(),
            port,
            timeout,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
