//! High-level error types
//!
//! Per-operation device calls never return these: they report soft results.
//! Errors surface only while building a manager or loading configuration.

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported device type: {0:?} (expected one of: zkteco, suprema)")]
    UnsupportedDeviceType(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Core protocol error: {0}")]
    Core(#[from] biogate_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] biogate_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] biogate_types::Error),
}
