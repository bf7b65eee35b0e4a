//! Transport errors

use std::io;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No reply within {0:?}")]
    Timeout(Duration),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Frame error: {0}")]
    Frame(#[from] biogate_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Check if the device was never reached or did not answer
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::NotConnected
            | Self::ConnectionFailed(_)
            | Self::Timeout(_)
            | Self::InvalidAddress(_)
            | Self::Io(_) => true,
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::AlreadyConnected | Self::Protocol(_) | Self::Frame(_) => false,
        }
    }

    /// Check if a retry might succeed without reconnecting
    ///
    /// Retrying mutating commands is still the caller's call: the protocol
    /// has no idempotency token.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
