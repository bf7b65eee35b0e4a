//! Error types for biogate-core

use crate::session::SessionState;

/// Result type alias for biogate-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to carry a header
    #[error("Malformed frame: expected at least {expected} header bytes, got {actual} bytes")]
    MalformedFrame {
        expected: usize,
        actual: usize,
    },

    /// Frame is shorter than the highest offset its layout requires
    #[error("Truncated frame: layout needs {expected} bytes, got {actual} bytes")]
    TruncatedFrame {
        expected: usize,
        actual: usize,
    },

    /// Field layout entry cannot be decoded as requested
    #[error("Invalid field `{name}`: {reason}")]
    InvalidField {
        name: &'static str,
        reason: String,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:04X}")]
    UnknownCommand(u32),

    /// Session state transition not allowed
    #[error("Invalid session state: cannot {action} while {state:?}")]
    InvalidSessionState {
        action: &'static str,
        state: SessionState,
    },
}
