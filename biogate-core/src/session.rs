//! Session state for the datagram protocol
//!
//! A session tracks:
//! - Lifecycle state (`Disconnected -> Connecting -> Connected`, or `Failed`)
//! - Session ID (assigned by the device in its connect reply)
//! - Reply sequence (counts completed exchanges)

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No socket, no session id
    Disconnected,

    /// Handshake in flight
    Connecting,

    /// Handshake completed, exchanges allowed
    Connected,

    /// Unrecoverable I/O error; must reconnect
    Failed,
}

/// Session state tracker
///
/// Cheap to clone (Arc internally); clones observe the same session, which
/// lets a caller watch state while the socket owner performs exchanges.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    session_id: Option<u32>,
    reply_sequence: u32,
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                state: SessionState::Disconnected,
                session_id: None,
                reply_sequence: 0,
            })),
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.inner.read().state
    }

    /// Device-assigned session id, `None` unless connected
    pub fn session_id(&self) -> Option<u32> {
        self.inner.read().session_id
    }

    /// Number of exchanges completed in this session
    pub fn reply_sequence(&self) -> u32 {
        self.inner.read().reply_sequence
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    /// Enter `Connecting`
    ///
    /// Allowed from `Disconnected` and `Failed`.
    pub fn begin_connect(&self) -> Result<()> {
        let mut inner = self.inner.write();

        match inner.state {
            SessionState::Disconnected | SessionState::Failed => {
                inner.state = SessionState::Connecting;
                inner.session_id = None;
                inner.reply_sequence = 0;
                Ok(())
            }
            state => Err(Error::InvalidSessionState {
                action: "connect",
                state,
            }),
        }
    }

    /// Record the handshake result and enter `Connected`
    pub fn establish(&self, session_id: u32) -> Result<()> {
        let mut inner = self.inner.write();

        if inner.state != SessionState::Connecting {
            return Err(Error::InvalidSessionState {
                action: "establish",
                state: inner.state,
            });
        }

        inner.state = SessionState::Connected;
        inner.session_id = Some(session_id);
        inner.reply_sequence = 0;
        Ok(())
    }

    /// Enter `Failed` and forget the session id
    pub fn fail(&self) {
        let mut inner = self.inner.write();
        inner.state = SessionState::Failed;
        inner.session_id = None;
    }

    /// Return to `Disconnected`, zeroing all session data
    pub fn close(&self) {
        let mut inner = self.inner.write();
        inner.state = SessionState::Disconnected;
        inner.session_id = None;
        inner.reply_sequence = 0;
    }

    /// Count a completed exchange, returning the new sequence value
    ///
    /// Wraps at `u32::MAX`.
    pub fn advance(&self) -> u32 {
        let mut inner = self.inner.write();
        inner.reply_sequence = inner.reply_sequence.wrapping_add(1);
        inner.reply_sequence
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
