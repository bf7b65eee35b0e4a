//! Command frame structure and header encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    command::Command,
    error::{Error, Result},
};

/// Frame header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Command frame sent to a binary-protocol device
///
/// # Frame Structure
///
/// ```text
/// ┌─────────────┬─────────────┬─────────────┐
/// │ Packet size │   Command   │   Payload   │
/// │   4 bytes   │   4 bytes   │   N bytes   │
/// │  (LE u32)   │  (LE u32)   │   (bytes)   │
/// └─────────────┴─────────────┴─────────────┘
/// ```
///
/// Packet size is always `8 + N`.
///
/// # Examples
///
/// ```
/// use biogate_core::{Command, Frame, frame};
///
/// let frame = Frame::new(Command::Connect);
/// let encoded = frame.encode();
///
/// let header = frame::decode_header(&encoded).unwrap();
/// assert_eq!(header.size, 8);
/// assert_eq!(header.code, 0x1000);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw command code
    pub command_code: u32,

    /// Session the frame belongs to, if any
    ///
    /// Carried for diagnostics only; the header layout has no slot for it.
    pub session_id: Option<u32>,

    /// Command-specific data
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame with empty payload
    pub fn new(command: Command) -> Self {
        Self::with_payload(command, Bytes::new())
    }

    /// Create a frame with payload
    ///
    /// # Examples
    ///
    /// ```
    /// use biogate_core::{Command, Frame, frame};
    ///
    /// let payload = frame::identity_payload(123, 1);
    /// let frame = Frame::with_payload(Command::Verify, payload);
    /// assert_eq!(frame.total_size(), 16);
    /// ```
    pub fn with_payload(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command_code: command.code(),
            session_id: None,
            payload: payload.into(),
        }
    }

    /// Tag the frame with the session it is sent on
    pub fn in_session(mut self, session_id: Option<u32>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Total encoded size (header + payload)
    pub fn total_size(&self) -> u32 {
        (HEADER_SIZE + self.payload.len()) as u32
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> BytesMut {
        encode(self.command_code, &self.payload)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command_code", &format!("0x{:04X}", self.command_code))
            .field("session_id", &self.session_id)
            .field("total_size", &self.total_size())
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Command::try_from(self.command_code) {
            Ok(command) => write!(f, "Frame[{}]", command)?,
            Err(_) => write!(f, "Frame[0x{:04X}]", self.command_code)?,
        }
        write!(f, "(len={})", self.payload.len())
    }
}

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Packet size as reported by the sender
    pub size: u32,

    /// Command code (or, in replies, the first reply word)
    pub code: u32,
}

impl FrameHeader {
    /// Resolve the code as a known command
    pub fn command(&self) -> Result<Command> {
        Command::try_from(self.code)
    }
}

impl From<FrameHeader> for (u32, u32) {
    fn from(header: FrameHeader) -> Self {
        (header.size, header.code)
    }
}

/// Encode a command code and payload into a frame
///
/// Infallible: payload length is not bounded at this layer.
pub fn encode(command_code: u32, payload: &[u8]) -> BytesMut {
    let total_size = HEADER_SIZE + payload.len();
    let mut buf = BytesMut::with_capacity(total_size);

    buf.put_u32_le(total_size as u32);
    buf.put_u32_le(command_code);
    buf.put_slice(payload);

    buf
}

/// Decode the fixed 8-byte header of a frame
///
/// # Errors
///
/// Returns [`Error::MalformedFrame`] if fewer than 8 bytes are available.
pub fn decode_header(frame: &[u8]) -> Result<FrameHeader> {
    if frame.len() < HEADER_SIZE {
        return Err(Error::MalformedFrame {
            expected: HEADER_SIZE,
            actual: frame.len(),
        });
    }

    let mut buf = &frame[..HEADER_SIZE];
    let size = buf.get_u32_le();
    let code = buf.get_u32_le();

    Ok(FrameHeader { size, code })
}

/// Build the `(user_id, finger_index)` payload used by identity commands
pub fn identity_payload(user_id: u32, finger_index: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(8);
    buf.put_u32_le(user_id);
    buf.put_u32_le(finger_index);
    buf.freeze()
}
