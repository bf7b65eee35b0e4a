//! Protocol constants

/// Default port of the binary (datagram) device family
pub const DEFAULT_DATAGRAM_PORT: u16 = 4370;

/// Default port of the HTTP device family
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default exchange timeout (seconds)
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Default bound on waiting for a finger capture (seconds)
pub const DEFAULT_CAPTURE_TIMEOUT: u64 = 30;

/// Default fixed capture delay (milliseconds)
pub const DEFAULT_CAPTURE_DELAY_MS: u64 = 3000;

/// Receive buffer for one reply datagram
pub const RECV_BUFFER_SIZE: usize = 2048;

/// Reply word meaning "accepted" in verify/delete replies
pub const RESULT_OK: u32 = 1;
