//! Transport layer for fingerprint terminals
//!
//! Two ways of talking to a device:
//! - [`DatagramSession`]: stateful binary session over a datagram socket
//! - [`HttpSession`]: stateless JSON request/response over HTTP

pub mod error;
pub mod http;
pub mod session;
pub mod udp;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, Result};
pub use http::{ApiReply, HttpSession};
pub use session::DatagramSession;
pub use udp::UdpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Raw datagram carrier under a [`DatagramSession`]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the socket
    async fn connect(&mut self) -> Result<()>;

    /// Release the socket; a no-op when already closed
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if a socket is open
    fn is_connected(&self) -> bool;

    /// Send one datagram
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive one datagram, waiting at most `timeout`
    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
