//! Stateful binary session over a datagram transport
//!
//! One request frame out, one reply datagram back. No pipelining, no retry,
//! no reordering protection: a reply is paired with whatever request is in
//! flight, so callers must not share a session between concurrent tasks.

use std::time::Duration;

use biogate_core::{Command, Frame, Session, SessionState, fields::connect_session_id};
use biogate_types::DeviceEndpoint;
use bytes::{Bytes, BytesMut};
use tracing::{debug, info, trace, warn};

use crate::{Transport, UdpTransport, error::*};

/// Datagram session with a binary-protocol device
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use biogate_core::Command;
/// use biogate_transport::DatagramSession;
/// use biogate_types::DeviceEndpoint;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = DeviceEndpoint::new("192.168.1.201", 4370, Duration::from_secs(5))?;
/// let mut session = DatagramSession::udp(&endpoint);
///
/// session.connect().await?;
/// let reply = session.exchange(Command::GetInfo, &[]).await?;
/// println!("{} reply bytes", reply.len());
/// session.disconnect().await?;
/// # Ok(())
/// # }
/// ```
pub struct DatagramSession<T: Transport = UdpTransport> {
    transport: T,
    session: Session,
    timeout: Duration,
}

impl DatagramSession<UdpTransport> {
    /// Session over UDP to `endpoint`
    pub fn udp(endpoint: &DeviceEndpoint) -> Self {
        Self::new(UdpTransport::for_endpoint(endpoint), endpoint.timeout())
    }
}

impl<T: Transport> DatagramSession<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            transport,
            session: Session::new(),
            timeout,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected() && self.transport.is_connected()
    }

    pub fn session_id(&self) -> Option<u32> {
        self.session.session_id()
    }

    /// Number of exchanges answered in this session
    pub fn reply_sequence(&self) -> u32 {
        self.session.reply_sequence()
    }

    /// Shared view of the session state
    pub fn state_handle(&self) -> Session {
        self.session.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn remote_addr(&self) -> String {
        self.transport.remote_addr()
    }

    /// Open the socket and perform the connect handshake
    ///
    /// On any failure the session ends in [`SessionState::Failed`] with the
    /// socket released, and [`Error::ConnectionFailed`] is returned.
    pub async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        self.session.begin_connect()?;

        info!("Connecting to {}...", self.transport.remote_addr());

        match self.handshake().await {
            Ok(session_id) => {
                self.session.establish(session_id)?;
                info!("Connected successfully (session_id={})", session_id);
                Ok(())
            }
            Err(e) => {
                warn!("Handshake with {} failed: {}", self.transport.remote_addr(), e);
                self.session.fail();
                if let Err(close_err) = self.transport.disconnect().await {
                    warn!("Failed to release socket: {}", close_err);
                }
                Err(Error::ConnectionFailed(e.to_string()))
            }
        }
    }

    async fn handshake(&mut self) -> Result<u32> {
        self.transport.connect().await?;

        let frame = Frame::new(Command::Connect);
        self.send_frame(&frame).await?;

        let reply = self.transport.receive(self.timeout).await?;
        trace!("Connect reply: {}", hex::encode(&reply));

        Ok(connect_session_id(&reply)?)
    }

    /// Send one command and wait for exactly one reply
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] unless the session is connected
    /// - [`Error::Timeout`] if no datagram arrives in time; the session
    ///   stays connected and the socket open
    /// - any other I/O error moves the session to [`SessionState::Failed`]
    ///   and releases the socket
    pub async fn exchange(&mut self, command: Command, payload: &[u8]) -> Result<Bytes> {
        self.ensure_connected()?;

        let frame = Frame::with_payload(command, Bytes::copy_from_slice(payload))
            .in_session(self.session.session_id());

        debug!("Exchange {}", frame);

        let result = match self.send_frame(&frame).await {
            Ok(()) => self.transport.receive(self.timeout).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => {
                let sequence = self.session.advance();
                trace!(
                    command = %command,
                    sequence,
                    reply_len = reply.len(),
                    "Reply received"
                );
                Ok(reply.freeze())
            }
            Err(e) if e.is_recoverable() => {
                if command.is_mutating() {
                    warn!(
                        "{} timed out after {:?}; it may still have been applied",
                        command, self.timeout
                    );
                } else {
                    warn!("{} timed out after {:?}", command, self.timeout);
                }
                Err(e)
            }
            Err(e) => {
                warn!("{} failed, marking session failed: {}", command, e);
                self.session.fail();
                if let Err(close_err) = self.transport.disconnect().await {
                    warn!("Failed to release socket: {}", close_err);
                }
                Err(e)
            }
        }
    }

    /// Close the session; calling it again is a no-op
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.session.state() == SessionState::Disconnected && !self.transport.is_connected() {
            return Ok(());
        }

        info!("Disconnecting from {}...", self.transport.remote_addr());

        let result = self.transport.disconnect().await;
        self.session.close();

        info!("Disconnected");
        result
    }

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        trace!("Sending: {:?}", frame);

        let data: BytesMut = frame.encode();
        self.transport.send(&data).await
    }
}

impl<T: Transport> Drop for DatagramSession<T> {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!(
                "Session to {} dropped while still connected",
                self.transport.remote_addr()
            );
        }
    }
}
