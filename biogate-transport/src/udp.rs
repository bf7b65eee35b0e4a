//! UDP transport for binary-protocol terminals
//!
//! One command frame per datagram, one reply frame per datagram.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use biogate_core::constants::RECV_BUFFER_SIZE;
use biogate_types::DeviceEndpoint;
use bytes::BytesMut;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{Transport, error::*};

/// UDP transport
pub struct UdpTransport {
    addr: String,
    port: u16,
    socket: Option<UdpSocket>,
    remote_addr: Option<SocketAddr>,
}

impl UdpTransport {
    /// Create new UDP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket: None,
            remote_addr: None,
        }
    }

    /// Create a transport targeting an endpoint
    pub fn for_endpoint(endpoint: &DeviceEndpoint) -> Self {
        Self::new(endpoint.host(), endpoint.port())
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.remote_addr {
            return Ok(addr);
        }

        let addr_str = format!("{}:{}", self.addr, self.port);
        let host = self.addr.trim_start_matches('[').trim_end_matches(']');

        let addr = tokio::net::lookup_host((host, self.port))
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .next()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;

        self.remote_addr = Some(addr);
        Ok(addr)
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        let remote = self.resolve_addr().await?;

        let local = if remote.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;

        // Fixes the peer: datagrams from other sources are dropped by the OS
        socket.connect(remote).await?;

        debug!("UDP socket {} -> {}", socket.local_addr()?, remote);

        self.socket = Some(socket);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.socket.take().is_some() {
            debug!("Closed UDP socket to {}", self.remote_addr());
        }

        self.remote_addr = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let socket = self.socket.as_ref().ok_or(Error::NotConnected)?;

        trace!(
            "Sending {} bytes via UDP: {}",
            data.len(),
            hex::encode(&data[..data.len().min(32)])
        );

        socket.send(data).await?;

        Ok(())
    }

    async fn receive(&mut self, wait: Duration) -> Result<BytesMut> {
        let socket = self.socket.as_ref().ok_or(Error::NotConnected)?;

        let mut buf = BytesMut::zeroed(RECV_BUFFER_SIZE);

        let n = timeout(wait, socket.recv(&mut buf))
            .await
            .map_err(|_| {
                warn!("No datagram from {} within {:?}", self.remote_addr(), wait);
                Error::Timeout(wait)
            })?
            .map_err(|e| {
                warn!("Read error: {}", e);
                Error::Io(e)
            })?;

        buf.truncate(n);

        trace!(
            "Received {} bytes via UDP: {}",
            n,
            hex::encode(&buf[..n.min(32)])
        );

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        self.remote_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_udp_transport_create() {
        let transport = UdpTransport::new("192.168.1.201", 4370);
        assert!(!transport.is_connected());
        assert_eq!(transport.remote_addr(), "192.168.1.201:4370");
    }

    #[tokio::test]
    async fn test_udp_transport_invalid_address() {
        let mut transport = UdpTransport::new("invalid..address", 4370);

        let result = transport.connect().await;
        assert!(result.is_err());
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_udp_send_without_socket() {
        let mut transport = UdpTransport::new("127.0.0.1", 4370);
        assert!(matches!(transport.send(&[0u8; 8]).await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_udp_loopback_round_trip() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port();

        let mut transport = UdpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();
        assert!(matches!(transport.connect().await, Err(Error::AlreadyConnected)));

        transport.send(b"ping").await.unwrap();
        let mut buf = [0u8; 16];
        let (n, from) = peer.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");

        peer.send_to(b"pong", from).await.unwrap();
        let reply = transport.receive(Duration::from_secs(1)).await.unwrap();
        assert_eq!(reply.as_ref(), b"pong");

        transport.disconnect().await.unwrap();
        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_udp_receive_timeout() {
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port();

        let mut transport = UdpTransport::new("127.0.0.1", port);
        transport.connect().await.unwrap();

        let result = transport.receive(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(Error::Timeout(_))));
        assert!(transport.is_connected());
    }

    #[tokio::test]
    async fn test_udp_resolves_ipv6_literal() {
        for host in ["::1", "[::1]"] {
            let mut transport = UdpTransport::new(host, 4370);
            let addr = transport.resolve_addr().await.unwrap();
            assert_eq!(addr, "[::1]:4370".parse::<SocketAddr>().unwrap());
        }
    }
}
