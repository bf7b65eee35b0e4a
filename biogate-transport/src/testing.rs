//! Loopback stand-ins for devices
//!
//! Compiled for this crate's tests and, through the `testing` feature, for
//! downstream crates' tests.

use std::time::Duration;

use biogate_core::frame;
use biogate_types::DeviceEndpoint;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinHandle;

/// Binary-protocol device on a loopback UDP socket
pub struct FakeUdpDevice {
    socket: UdpSocket,
}

impl FakeUdpDevice {
    pub async fn bind() -> Self {
        Self {
            socket: UdpSocket::bind("127.0.0.1:0").await.unwrap(),
        }
    }

    pub fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    pub fn endpoint(&self, timeout: Duration) -> DeviceEndpoint {
        DeviceEndpoint::new("127.0.0.1", self.port(), timeout).unwrap()
    }

    /// Wait for one frame and answer with `reply`; returns the request
    pub async fn answer(&self, reply: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; 2048];
        let (n, from) = self.socket.recv_from(&mut buf).await.unwrap();
        self.socket.send_to(reply, from).await.unwrap();
        buf[..n].to_vec()
    }

    /// Wait for one frame without answering
    pub async fn swallow(&self) -> Vec<u8> {
        let mut buf = [0u8; 2048];
        let (n, _) = self.socket.recv_from(&mut buf).await.unwrap();
        buf[..n].to_vec()
    }
}

/// `size=12, code=0x1000` followed by the session id
pub fn connect_reply(session_id: u32) -> Vec<u8> {
    frame::encode(0x1000, &session_id.to_le_bytes()).to_vec()
}

/// Serve one canned HTTP response, returning the raw request
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (DeviceEndpoint, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let endpoint = DeviceEndpoint::new("127.0.0.1", port, Duration::from_secs(2)).unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        request
    });

    (endpoint, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
