//! JSON-over-HTTP device family

use async_trait::async_trait;
use biogate_transport::{HttpSession, Result as TransportResult, http::DEVICE_INFO_PATH};
use biogate_types::{AttendanceLogEntry, DeviceDetails, DeviceEndpoint, FailureKind, OperationOutcome};
use serde::Serialize;
use tracing::{error, info, warn};

use super::{FingerprintDevice, failure_kind};

pub const ENROLL_PATH: &str = "/api/fingerprint/enroll";
pub const VERIFY_PATH: &str = "/api/fingerprint/verify";
pub const DELETE_PATH: &str = "/api/fingerprint/delete";

#[derive(Debug, Serialize)]
struct FingerRequest {
    user_id: u32,
    finger_index: u32,
}

/// Suprema-style terminal exposing a JSON API
///
/// Every call is an independent request, so operations work whether or not
/// [`connect`](FingerprintDevice::connect) was called. `connect` only probes
/// reachability.
#[derive(Debug)]
pub struct SupremaDevice {
    http: HttpSession,
    reachable: bool,
}

impl SupremaDevice {
    pub fn new(endpoint: &DeviceEndpoint) -> TransportResult<Self> {
        Ok(Self {
            http: HttpSession::new(endpoint)?,
            reachable: false,
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn post_finger(
        &self,
        path: &str,
        user_id: u32,
        finger_index: u32,
    ) -> OperationOutcome {
        let body = FingerRequest {
            user_id,
            finger_index,
        };

        match self.http.post_json(path, &body).await {
            Ok(reply) => {
                let outcome = if reply.success {
                    OperationOutcome::succeeded()
                } else {
                    OperationOutcome::failed(FailureKind::Rejected)
                };
                match reply.message {
                    Some(message) => outcome.with_message(message),
                    None => outcome,
                }
            }
            Err(e) => {
                error!("POST {} for user {} failed: {}", path, user_id, e);
                OperationOutcome::failed(failure_kind(&e))
            }
        }
    }
}

#[async_trait]
impl FingerprintDevice for SupremaDevice {
    async fn connect(&mut self) -> bool {
        match self.http.probe().await {
            Ok(()) => {
                info!("Device at {} is reachable", self.http.base_url());
                self.reachable = true;
            }
            Err(e) => {
                error!("Failed to reach {}: {}", self.http.base_url(), e);
                self.reachable = false;
            }
        }
        self.reachable
    }

    async fn disconnect(&mut self) {
        self.reachable = false;
    }

    fn is_connected(&self) -> bool {
        self.reachable
    }

    async fn get_device_info(&mut self) -> Option<DeviceDetails> {
        match self.http.get_json(DEVICE_INFO_PATH).await {
            Ok(map) => Some(DeviceDetails::Json(map)),
            Err(e) => {
                error!("Error getting device info: {}", e);
                None
            }
        }
    }

    async fn enroll_fingerprint(&mut self, user_id: u32, finger_index: u32) -> OperationOutcome {
        let outcome = self.post_finger(ENROLL_PATH, user_id, finger_index).await;
        if outcome.success {
            info!("Fingerprint enrolled successfully for user {}", user_id);
        }
        outcome
    }

    async fn verify_fingerprint(&mut self, user_id: u32, finger_index: u32) -> OperationOutcome {
        let outcome = self.post_finger(VERIFY_PATH, user_id, finger_index).await;
        if outcome.success {
            info!("Fingerprint verified for user {}", user_id);
        } else if outcome.is_rejected() {
            warn!("Fingerprint verification failed for user {}", user_id);
        }
        outcome
    }

    async fn delete_fingerprint(&mut self, user_id: u32, finger_index: u32) -> OperationOutcome {
        let outcome = self.post_finger(DELETE_PATH, user_id, finger_index).await;
        if outcome.success {
            info!("Fingerprint deleted for user {}", user_id);
        }
        outcome
    }

    async fn get_attendance_logs(&mut self) -> Vec<AttendanceLogEntry> {
        warn!("{} does not expose attendance logs", self.http.base_url());
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_probes_info_endpoint() {
        let (endpoint, server) = serve_once("200 OK", "{}").await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        assert!(device.connect().await);
        assert!(device.is_connected());

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/device/info HTTP/1.1"));

        device.disconnect().await;
        device.disconnect().await;
        assert!(!device.is_connected());
    }

    #[tokio::test]
    async fn test_connect_unreachable_is_false() {
        let (endpoint, _server) = serve_once("503 Service Unavailable", "{}").await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        assert!(!device.connect().await);
        assert!(!device.is_connected());
    }

    #[tokio::test]
    async fn test_get_device_info_is_json_mapping() {
        let (endpoint, _server) =
            serve_once("200 OK", r#"{"serial_number":"BS2-77","model":"BioStation 2"}"#).await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        let details = device.get_device_info().await.unwrap();
        assert_eq!(details.serial_number(), Some("BS2-77"));
        match details {
            DeviceDetails::Json(map) => assert_eq!(map.get("model"), Some(&json!("BioStation 2"))),
            other => panic!("expected JSON details, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_device_info_malformed_is_none() {
        let (endpoint, _server) = serve_once("200 OK", "<html>").await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        assert_eq!(device.get_device_info().await, None);
    }

    #[tokio::test]
    async fn test_verify_posts_identity() {
        let (endpoint, server) = serve_once("200 OK", r#"{"success":true}"#).await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        let outcome = device.verify_fingerprint(123, 0).await;
        assert!(outcome.success);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/fingerprint/verify HTTP/1.1"));
        assert!(request.ends_with(r#"{"user_id":123,"finger_index":0}"#));
    }

    #[tokio::test]
    async fn test_verify_declined_carries_message() {
        let (endpoint, _server) =
            serve_once("200 OK", r#"{"success":false,"message":"no match"}"#).await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        let outcome = device.verify_fingerprint(123, 0).await;
        assert!(!outcome.success);
        assert!(outcome.is_rejected());
        assert_eq!(outcome.message.as_deref(), Some("no match"));
    }

    #[tokio::test]
    async fn test_enroll_server_error_is_protocol_failure() {
        let (endpoint, _server) =
            serve_once("500 Internal Server Error", r#"{"success":true}"#).await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        let outcome = device.enroll_fingerprint(1, 2).await;
        assert!(!outcome.success);
        assert_eq!(outcome.failure, Some(FailureKind::Protocol));
    }

    #[tokio::test]
    async fn test_delete_posts_to_delete_endpoint() {
        let (endpoint, server) = serve_once("200 OK", r#"{"success":true}"#).await;
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        assert!(device.delete_fingerprint(5, 3).await.success);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/fingerprint/delete HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        // nothing listens on a port we just released
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = DeviceEndpoint::new("127.0.0.1", port, Duration::from_millis(500)).unwrap();
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        assert!(!device.connect().await);
        assert!(device.verify_fingerprint(1, 0).await.is_unreachable());
        assert_eq!(device.get_device_info().await, None);
    }

    #[tokio::test]
    async fn test_attendance_logs_unsupported() {
        let endpoint = DeviceEndpoint::new("127.0.0.1", 80, Duration::from_millis(100)).unwrap();
        let mut device = SupremaDevice::new(&endpoint).unwrap();

        assert!(device.get_attendance_logs().await.is_empty());
    }
}
