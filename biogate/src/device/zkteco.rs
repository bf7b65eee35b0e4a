//! Binary-protocol (datagram) device family

use std::time::Duration;

use async_trait::async_trait;
use biogate_core::{
    Command,
    constants::{DEFAULT_CAPTURE_TIMEOUT, RESULT_OK},
    decode_fixed_fields, decode_header,
    fields::layout,
    frame::identity_payload,
};
use biogate_transport::{DatagramSession, Transport, UdpTransport};
use biogate_types::{
    AttendanceLogEntry, DeviceDetails, DeviceEndpoint, DeviceInfo, FailureKind, OperationOutcome,
};
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use super::{FingerprintDevice, failure_kind};
use crate::capture::{CaptureMonitor, FixedDelayCapture, await_capture};

/// ZKTeco-style terminal speaking the binary datagram protocol
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use biogate::{FingerprintDevice, ZktecoDevice};
/// use biogate_types::DeviceEndpoint;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = DeviceEndpoint::new("192.168.1.201", 4370, Duration::from_secs(5))?;
/// let mut device = ZktecoDevice::new(&endpoint);
///
/// if device.connect().await {
///     let matched = device.verify_fingerprint(123, 0).await.success;
///     println!("match: {}", matched);
///     device.disconnect().await;
/// }
/// # Ok(())
/// # }
/// ```
pub struct ZktecoDevice<T: Transport = UdpTransport> {
    session: DatagramSession<T>,
    capture: Box<dyn CaptureMonitor>,
    capture_timeout: Duration,
}

impl ZktecoDevice<UdpTransport> {
    /// Device reached over UDP at `endpoint`
    pub fn new(endpoint: &DeviceEndpoint) -> Self {
        Self::with_session(DatagramSession::udp(endpoint))
    }
}

impl<T: Transport> ZktecoDevice<T> {
    pub fn with_session(session: DatagramSession<T>) -> Self {
        Self {
            session,
            capture: Box::new(FixedDelayCapture::default()),
            capture_timeout: Duration::from_secs(DEFAULT_CAPTURE_TIMEOUT),
        }
    }

    /// Replace the capture collaborator (default: fixed delay)
    pub fn with_capture(mut self, capture: impl CaptureMonitor + 'static) -> Self {
        self.capture = Box::new(capture);
        self
    }

    /// Bound the wait between enrollment phases
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = timeout;
        self
    }

    pub fn session(&self) -> &DatagramSession<T> {
        &self.session
    }

    /// Exchange a command and require a full reply header
    async fn command(&mut self, command: Command, payload: &[u8]) -> Result<Bytes, OperationOutcome> {
        let reply = self.session.exchange(command, payload).await.map_err(|e| {
            error!("{} failed: {}", command, e);
            OperationOutcome::failed(failure_kind(&e))
        })?;

        if let Err(e) = decode_header(&reply) {
            error!("{} returned an unusable reply: {}", command, e);
            return Err(OperationOutcome::failed(FailureKind::Protocol));
        }

        Ok(reply)
    }

    /// Commands answering with a result word, `1` meaning success
    async fn result_code_command(
        &mut self,
        command: Command,
        user_id: u32,
        finger_index: u32,
    ) -> OperationOutcome {
        debug_assert!(command.takes_identity());
        let payload = identity_payload(user_id, finger_index);

        let reply = match self.command(command, &payload).await {
            Ok(reply) => reply,
            Err(outcome) => return outcome,
        };

        let code = match decode_fixed_fields(&reply, layout::RESULT_CODE) {
            Ok(fields) => fields.uint("result").unwrap_or_default() as u32,
            Err(e) => {
                error!("{} reply undecodable: {}", command, e);
                return OperationOutcome::failed(FailureKind::Protocol);
            }
        };

        if code == RESULT_OK {
            OperationOutcome::succeeded().with_code(code)
        } else {
            OperationOutcome::failed(FailureKind::Rejected).with_code(code)
        }
    }
}

#[async_trait]
impl<T: Transport + 'static> FingerprintDevice for ZktecoDevice<T> {
    async fn connect(&mut self) -> bool {
        if self.session.is_connected() {
            return true;
        }

        match self.session.connect().await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to connect to {}: {}", self.session.remote_addr(), e);
                false
            }
        }
    }

    async fn disconnect(&mut self) {
        if let Err(e) = self.session.disconnect().await {
            warn!("Error while disconnecting: {}", e);
        }
    }

    fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    async fn get_device_info(&mut self) -> Option<DeviceDetails> {
        debug!("Getting device info...");

        let reply = match self.session.exchange(Command::GetInfo, &[]).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error getting device info: {}", e);
                return None;
            }
        };

        let mut fields = match decode_fixed_fields(&reply, layout::DEVICE_INFO) {
            Ok(fields) => fields,
            Err(e) => {
                error!("Device info reply undecodable: {}", e);
                return None;
            }
        };

        let info = DeviceInfo {
            serial_number: fields.take_text("serial_number").unwrap_or_default(),
            platform: fields.take_text("platform").unwrap_or_default(),
            firmware_version: fields.take_text("firmware_version").unwrap_or_default(),
            work_code: fields.take_text("work_code").unwrap_or_default(),
        };

        debug!("Device info: {}", info);
        Some(DeviceDetails::Fixed(info))
    }

    async fn enroll_fingerprint(&mut self, user_id: u32, finger_index: u32) -> OperationOutcome {
        let payload = identity_payload(user_id, finger_index);

        if let Err(outcome) = self.command(Command::EnrollBegin, &payload).await {
            error!("Failed to start enrollment for user {}", user_id);
            return outcome;
        }

        if let Err(e) = await_capture(
            self.capture.as_ref(),
            self.capture_timeout,
            user_id,
            finger_index,
        )
        .await
        {
            // the device discards enrollments that never complete
            error!("Enrollment capture for user {} failed: {}", user_id, e);
            return OperationOutcome::failed(FailureKind::Unreachable).with_message(e.to_string());
        }

        match self.command(Command::EnrollComplete, &payload).await {
            Ok(_) => {
                info!("Fingerprint enrolled successfully for user {}", user_id);
                OperationOutcome::succeeded()
            }
            Err(outcome) => {
                error!("Enrollment failed for user {}", user_id);
                outcome
            }
        }
    }

    async fn verify_fingerprint(&mut self, user_id: u32, finger_index: u32) -> OperationOutcome {
        let outcome = self
            .result_code_command(Command::Verify, user_id, finger_index)
            .await;

        match outcome.failure {
            None => info!("Fingerprint verified for user {}", user_id),
            Some(FailureKind::Rejected) => {
                warn!("Fingerprint verification failed for user {}", user_id)
            }
            Some(_) => error!("Verification for user {} got no usable reply", user_id),
        }

        outcome
    }

    async fn delete_fingerprint(&mut self, user_id: u32, finger_index: u32) -> OperationOutcome {
        let outcome = self
            .result_code_command(Command::Delete, user_id, finger_index)
            .await;

        match outcome.failure {
            None => info!("Fingerprint deleted for user {}", user_id),
            Some(FailureKind::Rejected) => {
                error!("Failed to delete fingerprint for user {}", user_id)
            }
            Some(_) => error!("Delete for user {} got no usable reply", user_id),
        }

        outcome
    }

    async fn get_attendance_logs(&mut self) -> Vec<AttendanceLogEntry> {
        match self.command(Command::AttendanceLogs, &[]).await {
            Ok(reply) => {
                // TODO: decode records once the terminal's log record layout is documented
                info!(
                    "Attendance logs acknowledged ({} reply bytes, records not decoded)",
                    reply.len()
                );
                Vec::new()
            }
            Err(_) => {
                error!("Failed to get attendance logs");
                Vec::new()
            }
        }
    }
}
