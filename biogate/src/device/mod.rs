//! Device operation set
//!
//! One capability surface, implemented once per device family. Every
//! operation reports a definite result: communication faults are logged and
//! folded into `false`, `None` or an empty collection.

mod suprema;
mod zkteco;

pub use suprema::SupremaDevice;
pub use zkteco::ZktecoDevice;

use async_trait::async_trait;
use biogate_transport::Error as TransportError;
use biogate_types::{
    AttendanceLogEntry, DeletionResult, DeviceDetails, EnrollmentResult, FailureKind,
    VerificationResult,
};

/// Operations every fingerprint terminal supports
#[async_trait]
pub trait FingerprintDevice: Send {
    /// Establish the session (binary) or probe reachability (HTTP)
    async fn connect(&mut self) -> bool;

    /// Release the connection; safe to call repeatedly
    async fn disconnect(&mut self);

    /// Check if the last connect succeeded and the device was not released
    fn is_connected(&self) -> bool;

    /// Device details, `None` on any failure
    async fn get_device_info(&mut self) -> Option<DeviceDetails>;

    async fn enroll_fingerprint(&mut self, user_id: u32, finger_index: u32) -> EnrollmentResult;

    async fn verify_fingerprint(&mut self, user_id: u32, finger_index: u32) -> VerificationResult;

    async fn delete_fingerprint(&mut self, user_id: u32, finger_index: u32) -> DeletionResult;

    /// Attendance records; empty on failure
    async fn get_attendance_logs(&mut self) -> Vec<AttendanceLogEntry>;
}

/// Classify a transport fault for an operation outcome
pub(crate) fn failure_kind(err: &TransportError) -> FailureKind {
    if err.is_unreachable() {
        FailureKind::Unreachable
    } else {
        FailureKind::Protocol
    }
}
