//! Type definitions for biogate

pub mod attendance;
pub mod device_info;
pub mod endpoint;
pub mod error;
pub mod outcome;

pub use attendance::{AttendanceLogEntry, VerifyMode};
pub use device_info::{DeviceDetails, DeviceInfo};
pub use endpoint::DeviceEndpoint;
pub use error::{Error, Result};
pub use outcome::{
    DeletionResult, EnrollmentResult, FailureKind, OperationOutcome, VerificationResult,
};
