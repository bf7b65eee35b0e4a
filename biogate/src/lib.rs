//! # biogate
//!
//! Async client for networked fingerprint terminals.
//!
//! ## Features
//!
//! - Binary datagram protocol (ZKTeco-style) with a stateful session
//! - JSON-over-HTTP protocol (Suprema-style)
//! - One operation set for both, selected by a device family tag
//! - Soft failures: per-operation calls never return errors
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use biogate::{DeviceEndpoint, DeviceManager};
//!
//! #[tokio::main]
//! async fn main() -> biogate::Result<()> {
//!     let endpoint = DeviceEndpoint::new("192.168.1.201", 4370, Duration::from_secs(5))?;
//!     let mut device = DeviceManager::new("zkteco", endpoint)?;
//!
//!     if device.connect().await {
//!         if let Some(info) = device.get_device_info().await {
//!             println!("{}", info);
//!         }
//!
//!         let result = device.verify_fingerprint(123, 0).await;
//!         println!("verify: {}", result);
//!
//!         device.disconnect().await;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod config;
pub mod device;
pub mod error;
pub mod manager;

#[cfg(test)]
mod testing;

// Re-exports
pub use capture::{CaptureError, CaptureMonitor, FixedDelayCapture};
pub use config::{ConfigError, DeviceConfig};
pub use device::{FingerprintDevice, SupremaDevice, ZktecoDevice};
pub use error::{Error, Result};
pub use manager::{DeviceFamily, DeviceManager};

pub use biogate_types::{
    AttendanceLogEntry, DeletionResult, DeviceDetails, DeviceEndpoint, DeviceInfo,
    EnrollmentResult, FailureKind, OperationOutcome, VerificationResult, VerifyMode,
};
