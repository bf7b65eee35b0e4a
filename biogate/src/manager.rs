//! Device family selection and call forwarding

use std::fmt;
use std::str::FromStr;

use biogate_core::constants::{DEFAULT_DATAGRAM_PORT, DEFAULT_HTTP_PORT};
use biogate_types::{
    AttendanceLogEntry, DeletionResult, DeviceDetails, DeviceEndpoint, EnrollmentResult,
    VerificationResult,
};
use tracing::info;

use crate::config::DeviceConfig;
use crate::device::{FingerprintDevice, SupremaDevice, ZktecoDevice};
use crate::error::{Error, Result};

/// Supported device families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Binary datagram protocol
    Zkteco,
    /// JSON over HTTP
    Suprema,
}

impl DeviceFamily {
    pub const ALL: [DeviceFamily; 2] = [DeviceFamily::Zkteco, DeviceFamily::Suprema];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zkteco => "zkteco",
            Self::Suprema => "suprema",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Zkteco => DEFAULT_DATAGRAM_PORT,
            Self::Suprema => DEFAULT_HTTP_PORT,
        }
    }
}

impl FromStr for DeviceFamily {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|family| family.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| Error::UnsupportedDeviceType(tag.to_string()))
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes every call to the one device implementation chosen at construction
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use biogate::DeviceManager;
/// use biogate_types::DeviceEndpoint;
///
/// # async fn run() -> biogate::Result<()> {
/// let endpoint = DeviceEndpoint::new("192.168.1.201", 4370, Duration::from_secs(5))?;
/// let mut manager = DeviceManager::new("zkteco", endpoint)?;
///
/// if manager.connect().await {
///     if let Some(info) = manager.get_device_info().await {
///         println!("{}", info);
///     }
///     manager.disconnect().await;
/// }
/// # Ok(())
/// # }
/// ```
pub struct DeviceManager {
    family: DeviceFamily,
    device: Box<dyn FingerprintDevice>,
}

impl DeviceManager {
    /// Build the implementation for `device_type`
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedDeviceType`] for an unknown tag; there is no
    /// fallback family.
    pub fn new(device_type: &str, endpoint: DeviceEndpoint) -> Result<Self> {
        let family: DeviceFamily = device_type.parse()?;

        let device: Box<dyn FingerprintDevice> = match family {
            DeviceFamily::Zkteco => Box::new(ZktecoDevice::new(&endpoint)),
            DeviceFamily::Suprema => Box::new(SupremaDevice::new(&endpoint)?),
        };

        info!("Managing {} device at {}", family, endpoint);
        Ok(Self::with_device(family, device))
    }

    /// Build from a validated configuration, including capture settings
    pub fn from_config(config: &DeviceConfig) -> Result<Self> {
        config.validate()?;

        let family = config.family()?;
        let endpoint = config.endpoint()?;

        let device: Box<dyn FingerprintDevice> = match family {
            DeviceFamily::Zkteco => Box::new(
                ZktecoDevice::new(&endpoint)
                    .with_capture(config.capture())
                    .with_capture_timeout(config.capture_timeout()),
            ),
            DeviceFamily::Suprema => Box::new(SupremaDevice::new(&endpoint)?),
        };

        info!("Managing {} device at {}", family, endpoint);
        Ok(Self::with_device(family, device))
    }

    fn with_device(family: DeviceFamily, device: Box<dyn FingerprintDevice>) -> Self {
        Self { family, device }
    }

    pub fn family(&self) -> DeviceFamily {
        self.family
    }

    pub async fn connect(&mut self) -> bool {
        self.device.connect().await
    }

    pub async fn disconnect(&mut self) {
        self.device.disconnect().await
    }

    pub fn is_connected(&self) -> bool {
        self.device.is_connected()
    }

    pub async fn get_device_info(&mut self) -> Option<DeviceDetails> {
        self.device.get_device_info().await
    }

    pub async fn enroll_fingerprint(&mut self, user_id: u32, finger_index: u32) -> EnrollmentResult {
        self.device.enroll_fingerprint(user_id, finger_index).await
    }

    pub async fn verify_fingerprint(&mut self, user_id: u32, finger_index: u32) -> VerificationResult {
        self.device.verify_fingerprint(user_id, finger_index).await
    }

    pub async fn delete_fingerprint(&mut self, user_id: u32, finger_index: u32) -> DeletionResult {
        self.device.delete_fingerprint(user_id, finger_index).await
    }

    pub async fn get_attendance_logs(&mut self) -> Vec<AttendanceLogEntry> {
        self.device.get_attendance_logs().await
    }
}

impl fmt::Debug for DeviceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceManager")
            .field("family", &self.family)
            .field("connected", &self.device.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeUdpDevice, connect_reply, device_info_reply, reply_with_code, serve_once};
    use biogate_types::DeviceInfo;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn endpoint(port: u16) -> DeviceEndpoint {
        DeviceEndpoint::new("127.0.0.1", port, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_family_tags() {
        assert_eq!("zkteco".parse::<DeviceFamily>().unwrap(), DeviceFamily::Zkteco);
        assert_eq!(" ZKTeco ".parse::<DeviceFamily>().unwrap(), DeviceFamily::Zkteco);
        assert_eq!("SUPREMA".parse::<DeviceFamily>().unwrap(), DeviceFamily::Suprema);
        assert_eq!(DeviceFamily::Suprema.to_string(), "suprema");
        assert_eq!(DeviceFamily::Zkteco.default_port(), 4370);
        assert_eq!(DeviceFamily::Suprema.default_port(), 80);
    }

    #[test]
    fn test_unknown_tag_fails_fast() {
        for tag in ["", "anviz", "zk teco"] {
            let result = DeviceManager::new(tag, endpoint(4370));
            assert!(
                matches!(&result, Err(Error::UnsupportedDeviceType(t)) if t == tag.trim()),
                "{:?} accepted",
                tag
            );
        }
    }

    #[test]
    fn test_from_config_selects_family() {
        let manager = DeviceManager::from_config(&DeviceConfig::new("suprema", "10.0.0.7")).unwrap();
        assert_eq!(manager.family(), DeviceFamily::Suprema);
        assert!(!manager.is_connected());

        let invalid = DeviceConfig::new("suprema", "");
        assert!(matches!(DeviceManager::from_config(&invalid), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_forwards_to_binary_device() {
        let device = FakeUdpDevice::bind().await;
        let mut manager = DeviceManager::new("zkteco", endpoint(device.port())).unwrap();

        let reply = connect_reply(42);
        let (ok, _) = tokio::join!(manager.connect(), device.answer(&reply));
        assert!(ok);
        assert!(manager.is_connected());

        let reply = device_info_reply("SN00001", "ZK4500", "Ver 6.60", "0");
        let (info, _) = tokio::join!(manager.get_device_info(), device.answer(&reply));
        let info = info.unwrap();
        assert_eq!(info.as_fixed(), Some(&DeviceInfo::new("SN00001", "ZK4500", "Ver 6.60", "0")));

        let reply = reply_with_code(1);
        let (verified, _) =
            tokio::join!(manager.verify_fingerprint(123, 0), device.answer(&reply));
        assert!(verified.success);

        let reply = reply_with_code(0);
        let (deleted, _) =
            tokio::join!(manager.delete_fingerprint(123, 0), device.answer(&reply));
        assert!(!deleted.success);

        manager.disconnect().await;
        assert!(!manager.is_connected());
        assert!(!manager.verify_fingerprint(123, 0).await.success);
    }

    #[tokio::test]
    async fn test_forwards_to_http_device() {
        let (endpoint, server) = serve_once("200 OK", r#"{"success":true}"#).await;
        let mut manager = DeviceManager::new("suprema", endpoint).unwrap();

        assert!(manager.enroll_fingerprint(7, 1).await.success);
        assert!(manager.get_attendance_logs().await.is_empty());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/fingerprint/enroll HTTP/1.1"));
    }
}
