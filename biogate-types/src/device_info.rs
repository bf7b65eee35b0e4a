//! Device information structures

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Device information decoded from a binary get-info reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device serial number
    pub serial_number: String,

    /// Platform name
    pub platform: String,

    /// Firmware version
    pub firmware_version: String,

    /// Configured work code
    pub work_code: String,
}

impl DeviceInfo {
    pub fn new(
        serial_number: impl Into<String>,
        platform: impl Into<String>,
        firmware_version: impl Into<String>,
        work_code: impl Into<String>,
    ) -> Self {
        Self {
            serial_number: serial_number.into(),
            platform: platform.into(),
            firmware_version: firmware_version.into(),
            work_code: work_code.into(),
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[SN: {}, Platform: {}, FW: {}]",
            self.serial_number, self.platform, self.firmware_version
        )
    }
}

/// Device details as reported by a particular device family
///
/// Binary devices have a fixed info record; HTTP devices return an
/// arbitrary JSON object whose fields are vendor-specific.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeviceDetails {
    Fixed(DeviceInfo),
    Json(Map<String, Value>),
}

impl DeviceDetails {
    /// Serial number if the family reports one
    pub fn serial_number(&self) -> Option<&str> {
        match self {
            Self::Fixed(info) => Some(info.serial_number.as_str()),
            Self::Json(map) => map
                .get("serial_number")
                .or_else(|| map.get("serialNumber"))
                .and_then(Value::as_str),
        }
    }

    pub fn as_fixed(&self) -> Option<&DeviceInfo> {
        match self {
            Self::Fixed(info) => Some(info),
            Self::Json(_) => None,
        }
    }
}

impl fmt::Display for DeviceDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(info) => info.fmt(f),
            Self::Json(map) => write!(f, "Device{}", Value::Object(map.clone())),
        }
    }
}
