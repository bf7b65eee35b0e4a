//! Attendance log structures
//!
//! No device family decodes log records yet; these types fix the shape
//! callers receive once a record layout is known.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How a user was verified at the terminal
///
/// Not mapped to device codes; the log record layout is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMode {
    Password,
    Fingerprint,
    Card,
    Face,
}

/// One attendance punch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceLogEntry {
    pub user_id: u32,
    pub timestamp: NaiveDateTime,
    pub verification_method: VerifyMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_entry_serializes_mode_by_name() {
        let entry = AttendanceLogEntry {
            user_id: 123,
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(8, 30, 0))
                .unwrap(),
            verification_method: VerifyMode::Fingerprint,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["verification_method"], "fingerprint");
        assert_eq!(json["timestamp"], "2024-03-01T08:30:00");
    }
}
