//! Binary protocol command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// Opcodes understood by the binary (datagram) device family. They travel as
/// a little-endian `u32` at frame offset 4.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Command {
    // Session
    Connect = 0x1000,

    // Device information
    GetInfo = 0x1100,

    // Enrollment (two-phase)
    EnrollBegin = 0x1200,
    EnrollComplete = 0x1201,

    // Matching
    Verify = 0x1300,

    // Template management
    Delete = 0x1400,

    // Attendance logs
    AttendanceLogs = 0x1500,
}

impl Command {
    /// Raw opcode
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Check if the command changes state on the device
    ///
    /// Such commands are never retried by the library.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::EnrollBegin | Self::EnrollComplete | Self::Delete
        )
    }

    /// Check if the command carries a `(user_id, finger_index)` payload
    pub fn takes_identity(self) -> bool {
        matches!(
            self,
            Self::EnrollBegin | Self::EnrollComplete | Self::Verify | Self::Delete
        )
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Connect => "CMD_CONNECT",
            Self::GetInfo => "CMD_GET_INFO",
            Self::EnrollBegin => "CMD_ENROLL_BEGIN",
            Self::EnrollComplete => "CMD_ENROLL_COMPLETE",
            Self::Verify => "CMD_VERIFY",
            Self::Delete => "CMD_DELETE",
            Self::AttendanceLogs => "CMD_ATTLOG",
        }
    }
}

impl From<Command> for u32 {
    fn from(cmd: Command) -> u32 {
        cmd as u32
    }
}

impl TryFrom<u32> for Command {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0x1000 => Ok(Self::Connect),
            0x1100 => Ok(Self::GetInfo),
            0x1200 => Ok(Self::EnrollBegin),
            0x1201 => Ok(Self::EnrollComplete),
            0x1300 => Ok(Self::Verify),
            0x1400 => Ok(Self::Delete),
            0x1500 => Ok(Self::AttendanceLogs),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:04X})", self.name(), self.code())
    }
}
