//! # biogate-core
//!
//! Core protocol implementation for binary fingerprint terminals.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and header encoding/decoding
//! - Fixed-offset reply field decoding
//! - Command definitions
//! - Session state machine
//! - Protocol constants

pub mod command;
pub mod constants;
pub mod error;
pub mod fields;
pub mod frame;
pub mod session;

pub use command::Command;
pub use error::{Error, Result};
pub use fields::{FieldKind, FieldSpec, FieldValue, ReplyFields, decode_fixed_fields};
pub use frame::{Frame, FrameHeader, HEADER_SIZE, decode_header, encode};
pub use session::{Session, SessionState};
