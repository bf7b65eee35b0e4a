//! Fixed-offset reply field decoding
//!
//! Binary devices answer with fixed-record replies: every command has a
//! known layout of `(name, byte range, kind)` entries. Decoding is pure so
//! layouts can be checked against literal byte fixtures.

use std::collections::BTreeMap;
use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};
use tracing::trace;

use crate::{
    command::Command,
    error::{Error, Result},
    frame::decode_header,
};

/// How a field's bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Little-endian unsigned integer, 1 to 8 bytes wide
    UintLe,

    /// Text padded with trailing NUL bytes
    PaddedText,
}

/// One entry of a reply layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub range: Range<usize>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn uint(name: &'static str, start: usize, end: usize) -> Self {
        Self {
            name,
            range: start..end,
            kind: FieldKind::UintLe,
        }
    }

    pub const fn text(name: &'static str, start: usize, end: usize) -> Self {
        Self {
            name,
            range: start..end,
            kind: FieldKind::PaddedText,
        }
    }
}

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Uint(u64),
    Text(String),
}

/// Decoded fields, keyed by layout name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyFields {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ReplyFields {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Integer field, `None` if absent or not an integer
    pub fn uint(&self, name: &str) -> Option<u64> {
        match self.values.get(name)? {
            FieldValue::Uint(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    /// Text field, `None` if absent or not text
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Uint(_) => None,
        }
    }

    /// Take ownership of a text field
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        if !matches!(self.values.get(name), Some(FieldValue::Text(_))) {
            return None;
        }

        match self.values.remove(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Minimum frame length required by a layout
pub fn required_len(layout: &[FieldSpec]) -> usize {
    layout.iter().map(|f| f.range.end).max().unwrap_or(0)
}

/// Decode a reply's fixed-offset fields
///
/// # Errors
///
/// - [`Error::TruncatedFrame`] if `frame` is shorter than the highest offset
///   in `layout`; nothing is decoded in that case
/// - [`Error::InvalidField`] for a reversed range, an integer field wider
///   than 8 bytes or an empty integer range
pub fn decode_fixed_fields(frame: &[u8], layout: &[FieldSpec]) -> Result<ReplyFields> {
    if let Some(spec) = layout.iter().find(|spec| spec.range.start > spec.range.end) {
        return Err(Error::InvalidField {
            name: spec.name,
            reason: format!(
                "range {}..{} starts after it ends",
                spec.range.start, spec.range.end
            ),
        });
    }

    let required = required_len(layout);
    if frame.len() < required {
        return Err(Error::TruncatedFrame {
            expected: required,
            actual: frame.len(),
        });
    }

    let mut values = BTreeMap::new();

    for spec in layout {
        let bytes = &frame[spec.range.clone()];

        let value = match spec.kind {
            FieldKind::UintLe => FieldValue::Uint(decode_uint(spec.name, bytes)?),
            FieldKind::PaddedText => FieldValue::Text(decode_padded_text(bytes)),
        };

        trace!(field = spec.name, ?value, "Decoded reply field");
        values.insert(spec.name, value);
    }

    Ok(ReplyFields { values })
}

/// Decode NUL-padded text, dropping the trailing padding
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_padded_text(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);

    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn decode_uint(name: &'static str, bytes: &[u8]) -> Result<u64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return Err(Error::InvalidField {
            name,
            reason: format!("integer width {} not in 1..=8", bytes.len()),
        });
    }

    Ok(LittleEndian::read_uint(bytes, bytes.len()))
}

/// Extract the device-assigned session id from a connect reply
///
/// Devices answer the handshake in one of two shapes: the session id in
/// place of the command word (`[4,8)`), or a reply header echoing the
/// connect opcode followed by the session id (`[8,12)`).
///
/// # Errors
///
/// Returns [`Error::MalformedFrame`] for replies shorter than a header.
pub fn connect_session_id(reply: &[u8]) -> Result<u32> {
    let header = decode_header(reply)?;

    let layout = if header.code == Command::Connect.code() && reply.len() >= 12 {
        layout::CONNECT_REPLY_ECHOED
    } else {
        layout::CONNECT_REPLY
    };

    let fields = decode_fixed_fields(reply, layout)?;
    fields
        .uint("session_id")
        .map(|id| id as u32)
        .ok_or(Error::InvalidField {
            name: "session_id",
            reason: "missing from connect reply".to_string(),
        })
}

/// Reply layouts for the consumed opcodes
pub mod layout {
    use super::FieldSpec;

    /// Connect reply: device-assigned session id in the second header word
    pub const CONNECT_REPLY: &[FieldSpec] = &[FieldSpec::uint("session_id", 4, 8)];

    /// Connect reply that echoes the connect opcode in its header and
    /// carries the session id as the first payload word
    pub const CONNECT_REPLY_ECHOED: &[FieldSpec] = &[
        FieldSpec::uint("code", 4, 8),
        FieldSpec::uint("session_id", 8, 12),
    ];

    /// Verify/delete reply: `1` means success
    pub const RESULT_CODE: &[FieldSpec] = &[FieldSpec::uint("result", 4, 8)];

    /// Get-info reply: four 16-byte NUL-padded strings after the header
    pub const DEVICE_INFO: &[FieldSpec] = &[
        FieldSpec::text("serial_number", 8, 24),
        FieldSpec::text("platform", 24, 40),
        FieldSpec::text("firmware_version", 40, 56),
        FieldSpec::text("work_code", 56, 72),
    ];
}
