//! Reply fixtures for device tests

use biogate_core::frame;

pub(crate) use biogate_transport::testing::{FakeUdpDevice, connect_reply, serve_once};

/// Reply whose result word is `code`
pub(crate) fn reply_with_code(code: u32) -> Vec<u8> {
    frame::encode(code, &[]).to_vec()
}

pub(crate) fn device_info_reply(serial: &str, platform: &str, firmware: &str, work_code: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(64);
    for text in [serial, platform, firmware, work_code] {
        let mut field = [0u8; 16];
        field[..text.len()].copy_from_slice(text.as_bytes());
        payload.extend_from_slice(&field);
    }
    frame::encode(0x1100, &payload).to_vec()
}
