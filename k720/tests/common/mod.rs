// k720-rs/k720/tests/common/mod.rs

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use k720::constants::{ACK, EOT, STATUS_OK};
use k720::protocol::Frame;
use k720::test_support::SharedChannel;

/// Queue a complete successful exchange on the shared mock: ACK, a response
/// frame echoing `opcode` with OK status and `data`, then EOT.
pub fn seed_ok(handle: &SharedChannel, address: u8, opcode: u8, data: &[u8]) {
    let mut payload = vec![opcode, STATUS_OK];
    payload.extend_from_slice(data);

    let mut ch = handle.lock();
    ch.push_read(vec![ACK]);
    ch.push_read(Frame::encode(address, &payload).expect("payload fits a frame"));
    ch.push_read(vec![EOT]);
}

/// Decode every frame the session wrote, asserting each one is well-formed.
pub fn written_frames(handle: &SharedChannel) -> Vec<Frame> {
    handle
        .lock()
        .written
        .iter()
        .map(|wire| Frame::decode(wire).expect("session writes well-formed frames"))
        .collect()
}
