// k720-rs/k720/src/test_support.rs

//! Shared helpers for unit and integration tests.
//!
//! A session owns its channel, so tests that need to inspect traffic after
//! the fact wrap a [`MockChannel`] in a [`SharedChannel`] and keep a clone of
//! the handle outside the session.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::channel::{Channel, MockChannel};
use crate::constants::{ACK, EOT, STATUS_OK};
use crate::device::Session;
use crate::protocol::Frame;
use crate::Result;

/// Cloneable channel handle over a [`MockChannel`].
#[derive(Clone)]
pub struct SharedChannel(Arc<Mutex<MockChannel>>);

impl SharedChannel {
    pub fn new(inner: MockChannel) -> Self {
        Self(Arc::new(Mutex::new(inner)))
    }

    /// Lock the wrapped mock for seeding or inspection.
    pub fn lock(&self) -> MutexGuard<'_, MockChannel> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Channel for SharedChannel {
    fn write(&mut self, data: &[u8], timeout: Duration) -> Result<()> {
        self.lock().write(data, timeout)
    }

    fn read(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        self.lock().read(max_len, timeout)
    }

    fn flush(&mut self) -> Result<()> {
        self.lock().flush()
    }
}

/// Session over a fresh mock channel, returning the inspection handle.
pub fn mock_session() -> (Session, SharedChannel) {
    let handle = SharedChannel::new(MockChannel::new());
    let session = Session::new(Box::new(handle.clone()));
    (session, handle)
}

/// Queue one complete successful exchange: ACK, a response frame echoing
/// `opcode` with OK status and `data`, then EOT.
pub fn seed_ok(ch: &mut MockChannel, address: u8, opcode: u8, data: &[u8]) {
    let mut payload = vec![opcode, STATUS_OK];
    payload.extend_from_slice(data);
    seed_payload(ch, address, &payload);
}

/// Queue one complete exchange whose response carries `status` and no data.
pub fn seed_status(ch: &mut MockChannel, address: u8, opcode: u8, status: u8) {
    seed_payload(ch, address, &[opcode, status]);
}

/// Queue ACK, an arbitrary response payload, then EOT.
pub fn seed_payload(ch: &mut MockChannel, address: u8, payload: &[u8]) {
    ch.push_read(vec![ACK]);
    // Encoding only fails on oversize payloads, which no test seeds
    if let Ok(wire) = Frame::encode(address, payload) {
        ch.push_read(wire);
    }
    ch.push_read(vec![EOT]);
}
