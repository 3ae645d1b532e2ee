// k720-rs/k720/tests/device.rs

//! Session-level integration tests: typed operations and cross-thread use.

mod common;

use std::sync::{Arc, Mutex};
use std::thread;

use k720::test_support::mock_session;
use k720::types::{CardFamily, KeyType, SectorKey};

use common::{seed_ok, written_frames};

#[test]
fn authenticate_and_read_card() {
    let (mut session, handle) = mock_session();
    seed_ok(&handle, 0x01, 0x10, &[]); // detect
    seed_ok(&handle, 0x01, 0x11, &[0x04, 0xA1, 0xB2, 0xC3]); // uid
    seed_ok(&handle, 0x01, 0x12, &[]); // load key
    seed_ok(&handle, 0x01, 0x13, &[0x5A; 16]); // read block

    session.mifare_detect(CardFamily::S50).unwrap();
    let uid = session.mifare_get_id(CardFamily::S50).unwrap();
    assert_eq!(uid.to_hex(), "04a1b2c3");

    session
        .mifare_load_key(
            CardFamily::S50,
            1,
            KeyType::A,
            SectorKey::from_bytes([0xFF; 6]),
        )
        .unwrap();
    let block = session.mifare_read_block(CardFamily::S50, 1, 2).unwrap();
    assert_eq!(block.as_bytes(), &[0x5A; 16]);

    // The key bytes crossed the wire exactly once, inside the load command
    let frames = written_frames(&handle);
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[2].payload[..3], [0x12, 0x01, 0x00]);
    assert_eq!(&frames[2].payload[3..], &[0xFF; 6]);
}

#[test]
fn vicinity_addressed_operations() {
    let (mut session, handle) = mock_session();
    let uid = [0xE0, 0x04, 0x01, 0x00, 0x12, 0x34, 0x56, 0x78];
    seed_ok(&handle, 0x01, 0x50, &uid);
    seed_ok(&handle, 0x01, 0x51, &[]);
    seed_ok(&handle, 0x01, 0x52, &[1, 2, 3, 4]);

    let card = session.vicinity_get_uid().unwrap();
    session.vicinity_choose_card(card).unwrap();
    let data = session.vicinity_read(Some(card), 0, 1).unwrap();
    assert_eq!(data, vec![1, 2, 3, 4]);

    let frames = written_frames(&handle);
    // ChooseCard carries the addressed-mode flag and the UID
    assert_eq!(frames[1].payload[0], 0x51);
    assert_eq!(frames[1].payload[1], 0x01);
    assert_eq!(&frames[1].payload[2..10], &uid);
    // GetUid went out non-addressed with a zeroed UID field
    assert_eq!(frames[0].payload[1], 0x00);
    assert_eq!(&frames[0].payload[2..10], &[0u8; 8]);
}

// The protocol is half-duplex: `&mut self` on every operation means sharing
// a session requires a lock, and the lock keeps whole exchanges atomic.
#[test]
fn shared_session_never_interleaves_exchanges() {
    let (session, handle) = mock_session();
    for _ in 0..8 {
        seed_ok(&handle, 0x01, 0x66, &[]);
    }
    let session = Arc::new(Mutex::new(session));

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for _ in 0..4 {
                    let mut guard = session.lock().unwrap();
                    guard.auto_test_mac().unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // Every write is one complete well-formed frame; a torn or interleaved
    // request would fail to decode here.
    let frames = written_frames(&handle);
    assert_eq!(frames.len(), 8);
    for frame in frames {
        assert_eq!(frame.payload, vec![0x66]);
    }
}

/// Smoke test against real hardware. Point `K720_PORT` at the terminal's
/// serial device and run with `--ignored`.
#[test]
#[ignore]
#[cfg(feature = "serial")]
#[serial_test::serial]
fn hardware_version_query() {
    use k720::channel::SerialChannel;
    use k720::device::Session;

    let port = std::env::var("K720_PORT").expect("set K720_PORT to run hardware tests");
    let channel = SerialChannel::open(&port, 9600).expect("open serial port");
    let mut session = Session::new(Box::new(channel));
    let version = session.version().expect("version query");
    assert!(!version.is_empty());
}
