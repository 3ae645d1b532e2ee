// k720-rs/k720/tests/protocol.rs

//! Wire-level integration tests: a session driving the exchange engine
//! against a scripted channel.

mod common;

use k720::constants::{ACK, EOT, NAK};
use k720::device::Session;
use k720::protocol::{ExchangeTimeouts, Frame};
use k720::test_support::{mock_session, SharedChannel};
use k720::utils::ms;
use k720::Error;

use common::{seed_ok, written_frames};

#[test]
fn counters_over_the_wire() {
    let (mut session, handle) = mock_session();
    let mut data = Vec::new();
    data.extend_from_slice(&40211u32.to_be_bytes());
    data.extend_from_slice(&977u32.to_be_bytes());
    data.extend_from_slice(&[0, 0, 0]);
    seed_ok(&handle, 0x01, 0x63, &data);

    let (dispensed, recycled) = session.counters().unwrap();
    assert_eq!((dispensed, recycled), (40211, 977));

    let frames = written_frames(&handle);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].address, 0x01);
    assert_eq!(frames[0].payload, vec![0x63]);
}

#[test]
fn response_split_across_chunks() {
    let (mut session, handle) = mock_session();
    let payload = hex::decode("60004431383031").unwrap(); // opcode, OK, "D1801"
    let wire = Frame::encode(0x01, &payload).unwrap();
    {
        let mut ch = handle.lock();
        // Line noise, then ACK glued to the first half of the packet
        let mut first = vec![NAK, ACK];
        first.extend_from_slice(&wire[..4]);
        ch.push_read(first);
        ch.push_read(wire[4..].to_vec());
        ch.push_read(vec![EOT]);
    }

    assert_eq!(session.version().unwrap(), "D1801");
}

#[test]
fn non_default_address_round_trip() {
    let handle = SharedChannel::new(k720::channel::MockChannel::new());
    let mut session = Session::builder(Box::new(handle.clone()))
        .address(0x07)
        .timeouts(ExchangeTimeouts {
            ack: ms(50),
            packet: ms(50),
            eot: ms(50),
            total: ms(200),
        })
        .build();
    seed_ok(&handle, 0x07, 0x66, &[]);

    session.auto_test_mac().unwrap();
    assert_eq!(written_frames(&handle)[0].address, 0x07);
}

#[test]
fn corrupted_response_is_not_retried() {
    let (mut session, handle) = mock_session();
    {
        let mut ch = handle.lock();
        let mut wire = Frame::encode(0x01, &[0x61, 0x00, 0x30, 0x33, 0x32]).unwrap();
        let last = wire.len() - 1;
        wire[last] ^= 0x55;
        ch.push_read(vec![ACK]);
        ch.push_read(wire);
    }

    let err = session
        .execute(&k720::protocol::Command::Dispenser(
            k720::protocol::commands::DispenserCommand::Query,
        ))
        .unwrap_err();
    assert!(matches!(err, Error::WrongBcc { .. }));
    // The request went out exactly once
    assert_eq!(handle.lock().written.len(), 1);
}
