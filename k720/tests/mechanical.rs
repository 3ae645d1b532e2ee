// k720-rs/k720/tests/mechanical.rs

//! End-to-end dispense scenarios: controller, session, and scripted sensors.

mod common;

use k720::mechanical::{MechanicalConfig, MechanicalController, MechanicalState};
use k720::test_support::{mock_session, SharedChannel};
use k720::types::{CardFamily, RetainTarget};
use k720::utils::ms;
use k720::Error;

use common::seed_ok;

const SENSOR_QUERY: u8 = 0x62;

fn fast_controller() -> MechanicalController {
    MechanicalController::new(MechanicalConfig {
        send_card: ms(200),
        eject: ms(200),
        retain: ms(200),
        retain_check: ms(100),
        poll_interval: ms(1),
    })
}

fn seed_snapshot(handle: &SharedChannel, device: u8, transport: u8, card_box: u8, retain_box: u8) {
    seed_ok(
        handle,
        0x01,
        SENSOR_QUERY,
        &[device, transport, card_box, retain_box],
    );
}

// The full kiosk flow: dispense a card to the read head, read its UID,
// eject it, and watch the user take it.
#[test]
fn dispense_read_eject_cycle() {
    let (mut session, handle) = mock_session();
    let mut ctl = fast_controller();

    // send_card: pre-check, movement ack, one in-flight poll, arrival
    seed_snapshot(&handle, 0x30, 0x33, 0x32, 0x30);
    seed_ok(&handle, 0x01, 0x67, &[]);
    seed_snapshot(&handle, 0x33, 0x33, 0x32, 0x30);
    seed_snapshot(&handle, 0x30, 0x32, 0x32, 0x30);
    // card read at the head
    seed_ok(&handle, 0x01, 0x11, &[0xDE, 0xAD, 0xBE, 0xEF]);
    // eject: pre-check, movement ack, card taken
    seed_snapshot(&handle, 0x30, 0x32, 0x32, 0x30);
    seed_ok(&handle, 0x01, 0x67, &[]);
    seed_snapshot(&handle, 0x30, 0x33, 0x32, 0x30);

    ctl.send_card(&mut session).unwrap();
    assert_eq!(ctl.state(), MechanicalState::Idle);

    let uid = session.mifare_get_id(CardFamily::S50).unwrap();
    assert_eq!(uid.to_hex(), "deadbeef");

    ctl.eject_card(&mut session).unwrap();
    assert_eq!(ctl.state(), MechanicalState::Idle);
}

// A dispensed card the user rejected is pulled back into the reject box.
#[test]
fn recycle_unwanted_card() {
    let (mut session, handle) = mock_session();
    let mut ctl = fast_controller();

    // retain: pre-check shows the card still held, movement ack, clearing
    seed_snapshot(&handle, 0x30, 0x32, 0x32, 0x30);
    seed_ok(&handle, 0x01, 0x68, &[]);
    seed_snapshot(&handle, 0x34, 0x32, 0x32, 0x30);
    seed_snapshot(&handle, 0x30, 0x33, 0x32, 0x31);

    ctl.retain_card(&mut session, RetainTarget::RejectBox)
        .unwrap();
    assert_eq!(ctl.state(), MechanicalState::Idle);
}

#[test]
fn empty_box_reported_before_any_movement() {
    let (mut session, handle) = mock_session();
    let mut ctl = fast_controller();

    seed_snapshot(&handle, 0x30, 0x33, 0x30, 0x30);

    let err = ctl.send_card(&mut session).unwrap_err();
    assert!(matches!(err, Error::CardBoxEmpty));
    assert_eq!(ctl.state(), MechanicalState::SendFailed);
    assert_eq!(handle.lock().written.len(), 1);
}

// A jam latches Fault; only a recovery movement releases it and the next
// dispense succeeds.
#[test]
fn jam_recovery_cycle() {
    let (mut session, handle) = mock_session();
    let mut ctl = fast_controller();

    // First dispense jams mid-movement
    seed_snapshot(&handle, 0x30, 0x33, 0x32, 0x30);
    seed_ok(&handle, 0x01, 0x67, &[]);
    seed_snapshot(&handle, 0x31, 0x31, 0x32, 0x30);

    let err = ctl.send_card(&mut session).unwrap_err();
    assert!(matches!(err, Error::MechanicalFault { .. }));
    assert_eq!(ctl.state(), MechanicalState::Fault);

    // Recovery
    seed_ok(&handle, 0x01, 0x69, &[]);
    ctl.force_move(&mut session).unwrap();
    assert_eq!(ctl.state(), MechanicalState::Idle);

    // Second dispense goes through
    seed_snapshot(&handle, 0x30, 0x33, 0x32, 0x30);
    seed_ok(&handle, 0x01, 0x67, &[]);
    seed_snapshot(&handle, 0x30, 0x32, 0x32, 0x30);
    ctl.send_card(&mut session).unwrap();
    assert_eq!(ctl.state(), MechanicalState::Idle);
}
