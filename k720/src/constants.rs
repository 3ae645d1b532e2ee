// k720-rs/k720/src/constants.rs
//! Wire constants shared across the crate.
//!
//! The status byte vocabulary and the mechanical timeout budgets are part of
//! the device firmware contract and must be preserved exactly.

/// Frame header byte (STX) opening every data packet.
pub const FRAME_HEADER: u8 = 0xF2;

/// Control byte acknowledging receipt of a request, sent before the data packet.
pub const ACK: u8 = 0x06;

/// Control byte rejecting a request.
pub const NAK: u8 = 0x15;

/// Control byte terminating an exchange, sent after the data packet.
pub const EOT: u8 = 0x04;

/// Control byte asking the device to re-send its last packet.
pub const ENQ: u8 = 0x05;

/// Minimal wire frame length: header + address + two length bytes + BCC.
pub const MIN_FRAME_LEN: usize = 5;

/// Maximum payload length accepted in one frame.
pub const MAX_PAYLOAD_LEN: usize = 512;

/// Default device address byte.
pub const DEFAULT_ADDRESS: u8 = 0x01;

// Mechanical fault codes returned in the response status byte.
/// Dispense box empty, cannot dispense.
pub const FAULT_CARD_BOX_EMPTY: u8 = 0xA0;
/// Dispense box full, cannot recycle a card into it.
pub const FAULT_CARD_BOX_FULL: u8 = 0xA1;
/// Retain box full, cannot retain.
pub const FAULT_RETAIN_BOX_FULL: u8 = 0xA2;
/// A card already occupies the transport.
pub const FAULT_HAVE_CARD: u8 = 0xA3;
/// No card in the transport for an eject/retain action.
pub const FAULT_HAVE_NO_CARD: u8 = 0xA4;
/// Card movement timed out (dispense, eject, retain).
pub const FAULT_MOVE_CARD_TIMEOUT: u8 = 0xA5;
/// Front-end card entry timed out while retaining.
pub const FAULT_ENTER_CARD_TIMEOUT: u8 = 0xA6;

// Mechanical timeout budgets in milliseconds.
/// Budget for a full dispense movement.
pub const SEND_CARD_TIMEOUT_MS: u64 = 15000;
/// Budget for an eject movement.
pub const EJECT_CARD_TIMEOUT_MS: u64 = 8000;
/// Budget for the card to reach the retain box.
pub const RETAIN_CARD_TIMEOUT_MS: u64 = 4000;
/// Budget for the card to enter the transport while retaining.
pub const RETAIN_CHECK_TIMEOUT_MS: u64 = 2500;
/// Interval between mechanical status polls.
pub const POLL_INTERVAL_MS: u64 = 200;

// Exchange timeout defaults in milliseconds.
/// Default wait for the ACK control byte.
pub const ACK_TIMEOUT_MS: u64 = 500;
/// Default wait for a complete data packet after ACK.
pub const PACKET_TIMEOUT_MS: u64 = 1000;
/// Default wait for the EOT control byte after the data packet.
pub const EOT_TIMEOUT_MS: u64 = 300;
/// Default budget for one whole exchange attempt.
pub const EXCHANGE_TIMEOUT_MS: u64 = 3000;

// Command opcode blocks, one byte per operation grouped by family. The
// Mifare families share operation offsets within their 0x10-aligned blocks.
/// Base opcode for Mifare S50 operations.
pub const OPCODE_BASE_S50: u8 = 0x10;
/// Base opcode for Mifare S70 operations.
pub const OPCODE_BASE_S70: u8 = 0x20;
/// Base opcode for Mifare Ultralight operations.
pub const OPCODE_BASE_UL: u8 = 0x30;
/// Base opcode for CPU (ISO7816) card operations.
pub const OPCODE_BASE_CPU: u8 = 0x40;
/// Base opcode for ISO15693 vicinity card operations.
pub const OPCODE_BASE_VICINITY: u8 = 0x50;
/// Base opcode for D1801 dispenser operations.
pub const OPCODE_BASE_DISPENSER: u8 = 0x60;
/// Base opcode for auxiliary sensor operations.
pub const OPCODE_BASE_AUX: u8 = 0x70;

/// Response status byte signalling success.
pub const STATUS_OK: u8 = 0x00;
