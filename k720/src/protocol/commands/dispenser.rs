// k720-rs/k720/src/protocol/commands/dispenser.rs

use crate::constants::OPCODE_BASE_DISPENSER;
use crate::types::{MovePosition, RetainTarget};

/// D1801 dispenser operations: firmware queries, counters, raw movement.
#[derive(Debug, Clone)]
pub enum DispenserCommand {
    /// Firmware version string (up to 20 bytes).
    GetVersion,
    /// Device/transport/card-box status triple.
    Query,
    /// Full four-sensor position snapshot.
    SensorQuery,
    /// Lifetime dispense/recycle counters.
    GetCountSum,
    /// Zero the dispense counter.
    ClearSendCount,
    /// Zero the recycle counter.
    ClearRecycleCount,
    /// Link test against the addressed controller.
    AutoTestMac,
    /// Start a raw card movement. Completion is observed by polling.
    MoveCard { position: MovePosition },
    /// Start moving the held card into a box.
    RetainToBox { target: RetainTarget },
    /// Unconditional recovery movement, clears jams.
    ForceMove,
    /// Read the DIP/configuration switches.
    CheckSetting,
    /// Probe the card at the read head and report its type.
    AutoTestRfidCard,
    /// Raw command passthrough for diagnostics.
    SendRaw { data: Vec<u8> },
}

impl DispenserCommand {
    pub fn opcode(&self) -> u8 {
        OPCODE_BASE_DISPENSER
            + match self {
                Self::GetVersion => 0x00,
                Self::Query => 0x01,
                Self::SensorQuery => 0x02,
                Self::GetCountSum => 0x03,
                Self::ClearSendCount => 0x04,
                Self::ClearRecycleCount => 0x05,
                Self::AutoTestMac => 0x06,
                Self::MoveCard { .. } => 0x07,
                Self::RetainToBox { .. } => 0x08,
                Self::ForceMove => 0x09,
                Self::CheckSetting => 0x0A,
                Self::AutoTestRfidCard => 0x0B,
                Self::SendRaw { .. } => 0x0C,
            }
    }

    pub fn encode_args(&self, out: &mut Vec<u8>) {
        match self {
            Self::MoveCard { position } => out.push(*position as u8),
            Self::RetainToBox { target } => out.push(target.as_byte()),
            Self::SendRaw { data } => out.extend_from_slice(data),
            _ => {}
        }
    }
}
