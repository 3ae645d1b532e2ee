// k720-rs/k720/src/protocol/responses/mod.rs

//! Response payload decoders.
//!
//! A response payload is `[opcode echo][status][data...]`. Decoding first
//! checks the opcode echo against the request, then the status byte: any
//! non-zero status becomes a typed error before the data is looked at.
//! The data bytes are then dispatched to the family decoder by opcode block.

mod aux;
mod cpu;
mod dispenser;
mod mifare;
mod vicinity;

use crate::constants::{
    OPCODE_BASE_AUX, OPCODE_BASE_CPU, OPCODE_BASE_DISPENSER, OPCODE_BASE_S50,
    OPCODE_BASE_VICINITY, STATUS_OK,
};
use crate::protocol::parser::{byte_at, expect_opcode};
use crate::status::{mechanical_error, CardBoxStatus, DeviceStatus, PositionStatus, TransportStatus};
use crate::types::{Atr, BlockData, CardType, CardUid, VicinityUid as Uid15693};
use crate::{Error, Result};

/// Decoded response data, one variant per response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Status-only acknowledgement.
    Ok,
    /// Firmware version string.
    Version(String),
    /// Device/transport/card-box status triple from the short query.
    QueryStatus {
        device: DeviceStatus,
        transport: TransportStatus,
        card_box: CardBoxStatus,
    },
    /// Full four-sensor snapshot.
    Position(PositionStatus),
    /// Lifetime dispense/recycle counters.
    Counters { dispensed: u32, recycled: u32 },
    /// Card type from the RFID auto-test.
    CardType(CardType),
    /// Mifare card UID.
    Uid(CardUid),
    /// One 16-byte Mifare block.
    Block(BlockData),
    /// CPU card answer-to-reset.
    Atr(Atr),
    /// One chained APDU response fragment.
    Apdu { rch: u8, data: Vec<u8> },
    /// ISO15693 card UID.
    VicinityUid(Uid15693),
    /// Raw data bytes for operations with free-form responses.
    Data(Vec<u8>),
    /// Single-byte reading from an auxiliary sensor.
    Byte(u8),
}

impl Response {
    /// Decode a response payload for the given request opcode.
    pub fn decode(opcode: u8, payload: &[u8]) -> Result<Self> {
        expect_opcode(payload, opcode)?;
        let status = byte_at(payload, 1)?;
        if status != STATUS_OK {
            return Err(mechanical_error(status));
        }
        let data = &payload[2..];
        match opcode {
            op if (OPCODE_BASE_S50..OPCODE_BASE_CPU).contains(&op) => {
                mifare::decode(op, data)
            }
            op if (OPCODE_BASE_CPU..OPCODE_BASE_VICINITY).contains(&op) => {
                cpu::decode(op, data)
            }
            op if (OPCODE_BASE_VICINITY..OPCODE_BASE_DISPENSER).contains(&op) => {
                vicinity::decode(op, data)
            }
            op if (OPCODE_BASE_DISPENSER..OPCODE_BASE_AUX).contains(&op) => {
                dispenser::decode(op, data)
            }
            op if op >= OPCODE_BASE_AUX => aux::decode(op, data),
            op => Err(Error::BadParameter(format!(
                "opcode {op:#04x} has no response decoder"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_echo_checked_first() {
        let err = Response::decode(0x61, &[0x62, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedResponse {
                expected: 0x61,
                actual: 0x62
            }
        ));
    }

    #[test]
    fn fault_status_short_circuits_decoding() {
        // Card box empty on a move command; data bytes are irrelevant
        let err = Response::decode(0x67, &[0x67, 0xA0, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::CardBoxEmpty));
    }

    #[test]
    fn unknown_fault_code_is_device_error() {
        let err = Response::decode(0x67, &[0x67, 0xC3]).unwrap_err();
        assert!(matches!(err, Error::Device { code: 0xC3 }));
    }

    #[test]
    fn ok_status_decodes() {
        let resp = Response::decode(0x67, &[0x67, 0x00]).unwrap();
        assert_eq!(resp, Response::Ok);
    }
}
