// k720-rs/k720/src/protocol/responses/dispenser.rs

use crate::constants::OPCODE_BASE_DISPENSER;
use crate::protocol::parser::{be_u32_at, byte_at, ensure_len};
use crate::status::{CardBoxStatus, DeviceStatus, PositionStatus, TransportStatus};
use crate::types::CardType;
use crate::{Error, Result};

use super::Response;

/// Counter payload: dispensed (4) + recycled (4) + 3 reserved bytes.
const COUNTERS_LEN: usize = 11;

pub(super) fn decode(opcode: u8, data: &[u8]) -> Result<Response> {
    match opcode - OPCODE_BASE_DISPENSER {
        // GetVersion: ASCII string, NUL-padded to the field width
        0x00 => {
            let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
            Ok(Response::Version(
                String::from_utf8_lossy(&data[..end]).into_owned(),
            ))
        }
        // Query: device/transport/card-box triple
        0x01 => {
            ensure_len(data, 3)?;
            Ok(Response::QueryStatus {
                device: DeviceStatus::from_byte(data[0])?,
                transport: TransportStatus::from_byte(data[1])?,
                card_box: CardBoxStatus::from_byte(data[2])?,
            })
        }
        // SensorQuery: full four-sensor snapshot
        0x02 => Ok(Response::Position(PositionStatus::from_bytes(
            data.get(..4).unwrap_or(data),
        )?)),
        // GetCountSum
        0x03 => {
            ensure_len(data, COUNTERS_LEN)?;
            Ok(Response::Counters {
                dispensed: be_u32_at(data, 0)?,
                recycled: be_u32_at(data, 4)?,
            })
        }
        // Counter clears, link test, movements, recovery: status-only
        0x04..=0x09 => Ok(Response::Ok),
        // CheckSetting: raw switch bytes
        0x0A => Ok(Response::Data(data.to_vec())),
        // AutoTestRfidCard
        0x0B => Ok(Response::CardType(CardType::from_byte(byte_at(data, 0)?)?)),
        // SendRaw passthrough
        0x0C => Ok(Response::Data(data.to_vec())),
        _ => Err(Error::BadParameter(format!(
            "opcode {opcode:#04x} has no response decoder"
        ))),
    }
}
