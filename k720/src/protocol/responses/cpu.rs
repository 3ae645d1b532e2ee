// k720-rs/k720/src/protocol/responses/cpu.rs

use crate::constants::OPCODE_BASE_CPU;
use crate::protocol::parser::byte_at;
use crate::types::Atr;
use crate::{Error, Result};

use super::Response;

pub(super) fn decode(opcode: u8, data: &[u8]) -> Result<Response> {
    match opcode - OPCODE_BASE_CPU {
        // PowerOn / TypeBPowerOn: data is the ATR
        0x00 | 0x03 => Ok(Response::Atr(Atr::from_bytes(data))),
        // Apdu / TypeBApdu: receive chain header then response bytes
        0x01 | 0x04 => {
            let rch = byte_at(data, 0)?;
            Ok(Response::Apdu {
                rch,
                data: data[1..].to_vec(),
            })
        }
        // PowerOff / TypeBPowerOff: status-only
        0x02 | 0x05 => Ok(Response::Ok),
        _ => Err(Error::BadParameter(format!(
            "opcode {opcode:#04x} has no response decoder"
        ))),
    }
}
