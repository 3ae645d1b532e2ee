// k720-rs/k720/src/protocol/responses/aux.rs

use crate::constants::OPCODE_BASE_AUX;
use crate::protocol::parser::byte_at;
use crate::{Error, Result};

use super::Response;

pub(super) fn decode(opcode: u8, data: &[u8]) -> Result<Response> {
    match opcode - OPCODE_BASE_AUX {
        // Alcohol sensor reads: single byte
        0x00 | 0x01 | 0x04 | 0x06 => Ok(Response::Byte(byte_at(data, 0)?)),
        // Writes and mode reset: status-only
        0x02 | 0x03 | 0x05 | 0x07 | 0x09 => Ok(Response::Ok),
        // Machine ID and barcode: raw bytes
        0x08 | 0x0A => Ok(Response::Data(data.to_vec())),
        _ => Err(Error::BadParameter(format!(
            "opcode {opcode:#04x} has no response decoder"
        ))),
    }
}
