// k720-rs/k720/src/protocol/responses/mifare.rs

use crate::constants::{OPCODE_BASE_S50, OPCODE_BASE_S70, OPCODE_BASE_UL};
use crate::protocol::parser::ensure_len;
use crate::types::{BlockData, CardFamily, CardUid};
use crate::{Error, Result};

use super::Response;

fn family_of(opcode: u8) -> Result<CardFamily> {
    match opcode & 0xF0 {
        OPCODE_BASE_S50 => Ok(CardFamily::S50),
        OPCODE_BASE_S70 => Ok(CardFamily::S70),
        OPCODE_BASE_UL => Ok(CardFamily::Ultralight),
        _ => Err(Error::BadParameter(format!(
            "opcode {opcode:#04x} is not a Mifare opcode"
        ))),
    }
}

pub(super) fn decode(opcode: u8, data: &[u8]) -> Result<Response> {
    let family = family_of(opcode)?;
    match opcode & 0x0F {
        // GetId: UID length is fixed per family
        0x01 => {
            ensure_len(data, family.uid_len())?;
            Ok(Response::Uid(CardUid::from_bytes(&data[..family.uid_len()])))
        }
        // ReadBlock
        0x03 => Ok(Response::Block(BlockData::try_from(data)?)),
        // Detect, LoadKey, WriteBlock, value ops, Halt, UL key ops: status-only
        0x00 | 0x02 | 0x04..=0x0A => Ok(Response::Ok),
        _ => Err(Error::BadParameter(format!(
            "opcode {opcode:#04x} has no response decoder"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s50_uid_is_four_bytes() {
        let resp = decode(0x11, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(resp, Response::Uid(CardUid::from_bytes(&[0xDE, 0xAD, 0xBE, 0xEF])));
    }

    #[test]
    fn ultralight_uid_is_seven_bytes() {
        assert!(matches!(
            decode(0x31, &[1, 2, 3, 4]),
            Err(Error::InvalidLength { .. })
        ));
        let resp = decode(0x31, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(resp, Response::Uid(CardUid::from_bytes(&[1, 2, 3, 4, 5, 6, 7])));
    }

    #[test]
    fn read_block_needs_sixteen_bytes() {
        let block = [0x5A; 16];
        let resp = decode(0x13, &block).unwrap();
        assert_eq!(resp, Response::Block(BlockData::from_bytes(block)));
        assert!(decode(0x13, &block[..8]).is_err());
    }

    #[test]
    fn write_block_acknowledges() {
        assert_eq!(decode(0x24, &[]).unwrap(), Response::Ok);
    }
}
