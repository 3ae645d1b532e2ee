// k720-rs/k720/src/protocol/responses/vicinity.rs

use crate::constants::OPCODE_BASE_VICINITY;
use crate::types::VicinityUid;
use crate::{Error, Result};

use super::Response;

pub(super) fn decode(opcode: u8, data: &[u8]) -> Result<Response> {
    match opcode - OPCODE_BASE_VICINITY {
        // GetUid: fixed 8-byte UID
        0x00 => Ok(Response::VicinityUid(VicinityUid::try_from(data)?)),
        // ReadData, ReadSafeBit, GetMessage: raw block/system bytes
        0x02 | 0x09 | 0x0A => Ok(Response::Data(data.to_vec())),
        // ChooseCard, writes, locks: status-only
        0x01 | 0x03..=0x08 => Ok(Response::Ok),
        _ => Err(Error::BadParameter(format!(
            "opcode {opcode:#04x} has no response decoder"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_uid_fixed_width() {
        let uid = [0xE0, 4, 1, 0, 0x12, 0x34, 0x56, 0x78];
        let resp = decode(0x50, &uid).unwrap();
        assert_eq!(resp, Response::VicinityUid(VicinityUid::from_bytes(uid)));
        assert!(decode(0x50, &uid[..6]).is_err());
    }

    #[test]
    fn read_data_passthrough() {
        let resp = decode(0x52, &[1, 2, 3, 4]).unwrap();
        assert_eq!(resp, Response::Data(vec![1, 2, 3, 4]));
    }

    #[test]
    fn lock_afi_acknowledges() {
        assert_eq!(decode(0x56, &[]).unwrap(), Response::Ok);
    }
}
