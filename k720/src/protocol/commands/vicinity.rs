// k720-rs/k720/src/protocol/commands/vicinity.rs

use crate::constants::OPCODE_BASE_VICINITY;
use crate::types::VicinityUid;

/// ISO15693 vicinity card operations.
///
/// Every request carries an addressing prefix: a mode flag (0x01 when a
/// specific card UID is targeted, 0x00 for non-addressed mode) followed by
/// the 8 UID bytes, zeroed in non-addressed mode.
#[derive(Debug, Clone)]
pub enum VicinityOp {
    /// Inventory the field and return one card UID.
    GetUid,
    /// Select a card for subsequent addressed operations.
    ChooseCard,
    /// Read `block_len` blocks starting at `block_addr`.
    ReadData { block_addr: u8, block_len: u8 },
    /// Write one block.
    WriteData { block_addr: u8, data: Vec<u8> },
    /// Permanently lock one block.
    LockBlock { lock_addr: u8 },
    /// Write the application family identifier.
    WriteAfi { value: u8 },
    /// Permanently lock the AFI.
    LockAfi,
    /// Write the data storage format identifier.
    WriteDsfid { value: u8 },
    /// Permanently lock the DSFID.
    LockDsfid,
    /// Read blocks together with their lock status bits.
    ReadSafeBit { block_addr: u8, block_len: u8 },
    /// Read the card system information.
    GetMessage,
}

impl VicinityOp {
    pub fn opcode(&self) -> u8 {
        OPCODE_BASE_VICINITY
            + match self {
                Self::GetUid => 0x00,
                Self::ChooseCard => 0x01,
                Self::ReadData { .. } => 0x02,
                Self::WriteData { .. } => 0x03,
                Self::LockBlock { .. } => 0x04,
                Self::WriteAfi { .. } => 0x05,
                Self::LockAfi => 0x06,
                Self::WriteDsfid { .. } => 0x07,
                Self::LockDsfid => 0x08,
                Self::ReadSafeBit { .. } => 0x09,
                Self::GetMessage => 0x0A,
            }
    }

    pub fn encode_args(&self, uid: Option<VicinityUid>, out: &mut Vec<u8>) {
        match uid {
            Some(uid) => {
                out.push(0x01);
                out.extend_from_slice(uid.as_bytes());
            }
            None => {
                out.push(0x00);
                out.extend_from_slice(&[0u8; 8]);
            }
        }
        match self {
            Self::GetUid | Self::ChooseCard | Self::LockAfi | Self::LockDsfid | Self::GetMessage => {}
            Self::ReadData {
                block_addr,
                block_len,
            }
            | Self::ReadSafeBit {
                block_addr,
                block_len,
            } => {
                out.push(*block_addr);
                out.push(*block_len);
            }
            Self::WriteData { block_addr, data } => {
                out.push(*block_addr);
                out.extend_from_slice(data);
            }
            Self::LockBlock { lock_addr } => out.push(*lock_addr),
            Self::WriteAfi { value } | Self::WriteDsfid { value } => out.push(*value),
        }
    }
}
