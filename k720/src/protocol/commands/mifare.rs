// k720-rs/k720/src/protocol/commands/mifare.rs

use crate::types::{BlockData, CardFamily, KeyType, SectorKey};
use crate::{Error, Result};

/// Shared Mifare operation set. One builder serves S50, S70 and Ultralight;
/// the family tag selects the opcode block and argument rules.
///
/// Ultralight addressing: pass the page number in `sector` and 0 in `block`.
/// Value-block operations only exist on S50/S70.
#[derive(Debug, Clone)]
pub enum MifareOp {
    /// Probe for a card of this family in the RF field.
    Detect,
    /// Read the card UID (4 bytes for S50/S70, 7 for Ultralight).
    GetId,
    /// Load an opaque sector key into the reader for later authentication.
    LoadKey {
        sector: u8,
        key_type: KeyType,
        key: SectorKey,
    },
    /// Read one 16-byte block.
    ReadBlock { sector: u8, block: u8 },
    /// Write one 16-byte block.
    WriteBlock {
        sector: u8,
        block: u8,
        data: BlockData,
    },
    /// Format a block as a value block with the given initial value.
    InitValue { sector: u8, block: u8, value: i32 },
    /// Add to a value block.
    Increment { sector: u8, block: u8, value: i32 },
    /// Subtract from a value block.
    Decrement { sector: u8, block: u8, value: i32 },
    /// Put the card to sleep.
    Halt,
    /// Load the Ultralight authentication key (Ultralight only).
    UlLoadKey { key: [u8; 16] },
    /// Program a new Ultralight authentication key (Ultralight only).
    UlWriteKey { key: [u8; 16] },
}

impl MifareOp {
    /// Operation offset within the family's opcode block.
    fn offset(&self) -> u8 {
        match self {
            Self::Detect => 0x00,
            Self::GetId => 0x01,
            Self::LoadKey { .. } => 0x02,
            Self::ReadBlock { .. } => 0x03,
            Self::WriteBlock { .. } => 0x04,
            Self::InitValue { .. } => 0x05,
            Self::Increment { .. } => 0x06,
            Self::Decrement { .. } => 0x07,
            Self::Halt => 0x08,
            Self::UlLoadKey { .. } => 0x09,
            Self::UlWriteKey { .. } => 0x0A,
        }
    }

    pub fn opcode(&self, family: CardFamily) -> u8 {
        family.opcode_base() + self.offset()
    }

    pub fn encode_args(&self, family: CardFamily, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Detect | Self::GetId | Self::Halt => {}
            Self::LoadKey {
                sector,
                key_type,
                key,
            } => {
                out.push(*sector);
                out.push(*key_type as u8);
                out.extend_from_slice(key.as_bytes());
            }
            Self::ReadBlock { sector, block } => {
                out.push(*sector);
                out.push(*block);
            }
            Self::WriteBlock {
                sector,
                block,
                data,
            } => {
                out.push(*sector);
                out.push(*block);
                out.extend_from_slice(data.as_bytes());
            }
            Self::InitValue {
                sector,
                block,
                value,
            }
            | Self::Increment {
                sector,
                block,
                value,
            }
            | Self::Decrement {
                sector,
                block,
                value,
            } => {
                if family == CardFamily::Ultralight {
                    return Err(Error::BadParameter(
                        "value blocks are not supported on Ultralight".into(),
                    ));
                }
                out.push(*sector);
                out.push(*block);
                out.extend_from_slice(&value.to_be_bytes());
            }
            Self::UlLoadKey { key } | Self::UlWriteKey { key } => {
                if family != CardFamily::Ultralight {
                    return Err(Error::BadParameter(
                        "Ultralight key operations require the Ultralight family".into(),
                    ));
                }
                out.extend_from_slice(key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_block_encoding() {
        let op = MifareOp::ReadBlock {
            sector: 0x02,
            block: 0x01,
        };
        let mut out = vec![op.opcode(CardFamily::S50)];
        op.encode_args(CardFamily::S50, &mut out).unwrap();
        assert_eq!(out, vec![0x13, 0x02, 0x01]);
    }

    #[test]
    fn load_key_encoding() {
        let op = MifareOp::LoadKey {
            sector: 0x05,
            key_type: KeyType::B,
            key: SectorKey::from_bytes([0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]),
        };
        let mut out = vec![op.opcode(CardFamily::S70)];
        op.encode_args(CardFamily::S70, &mut out).unwrap();
        assert_eq!(
            out,
            vec![0x22, 0x05, 0x01, 0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5]
        );
    }

    #[test]
    fn increment_encodes_value_be() {
        let op = MifareOp::Increment {
            sector: 1,
            block: 2,
            value: 300,
        };
        let mut out = vec![op.opcode(CardFamily::S50)];
        op.encode_args(CardFamily::S50, &mut out).unwrap();
        assert_eq!(out, vec![0x16, 0x01, 0x02, 0x00, 0x00, 0x01, 0x2C]);
    }

    #[test]
    fn value_ops_rejected_for_ultralight() {
        let op = MifareOp::InitValue {
            sector: 0,
            block: 1,
            value: 0,
        };
        let mut out = Vec::new();
        assert!(matches!(
            op.encode_args(CardFamily::Ultralight, &mut out),
            Err(Error::BadParameter(_))
        ));
    }

    #[test]
    fn ul_key_ops_rejected_for_classic() {
        let op = MifareOp::UlLoadKey { key: [0u8; 16] };
        let mut out = Vec::new();
        assert!(matches!(
            op.encode_args(CardFamily::S50, &mut out),
            Err(Error::BadParameter(_))
        ));
    }
}
