// k720-rs/k720/src/types.rs

use crate::Error;

/// Card UID as reported by the reader head.
///
/// Length depends on the card family: 4 bytes for S50/S70, 7 for
/// Ultralight, 8 for ISO15693.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardUid(Vec<u8>);

impl CardUid {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.0)
    }
}

/// One 16-byte Mifare block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockData([u8; 16]);

impl BlockData {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for BlockData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 16 {
            return Err(Error::InvalidLength {
                expected: 16,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(&bytes[..16]);
        Ok(Self(arr))
    }
}

/// Opaque 6-byte Mifare sector key. The crate hands keys through to the
/// device unexamined; key lifecycle is the caller's problem.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SectorKey([u8; 6]);

impl SectorKey {
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

// Keys never appear in trace output.
impl std::fmt::Debug for SectorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SectorKey(..)")
    }
}

impl TryFrom<&[u8]> for SectorKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 6 {
            return Err(Error::InvalidLength {
                expected: 6,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 6];
        arr.copy_from_slice(&bytes[..6]);
        Ok(Self(arr))
    }
}

/// Mifare authentication key slot.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum KeyType {
    #[display(fmt = "KeyA")]
    A = 0,
    #[display(fmt = "KeyB")]
    B = 1,
}

/// Card family tag. The per-family DLL entry points of the original SDK
/// collapse into one builder parameterized by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardFamily {
    S50,
    S70,
    Ultralight,
}

impl CardFamily {
    /// Opcode block base for this family.
    pub fn opcode_base(&self) -> u8 {
        match self {
            Self::S50 => crate::constants::OPCODE_BASE_S50,
            Self::S70 => crate::constants::OPCODE_BASE_S70,
            Self::Ultralight => crate::constants::OPCODE_BASE_UL,
        }
    }

    /// UID length reported by this family.
    pub fn uid_len(&self) -> usize {
        match self {
            Self::S50 | Self::S70 => 4,
            Self::Ultralight => 7,
        }
    }
}

/// Card type detected by the reader's auto-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    S50,
    S70,
    Ultralight,
    Cpu,
    CpuTypeB,
    Iso15693,
}

impl CardType {
    /// Map the auto-test result byte. Unknown bytes are a device error.
    pub fn from_byte(byte: u8) -> crate::Result<Self> {
        match byte {
            0x01 => Ok(Self::S50),
            0x02 => Ok(Self::S70),
            0x03 => Ok(Self::Ultralight),
            0x04 => Ok(Self::Cpu),
            0x05 => Ok(Self::CpuTypeB),
            0x06 => Ok(Self::Iso15693),
            code => Err(Error::Device { code }),
        }
    }
}

/// Target position for a raw movement command.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePosition {
    /// Move the next card from the box to the read head.
    ToReadHead = 0x01,
    /// Move the card at the read head to the exit gate.
    ToGate = 0x02,
    /// Push the card out of the gate for the user to take.
    Eject = 0x03,
}

/// Routing flag for retain movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetainTarget {
    /// Recycle the card back into the dispense box.
    DispenseBox,
    /// Drop the card into the reject (retain) box.
    RejectBox,
}

impl RetainTarget {
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::DispenseBox => 0x01,
            Self::RejectBox => 0x00,
        }
    }
}

/// Answer-to-reset returned by CPU card power-on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atr(Vec<u8>);

impl Atr {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.0)
    }
}

/// ISO15693 UID, fixed 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VicinityUid([u8; 8]);

impl VicinityUid {
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for VicinityUid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 8 {
            return Err(Error::InvalidLength {
                expected: 8,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 8];
        arr.copy_from_slice(&bytes[..8]);
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_data_try_from_ok() {
        let b = [0xAB; 16];
        let block = BlockData::try_from(&b[..]).unwrap();
        assert_eq!(block.as_bytes(), &b);
    }

    #[test]
    fn block_data_try_from_err() {
        let b = [0u8; 4];
        assert!(BlockData::try_from(&b[..]).is_err());
    }

    #[test]
    fn sector_key_debug_redacted() {
        let key = SectorKey::from_bytes([0xFF; 6]);
        assert_eq!(format!("{:?}", key), "SectorKey(..)");
    }

    #[test]
    fn card_family_opcode_bases_distinct() {
        let bases = [
            CardFamily::S50.opcode_base(),
            CardFamily::S70.opcode_base(),
            CardFamily::Ultralight.opcode_base(),
        ];
        assert_eq!(bases, [0x10, 0x20, 0x30]);
        assert_eq!(CardFamily::S50.uid_len(), 4);
        assert_eq!(CardFamily::Ultralight.uid_len(), 7);
    }

    #[test]
    fn card_type_from_byte() {
        assert_eq!(CardType::from_byte(0x01).unwrap(), CardType::S50);
        assert_eq!(CardType::from_byte(0x06).unwrap(), CardType::Iso15693);
        assert!(matches!(
            CardType::from_byte(0x7F),
            Err(Error::Device { code: 0x7F })
        ));
    }

    #[test]
    fn retain_target_bytes() {
        assert_eq!(RetainTarget::DispenseBox.as_byte(), 0x01);
        assert_eq!(RetainTarget::RejectBox.as_byte(), 0x00);
    }

    #[test]
    fn card_uid_hex() {
        let uid = CardUid::from_bytes(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(uid.to_hex(), "deadbeef");
    }
}
