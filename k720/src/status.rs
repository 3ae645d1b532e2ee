// k720-rs/k720/src/status.rs

//! Status mapper: raw firmware status bytes to typed enumerations.
//!
//! The byte values are fixed by the device firmware. Every defined byte has
//! exactly one meaning; anything else maps to [`Error::Device`].

use crate::{Error, Result};

/// Overall device state reported by the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceStatus {
    Idle,
    Fault,
    ReadyFailed,
    SendingCard,
    RetainingCard,
    SendFailed,
    RetainFailed,
}

impl DeviceStatus {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x30 => Ok(Self::Idle),
            0x31 => Ok(Self::Fault),
            0x32 => Ok(Self::ReadyFailed),
            0x33 => Ok(Self::SendingCard),
            0x34 => Ok(Self::RetainingCard),
            0x35 => Ok(Self::SendFailed),
            0x36 => Ok(Self::RetainFailed),
            code => Err(Error::Device { code }),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Idle => 0x30,
            Self::Fault => 0x31,
            Self::ReadyFailed => 0x32,
            Self::SendingCard => 0x33,
            Self::RetainingCard => 0x34,
            Self::SendFailed => 0x35,
            Self::RetainFailed => 0x36,
        }
    }
}

/// Transport (sensor) state along the card path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransportStatus {
    /// Two overlapping cards detected.
    Overlap,
    /// Card jammed in the transport.
    Jam,
    /// Card present at the read head.
    MediaPresent,
    /// No card anywhere in the transport.
    MediaNotPresent,
    /// Card entering at the front end.
    MediaEntering,
}

impl TransportStatus {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x30 => Ok(Self::Overlap),
            0x31 => Ok(Self::Jam),
            0x32 => Ok(Self::MediaPresent),
            0x33 => Ok(Self::MediaNotPresent),
            0x34 => Ok(Self::MediaEntering),
            code => Err(Error::Device { code }),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Overlap => 0x30,
            Self::Jam => 0x31,
            Self::MediaPresent => 0x32,
            Self::MediaNotPresent => 0x33,
            Self::MediaEntering => 0x34,
        }
    }

    /// Overlap and jam require explicit recovery before any further movement.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Overlap | Self::Jam)
    }

    /// A card is somewhere in the transport.
    pub fn has_card(&self) -> bool {
        !matches!(self, Self::MediaNotPresent)
    }
}

/// Fill level of the dispense box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardBoxStatus {
    Empty,
    Low,
    Sufficient,
    NearFull,
    Full,
}

impl CardBoxStatus {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x30 => Ok(Self::Empty),
            0x31 => Ok(Self::Low),
            0x32 => Ok(Self::Sufficient),
            0x33 => Ok(Self::NearFull),
            0x34 => Ok(Self::Full),
            code => Err(Error::Device { code }),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Empty => 0x30,
            Self::Low => 0x31,
            Self::Sufficient => 0x32,
            Self::NearFull => 0x33,
            Self::Full => 0x34,
        }
    }
}

/// Fill level of the retain (reject) box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetainBoxStatus {
    NotFull,
    Full,
}

impl RetainBoxStatus {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x30 => Ok(Self::NotFull),
            0x31 => Ok(Self::Full),
            code => Err(Error::Device { code }),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::NotFull => 0x30,
            Self::Full => 0x31,
        }
    }
}

/// Read-only snapshot of the four orthogonal status enumerations, refreshed
/// by an explicit sensor query. Never cached across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionStatus {
    pub device: DeviceStatus,
    pub transport: TransportStatus,
    pub card_box: CardBoxStatus,
    pub retain_box: RetainBoxStatus,
}

impl PositionStatus {
    /// Parse the 4 status bytes of a sensor query response, in wire order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 4 {
            return Err(Error::InvalidLength {
                expected: 4,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            device: DeviceStatus::from_byte(bytes[0])?,
            transport: TransportStatus::from_byte(bytes[1])?,
            card_box: CardBoxStatus::from_byte(bytes[2])?,
            retain_box: RetainBoxStatus::from_byte(bytes[3])?,
        })
    }
}

/// Map a response status byte to an error. Total function: defined fault
/// codes get their typed variant, anything else is a generic device error.
pub fn mechanical_error(code: u8) -> Error {
    match code {
        crate::constants::FAULT_CARD_BOX_EMPTY => Error::CardBoxEmpty,
        crate::constants::FAULT_CARD_BOX_FULL => Error::CardBoxFull,
        crate::constants::FAULT_RETAIN_BOX_FULL => Error::RetainBoxFull,
        crate::constants::FAULT_HAVE_CARD => Error::HaveCard,
        crate::constants::FAULT_HAVE_NO_CARD => Error::HaveNoCard,
        crate::constants::FAULT_MOVE_CARD_TIMEOUT => Error::MoveTimeout,
        crate::constants::FAULT_ENTER_CARD_TIMEOUT => Error::EnterTimeout,
        code => Error::Device { code },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_status_roundtrip() {
        for byte in 0x30..=0x36u8 {
            let status = DeviceStatus::from_byte(byte).unwrap();
            assert_eq!(status.as_byte(), byte);
        }
        assert!(DeviceStatus::from_byte(0x37).is_err());
    }

    #[test]
    fn transport_status_fault_classification() {
        assert!(TransportStatus::Overlap.is_fault());
        assert!(TransportStatus::Jam.is_fault());
        assert!(!TransportStatus::MediaPresent.is_fault());
        assert!(TransportStatus::MediaPresent.has_card());
        assert!(TransportStatus::MediaEntering.has_card());
        assert!(!TransportStatus::MediaNotPresent.has_card());
    }

    #[test]
    fn card_box_roundtrip() {
        for byte in 0x30..=0x34u8 {
            assert_eq!(CardBoxStatus::from_byte(byte).unwrap().as_byte(), byte);
        }
        assert!(matches!(
            CardBoxStatus::from_byte(0xFF),
            Err(Error::Device { code: 0xFF })
        ));
    }

    #[test]
    fn position_status_from_bytes() {
        let snap = PositionStatus::from_bytes(&[0x30, 0x33, 0x32, 0x30]).unwrap();
        assert_eq!(snap.device, DeviceStatus::Idle);
        assert_eq!(snap.transport, TransportStatus::MediaNotPresent);
        assert_eq!(snap.card_box, CardBoxStatus::Sufficient);
        assert_eq!(snap.retain_box, RetainBoxStatus::NotFull);
    }

    #[test]
    fn position_status_wrong_len() {
        assert!(PositionStatus::from_bytes(&[0x30, 0x33]).is_err());
    }

    #[test]
    fn mechanical_error_mapping() {
        assert!(matches!(mechanical_error(0xA0), Error::CardBoxEmpty));
        assert!(matches!(mechanical_error(0xA2), Error::RetainBoxFull));
        assert!(matches!(mechanical_error(0xA4), Error::HaveNoCard));
        assert!(matches!(mechanical_error(0xA5), Error::MoveTimeout));
        assert!(matches!(mechanical_error(0xA6), Error::EnterTimeout));
        assert!(matches!(mechanical_error(0xE9), Error::Device { code: 0xE9 }));
    }
}
