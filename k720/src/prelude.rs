// k720-rs/k720/src/prelude.rs

//! Convenience re-exports for applications.

pub use crate::channel::{Channel, MockChannel};
pub use crate::device::{Session, SessionBuilder};
pub use crate::mechanical::{MechanicalConfig, MechanicalController, MechanicalState};
pub use crate::protocol::{ApduChain, Command, ExchangeTimeouts, Response};
pub use crate::status::{
    CardBoxStatus, DeviceStatus, PositionStatus, RetainBoxStatus, TransportStatus,
};
pub use crate::types::{
    Atr, BlockData, CardFamily, CardType, CardUid, KeyType, MovePosition, RetainTarget,
    SectorKey, VicinityUid,
};
pub use crate::{Error, Result};

#[cfg(feature = "serial")]
pub use crate::channel::SerialChannel;

#[cfg(feature = "usb")]
pub use crate::channel::HidChannel;
