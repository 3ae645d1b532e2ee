// k720-rs/k720/src/error.rs

use thiserror::Error;

/// Crate-wide error type.
///
/// Framing and protocol-semantic errors indicate a desynchronized link and
/// are never retried automatically; only ACK/packet timeouts are, once, by
/// the exchange engine.
#[derive(Error, Debug)]
pub enum Error {
    // Channel errors
    #[error("channel not open")]
    NotOpen,
    #[error("invalid channel configuration: {0}")]
    InvalidConfig(String),
    #[error("channel read timed out")]
    ReadTimeout,
    #[error("channel write timed out")]
    WriteTimeout,
    #[error("channel closed unexpectedly")]
    Closed,

    #[cfg(feature = "serial")]
    #[error("serial error: {0}")]
    Serial(#[from] serialport::Error),

    // Framing errors
    #[error("wrong packet head: got {actual:#04x}")]
    WrongPacketHead { actual: u8 },
    #[error("wrong packet length: declared {declared}, got {actual}")]
    WrongPacketLen { declared: usize, actual: usize },
    #[error("BCC mismatch: expected {expected:#04x}, got {actual:#04x}")]
    WrongBcc { expected: u8, actual: u8 },
    #[error("timed out waiting for ACK")]
    AckTimeout,
    #[error("timed out waiting for EOT")]
    EotTimeout,
    #[error("timed out waiting for data packet")]
    PacketTimeout,

    // Protocol-semantic errors
    #[error("bad parameter: {0}")]
    BadParameter(String),
    #[error("wrong device address: expected {expected:#04x}, got {actual:#04x}")]
    WrongAddress { expected: u8, actual: u8 },
    #[error("APDU chain desync: expected RCH {expected:#04x}, got {actual:#04x}")]
    ChainDesync { expected: u8, actual: u8 },
    #[error("unexpected response opcode: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedResponse { expected: u8, actual: u8 },
    #[error("invalid payload length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    // Mechanical errors
    #[error("card box is empty")]
    CardBoxEmpty,
    #[error("card box is full")]
    CardBoxFull,
    #[error("retain box is full")]
    RetainBoxFull,
    #[error("a card already occupies the transport")]
    HaveCard,
    #[error("no card in the transport")]
    HaveNoCard,
    #[error("card movement timed out")]
    MoveTimeout,
    #[error("card did not enter the transport in time")]
    EnterTimeout,
    #[error("mechanical fault: transport reports {transport:?}")]
    MechanicalFault {
        transport: crate::status::TransportStatus,
    },
    #[error("device error: status={code:#04x}")]
    Device { code: u8 },

    // USB/HID-specific errors
    #[error("no HID device found")]
    NoHidDevice,
    #[error("failed to open HID device: {0}")]
    HidOpenFailed(String),
    #[error("HID device already closed")]
    HidClosed,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors the exchange engine may transparently re-send on.
    /// Hard framing errors must not be retried: re-sending over a
    /// desynchronized link would only mask the desync.
    pub fn is_retryable_timeout(&self) -> bool {
        matches!(self, Error::AckTimeout | Error::PacketTimeout)
    }
}
