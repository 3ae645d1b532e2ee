// k720-rs/k720/src/channel/mod.rs

//! Duplex byte-stream channels carrying the dispenser protocol.
//!
//! A channel knows nothing about frames or commands; it moves bytes with
//! caller-supplied timeouts and can discard stale buffered input. The serial
//! and USB-HID variants share the logical protocol and differ only here.

pub mod mock;
pub mod traits;

#[cfg(feature = "serial")]
pub mod serial;

#[cfg(feature = "usb")]
pub mod hid;

pub use mock::MockChannel;
pub use traits::Channel;

#[cfg(feature = "serial")]
pub use serial::SerialChannel;

#[cfg(feature = "usb")]
pub use hid::HidChannel;
