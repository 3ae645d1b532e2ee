// k720-rs/k720/src/lib.rs

//! Control library for K720/RF610 contactless-card dispenser terminals.
//!
//! The crate splits into three layers:
//!
//! * [`channel`] — byte transports (RS232/RS485 serial, USB-HID) behind one
//!   [`Channel`](channel::Channel) trait.
//! * [`protocol`] — the wire frame codec, the ACK/data/EOT exchange engine
//!   with its single-retry policy, and the command/response catalogue.
//! * [`device`] / [`mechanical`] — a typed [`Session`](device::Session) over
//!   one addressed controller, and the [`MechanicalController`] that wraps
//!   card movements in sensor poll loops with timeout budgets.
//!
#![cfg_attr(feature = "serial", doc = "```no_run")]
#![cfg_attr(not(feature = "serial"), doc = "```ignore")]
//! use k720::channel::SerialChannel;
//! use k720::device::Session;
//! use k720::mechanical::MechanicalController;
//!
//! # fn main() -> k720::Result<()> {
//! let channel = SerialChannel::open("/dev/ttyS0", 9600)?;
//! let mut session = Session::new(Box::new(channel));
//! let mut controller = MechanicalController::default();
//!
//! controller.send_card(&mut session)?;
//! let uid = session.mifare_get_id(k720::types::CardFamily::S50)?;
//! println!("dispensed card {}", uid.to_hex());
//! controller.eject_card(&mut session)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`MechanicalController`]: mechanical::MechanicalController

pub mod channel;
pub mod constants;
pub mod device;
pub mod error;
pub mod mechanical;
pub mod prelude;
pub mod protocol;
pub mod status;
#[doc(hidden)]
pub mod test_support;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
