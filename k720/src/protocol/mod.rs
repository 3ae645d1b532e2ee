// k720-rs/k720/src/protocol/mod.rs

//! Wire protocol: frame codec, exchange engine, and the command catalogue.

pub mod apdu;
pub mod checksum;
pub mod commands;
pub mod exchange;
pub mod frame;
pub mod parser;
pub mod responses;

pub use apdu::ApduChain;
pub use commands::Command;
pub use exchange::{Exchange, ExchangeTimeouts};
pub use frame::{Frame, FrameAccumulator};
pub use responses::Response;
