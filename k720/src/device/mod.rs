// k720-rs/k720/src/device/mod.rs

//! Device session: typed operations over one addressed controller.

mod builder;
mod session;

pub use builder::SessionBuilder;
pub use session::Session;
