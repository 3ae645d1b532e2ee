// k720-rs/k720/src/device/builder.rs

use crate::channel::Channel;
use crate::constants::DEFAULT_ADDRESS;
use crate::protocol::ExchangeTimeouts;

use super::Session;

/// Builder for a [`Session`] with a non-default address or timeouts.
pub struct SessionBuilder {
    channel: Box<dyn Channel>,
    address: u8,
    timeouts: ExchangeTimeouts,
}

impl SessionBuilder {
    pub fn new(channel: Box<dyn Channel>) -> Self {
        Self {
            channel,
            address: DEFAULT_ADDRESS,
            timeouts: ExchangeTimeouts::default(),
        }
    }

    /// Target address byte, for multi-drop RS485 wiring.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Exchange timeout budgets.
    pub fn timeouts(mut self, timeouts: ExchangeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn build(self) -> Session {
        Session::with_config(self.channel, self.address, self.timeouts)
    }
}
