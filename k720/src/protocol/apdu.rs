// k720-rs/k720/src/protocol/apdu.rs

//! CPU-card APDU chaining counters.
//!
//! Multi-frame APDU exchanges carry a send chain header (SCH) on each
//! request and a receive chain header (RCH) on each response. Both alternate
//! 0x00/0x01 per exchange. A response whose RCH breaks the alternation means
//! the link and the card disagree about position in the chain; that is a
//! desync, never retried — the caller must power the card on again.

use crate::{Error, Result};

/// Chaining context for one powered-on card session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApduChain {
    sch: u8,
}

impl ApduChain {
    /// Fresh context, as handed out by card power-on.
    pub fn new() -> Self {
        Self { sch: 0x00 }
    }

    /// Chain header to put on the next request.
    pub fn sch(&self) -> u8 {
        self.sch
    }

    /// RCH the next response must carry.
    pub fn expected_rch(&self) -> u8 {
        self.sch
    }

    /// Check the response chain header and advance the alternation.
    pub fn verify_and_advance(&mut self, rch: u8) -> Result<()> {
        if rch != self.sch {
            return Err(Error::ChainDesync {
                expected: self.sch,
                actual: rch,
            });
        }
        self.sch ^= 0x01;
        Ok(())
    }
}
