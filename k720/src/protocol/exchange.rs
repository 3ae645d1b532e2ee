// k720-rs/k720/src/protocol/exchange.rs

//! Exchange engine: one request -> ACK -> data packet -> EOT round trip.
//!
//! The engine owns the retry policy. Only silence (ACK or packet timeout) is
//! retried, exactly once; hard framing errors and an EOT timeout surface
//! immediately. A desynchronized link must never be masked as a transient
//! timeout, and re-sending after the data packet already arrived intact
//! could double-execute a movement command.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::channel::Channel;
use crate::constants::{ACK, EOT};
use crate::protocol::frame::{Frame, FrameAccumulator};
use crate::utils::ms;
use crate::{Error, Result};

/// Read chunk size per channel call.
const READ_CHUNK: usize = 64;

/// The four independently configurable budgets of one exchange attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeTimeouts {
    /// Wait for the ACK control byte after the request is written.
    pub ack: Duration,
    /// Wait for the complete data packet after ACK.
    pub packet: Duration,
    /// Wait for the EOT control byte after the data packet.
    pub eot: Duration,
    /// Overall budget for one attempt; caps every phase.
    pub total: Duration,
}

impl Default for ExchangeTimeouts {
    fn default() -> Self {
        Self {
            ack: ms(crate::constants::ACK_TIMEOUT_MS),
            packet: ms(crate::constants::PACKET_TIMEOUT_MS),
            eot: ms(crate::constants::EOT_TIMEOUT_MS),
            total: ms(crate::constants::EXCHANGE_TIMEOUT_MS),
        }
    }
}

/// Exchange engine states. `Failed` is reachable from every state; the
/// failing reason is carried in the returned error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingAck,
    AwaitingData,
    AwaitingEot,
    Complete,
    Failed,
}

/// Drives one logical request/response over a channel.
pub struct Exchange<'a> {
    channel: &'a mut dyn Channel,
    timeouts: ExchangeTimeouts,
    state: ExchangeState,
}

impl<'a> Exchange<'a> {
    pub fn new(channel: &'a mut dyn Channel, timeouts: ExchangeTimeouts) -> Self {
        Self {
            channel,
            timeouts,
            state: ExchangeState::Idle,
        }
    }

    /// Current engine state, for diagnostics.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Execute the exchange for an already-encoded wire frame. Applies the
    /// single-retry policy: one full re-send on ACK or packet timeout.
    pub fn run(&mut self, wire: &[u8]) -> Result<Frame> {
        match self.attempt(wire) {
            Ok(frame) => Ok(frame),
            Err(e) if e.is_retryable_timeout() => {
                debug!("exchange timed out ({e}); re-sending once");
                self.attempt(wire)
            }
            Err(e) => {
                self.state = ExchangeState::Failed;
                Err(e)
            }
        }
    }

    fn attempt(&mut self, wire: &[u8]) -> Result<Frame> {
        let deadline = Instant::now() + self.timeouts.total;

        self.state = ExchangeState::Idle;
        self.channel.flush()?;
        trace!(">> {}", crate::utils::bytes_to_hex_spaced(wire));
        self.channel
            .write(wire, phase_remaining(deadline, Error::WriteTimeout)?)?;

        self.state = ExchangeState::AwaitingAck;
        let carry = self.await_ack(deadline).inspect_err(|_| {
            self.state = ExchangeState::Failed;
        })?;

        self.state = ExchangeState::AwaitingData;
        let (frame, carry) = self.await_data(deadline, carry).inspect_err(|_| {
            self.state = ExchangeState::Failed;
        })?;

        self.state = ExchangeState::AwaitingEot;
        self.await_eot(deadline, carry).inspect_err(|_| {
            self.state = ExchangeState::Failed;
        })?;

        self.state = ExchangeState::Complete;
        trace!("<< addr={:#04x} {}", frame.address, crate::utils::bytes_to_hex_spaced(&frame.payload));
        Ok(frame)
    }

    /// Wait for the ACK marker. Bytes trailing the ACK in the same chunk are
    /// handed to the data phase.
    fn await_ack(&mut self, total_deadline: Instant) -> Result<Vec<u8>> {
        let deadline = phase_deadline(total_deadline, self.timeouts.ack);
        loop {
            let budget = phase_remaining(deadline, Error::AckTimeout)?;
            let chunk = match self.channel.read(READ_CHUNK, budget) {
                Ok(chunk) => chunk,
                Err(Error::ReadTimeout) => continue,
                Err(e) => return Err(e),
            };
            if let Some(pos) = chunk.iter().position(|&b| b == ACK) {
                return Ok(chunk[pos + 1..].to_vec());
            }
        }
    }

    /// Assemble the data packet. Framing errors are hard failures.
    fn await_data(
        &mut self,
        total_deadline: Instant,
        carry: Vec<u8>,
    ) -> Result<(Frame, Vec<u8>)> {
        let deadline = phase_deadline(total_deadline, self.timeouts.packet);
        let mut acc = FrameAccumulator::new();
        if let Some(frame) = acc.push(&carry)? {
            return Ok((frame, acc.take_remainder()));
        }
        loop {
            let budget = phase_remaining(deadline, Error::PacketTimeout)?;
            let chunk = match self.channel.read(READ_CHUNK, budget) {
                Ok(chunk) => chunk,
                Err(Error::ReadTimeout) => continue,
                Err(e) => return Err(e),
            };
            if let Some(frame) = acc.push(&chunk)? {
                return Ok((frame, acc.take_remainder()));
            }
        }
    }

    /// Wait for the EOT marker, first in carried-over bytes, then on the wire.
    fn await_eot(&mut self, total_deadline: Instant, carry: Vec<u8>) -> Result<()> {
        if carry.contains(&EOT) {
            return Ok(());
        }
        let deadline = phase_deadline(total_deadline, self.timeouts.eot);
        loop {
            let budget = phase_remaining(deadline, Error::EotTimeout)?;
            let chunk = match self.channel.read(READ_CHUNK, budget) {
                Ok(chunk) => chunk,
                Err(Error::ReadTimeout) => continue,
                Err(e) => return Err(e),
            };
            if chunk.contains(&EOT) {
                return Ok(());
            }
        }
    }
}

/// Phase deadline, capped by the overall exchange deadline.
fn phase_deadline(total_deadline: Instant, phase: Duration) -> Instant {
    (Instant::now() + phase).min(total_deadline)
}

/// Budget left before `deadline`, or the phase's timeout error.
fn phase_remaining(deadline: Instant, on_expiry: Error) -> Result<Duration> {
    let now = Instant::now();
    if now >= deadline {
        return Err(on_expiry);
    }
    Ok(deadline - now)
}
