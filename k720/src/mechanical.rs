// k720-rs/k720/src/mechanical.rs

//! Mechanical transport controller.
//!
//! Movement commands only start a motion; the firmware reports progress
//! through the sensor snapshot. The controller wraps each motion in a
//! poll loop with a per-motion timeout budget and tracks the device's
//! lifecycle state across operations. A `Fault` state (jam or overlap)
//! latches until an explicit recovery via [`force_move`].
//!
//! [`force_move`]: MechanicalController::force_move

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::constants::{
    EJECT_CARD_TIMEOUT_MS, POLL_INTERVAL_MS, RETAIN_CARD_TIMEOUT_MS, RETAIN_CHECK_TIMEOUT_MS,
    SEND_CARD_TIMEOUT_MS,
};
use crate::device::Session;
use crate::status::{CardBoxStatus, PositionStatus, RetainBoxStatus, TransportStatus};
use crate::types::{MovePosition, RetainTarget};
use crate::utils::ms;
use crate::{Error, Result};

/// Controller-side lifecycle state, mirroring the firmware's device status
/// vocabulary. Failed states are sticky until the next operation starts;
/// `Fault` is sticky until recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MechanicalState {
    Idle,
    ReadyFailed,
    SendingCard,
    RetainingCard,
    SendFailed,
    RetainFailed,
    Fault,
}

/// Per-motion timeout budgets and the poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanicalConfig {
    /// Budget for a full dispense movement.
    pub send_card: Duration,
    /// Budget for an eject movement.
    pub eject: Duration,
    /// Budget for the card to reach the retain box.
    pub retain: Duration,
    /// Budget for the card to enter the transport while retaining.
    pub retain_check: Duration,
    /// Interval between sensor polls.
    pub poll_interval: Duration,
}

impl Default for MechanicalConfig {
    fn default() -> Self {
        Self {
            send_card: ms(SEND_CARD_TIMEOUT_MS),
            eject: ms(EJECT_CARD_TIMEOUT_MS),
            retain: ms(RETAIN_CARD_TIMEOUT_MS),
            retain_check: ms(RETAIN_CHECK_TIMEOUT_MS),
            poll_interval: ms(POLL_INTERVAL_MS),
        }
    }
}

/// Drives card movements over a session and tracks lifecycle state.
#[derive(Debug)]
pub struct MechanicalController {
    state: MechanicalState,
    config: MechanicalConfig,
}

impl Default for MechanicalController {
    fn default() -> Self {
        Self::new(MechanicalConfig::default())
    }
}

impl MechanicalController {
    pub fn new(config: MechanicalConfig) -> Self {
        Self {
            state: MechanicalState::Idle,
            config,
        }
    }

    /// Current controller state.
    pub fn state(&self) -> MechanicalState {
        self.state
    }

    /// Fresh sensor snapshot. Never changes controller state.
    pub fn check_position(&self, session: &mut Session) -> Result<PositionStatus> {
        session.check_position()
    }

    /// Dispense one card from the box to the read head.
    ///
    /// The card box is checked before any motion starts; dispensing from an
    /// empty box would grind the feed rollers against nothing.
    pub fn send_card(&mut self, session: &mut Session) -> Result<()> {
        let snap = session.check_position()?;
        self.check_transport(snap.transport)?;
        if snap.card_box == CardBoxStatus::Empty {
            self.state = MechanicalState::SendFailed;
            return Err(Error::CardBoxEmpty);
        }
        if snap.transport.has_card() {
            self.state = MechanicalState::SendFailed;
            return Err(Error::HaveCard);
        }

        info!("dispensing card to read head");
        self.state = MechanicalState::SendingCard;
        session.move_card(MovePosition::ToReadHead)?;

        match self.poll_until(session, self.config.send_card, |t| {
            t == TransportStatus::MediaPresent
        }) {
            Ok(()) => {
                self.state = MechanicalState::Idle;
                Ok(())
            }
            Err(Error::MoveTimeout) => {
                warn!("dispense did not reach the read head in time");
                self.state = MechanicalState::SendFailed;
                Err(Error::MoveTimeout)
            }
            Err(e) => Err(e),
        }
    }

    /// Push the held card out of the gate for the user to take.
    pub fn eject_card(&mut self, session: &mut Session) -> Result<()> {
        let snap = session.check_position()?;
        self.check_transport(snap.transport)?;
        if !snap.transport.has_card() {
            return Err(Error::HaveNoCard);
        }

        info!("ejecting card");
        session.move_card(MovePosition::Eject)?;

        match self.poll_until(session, self.config.eject, |t| {
            t == TransportStatus::MediaNotPresent
        }) {
            Ok(()) => {
                self.state = MechanicalState::Idle;
                Ok(())
            }
            Err(Error::MoveTimeout) => {
                // The card sits in the gate waiting for the user; the
                // transport itself is healthy and ready for recovery paths.
                warn!("ejected card not taken in time");
                self.state = MechanicalState::Idle;
                Err(Error::MoveTimeout)
            }
            Err(e) => Err(e),
        }
    }

    /// Pull a card into the given box.
    ///
    /// When no card is in the transport yet, the first phase waits for one
    /// to enter at the gate within the `retain_check` budget. The second
    /// phase waits for the transport to clear within the `retain` budget.
    pub fn retain_card(&mut self, session: &mut Session, target: RetainTarget) -> Result<()> {
        let (enter, reach) = (self.config.retain_check, self.config.retain);
        self.retain_card_within(session, target, enter, reach)
    }

    /// [`retain_card`] with per-call budgets overriding the configured ones.
    ///
    /// [`retain_card`]: Self::retain_card
    pub fn retain_card_within(
        &mut self,
        session: &mut Session,
        target: RetainTarget,
        enter_budget: Duration,
        reach_budget: Duration,
    ) -> Result<()> {
        let snap = session.check_position()?;
        self.check_transport(snap.transport)?;
        match target {
            RetainTarget::RejectBox if snap.retain_box == RetainBoxStatus::Full => {
                self.state = MechanicalState::RetainFailed;
                return Err(Error::RetainBoxFull);
            }
            RetainTarget::DispenseBox if snap.card_box == CardBoxStatus::Full => {
                self.state = MechanicalState::RetainFailed;
                return Err(Error::CardBoxFull);
            }
            _ => {}
        }

        info!("retaining card to {target:?}");
        self.state = MechanicalState::RetainingCard;
        session.retain_to_box(target)?;

        if !snap.transport.has_card() {
            match self.poll_until(session, enter_budget, |t| t.has_card()) {
                Ok(()) => {}
                Err(Error::MoveTimeout) => {
                    warn!("no card entered the transport");
                    self.state = MechanicalState::RetainFailed;
                    return Err(Error::EnterTimeout);
                }
                Err(e) => return Err(e),
            }
        }

        match self.poll_until(session, reach_budget, |t| {
            t == TransportStatus::MediaNotPresent
        }) {
            Ok(()) => {
                self.state = MechanicalState::Idle;
                Ok(())
            }
            Err(Error::MoveTimeout) => {
                warn!("card did not reach the box in time");
                self.state = MechanicalState::RetainFailed;
                Err(Error::MoveTimeout)
            }
            Err(e) => Err(e),
        }
    }

    /// Unconditional recovery movement. The only way out of `Fault`.
    pub fn force_move(&mut self, session: &mut Session) -> Result<()> {
        info!("forcing recovery movement");
        session.force_move()?;
        self.state = MechanicalState::Idle;
        Ok(())
    }

    /// Latch `Fault` on a jammed or overlapped transport.
    fn check_transport(&mut self, transport: TransportStatus) -> Result<()> {
        if transport.is_fault() {
            self.state = MechanicalState::Fault;
            return Err(Error::MechanicalFault { transport });
        }
        Ok(())
    }

    /// Poll the sensors until `done(transport)` holds or `budget` runs out.
    /// A transport fault aborts the poll and latches the `Fault` state.
    fn poll_until(
        &mut self,
        session: &mut Session,
        budget: Duration,
        done: impl Fn(TransportStatus) -> bool,
    ) -> Result<()> {
        let deadline = Instant::now() + budget;
        loop {
            let snap = session.check_position()?;
            debug!("transport={:?}", snap.transport);
            self.check_transport(snap.transport)?;
            if done(snap.transport) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::MoveTimeout);
            }
            std::thread::sleep(self.config.poll_interval);
        }
    }
}
