// k720-rs/k720/src/device/session.rs

use log::debug;

use crate::channel::Channel;
use crate::constants::DEFAULT_ADDRESS;
use crate::protocol::commands::{
    AuxCommand, Command, CpuCommand, DispenserCommand, MifareOp, VicinityOp,
};
use crate::protocol::{ApduChain, Exchange, ExchangeTimeouts, Frame, Response};
use crate::status::{CardBoxStatus, DeviceStatus, PositionStatus, TransportStatus};
use crate::types::{
    Atr, BlockData, CardFamily, CardType, CardUid, KeyType, MovePosition, RetainTarget,
    SectorKey, VicinityUid,
};
use crate::{Error, Result};

use super::SessionBuilder;

/// One logical session with an addressed controller.
///
/// The session owns its channel exclusively; the protocol is strictly
/// half-duplex and `&mut self` on every operation keeps concurrent commands
/// from interleaving on the wire. Share a session across threads behind a
/// `Mutex` if several callers need the same device.
pub struct Session {
    channel: Box<dyn Channel>,
    address: u8,
    timeouts: ExchangeTimeouts,
}

impl Session {
    /// Session with the default address and exchange timeouts.
    pub fn new(channel: Box<dyn Channel>) -> Self {
        Self {
            channel,
            address: DEFAULT_ADDRESS,
            timeouts: ExchangeTimeouts::default(),
        }
    }

    /// Builder for non-default address or timeouts.
    pub fn builder(channel: Box<dyn Channel>) -> SessionBuilder {
        SessionBuilder::new(channel)
    }

    pub(super) fn with_config(
        channel: Box<dyn Channel>,
        address: u8,
        timeouts: ExchangeTimeouts,
    ) -> Self {
        Self {
            channel,
            address,
            timeouts,
        }
    }

    /// Address byte this session targets.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Encode, exchange, and decode one command.
    pub fn execute(&mut self, cmd: &Command) -> Result<Response> {
        let payload = cmd.encode()?;
        let wire = Frame::encode(self.address, &payload)?;
        debug!("execute opcode={:#04x} addr={:#04x}", cmd.opcode(), self.address);

        let mut exchange = Exchange::new(self.channel.as_mut(), self.timeouts);
        let frame = exchange.run(&wire)?;
        if frame.address != self.address {
            return Err(Error::WrongAddress {
                expected: self.address,
                actual: frame.address,
            });
        }
        Response::decode(cmd.opcode(), &frame.payload)
    }

    fn exec_ok(&mut self, cmd: Command) -> Result<()> {
        match self.execute(&cmd)? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    fn exec_data(&mut self, cmd: Command) -> Result<Vec<u8>> {
        match self.execute(&cmd)? {
            Response::Data(data) => Ok(data),
            other => Err(unexpected(other)),
        }
    }

    fn exec_byte(&mut self, cmd: Command) -> Result<u8> {
        match self.execute(&cmd)? {
            Response::Byte(value) => Ok(value),
            other => Err(unexpected(other)),
        }
    }

    // Dispenser operations

    /// Firmware version string.
    pub fn version(&mut self) -> Result<String> {
        match self.execute(&Command::Dispenser(DispenserCommand::GetVersion))? {
            Response::Version(v) => Ok(v),
            other => Err(unexpected(other)),
        }
    }

    /// Short status query: device, transport, and card box.
    pub fn query(&mut self) -> Result<(DeviceStatus, TransportStatus, CardBoxStatus)> {
        match self.execute(&Command::Dispenser(DispenserCommand::Query))? {
            Response::QueryStatus {
                device,
                transport,
                card_box,
            } => Ok((device, transport, card_box)),
            other => Err(unexpected(other)),
        }
    }

    /// Full four-sensor position snapshot.
    pub fn check_position(&mut self) -> Result<PositionStatus> {
        match self.execute(&Command::Dispenser(DispenserCommand::SensorQuery))? {
            Response::Position(snap) => Ok(snap),
            other => Err(unexpected(other)),
        }
    }

    /// Lifetime dispense and recycle counters.
    pub fn counters(&mut self) -> Result<(u32, u32)> {
        match self.execute(&Command::Dispenser(DispenserCommand::GetCountSum))? {
            Response::Counters {
                dispensed,
                recycled,
            } => Ok((dispensed, recycled)),
            other => Err(unexpected(other)),
        }
    }

    /// Zero the dispense counter.
    pub fn clear_send_count(&mut self) -> Result<()> {
        self.exec_ok(Command::Dispenser(DispenserCommand::ClearSendCount))
    }

    /// Zero the recycle counter.
    pub fn clear_recycle_count(&mut self) -> Result<()> {
        self.exec_ok(Command::Dispenser(DispenserCommand::ClearRecycleCount))
    }

    /// Link test against the addressed controller.
    pub fn auto_test_mac(&mut self) -> Result<()> {
        self.exec_ok(Command::Dispenser(DispenserCommand::AutoTestMac))
    }

    /// Start a raw card movement. Completion is observed by polling
    /// [`check_position`](Self::check_position); the mechanical controller
    /// wraps this with timeout budgets.
    pub fn move_card(&mut self, position: MovePosition) -> Result<()> {
        self.exec_ok(Command::Dispenser(DispenserCommand::MoveCard { position }))
    }

    /// Start moving the held card into a box.
    pub fn retain_to_box(&mut self, target: RetainTarget) -> Result<()> {
        self.exec_ok(Command::Dispenser(DispenserCommand::RetainToBox { target }))
    }

    /// Unconditional recovery movement.
    pub fn force_move(&mut self) -> Result<()> {
        self.exec_ok(Command::Dispenser(DispenserCommand::ForceMove))
    }

    /// Raw DIP/configuration switch bytes.
    pub fn check_setting(&mut self) -> Result<Vec<u8>> {
        self.exec_data(Command::Dispenser(DispenserCommand::CheckSetting))
    }

    /// Probe the card at the read head and report its type.
    pub fn auto_test_rfid_card(&mut self) -> Result<CardType> {
        match self.execute(&Command::Dispenser(DispenserCommand::AutoTestRfidCard))? {
            Response::CardType(kind) => Ok(kind),
            other => Err(unexpected(other)),
        }
    }

    /// Raw command passthrough for diagnostics.
    pub fn send_raw(&mut self, data: Vec<u8>) -> Result<Vec<u8>> {
        self.exec_data(Command::Dispenser(DispenserCommand::SendRaw { data }))
    }

    // Mifare operations

    /// Probe for a card of this family in the RF field.
    pub fn mifare_detect(&mut self, family: CardFamily) -> Result<()> {
        self.exec_ok(mifare(family, MifareOp::Detect))
    }

    /// Card UID, 4 bytes for S50/S70 and 7 for Ultralight.
    pub fn mifare_get_id(&mut self, family: CardFamily) -> Result<CardUid> {
        match self.execute(&mifare(family, MifareOp::GetId))? {
            Response::Uid(uid) => Ok(uid),
            other => Err(unexpected(other)),
        }
    }

    /// Load a sector key for later authentication.
    pub fn mifare_load_key(
        &mut self,
        family: CardFamily,
        sector: u8,
        key_type: KeyType,
        key: SectorKey,
    ) -> Result<()> {
        self.exec_ok(mifare(
            family,
            MifareOp::LoadKey {
                sector,
                key_type,
                key,
            },
        ))
    }

    /// Read one 16-byte block.
    pub fn mifare_read_block(
        &mut self,
        family: CardFamily,
        sector: u8,
        block: u8,
    ) -> Result<BlockData> {
        match self.execute(&mifare(family, MifareOp::ReadBlock { sector, block }))? {
            Response::Block(data) => Ok(data),
            other => Err(unexpected(other)),
        }
    }

    /// Write one 16-byte block.
    pub fn mifare_write_block(
        &mut self,
        family: CardFamily,
        sector: u8,
        block: u8,
        data: BlockData,
    ) -> Result<()> {
        self.exec_ok(mifare(
            family,
            MifareOp::WriteBlock {
                sector,
                block,
                data,
            },
        ))
    }

    /// Format a block as a value block (S50/S70 only).
    pub fn mifare_init_value(
        &mut self,
        family: CardFamily,
        sector: u8,
        block: u8,
        value: i32,
    ) -> Result<()> {
        self.exec_ok(mifare(
            family,
            MifareOp::InitValue {
                sector,
                block,
                value,
            },
        ))
    }

    /// Add to a value block (S50/S70 only).
    pub fn mifare_increment(
        &mut self,
        family: CardFamily,
        sector: u8,
        block: u8,
        value: i32,
    ) -> Result<()> {
        self.exec_ok(mifare(
            family,
            MifareOp::Increment {
                sector,
                block,
                value,
            },
        ))
    }

    /// Subtract from a value block (S50/S70 only).
    pub fn mifare_decrement(
        &mut self,
        family: CardFamily,
        sector: u8,
        block: u8,
        value: i32,
    ) -> Result<()> {
        self.exec_ok(mifare(
            family,
            MifareOp::Decrement {
                sector,
                block,
                value,
            },
        ))
    }

    /// Put the card to sleep.
    pub fn mifare_halt(&mut self, family: CardFamily) -> Result<()> {
        self.exec_ok(mifare(family, MifareOp::Halt))
    }

    /// Load the Ultralight authentication key.
    pub fn ul_load_key(&mut self, key: [u8; 16]) -> Result<()> {
        self.exec_ok(mifare(CardFamily::Ultralight, MifareOp::UlLoadKey { key }))
    }

    /// Program a new Ultralight authentication key.
    pub fn ul_write_key(&mut self, key: [u8; 16]) -> Result<()> {
        self.exec_ok(mifare(CardFamily::Ultralight, MifareOp::UlWriteKey { key }))
    }

    // CPU card operations

    /// Power on a Type A CPU card. Returns the ATR and a fresh APDU chain.
    pub fn cpu_power_on(&mut self) -> Result<(Atr, ApduChain)> {
        match self.execute(&Command::Cpu(CpuCommand::PowerOn))? {
            Response::Atr(atr) => Ok((atr, ApduChain::new())),
            other => Err(unexpected(other)),
        }
    }

    /// Exchange one APDU with a Type A card, advancing the chain.
    pub fn cpu_apdu(&mut self, chain: &mut ApduChain, data: &[u8]) -> Result<Vec<u8>> {
        let cmd = Command::Cpu(CpuCommand::Apdu {
            sch: chain.sch(),
            data: data.to_vec(),
        });
        self.chained_apdu(chain, cmd)
    }

    /// Power off the Type A card.
    pub fn cpu_power_off(&mut self) -> Result<()> {
        self.exec_ok(Command::Cpu(CpuCommand::PowerOff))
    }

    /// Power on a Type B CPU card.
    pub fn cpu_power_on_type_b(&mut self) -> Result<(Atr, ApduChain)> {
        match self.execute(&Command::Cpu(CpuCommand::TypeBPowerOn))? {
            Response::Atr(atr) => Ok((atr, ApduChain::new())),
            other => Err(unexpected(other)),
        }
    }

    /// Exchange one APDU with a Type B card, advancing the chain.
    pub fn cpu_apdu_type_b(&mut self, chain: &mut ApduChain, data: &[u8]) -> Result<Vec<u8>> {
        let cmd = Command::Cpu(CpuCommand::TypeBApdu {
            sch: chain.sch(),
            data: data.to_vec(),
        });
        self.chained_apdu(chain, cmd)
    }

    /// Power off the Type B card.
    pub fn cpu_power_off_type_b(&mut self) -> Result<()> {
        self.exec_ok(Command::Cpu(CpuCommand::TypeBPowerOff))
    }

    fn chained_apdu(&mut self, chain: &mut ApduChain, cmd: Command) -> Result<Vec<u8>> {
        match self.execute(&cmd)? {
            Response::Apdu { rch, data } => {
                chain.verify_and_advance(rch)?;
                Ok(data)
            }
            other => Err(unexpected(other)),
        }
    }

    // ISO15693 vicinity operations

    /// Inventory the field and return one card UID.
    pub fn vicinity_get_uid(&mut self) -> Result<VicinityUid> {
        match self.execute(&vicinity(None, VicinityOp::GetUid))? {
            Response::VicinityUid(uid) => Ok(uid),
            other => Err(unexpected(other)),
        }
    }

    /// Select a card for subsequent addressed operations.
    pub fn vicinity_choose_card(&mut self, uid: VicinityUid) -> Result<()> {
        self.exec_ok(vicinity(Some(uid), VicinityOp::ChooseCard))
    }

    /// Read `block_len` blocks starting at `block_addr`.
    pub fn vicinity_read(
        &mut self,
        uid: Option<VicinityUid>,
        block_addr: u8,
        block_len: u8,
    ) -> Result<Vec<u8>> {
        self.exec_data(vicinity(
            uid,
            VicinityOp::ReadData {
                block_addr,
                block_len,
            },
        ))
    }

    /// Write one block.
    pub fn vicinity_write(
        &mut self,
        uid: Option<VicinityUid>,
        block_addr: u8,
        data: Vec<u8>,
    ) -> Result<()> {
        self.exec_ok(vicinity(uid, VicinityOp::WriteData { block_addr, data }))
    }

    /// Permanently lock one block.
    pub fn vicinity_lock_block(&mut self, uid: Option<VicinityUid>, lock_addr: u8) -> Result<()> {
        self.exec_ok(vicinity(uid, VicinityOp::LockBlock { lock_addr }))
    }

    /// Write the application family identifier.
    pub fn vicinity_write_afi(&mut self, uid: Option<VicinityUid>, value: u8) -> Result<()> {
        self.exec_ok(vicinity(uid, VicinityOp::WriteAfi { value }))
    }

    /// Permanently lock the AFI.
    pub fn vicinity_lock_afi(&mut self, uid: Option<VicinityUid>) -> Result<()> {
        self.exec_ok(vicinity(uid, VicinityOp::LockAfi))
    }

    /// Write the data storage format identifier.
    pub fn vicinity_write_dsfid(&mut self, uid: Option<VicinityUid>, value: u8) -> Result<()> {
        self.exec_ok(vicinity(uid, VicinityOp::WriteDsfid { value }))
    }

    /// Permanently lock the DSFID.
    pub fn vicinity_lock_dsfid(&mut self, uid: Option<VicinityUid>) -> Result<()> {
        self.exec_ok(vicinity(uid, VicinityOp::LockDsfid))
    }

    /// Read blocks together with their lock status bits.
    pub fn vicinity_read_safe_bit(
        &mut self,
        uid: Option<VicinityUid>,
        block_addr: u8,
        block_len: u8,
    ) -> Result<Vec<u8>> {
        self.exec_data(vicinity(
            uid,
            VicinityOp::ReadSafeBit {
                block_addr,
                block_len,
            },
        ))
    }

    /// Read the card system information.
    pub fn vicinity_get_message(&mut self, uid: Option<VicinityUid>) -> Result<Vec<u8>> {
        self.exec_data(vicinity(uid, VicinityOp::GetMessage))
    }

    // Auxiliary sensor operations

    /// Current alcohol sensor voltage.
    pub fn alcohol_voltage(&mut self) -> Result<u8> {
        self.exec_byte(Command::Aux(AuxCommand::ReadAlcoholVoltage))
    }

    /// Configured alcohol trigger voltage.
    pub fn alcohol_set_voltage(&mut self) -> Result<u8> {
        self.exec_byte(Command::Aux(AuxCommand::ReadAlcoholSetVoltage))
    }

    /// Set the alcohol trigger voltage.
    pub fn write_alcohol_set_voltage(&mut self, value: u8) -> Result<()> {
        self.exec_ok(Command::Aux(AuxCommand::WriteAlcoholSetVoltage { value }))
    }

    /// Reset the alcohol sensor mode.
    pub fn reset_alcohol_mode(&mut self) -> Result<()> {
        self.exec_ok(Command::Aux(AuxCommand::ResetAlcoholMode))
    }

    /// Configured humidity compensation value.
    pub fn alcohol_humidity(&mut self) -> Result<u8> {
        self.exec_byte(Command::Aux(AuxCommand::ReadAlcoholHumidity))
    }

    /// Set the humidity compensation value.
    pub fn write_alcohol_humidity(&mut self, value: u8) -> Result<()> {
        self.exec_ok(Command::Aux(AuxCommand::WriteAlcoholHumidity { value }))
    }

    /// Configured sensor warm-up time.
    pub fn alcohol_power_time(&mut self) -> Result<u8> {
        self.exec_byte(Command::Aux(AuxCommand::ReadAlcoholPowerTime))
    }

    /// Set the sensor warm-up time.
    pub fn write_alcohol_power_time(&mut self, value: u8) -> Result<()> {
        self.exec_ok(Command::Aux(AuxCommand::WriteAlcoholPowerTime { value }))
    }

    /// Read the persisted machine identifier.
    pub fn machine_id(&mut self) -> Result<Vec<u8>> {
        self.exec_data(Command::Aux(AuxCommand::GetMachineId))
    }

    /// Persist a machine identifier.
    pub fn set_machine_id(&mut self, data: Vec<u8>) -> Result<()> {
        self.exec_ok(Command::Aux(AuxCommand::SetMachineId { data }))
    }

    /// Read one scan from the barcode reader.
    pub fn read_barcode(&mut self) -> Result<Vec<u8>> {
        self.exec_data(Command::Aux(AuxCommand::ReadBarcode))
    }
}

fn mifare(family: CardFamily, op: MifareOp) -> Command {
    Command::Mifare { family, op }
}

fn vicinity(uid: Option<VicinityUid>, op: VicinityOp) -> Command {
    Command::Vicinity { uid, op }
}

fn unexpected(resp: Response) -> Error {
    Error::BadParameter(format!("unexpected response shape: {resp:?}"))
}
