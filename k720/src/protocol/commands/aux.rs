// k720-rs/k720/src/protocol/commands/aux.rs

use crate::constants::OPCODE_BASE_AUX;

/// Auxiliary sensor operations: the alcohol probe, the machine ID memory,
/// and the barcode reader attached to some terminal variants.
#[derive(Debug, Clone)]
pub enum AuxCommand {
    /// Current alcohol sensor voltage.
    ReadAlcoholVoltage,
    /// Configured alcohol trigger voltage.
    ReadAlcoholSetVoltage,
    /// Set the alcohol trigger voltage.
    WriteAlcoholSetVoltage { value: u8 },
    /// Reset the alcohol sensor mode.
    ResetAlcoholMode,
    /// Configured humidity compensation value.
    ReadAlcoholHumidity,
    /// Set the humidity compensation value.
    WriteAlcoholHumidity { value: u8 },
    /// Configured sensor warm-up time.
    ReadAlcoholPowerTime,
    /// Set the sensor warm-up time.
    WriteAlcoholPowerTime { value: u8 },
    /// Read the persisted machine identifier.
    GetMachineId,
    /// Persist a machine identifier.
    SetMachineId { data: Vec<u8> },
    /// Read one scan from the barcode reader.
    ReadBarcode,
}

impl AuxCommand {
    pub fn opcode(&self) -> u8 {
        OPCODE_BASE_AUX
            + match self {
                Self::ReadAlcoholVoltage => 0x00,
                Self::ReadAlcoholSetVoltage => 0x01,
                Self::WriteAlcoholSetVoltage { .. } => 0x02,
                Self::ResetAlcoholMode => 0x03,
                Self::ReadAlcoholHumidity => 0x04,
                Self::WriteAlcoholHumidity { .. } => 0x05,
                Self::ReadAlcoholPowerTime => 0x06,
                Self::WriteAlcoholPowerTime { .. } => 0x07,
                Self::GetMachineId => 0x08,
                Self::SetMachineId { .. } => 0x09,
                Self::ReadBarcode => 0x0A,
            }
    }

    pub fn encode_args(&self, out: &mut Vec<u8>) {
        match self {
            Self::WriteAlcoholSetVoltage { value }
            | Self::WriteAlcoholHumidity { value }
            | Self::WriteAlcoholPowerTime { value } => out.push(*value),
            Self::SetMachineId { data } => out.extend_from_slice(data),
            _ => {}
        }
    }
}
