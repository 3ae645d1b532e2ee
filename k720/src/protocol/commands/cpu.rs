// k720-rs/k720/src/protocol/commands/cpu.rs

use crate::constants::OPCODE_BASE_CPU;

/// CPU (ISO7816) card operations, contact-side Type A and Type B.
///
/// `Apdu` carries the send chain header explicitly; the caller obtains it
/// from the [`ApduChain`](crate::protocol::ApduChain) handed out by power-on
/// and advances the chain against the response.
#[derive(Debug, Clone)]
pub enum CpuCommand {
    /// Power the card on and return its ATR.
    PowerOn,
    /// Exchange one chained APDU fragment.
    Apdu { sch: u8, data: Vec<u8> },
    /// Power the card off.
    PowerOff,
    /// Power on a Type B card.
    TypeBPowerOn,
    /// Exchange one chained APDU fragment with a Type B card.
    TypeBApdu { sch: u8, data: Vec<u8> },
    /// Power off a Type B card.
    TypeBPowerOff,
}

impl CpuCommand {
    pub fn opcode(&self) -> u8 {
        OPCODE_BASE_CPU
            + match self {
                Self::PowerOn => 0x00,
                Self::Apdu { .. } => 0x01,
                Self::PowerOff => 0x02,
                Self::TypeBPowerOn => 0x03,
                Self::TypeBApdu { .. } => 0x04,
                Self::TypeBPowerOff => 0x05,
            }
    }

    pub fn encode_args(&self, out: &mut Vec<u8>) {
        match self {
            Self::Apdu { sch, data } | Self::TypeBApdu { sch, data } => {
                out.push(*sch);
                out.extend_from_slice(data);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes() {
        assert_eq!(CpuCommand::PowerOn.opcode(), 0x40);
        assert_eq!(CpuCommand::TypeBPowerOff.opcode(), 0x45);
    }

    #[test]
    fn apdu_carries_chain_header() {
        let cmd = CpuCommand::Apdu {
            sch: 0x01,
            data: vec![0x00, 0xA4, 0x04, 0x00],
        };
        let mut out = vec![cmd.opcode()];
        cmd.encode_args(&mut out);
        assert_eq!(out, vec![0x41, 0x01, 0x00, 0xA4, 0x04, 0x00]);
    }
}
