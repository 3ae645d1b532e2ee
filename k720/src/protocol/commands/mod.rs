// k720-rs/k720/src/protocol/commands/mod.rs

//! Command catalogue builders.
//!
//! Every public operation reduces to `[opcode][args...]` executed through
//! the exchange engine. The per-card-family entry points of the original
//! SDK collapse into a family tag plus a shared operation set; new commands
//! get an opcode in their family's block and an encoder in the family module.

pub mod aux;
pub mod cpu;
pub mod dispenser;
pub mod mifare;
pub mod vicinity;

pub use aux::AuxCommand;
pub use cpu::CpuCommand;
pub use dispenser::DispenserCommand;
pub use mifare::MifareOp;
pub use vicinity::VicinityOp;

use crate::types::{CardFamily, VicinityUid};
use crate::Result;

/// High-level command. Variants group by family; each family module owns
/// the opcode assignment and argument encoding.
#[derive(Debug, Clone)]
pub enum Command {
    /// D1801 dispenser movement, status, and counter operations.
    Dispenser(DispenserCommand),
    /// Mifare S50/S70/Ultralight operation dispatched by family tag.
    Mifare { family: CardFamily, op: MifareOp },
    /// CPU (ISO7816 Type A/B) card operations.
    Cpu(CpuCommand),
    /// ISO15693 vicinity card operation, optionally addressed to one UID.
    Vicinity {
        uid: Option<VicinityUid>,
        op: VicinityOp,
    },
    /// Auxiliary sensors: alcohol probe, machine ID memory, barcode reader.
    Aux(AuxCommand),
}

impl Command {
    /// Wire opcode for this command.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Dispenser(cmd) => cmd.opcode(),
            Self::Mifare { family, op } => op.opcode(*family),
            Self::Cpu(cmd) => cmd.opcode(),
            Self::Vicinity { op, .. } => op.opcode(),
            Self::Aux(cmd) => cmd.opcode(),
        }
    }

    /// Encode the request payload (opcode + arguments).
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = vec![self.opcode()];
        match self {
            Self::Dispenser(cmd) => cmd.encode_args(&mut out),
            Self::Mifare { family, op } => op.encode_args(*family, &mut out)?,
            Self::Cpu(cmd) => cmd.encode_args(&mut out),
            Self::Vicinity { uid, op } => op.encode_args(*uid, &mut out),
            Self::Aux(cmd) => cmd.encode_args(&mut out),
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovePosition, SectorKey};

    #[test]
    fn command_encode_starts_with_opcode() {
        let cmd = Command::Dispenser(DispenserCommand::MoveCard {
            position: MovePosition::ToReadHead,
        });
        let bytes = cmd.encode().unwrap();
        assert_eq!(bytes[0], cmd.opcode());
        assert_eq!(bytes, vec![0x67, 0x01]);
    }

    #[test]
    fn mifare_families_map_to_distinct_opcodes() {
        let op = MifareOp::LoadKey {
            sector: 1,
            key_type: crate::types::KeyType::A,
            key: SectorKey::from_bytes([0xFF; 6]),
        };
        let s50 = Command::Mifare {
            family: CardFamily::S50,
            op: op.clone(),
        };
        let s70 = Command::Mifare {
            family: CardFamily::S70,
            op,
        };
        assert_eq!(s50.opcode(), 0x12);
        assert_eq!(s70.opcode(), 0x22);
    }
}
