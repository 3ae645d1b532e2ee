// k720-rs/k720/src/protocol/frame.rs

use crate::constants::{ACK, ENQ, EOT, FRAME_HEADER, MAX_PAYLOAD_LEN, MIN_FRAME_LEN, NAK};
use crate::protocol::checksum::bcc;
use crate::{Error, Result};

/// One decoded wire packet.
///
/// Format: `[HEADER(0xF2)] [ADDR] [LEN_HI] [LEN_LO] [PAYLOAD...] [BCC]`
/// where LEN is the big-endian payload length and BCC is the XOR of all
/// preceding frame bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub address: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Encode an address/payload pair into a full wire frame. Pure function,
    /// no I/O.
    pub fn encode(address: u8, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidLength {
                expected: MAX_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let len = payload.len() as u16;
        let mut out = Vec::with_capacity(MIN_FRAME_LEN + payload.len());
        out.push(FRAME_HEADER);
        out.push(address);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(payload);
        out.push(bcc(&out));
        Ok(out)
    }

    /// Decode an exact wire frame. Any framing mismatch is a hard failure;
    /// a malformed frame is never partially interpreted.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() < MIN_FRAME_LEN {
            return Err(Error::InvalidLength {
                expected: MIN_FRAME_LEN,
                actual: frame.len(),
            });
        }

        if frame[0] != FRAME_HEADER {
            return Err(Error::WrongPacketHead { actual: frame[0] });
        }

        let declared = u16::from_be_bytes([frame[2], frame[3]]) as usize;
        let actual = frame.len() - MIN_FRAME_LEN;
        if declared != actual {
            return Err(Error::WrongPacketLen { declared, actual });
        }

        let bcc_expected = bcc(&frame[..frame.len() - 1]);
        let bcc_actual = frame[frame.len() - 1];
        if bcc_actual != bcc_expected {
            return Err(Error::WrongBcc {
                expected: bcc_expected,
                actual: bcc_actual,
            });
        }

        Ok(Self {
            address: frame[1],
            payload: frame[4..frame.len() - 1].to_vec(),
        })
    }

    /// Total wire length of a frame carrying `payload_len` bytes.
    pub fn wire_len(payload_len: usize) -> usize {
        MIN_FRAME_LEN + payload_len
    }
}

/// Incremental frame assembler for a live byte stream.
///
/// ACK/EOT/NAK/ENQ control bytes arriving before the packet header are
/// skipped; bytes arriving after a complete frame are kept for the caller
/// (the EOT marker usually trails the packet). The first non-control byte
/// must be the frame header or assembly fails immediately.
#[derive(Debug, Default)]
pub struct FrameAccumulator {
    buf: Vec<u8>,
    remainder: Vec<u8>,
}

impl FrameAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes; returns the frame once one is complete and validated.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Option<Frame>> {
        for &b in bytes {
            if self.buf.is_empty() {
                if matches!(b, ACK | EOT | NAK | ENQ) {
                    continue;
                }
                if b != FRAME_HEADER {
                    return Err(Error::WrongPacketHead { actual: b });
                }
            }
            self.buf.push(b);
        }

        if self.buf.len() < 4 {
            return Ok(None);
        }

        let declared = u16::from_be_bytes([self.buf[2], self.buf[3]]) as usize;
        if declared > MAX_PAYLOAD_LEN {
            return Err(Error::WrongPacketLen {
                declared,
                actual: MAX_PAYLOAD_LEN,
            });
        }

        let total = Frame::wire_len(declared);
        if self.buf.len() < total {
            return Ok(None);
        }

        self.remainder = self.buf.split_off(total);
        let frame = Frame::decode(&self.buf)?;
        self.buf.clear();
        Ok(Some(frame))
    }

    /// Bytes received after the completed frame (e.g. a trailing EOT).
    pub fn take_remainder(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.remainder)
    }
}
