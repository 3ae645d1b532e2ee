// k720-rs/k720/src/protocol/parser.rs

use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InvalidLength {
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Read a single byte at `idx` with bounds checking.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    ensure_len(data, idx + 1)?;
    Ok(data[idx])
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    ensure_len(data, idx + len)?;
    Ok(&data[idx..idx + len])
}

/// Read a big-endian u32 at `idx` with bounds checking.
pub fn be_u32_at(data: &[u8], idx: usize) -> Result<u32> {
    let s = slice_at(data, idx, 4)?;
    Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
}

/// Ensure the first payload byte (opcode echo) equals `expected`.
pub fn expect_opcode(data: &[u8], expected: u8) -> Result<()> {
    let actual = byte_at(data, 0)?;
    if actual != expected {
        return Err(Error::UnexpectedResponse { expected, actual });
    }
    Ok(())
}
