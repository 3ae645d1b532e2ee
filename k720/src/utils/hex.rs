//! Hexadecimal formatting for trace logs and UID display.

/// Convert a byte slice to a lowercase hex string without separators.
///
/// Example: `&[0xde, 0xad]` -> `"dead"`
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // write! never fails writing to a String
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

/// Convert a byte slice to a lowercase hex string with a single space
/// between each byte.
///
/// Example: `&[0xde, 0xad]` -> `"de ad"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_to_hex_basic() {
        assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn bytes_to_hex_spaced_basic() {
        assert_eq!(bytes_to_hex_spaced(&[0xde, 0xab]), "de ab");
    }
}
