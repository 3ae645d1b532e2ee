// k720-rs/k720/src/protocol/checksum.rs

/// Compute the block check character (BCC) for a frame: the running XOR of
/// every byte preceding the checksum position.
pub fn bcc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcc_examples() {
        assert_eq!(bcc(&[]), 0x00);
        assert_eq!(bcc(&[0xFF]), 0xFF);
        assert_eq!(bcc(&[0x01, 0x02, 0x03]), 0x00);
        assert_eq!(bcc(&[0xF2, 0x01, 0x00, 0x01, 0x61]), 0x93);
    }

    #[test]
    fn bcc_self_inverse() {
        let data = [0xF2, 0x01, 0x00, 0x02, 0x10, 0x20];
        let c = bcc(&data);
        let mut framed = data.to_vec();
        framed.push(c);
        assert_eq!(bcc(&framed), 0x00);
    }
}
