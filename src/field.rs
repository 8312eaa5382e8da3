//! Big-endian field extraction from fixed byte windows.
//!
//! Every multi-byte integer in the container is big-endian. Callers read a
//! fixed-size block first, so the windows here are always in bounds.

pub fn be_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}

pub fn be_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_be_u16() {
        assert_eq!(be_u16(&[0x12, 0x34], 0), 0x1234);
        assert_eq!(be_u16(&[0, 0x12, 0x34], 1), 0x1234);
    }

    #[test]
    fn test_be_u32() {
        assert_eq!(be_u32(&[0x12, 0x34, 0x56, 0x78], 0), 0x12345678);
        assert_eq!(be_u32(&[0xFF, 0, 0, 0, 0x2A], 1), 42);
    }
}
