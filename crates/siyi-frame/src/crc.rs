//! CRC16 checksum for protocol frames.
//!
//! The camera uses CRC-16/XMODEM (polynomial 0x1021, no reflection, no final
//! xor) with a 256-entry lookup table. Frames always start from an initial
//! value of 0.

use crc::{Crc, CRC_16_XMODEM};

static CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Calculate the CRC16 of `data`, starting from `init`.
#[inline]
#[must_use]
pub fn crc16(data: &[u8], init: u16) -> u16 {
    let mut digest = CRC16.digest_with_initial(init);
    digest.update(data);
    digest.finalize()
}

/// CRC16 digest for incremental calculation.
pub struct Crc16Digest {
    digest: crc::Digest<'static, u16>,
}

impl Crc16Digest {
    /// Create a digest starting from 0.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(0)
    }

    /// Create a digest starting from `init`.
    #[inline]
    #[must_use]
    pub fn with_initial(init: u16) -> Self {
        Self {
            digest: CRC16.digest_with_initial(init),
        }
    }

    /// Update the digest with a byte slice.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    /// Finalize and return the checksum value.
    #[inline]
    #[must_use]
    pub fn finalize(self) -> u16 {
        self.digest.finalize()
    }
}

impl Default for Crc16Digest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_vector() {
        // Published check value for CRC-16/XMODEM.
        assert_eq!(crc16(b"123456789", 0), 0x31C3);
    }

    #[test]
    fn empty_input_returns_init() {
        assert_eq!(crc16(&[], 0), 0x0000);
        assert_eq!(crc16(&[], 0xBEEF), 0xBEEF);
    }

    #[test]
    fn camera_attitude_request_vector() {
        // Attitude request with sequence 0; wire checksum bytes are `e8 05`.
        let frame = [0x55, 0x66, 0x01, 0x00, 0x00, 0x00, 0x00, 0x0D];
        assert_eq!(crc16(&frame, 0), 0x05E8);
    }

    #[test]
    fn camera_take_photo_vector() {
        let frame = [0x55, 0x66, 0x01, 0x01, 0x00, 0x00, 0x00, 0x0C, 0x00];
        assert_eq!(crc16(&frame, 0), 0xCE34);
    }

    #[test]
    fn init_value_changes_result() {
        assert_ne!(crc16(b"abc", 0), crc16(b"abc", 0x1234));
    }

    #[test]
    fn digest_matches_batch() {
        let data = b"\x55\x66\x01\x01\x00\x00\x00\x05\x01";
        let mut digest = Crc16Digest::new();
        for chunk in data.chunks(2) {
            digest.update(chunk);
        }
        assert_eq!(digest.finalize(), crc16(data, 0));
    }

    #[test]
    fn digest_with_initial_matches_batch() {
        let mut digest = Crc16Digest::with_initial(0x1D0F);
        digest.update(b"123456789");
        assert_eq!(digest.finalize(), crc16(b"123456789", 0x1D0F));
    }
}
