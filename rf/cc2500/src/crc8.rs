//! 8-bit CRC with generator polynomial 0x2F (x^8 + x^5 + x^3 + x^2 + x + 1), initial value 0.
//!
//! This is the software checksum carried inside G4 broadcast frames.
//! It is unrelated to the CRC the chip computes in hardware.

const CRC8_POLY: u8 = 0x2F;

const CRC8_TABLE: [u8; 256] = generate_crc8_table();

const fn generate_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u8;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x80) != 0 {
                crc = (crc << 1) ^ CRC8_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Compute the 8-bit CRC of `msg`.
pub fn crc8(msg: &[u8]) -> u8 {
    msg.iter()
        .fold(0, |crc, &byte| CRC8_TABLE[(crc ^ byte) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_checksums() {
        let cases: [([u8; 6], u8); 14] = [
            ([0x19, 0xFD, 0xA5, 0xF9, 0xD8, 0x00], 0xD2),
            ([0x1B, 0xFD, 0x4E, 0xF9, 0xD7, 0x00], 0x2F),
            ([0x45, 0xFD, 0xCC, 0xF9, 0xD8, 0x00], 0x28),
            ([0x4E, 0x7D, 0xAB, 0xB9, 0xD7, 0x00], 0xD4),
            ([0x54, 0xFD, 0x5D, 0x79, 0xD8, 0x00], 0x60),
            ([0x5D, 0xBD, 0x7C, 0x39, 0xD7, 0x00], 0x33),
            ([0x68, 0x7D, 0x08, 0xB9, 0xD8, 0x00], 0x13),
            ([0x8A, 0xDD, 0x29, 0x59, 0xD7, 0x00], 0x0C),
            ([0xA2, 0xDD, 0xD1, 0x99, 0xD7, 0x00], 0xD0),
            ([0xA2, 0xFD, 0x1F, 0x79, 0xD7, 0x00], 0x5C),
            ([0xBD, 0xFD, 0x03, 0xF9, 0xD7, 0x00], 0xF8),
            ([0xEB, 0x7D, 0xC6, 0x79, 0xD7, 0x00], 0x2F),
            ([0xEF, 0x3D, 0x76, 0xD9, 0xD7, 0x00], 0x3C),
            ([0xFC, 0x1D, 0xED, 0x19, 0xD7, 0x00], 0xCE),
        ];
        for (msg, sum) in cases {
            assert_eq!(sum, crc8(&msg), "crc8({:02X?})", msg);
        }
    }

    #[test]
    fn empty_message() {
        assert_eq!(0, crc8(&[]));
    }

    #[test]
    fn single_bit_flip_changes_checksum() {
        let msg = [0x59, 0x8D, 0x12, 0x49, 0xD5, 0x00];
        let sum = crc8(&msg);
        for byte in 0..msg.len() {
            for bit in 0..8 {
                let mut corrupted = msg;
                corrupted[byte] ^= 1 << bit;
                assert_ne!(sum, crc8(&corrupted));
            }
        }
    }
}
