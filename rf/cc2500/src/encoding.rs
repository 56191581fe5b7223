//! 4b/6b line code.
//!
//! Every nibble is sent as a 6-bit codeword with a bounded run of equal bits, high nibble first,
//! packed most significant bit first. An odd number of input bytes leaves half a byte, which is
//! padded with 0101.

use alloc::vec::Vec;

use crate::errors::DecodeError;

const ENCODE: [u8; 16] = [
    0x15, 0x31, 0x32, 0x23, 0x34, 0x25, 0x26, 0x16, 0x1A, 0x19, 0x2A, 0x0B, 0x2C, 0x0D, 0x0E, 0x1C,
];

const INVALID: u8 = 0xFF;

const DECODE: [u8; 64] = decode_table();

const PADDING: u8 = 0b0101;

const fn decode_table() -> [u8; 64] {
    let mut table = [INVALID; 64];
    let mut nibble = 0;
    while nibble < ENCODE.len() {
        table[ENCODE[nibble] as usize] = nibble as u8;
        nibble += 1;
    }
    table
}

/// Number of bytes needed to encode `len` bytes.
pub const fn encoded_len(len: usize) -> usize {
    (len * 12 + 7) / 8
}

pub fn encode_4b6b(data: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(encoded_len(data.len()));
    let mut acc: u32 = 0;
    let mut bits = 0;

    for &byte in data {
        let word = (ENCODE[(byte >> 4) as usize] as u32) << 6 | ENCODE[(byte & 0x0F) as usize] as u32;
        acc = acc << 12 | word;
        bits += 12;
        while bits >= 8 {
            bits -= 8;
            encoded.push((acc >> bits) as u8);
        }
    }

    if bits > 0 {
        // 12 bits per byte leaves either nothing or a nibble.
        encoded.push((acc << 4) as u8 | PADDING);
    }

    encoded
}

pub fn decode_6b4b(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoded = Vec::with_capacity(data.len() * 2 / 3);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        acc = acc << 8 | byte as u32;
        bits += 8;
        if bits >= 12 {
            bits -= 12;
            let word = acc >> bits;
            let position = 2 * decoded.len();
            let high = decode_codeword((word >> 6) as u8 & 0x3F, position)?;
            let low = decode_codeword(word as u8 & 0x3F, position + 1)?;
            decoded.push(high << 4 | low);
        }
    }

    // Whole bytes carry 12-bit codeword pairs, so at most half a byte of padding is left.
    let position = 2 * decoded.len();
    match bits {
        0 => {}
        4 if acc & 0x0F == PADDING as u32 => {}
        _ => {
            return Err(DecodeError {
                position,
                codeword: (acc & ((1 << bits) - 1)) as u8,
            })
        }
    }

    Ok(decoded)
}

fn decode_codeword(codeword: u8, position: usize) -> Result<u8, DecodeError> {
    match DECODE[codeword as usize] {
        INVALID => Err(DecodeError { position, codeword }),
        nibble => Ok(nibble),
    }
}
