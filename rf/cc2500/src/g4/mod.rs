//! The Dexcom G4 broadcast packet and the channel hopping receiver that follows it.
//!
//! Wire format of the 18-byte packet body:
//!
//! | Offset | Size | Content                          |
//! |--------|------|----------------------------------|
//! | 0      | 4    | destination, always FF FF FF FF  |
//! | 4      | 4    | transmitter id                   |
//! | 8      | 1    | port, always 3F                  |
//! | 9      | 1    | device info, always 03           |
//! | 10     | 1    | sequence number                  |
//! | 11     | 2    | raw reading                      |
//! | 13     | 2    | filtered reading, half scale     |
//! | 15     | 1    | battery level                    |
//! | 16     | 1    | unknown                          |
//! | 17     | 1    | checksum of bytes 11..17         |

use core::{fmt, str::FromStr};

use embassy_time::Instant;

use crate::{
    bits::reverse_bits,
    crc8::crc8,
    errors::{FrameError, InvalidTransmitterId, RadioError},
    Frame, Rssi,
};

mod channel;
mod scanner;

pub use channel::{Channel, BASE_FREQUENCY, CHANNELS};
pub use scanner::{Scanner, ScannerConfig, Timing};

pub const PACKET_LENGTH: usize = 18;

const CHECKSUM_SPAN: core::ops::Range<usize> = 11..PACKET_LENGTH - 1;

const TRANSMITTER_ID_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKLMNPQRSTUWXY";

/// Five symbols identifying a transmitter, as printed on its case.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TransmitterId([u8; 5]);

impl TransmitterId {
    /// Decode the little-endian wire encoding: five 5-bit symbols, most significant first, starting at bit 20.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let value = u32::from_le_bytes(bytes);
        let mut id = [0; 5];
        for (i, symbol) in id.iter_mut().enumerate() {
            let index = (value >> (20 - 5 * i)) & 0x1F;
            *symbol = TRANSMITTER_ID_ALPHABET[index as usize];
        }
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        // Every symbol comes from the ascii alphabet.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for TransmitterId {
    type Err = InvalidTransmitterId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 5] = s.as_bytes().try_into().map_err(|_| InvalidTransmitterId)?;
        if bytes
            .iter()
            .all(|b| TRANSMITTER_ID_ALPHABET.contains(b))
        {
            Ok(Self(bytes))
        } else {
            Err(InvalidTransmitterId)
        }
    }
}

impl fmt::Display for TransmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TransmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransmitterId({})", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransmitterId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// A decoded sensor broadcast.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub timestamp: Instant,
    /// Index into [`CHANNELS`] of the channel the packet was heard on.
    pub channel: usize,
    pub transmitter_id: TransmitterId,
    pub raw: u32,
    pub filtered: u32,
    pub battery: u8,
    pub rssi: Rssi,
    pub lqi: u8,
}

/// Decode a 16-bit float with a 13-bit mantissa and 3-bit exponent, sent with the bits of each byte reversed.
pub fn decode_reading(bytes: [u8; 2]) -> u32 {
    let value = u16::from_le_bytes([reverse_bits(bytes[0]), reverse_bits(bytes[1])]);
    ((value & 0x1FFF) as u32) << (value >> 13)
}

/// Validate a received frame as a G4 broadcast and decode it.
///
/// When `expected` is given, packets from any other transmitter are rejected.
pub fn decode_packet(
    channel: usize,
    timestamp: Instant,
    frame: &Frame,
    expected: Option<TransmitterId>,
) -> Result<Reading, RadioError> {
    let data = frame.body.as_slice();
    if data.len() != PACKET_LENGTH {
        return Err(FrameError::UnexpectedLength { len: data.len() }.into());
    }

    let received = data[PACKET_LENGTH - 1];
    let computed = crc8(&data[CHECKSUM_SPAN]);
    if computed != received {
        return Err(FrameError::ChecksumMismatch { computed, received }.into());
    }

    let transmitter_id = TransmitterId::from_bytes([data[4], data[5], data[6], data[7]]);
    if let Some(expected) = expected {
        if transmitter_id != expected {
            return Err(RadioError::UnexpectedTransmitter(transmitter_id));
        }
    }

    Ok(Reading {
        timestamp,
        channel,
        transmitter_id,
        raw: decode_reading([data[11], data[12]]),
        filtered: 2 * decode_reading([data[13], data[14]]),
        battery: data[15],
        rssi: frame.rssi,
        lqi: frame.lqi,
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn frame(hex: &str) -> Frame {
        Frame {
            body: hex
                .split_whitespace()
                .map(|b| u8::from_str_radix(b, 16).unwrap())
                .collect::<Vec<_>>(),
            rssi: -60,
            lqi: 10,
        }
    }

    fn id(s: &str) -> TransmitterId {
        s.parse().unwrap()
    }

    #[test]
    fn transmitter_ids() {
        assert_eq!("63GEA", TransmitterId::from_bytes([0xCA, 0xC1, 0x61, 0x00]).to_string());
        assert_eq!("67LDE", TransmitterId::from_bytes([0xAE, 0xD1, 0x63, 0x00]).to_string());
        assert_eq!("64K6A", TransmitterId::from_bytes([0xCA, 0x4C, 0x62, 0x00]).to_string());
    }

    #[test]
    fn parse_transmitter_id() {
        assert_eq!(TransmitterId(*b"6GN7J"), id("6GN7J"));
        assert_eq!(Err(InvalidTransmitterId), "6GN7".parse::<TransmitterId>());
        assert_eq!(Err(InvalidTransmitterId), "6GN7JX".parse::<TransmitterId>());
        // I, O, V and Z are not used.
        assert_eq!(Err(InvalidTransmitterId), "6GN7Z".parse::<TransmitterId>());
        assert_eq!(Err(InvalidTransmitterId), "6gn7j".parse::<TransmitterId>());
    }

    #[test]
    fn readings() {
        assert_eq!(156_576, decode_reading([0xB8, 0xCD]));
        assert_eq!(167_552, 2 * decode_reading([0x2E, 0x29]));
    }

    #[test]
    fn decode_packets() {
        let packets = [
            ("FF FF FF FF AE D1 63 00 3F 03 76 59 8D 12 49 D5 00 E4", "67LDE", 144_192, 149_760, 213),
            ("FF FF FF FF AE D1 63 00 3F 03 6E 39 4D 89 C9 D5 00 DE", "67LDE", 152_448, 160_288, 213),
            ("FF FF FF FF F2 58 68 00 3F 03 D6 FC 1D ED 19 D7 00 CE", "6GN7J", 198_624, 202_464, 215),
            ("FF FF FF FF F2 58 68 00 3F 03 DA 03 ED 5A 19 D7 00 F4", "6GN7J", 194_560, 199_488, 215),
            ("FF FF FF FF B0 CD 61 00 3F 03 AF 11 39 B3 7E D9 00 4E", "63KDG", 116_864, 126_160, 217),
        ];
        let timestamp = Instant::from_secs(100);

        for (hex, transmitter_id, raw, filtered, battery) in packets {
            let reading = decode_packet(2, timestamp, &frame(hex), None).unwrap();

            assert_eq!(id(transmitter_id), reading.transmitter_id);
            assert_eq!(raw, reading.raw);
            assert_eq!(filtered, reading.filtered);
            assert_eq!(battery, reading.battery);
            assert_eq!(2, reading.channel);
            assert_eq!(timestamp, reading.timestamp);
            assert_eq!(-60, reading.rssi);
        }
    }

    #[test]
    fn expected_transmitter() {
        let p1 = frame("FF FF FF FF AE D1 63 00 3F 03 76 59 8D 12 49 D5 00 E4");

        assert!(decode_packet(0, Instant::from_secs(0), &p1, Some(id("67LDE"))).is_ok());
        assert_eq!(
            Err(RadioError::UnexpectedTransmitter(id("67LDE"))),
            decode_packet(0, Instant::from_secs(0), &p1, Some(id("6GN7J")))
        );
    }

    #[test]
    fn corrupted_checksum() {
        let p1 = frame("FF FF FF FF AE D1 63 00 3F 03 76 59 8D 12 49 D5 00 E5");

        assert_eq!(
            Err(RadioError::InvalidFrame(FrameError::ChecksumMismatch {
                computed: 0xE4,
                received: 0xE5
            })),
            decode_packet(0, Instant::from_secs(0), &p1, None)
        );
    }

    #[test]
    fn wrong_length() {
        let short = frame("FF FF FF FF AE D1 63 00 3F 03 76 59 8D 12 49 D5 00");

        assert_eq!(
            Err(RadioError::InvalidFrame(FrameError::UnexpectedLength { len: 17 })),
            decode_packet(0, Instant::from_secs(0), &short, None)
        );
    }
}
