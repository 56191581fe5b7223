use core::fmt;

use embedded_hal::{digital, spi};

use crate::{g4::TransmitterId, Rssi};

/// Failure of the hardware register port.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    Spi(spi::ErrorKind),
    Pin(digital::ErrorKind),
    /// The chip did not reach the requested state.
    Timeout,
}

/// Reason a received frame was discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer bytes than a length byte and the two appended status bytes.
    TooShort { len: usize },
    /// The chip flagged the hardware CRC as failed.
    CrcMismatch { rssi: Rssi },
    /// The length byte does not match the number of body bytes received.
    LengthMismatch {
        declared: usize,
        actual: usize,
        rssi: Rssi,
    },
    /// The body does not have the size of a broadcast packet.
    UnexpectedLength { len: usize },
    /// The software checksum inside the body is wrong.
    ChecksumMismatch { computed: u8, received: u8 },
}

/// The requested operation can never succeed with the given arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Violation {
    /// The packet and its length byte do not fit in the TX fifo.
    PacketTooLarge { len: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    Driver(DriverError),
    /// No frame arrived within the requested time.
    ReceiveTimeout,
    InvalidFrame(FrameError),
    /// A valid frame from a transmitter other than the one configured.
    UnexpectedTransmitter(TransmitterId),
    ProtocolViolation(Violation),
    /// The frequency lies outside the band of the synthesizer.
    FrequencyOutOfRange(u32),
}

/// An illegal 6-bit codeword, or trailing bits other than the padding, was found while decoding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeError {
    /// Index of the offending codeword in the encoded stream.
    pub position: usize,
    /// The codeword, or the trailing bits right aligned.
    pub codeword: u8,
}

/// A transmitter id string is not five characters from the transmitter id alphabet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidTransmitterId;

impl<E: spi::Error> From<E> for DriverError {
    fn from(value: E) -> Self {
        DriverError::Spi(value.kind())
    }
}

impl From<DriverError> for RadioError {
    fn from(value: DriverError) -> Self {
        RadioError::Driver(value)
    }
}

impl From<FrameError> for RadioError {
    fn from(value: FrameError) -> Self {
        RadioError::InvalidFrame(value)
    }
}

impl RadioError {
    /// A routine outcome the receive loop should simply retry after.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RadioError::ReceiveTimeout)
    }

    /// The frame was discarded, either because it was corrupt or because it came from the wrong transmitter.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            RadioError::InvalidFrame(_) | RadioError::UnexpectedTransmitter(_)
        )
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Spi(kind) => write!(f, "spi error: {}", kind),
            DriverError::Pin(kind) => write!(f, "interrupt pin error: {}", kind),
            DriverError::Timeout => write!(f, "timeout waiting for chip state"),
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::TooShort { len } => write!(f, "{}-byte frame is too short", len),
            FrameError::CrcMismatch { rssi } => write!(f, "CRC error (RSSI = {})", rssi),
            FrameError::LengthMismatch {
                declared,
                actual,
                rssi,
            } => write!(
                f,
                "length byte is {} but {} bytes were received (RSSI = {})",
                declared, actual, rssi
            ),
            FrameError::UnexpectedLength { len } => write!(f, "unexpected {}-byte packet", len),
            FrameError::ChecksumMismatch { computed, received } => write!(
                f,
                "computed CRC {:02X} but received {:02X}",
                computed, received
            ),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PacketTooLarge { len, max } => {
                write!(f, "attempting to send {}-byte packet (max {})", len, max)
            }
        }
    }
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioError::Driver(e) => write!(f, "{}", e),
            RadioError::ReceiveTimeout => write!(f, "receive timeout"),
            RadioError::InvalidFrame(e) => write!(f, "invalid frame: {}", e),
            RadioError::UnexpectedTransmitter(id) => {
                write!(f, "ignoring packet from transmitter {}", id)
            }
            RadioError::ProtocolViolation(v) => write!(f, "{}", v),
            RadioError::FrequencyOutOfRange(hz) => {
                write!(f, "frequency {} Hz is outside the supported band", hz)
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid 6-bit codeword {:06b} at position {}",
            self.codeword, self.position
        )
    }
}

impl fmt::Display for InvalidTransmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transmitter id must be 5 characters from 0-9 and A-Y excluding I, O, V, Z")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        let id = "67LDE".parse().unwrap();

        assert!(RadioError::ReceiveTimeout.is_timeout());
        assert!(!RadioError::ReceiveTimeout.is_rejection());
        assert!(RadioError::UnexpectedTransmitter(id).is_rejection());
        assert!(RadioError::from(FrameError::UnexpectedLength { len: 17 }).is_rejection());

        let fault = RadioError::from(DriverError::Timeout);
        assert!(!fault.is_timeout());
        assert!(!fault.is_rejection());
    }
}
