use bitfield::bitfield;
use num_traits::FromPrimitive;

bitfield! {
    /// The status byte sent over SPI when the header byte, data byte, or command strobe is sent.
    #[derive(Clone, Copy, PartialEq)]
    pub struct StatusByte(u8);
    impl Debug;
    /// Stays high until power and crystal have stabilized. Should always be low when using the SPI interface.
    pub chip_rdyn, _: 7;
    /// Indicates the current main state machine mode.
    state_bits, _: 6, 4;
    /// Bytes available in the RX fifo on reads, free bytes in the TX fifo on writes. Saturates at 15.
    pub fifo_bytes_available, _: 3, 0;
}

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    IDLE = 0b000,
    RX = 0b001,
    TX = 0b010,
    FSTXON = 0b011,
    CALIBRATE = 0b100,
    SETTLING = 0b101,
    RXFIFO_OVERFLOW = 0b110,
    TXFIFO_UNDERFLOW = 0b111,
}

impl StatusByte {
    pub fn state(self) -> State {
        // All eight three-bit patterns are states.
        State::from_u8(self.state_bits()).unwrap_or(State::IDLE)
    }

    /// true if the chip is ready, false otherwise
    pub fn chip_rdy(self) -> bool {
        !self.chip_rdyn()
    }
}

impl From<u8> for StatusByte {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn can_get_state() {
        // Given
        let byte = StatusByte(0b1_110_0000);

        // Then
        assert_eq!(State::RXFIFO_OVERFLOW, byte.state());
        assert_eq!(true, byte.chip_rdyn());
        assert_eq!(false, byte.chip_rdy());
    }

    #[test]
    fn can_get_fifo_bytes() {
        let byte = StatusByte(0b0_001_1010);

        assert_eq!(State::RX, byte.state());
        assert_eq!(10, byte.fifo_bytes_available());
        assert!(byte.chip_rdy());
    }
}
