use crate::freq;

/// Carrier frequency of channel number 0, in Hz.
pub const BASE_FREQUENCY: u32 = 2_425_000_000;

/// A CHANNR value together with the FSCTRL0 frequency offset learned for it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel {
    pub number: u8,
    pub offset: u8,
}

/// The channels the transmitter hops across, in broadcast order, assuming 250 kHz channel spacing.
/// The initial offsets were determined empirically.
pub const CHANNELS: [Channel; 4] = [
    // 2425 MHz
    Channel::new(0, 0xFD),
    // 2450 MHz
    Channel::new(100, 0xFD),
    // 2474.75 MHz
    Channel::new(199, 0xFD),
    // 2477.25 MHz
    Channel::new(209, 0xFD),
];

impl Channel {
    pub const fn new(number: u8, offset: u8) -> Self {
        Self { number, offset }
    }

    /// The frequency offset in Hz.
    pub const fn offset_hz(&self) -> i32 {
        freq::register_to_frequency_offset(self.offset)
    }
}
