//! Conversions between physical quantities and their register encodings.
//!
//! All conversions are pure and use integer arithmetic so that values which are exactly representable
//! round-trip exactly.

use core::ops::RangeInclusive;

use crate::{Rssi, FXOSC};

/// The frequency band the synthesizer can be programmed to, in Hz.
pub const FREQUENCY_RANGE: RangeInclusive<u32> = 2_400_000_000..=2_483_500_000;

/// RSSI offset in dBm, from the data sheet.
const RSSI_OFFSET: Rssi = 72;

/// Encode a carrier frequency in Hz as the FREQ2, FREQ1, FREQ0 register values.
///
/// The frequency word is `hz * 2^16 / FXOSC` rounded to the nearest integer.
pub const fn frequency_to_registers(hz: u32) -> [u8; 3] {
    let fxosc = FXOSC as u64;
    let word = ((hz as u64) << 16).saturating_add(fxosc / 2) / fxosc;
    [(word >> 16) as u8, (word >> 8) as u8, word as u8]
}

/// Decode the FREQ2, FREQ1, FREQ0 register values to a carrier frequency in Hz.
pub const fn registers_to_frequency(regs: [u8; 3]) -> u32 {
    let word = (regs[0] as u64) << 16 | (regs[1] as u64) << 8 | regs[2] as u64;
    ((word * FXOSC as u64) >> 16) as u32
}

/// Decode a two's complement frequency offset register (FSCTRL0 or FREQEST) to Hz.
pub const fn register_to_frequency_offset(offset: u8) -> i32 {
    ((offset as i8 as i64 * FXOSC as i64) >> 14) as i32
}

/// Encode a frequency offset in Hz as a two's complement offset register value.
pub const fn frequency_offset_to_register(offset: i32) -> u8 {
    let fxosc = FXOSC as i64;
    (((offset as i64) << 14) + fxosc / 2).div_euclid(fxosc) as u8
}

/// Decode the FSCTRL1 FREQ_IF field to the intermediate frequency in Hz.
pub const fn intermediate_frequency(freq_if: u8) -> u32 {
    ((freq_if as u64 * FXOSC as u64) >> 10) as u32
}

/// Channel filter bandwidth in Hz.
pub const fn channel_bandwidth(chanbw_e: u8, chanbw_m: u8) -> u32 {
    (FXOSC as u64 / ((4 + chanbw_m as u64) << (chanbw_e + 3))) as u32
}

/// Symbol rate in Baud.
pub const fn data_rate(drate_e: u8, drate_m: u8) -> u32 {
    ((((256 + drate_m as u64) << drate_e) * FXOSC as u64) >> 28) as u32
}

/// Channel spacing in Hz.
pub const fn channel_spacing(chanspc_e: u8, chanspc_m: u8) -> u32 {
    ((((256 + chanspc_m as u64) << chanspc_e) * FXOSC as u64) >> 18) as u32
}

/// Convert the RSSI register value, or the appended RSSI status byte, to dBm.
pub const fn register_to_rssi(rssi: u8) -> Rssi {
    (rssi as i8 as Rssi) / 2 - RSSI_OFFSET
}
