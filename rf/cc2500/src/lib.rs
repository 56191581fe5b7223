#![cfg_attr(not(test), no_std)]

extern crate alloc;
extern crate bitfield;

#[macro_use]
extern crate num_derive;

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod bits;
mod config;
pub mod crc8;
mod driver;
pub mod encoding;
mod errors;
pub mod freq;
pub mod g4;
pub mod gpio;
mod opcode;
mod packet;
mod radio;
pub mod regs;
mod statusbyte;
pub mod traits;

#[cfg(test)]
mod sim;

/// Crystal oscillator frequency in Hz.
pub const FXOSC: u32 = 26_000_000;

/// Size of both the RX and the TX fifo.
pub const FIFO_SIZE: usize = 64;

/// Signal strength in dBm.
pub type Rssi = i16;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PartNumber {
    Cc2500,
}

pub use self::{
    config::RfConfiguration,
    driver::Driver,
    errors::*,
    opcode::Strobe,
    packet::{Frame, MAX_PACKET_SIZE},
    radio::{ChannelParams, Counts, ModemConfig, Radio, Statistics},
    statusbyte::{State, StatusByte},
};
