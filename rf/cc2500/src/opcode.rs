use crate::regs::{RegisterAddress, StatusRegister};

const WRITE_SINGLE: u8 = 0x00;
const WRITE_BURST: u8 = 0x40;
const READ_SINGLE: u8 = 0x80;
const READ_BURST: u8 = 0xC0;

const PATABLE: u8 = 0x3E;
const FIFO: u8 = 0x3F;

/// The header byte that starts every spi transaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Opcode {
    /// Write a single configuration register.
    WriteSingle(RegisterAddress),
    /// Write consecutive configuration registers.
    WriteBurst(RegisterAddress),
    /// Read a single configuration register.
    ReadSingle(RegisterAddress),
    /// Read consecutive configuration registers.
    ReadBurst(RegisterAddress),
    /// Read a status register.
    /// Status registers share addresses with the command strobes and are told apart by the burst bit.
    ReadStatus(StatusRegister),

    /// Command strobe.
    Strobe(Strobe),
    /// Read from RX FIFO.
    ReadFifoBurst,
    /// Write to TX FIFO.
    WriteFifoBurst,
    /// Read the power amplifier table.
    ReadPaTableBurst,
    /// Write the power amplifier table.
    WritePaTableBurst,
}

impl Opcode {
    pub const fn read(address: RegisterAddress, burst: bool) -> Self {
        if burst {
            Opcode::ReadBurst(address)
        } else {
            Opcode::ReadSingle(address)
        }
    }

    pub const fn write(address: RegisterAddress, burst: bool) -> Self {
        if burst {
            Opcode::WriteBurst(address)
        } else {
            Opcode::WriteSingle(address)
        }
    }

    pub const fn as_u8(&self) -> u8 {
        match *self {
            Opcode::WriteSingle(address) => WRITE_SINGLE | address.0,
            Opcode::WriteBurst(address) => WRITE_BURST | address.0,
            Opcode::ReadSingle(address) => READ_SINGLE | address.0,
            Opcode::ReadBurst(address) => READ_BURST | address.0,
            Opcode::ReadStatus(reg) => READ_BURST | reg as u8,
            Opcode::Strobe(strobe) => strobe as u8,
            Opcode::ReadFifoBurst => READ_BURST | FIFO,
            Opcode::WriteFifoBurst => WRITE_BURST | FIFO,
            Opcode::ReadPaTableBurst => READ_BURST | PATABLE,
            Opcode::WritePaTableBurst => WRITE_BURST | PATABLE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Strobe {
    /// Reset chip
    SRES = 0x30,
    /// Enable and calibrate frequency synthesizer
    SFSTXON = 0x31,
    /// Turn off crystal oscillator
    SXOFF = 0x32,
    /// Calibrate frequency synthesizer and turn it off
    SCAL = 0x33,
    /// Enable RX
    SRX = 0x34,
    /// Enable TX
    STX = 0x35,
    /// Exit RX/TX and turn off frequency synthesizer
    SIDLE = 0x36,
    /// Start automatic RX polling sequence
    SWOR = 0x38,
    /// Enter power down mode when CSn goes high
    SPWD = 0x39,
    /// Flush the RX FIFO
    SFRX = 0x3A,
    /// Flush the TX FIFO
    SFTX = 0x3B,
    /// Reset real time clock
    SWORRST = 0x3C,
    /// No operation - may be used to get access to the chip status byte
    SNOP = 0x3D,
}
