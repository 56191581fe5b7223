/// A configuration register with a typed view of its bit fields.
pub trait Register: Copy + From<u8> + Into<u8> {
    const ADDRESS: RegisterAddress;
}

/// A read-only status register.
pub trait StatusRegisterValue: Copy + From<u8> {
    const REGISTER: StatusRegister;
}

/// The read-only status registers.
/// These share addresses with the command strobes and can only be read in burst mode.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusRegister {
    PARTNUM = 0x30,
    VERSION = 0x31,
    FREQEST = 0x32,
    LQI = 0x33,
    RSSI = 0x34,
    MARCSTATE = 0x35,
    WORTIME1 = 0x36,
    WORTIME0 = 0x37,
    PKTSTATUS = 0x38,
    VCO_VC_DAC = 0x39,
    TXBYTES = 0x3A,
    RXBYTES = 0x3B,
    RCCTRL1_STATUS = 0x3C,
    RCCTRL0_STATUS = 0x3D,
}

macro_rules! register {
    ($name:ident, $address:ident) => {
        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl crate::regs::Register for $name {
            const ADDRESS: crate::regs::RegisterAddress = crate::regs::RegisterAddress::$address;
        }
    };
}

macro_rules! status_register {
    ($name:ident, $register:ident) => {
        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                Self(value)
            }
        }

        impl crate::regs::StatusRegisterValue for $name {
            const REGISTER: crate::regs::StatusRegister = crate::regs::StatusRegister::$register;
        }
    };
}

pub(crate) use {register, status_register};

mod config;
mod marc_state;
mod register_address;
mod status;

pub use config::*;
pub use marc_state::MarcStateValue;
pub use register_address::RegisterAddress;
pub use status::*;
