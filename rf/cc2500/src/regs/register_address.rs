/// Address of a configuration register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddress(pub u8);

impl RegisterAddress {
    pub const IOCFG2: RegisterAddress = RegisterAddress(0x00);
    pub const IOCFG1: RegisterAddress = RegisterAddress(0x01);
    pub const IOCFG0: RegisterAddress = RegisterAddress(0x02);
    pub const FIFOTHR: RegisterAddress = RegisterAddress(0x03);
    pub const SYNC1: RegisterAddress = RegisterAddress(0x04);
    pub const SYNC0: RegisterAddress = RegisterAddress(0x05);
    pub const PKTLEN: RegisterAddress = RegisterAddress(0x06);
    pub const PKTCTRL1: RegisterAddress = RegisterAddress(0x07);
    pub const PKTCTRL0: RegisterAddress = RegisterAddress(0x08);
    pub const ADDR: RegisterAddress = RegisterAddress(0x09);
    pub const CHANNR: RegisterAddress = RegisterAddress(0x0A);
    pub const FSCTRL1: RegisterAddress = RegisterAddress(0x0B);
    pub const FSCTRL0: RegisterAddress = RegisterAddress(0x0C);
    pub const FREQ2: RegisterAddress = RegisterAddress(0x0D);
    pub const FREQ1: RegisterAddress = RegisterAddress(0x0E);
    pub const FREQ0: RegisterAddress = RegisterAddress(0x0F);
    pub const MDMCFG4: RegisterAddress = RegisterAddress(0x10);
    pub const MDMCFG3: RegisterAddress = RegisterAddress(0x11);
    pub const MDMCFG2: RegisterAddress = RegisterAddress(0x12);
    pub const MDMCFG1: RegisterAddress = RegisterAddress(0x13);
    pub const MDMCFG0: RegisterAddress = RegisterAddress(0x14);
    pub const DEVIATN: RegisterAddress = RegisterAddress(0x15);
    pub const MCSM2: RegisterAddress = RegisterAddress(0x16);
    pub const MCSM1: RegisterAddress = RegisterAddress(0x17);
    pub const MCSM0: RegisterAddress = RegisterAddress(0x18);
    pub const FOCCFG: RegisterAddress = RegisterAddress(0x19);
    pub const BSCFG: RegisterAddress = RegisterAddress(0x1A);
    pub const AGCCTRL2: RegisterAddress = RegisterAddress(0x1B);
    pub const AGCCTRL1: RegisterAddress = RegisterAddress(0x1C);
    pub const AGCCTRL0: RegisterAddress = RegisterAddress(0x1D);
    pub const WOREVT1: RegisterAddress = RegisterAddress(0x1E);
    pub const WOREVT0: RegisterAddress = RegisterAddress(0x1F);
    pub const WORCTRL: RegisterAddress = RegisterAddress(0x20);
    pub const FREND1: RegisterAddress = RegisterAddress(0x21);
    pub const FREND0: RegisterAddress = RegisterAddress(0x22);
    pub const FSCAL3: RegisterAddress = RegisterAddress(0x23);
    pub const FSCAL2: RegisterAddress = RegisterAddress(0x24);
    pub const FSCAL1: RegisterAddress = RegisterAddress(0x25);
    pub const FSCAL0: RegisterAddress = RegisterAddress(0x26);
    pub const RCCTRL1: RegisterAddress = RegisterAddress(0x27);
    pub const RCCTRL0: RegisterAddress = RegisterAddress(0x28);
    pub const FSTEST: RegisterAddress = RegisterAddress(0x29);
    pub const PTEST: RegisterAddress = RegisterAddress(0x2A);
    pub const AGCTEST: RegisterAddress = RegisterAddress(0x2B);
    pub const TEST2: RegisterAddress = RegisterAddress(0x2C);
    pub const TEST1: RegisterAddress = RegisterAddress(0x2D);
    pub const TEST0: RegisterAddress = RegisterAddress(0x2E);

    pub const MIN: RegisterAddress = Self::IOCFG2;
    pub const MAX: RegisterAddress = Self::TEST0;

    /// Number of configuration registers.
    pub const COUNT: usize = (Self::MAX.0 - Self::MIN.0 + 1) as usize;

    /// Index of the register within the configuration block.
    pub const fn idx(&self) -> usize {
        (self.0 - Self::MIN.0) as usize
    }
}
