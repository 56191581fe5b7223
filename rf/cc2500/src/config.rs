use crate::{
    freq,
    gpio::GdoOutput,
    regs::{
        Iocfg0, LengthConfigValue, Mcsm0, Mcsm1, Mdmcfg1, Mdmcfg2, Mdmcfg4, ModFormatValue,
        OffModeValue, Pktctrl0, Pktctrl1, RegisterAddress, SyncModeValue,
    },
};

macro_rules! rf_configuration {
    ($($field:ident = $reset:expr,)*) => {
        /// The complete block of configuration registers, IOCFG2 through TEST0.
        ///
        /// Fields are in register address order, so the block is read and written as one burst.
        #[derive(Clone, Copy, Debug, PartialEq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(C)]
        pub struct RfConfiguration {
            $(pub $field: u8,)*
        }

        impl RfConfiguration {
            /// Register values after a chip reset.
            pub const RESET: RfConfiguration = RfConfiguration {
                $($field: $reset,)*
            };

            pub const fn as_bytes(&self) -> [u8; RegisterAddress::COUNT] {
                [$(self.$field,)*]
            }

            pub const fn from_bytes(bytes: &[u8; RegisterAddress::COUNT]) -> Self {
                let mut index = 0;
                $(
                    let $field = bytes[index];
                    index += 1;
                )*
                let _ = index;
                RfConfiguration { $($field,)* }
            }
        }
    };
}

rf_configuration! {
    iocfg2 = 0x29,
    iocfg1 = 0x2E,
    iocfg0 = 0x3F,
    fifothr = 0x07,
    sync1 = 0xD3,
    sync0 = 0x91,
    pktlen = 0xFF,
    pktctrl1 = 0x04,
    pktctrl0 = 0x45,
    addr = 0x00,
    channr = 0x00,
    fsctrl1 = 0x0F,
    fsctrl0 = 0x00,
    freq2 = 0x5E,
    freq1 = 0xC4,
    freq0 = 0xEC,
    mdmcfg4 = 0x8C,
    mdmcfg3 = 0x22,
    mdmcfg2 = 0x02,
    mdmcfg1 = 0x22,
    mdmcfg0 = 0xF8,
    deviatn = 0x47,
    mcsm2 = 0x07,
    mcsm1 = 0x30,
    mcsm0 = 0x04,
    foccfg = 0x36,
    bscfg = 0x6C,
    agcctrl2 = 0x03,
    agcctrl1 = 0x40,
    agcctrl0 = 0x91,
    worevt1 = 0x87,
    worevt0 = 0x6B,
    worctrl = 0xF8,
    frend1 = 0xA6,
    frend0 = 0x10,
    fscal3 = 0xA9,
    fscal2 = 0x0A,
    fscal1 = 0x20,
    fscal0 = 0x0D,
    rcctrl1 = 0x41,
    rcctrl0 = 0x00,
    fstest = 0x59,
    ptest = 0x7F,
    agctest = 0x3F,
    test2 = 0x88,
    test1 = 0x31,
    test0 = 0x0B,
}

/// Power amplifier setting used for transmission.
pub(crate) const G4_PA_TABLE: u8 = 0xBB;

impl RfConfiguration {
    /// Configuration for receiving G4 broadcast packets at `frequency` Hz.
    ///
    /// MSK at 49.987 kBaud, 325 kHz channel filter, 249.938 kHz channel spacing,
    /// sync word D3 91, variable length packets with hardware CRC and appended RSSI/LQI status.
    pub fn g4(frequency: u32) -> Self {
        let mut rf = Self::RESET;

        // Asserts when sync word has been sent/received, and de-asserts at the end of the packet.
        let mut iocfg0 = Iocfg0::default();
        iocfg0.set_gdo0_cfg(GdoOutput::SYNC_WORD as u8);
        rf.iocfg0 = iocfg0.into();

        rf.sync1 = 0xD3;
        rf.sync0 = 0x91;

        let mut pktctrl1 = Pktctrl1::default();
        pktctrl1.set_append_status(true);
        rf.pktctrl1 = pktctrl1.into();

        let mut pktctrl0 = Pktctrl0::default();
        pktctrl0.set_crc_en(true);
        pktctrl0.set_length_config(LengthConfigValue::Variable);
        rf.pktctrl0 = pktctrl0.into();

        // Intermediate frequency 0x09 * 26 MHz / 2^10 == 228515 Hz
        rf.fsctrl1 = 0x09;

        [rf.freq2, rf.freq1, rf.freq0] = freq::frequency_to_registers(frequency);

        // Channel BW = 26 MHz / (8 * (4 + CHANBW_M) * 2^CHANBW_E) == 325 kHz
        let mut mdmcfg4 = Mdmcfg4::default();
        mdmcfg4.set_chanbw_e(1);
        mdmcfg4.set_chanbw_m(1);
        mdmcfg4.set_drate_e(10);
        rf.mdmcfg4 = mdmcfg4.into();

        // Data rate = (256 + DRATE_M) * 2^DRATE_E * 26 MHz / 2^28 == 49987 Baud
        rf.mdmcfg3 = 0xF8;

        let mut mdmcfg2 = Mdmcfg2::default();
        mdmcfg2.set_mod_format(ModFormatValue::Msk);
        mdmcfg2.set_sync_mode(SyncModeValue::Sync30Of32);
        rf.mdmcfg2 = mdmcfg2.into();

        let mut mdmcfg1 = Mdmcfg1::default();
        mdmcfg1.set_num_preamble(2);
        mdmcfg1.set_chanspc_e(3);
        rf.mdmcfg1 = mdmcfg1.into();

        // Channel spacing = (256 + CHANSPC_M) * 2^CHANSPC_E * 26 MHz / 2^18 == 249938 Hz
        rf.mdmcfg0 = 0x3B;

        rf.deviatn = 0x40;

        // RX timeout until end of packet.
        rf.mcsm2 = 0x07;

        let mut mcsm1 = Mcsm1::default();
        mcsm1.set_rxoff_mode(OffModeValue::Idle);
        mcsm1.set_txoff_mode(OffModeValue::Idle);
        rf.mcsm1 = mcsm1.into();

        let mut mcsm0 = Mcsm0::default();
        mcsm0.set_fs_autocal(1);
        rf.mcsm0 = mcsm0.into();

        // Frequency offset compensation: 2K before sync, K after, limit BW/4.
        rf.foccfg = 0x0A;
        // Bit synchronization: 2KI/3KP before sync, KI/2 and KP after, no data rate offset compensation.
        rf.bscfg = 0x68;

        // All but the highest DVGA gain, maximum LNA gain, 36 dB target.
        rf.agcctrl2 = 0x44;
        rf.agcctrl1 = 0x00;
        // Medium hysteresis, 32 sample wait, normal freeze, 32 sample filter.
        rf.agcctrl0 = 0xB2;

        rf.frend1 = 0xB6;
        rf.frend0 = 0x10;

        rf.fscal3 = 0xA9;
        rf.fscal2 = 0x0A;
        rf.fscal1 = 0x00;
        rf.fscal0 = 0x20;

        // Values from SmartRF Studio for low data rate RX.
        rf.test2 = 0x81;
        rf.test1 = 0x35;
        rf.test0 = 0x0B;

        rf
    }

    /// The carrier frequency in Hz.
    pub fn frequency(&self) -> u32 {
        freq::registers_to_frequency([self.freq2, self.freq1, self.freq0])
    }

    /// Get a register value by address.
    pub fn get(&self, address: RegisterAddress) -> u8 {
        self.as_bytes()[address.idx()]
    }
}

impl Default for RfConfiguration {
    fn default() -> Self {
        Self::RESET
    }
}
