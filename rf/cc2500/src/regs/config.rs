use bitfield::bitfield;
use num_traits::FromPrimitive;

use super::register;

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Iocfg2(u8);
    pub gdo2_inv, set_gdo2_inv: 6;
    pub gdo2_cfg, set_gdo2_cfg: 5, 0;
}
register!(Iocfg2, IOCFG2);

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Iocfg0(u8);
    pub temp_sensor_enable, set_temp_sensor_enable: 7;
    pub gdo0_inv, set_gdo0_inv: 6;
    pub gdo0_cfg, set_gdo0_cfg: 5, 0;
}
register!(Iocfg0, IOCFG0);

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Pktctrl1(u8);
    pub pqt, set_pqt: 7, 5;
    pub crc_autoflush, set_crc_autoflush: 3;
    /// Append RSSI and LQI/CRC_OK status bytes to the payload.
    pub append_status, set_append_status: 2;
    pub adr_chk, set_adr_chk: 1, 0;
}
register!(Pktctrl1, PKTCTRL1);

#[derive(Clone, Copy, Debug, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LengthConfigValue {
    Fixed = 0b00,
    Variable = 0b01,
    Infinite = 0b10,
    Reserved = 0b11,
}

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Pktctrl0(u8);
    pub white_data, set_white_data: 6;
    pub pkt_format, set_pkt_format: 5, 4;
    pub crc_en, set_crc_en: 2;
    length_config_bits, set_length_config_bits: 1, 0;
}
register!(Pktctrl0, PKTCTRL0);

impl Pktctrl0 {
    pub fn length_config(&self) -> LengthConfigValue {
        LengthConfigValue::from_u8(self.length_config_bits()).unwrap_or(LengthConfigValue::Reserved)
    }

    pub fn set_length_config(&mut self, value: LengthConfigValue) {
        self.set_length_config_bits(value as u8);
    }
}

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Mdmcfg4(u8);
    pub chanbw_e, set_chanbw_e: 7, 6;
    pub chanbw_m, set_chanbw_m: 5, 4;
    pub drate_e, set_drate_e: 3, 0;
}
register!(Mdmcfg4, MDMCFG4);

#[derive(Clone, Copy, Debug, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModFormatValue {
    Fsk2 = 0b000,
    Gfsk = 0b001,
    Ook = 0b011,
    Msk = 0b111,
}

#[derive(Clone, Copy, Debug, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncModeValue {
    NoPreambleNoSync = 0b000,
    Sync15Of16 = 0b001,
    Sync16Of16 = 0b010,
    Sync30Of32 = 0b011,
    CarrierSense = 0b100,
    CarrierSense15Of16 = 0b101,
    CarrierSense16Of16 = 0b110,
    CarrierSense30Of32 = 0b111,
}

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Mdmcfg2(u8);
    /// Disable the digital DC blocking filter before the demodulator.
    pub dem_dcfilt_off, set_dem_dcfilt_off: 7;
    mod_format_bits, set_mod_format_bits: 6, 4;
    pub manchester_en, set_manchester_en: 3;
    sync_mode_bits, set_sync_mode_bits: 2, 0;
}
register!(Mdmcfg2, MDMCFG2);

impl Mdmcfg2 {
    pub fn mod_format(&self) -> Option<ModFormatValue> {
        ModFormatValue::from_u8(self.mod_format_bits())
    }

    pub fn set_mod_format(&mut self, value: ModFormatValue) {
        self.set_mod_format_bits(value as u8);
    }

    pub fn sync_mode(&self) -> SyncModeValue {
        SyncModeValue::from_u8(self.sync_mode_bits()).unwrap_or(SyncModeValue::NoPreambleNoSync)
    }

    pub fn set_sync_mode(&mut self, value: SyncModeValue) {
        self.set_sync_mode_bits(value as u8);
    }
}

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Mdmcfg1(u8);
    pub fec_en, set_fec_en: 7;
    num_preamble_bits, set_num_preamble_bits: 6, 4;
    pub chanspc_e, set_chanspc_e: 1, 0;
}
register!(Mdmcfg1, MDMCFG1);

impl Mdmcfg1 {
    const NUM_PREAMBLE: [u8; 8] = [2, 3, 4, 6, 8, 12, 16, 24];

    /// Minimum number of preamble bytes to be transmitted.
    pub fn num_preamble(&self) -> u8 {
        Self::NUM_PREAMBLE[self.num_preamble_bits() as usize]
    }

    /// Set the minimum number of preamble bytes, rounded up to the nearest supported value.
    pub fn set_num_preamble(&mut self, bytes: u8) {
        let index = Self::NUM_PREAMBLE
            .iter()
            .position(|&n| n >= bytes)
            .unwrap_or(Self::NUM_PREAMBLE.len() - 1);
        self.set_num_preamble_bits(index as u8);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffModeValue {
    Idle = 0b00,
    Fstxon = 0b01,
    Tx = 0b10,
    Rx = 0b11,
}

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Mcsm1(u8);
    pub cca_mode, set_cca_mode: 5, 4;
    rxoff_mode_bits, set_rxoff_mode_bits: 3, 2;
    txoff_mode_bits, set_txoff_mode_bits: 1, 0;
}
register!(Mcsm1, MCSM1);

impl Mcsm1 {
    pub fn rxoff_mode(&self) -> OffModeValue {
        OffModeValue::from_u8(self.rxoff_mode_bits()).unwrap_or(OffModeValue::Idle)
    }

    pub fn set_rxoff_mode(&mut self, value: OffModeValue) {
        self.set_rxoff_mode_bits(value as u8);
    }

    pub fn txoff_mode(&self) -> OffModeValue {
        OffModeValue::from_u8(self.txoff_mode_bits()).unwrap_or(OffModeValue::Idle)
    }

    pub fn set_txoff_mode(&mut self, value: OffModeValue) {
        self.set_txoff_mode_bits(value as u8);
    }
}

bitfield! {
    #[derive(Clone, Copy, Default)]
    pub struct Mcsm0(u8);
    /// When to automatically calibrate: 1 = when going from IDLE to RX or TX.
    pub fs_autocal, set_fs_autocal: 5, 4;
    pub po_timeout, set_po_timeout: 3, 2;
}
register!(Mcsm0, MCSM0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_preamble() {
        let mut mdmcfg1 = Mdmcfg1(0);
        assert_eq!(2, mdmcfg1.num_preamble());

        mdmcfg1.set_num_preamble(5);
        assert_eq!(6, mdmcfg1.num_preamble());
        assert_eq!(0b011, mdmcfg1.num_preamble_bits());

        mdmcfg1.set_num_preamble(100);
        assert_eq!(24, mdmcfg1.num_preamble());
    }

    #[test]
    fn length_config() {
        let mut pktctrl0 = Pktctrl0(0x45);
        assert_eq!(LengthConfigValue::Variable, pktctrl0.length_config());
        assert!(pktctrl0.crc_en());
        assert!(pktctrl0.white_data());

        pktctrl0.set_length_config(LengthConfigValue::Fixed);
        assert_eq!(0x44, u8::from(pktctrl0));
    }

    #[test]
    fn off_modes() {
        let mut mcsm1 = Mcsm1(0x30);
        assert_eq!(OffModeValue::Idle, mcsm1.rxoff_mode());
        mcsm1.set_rxoff_mode(OffModeValue::Rx);
        mcsm1.set_txoff_mode(OffModeValue::Fstxon);
        assert_eq!(0x3D, u8::from(mcsm1));
    }
}
