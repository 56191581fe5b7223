use bitfield::bitfield;
use num_traits::FromPrimitive;

use super::{status_register, MarcStateValue};

bitfield! {
    #[derive(Clone, Copy)]
    pub struct RxBytes(u8);
    pub rxfifo_overflow, _: 7;
    pub num_rxbytes, _: 6, 0;
}
status_register!(RxBytes, RXBYTES);

bitfield! {
    #[derive(Clone, Copy)]
    pub struct TxBytes(u8);
    pub txfifo_underflow, _: 7;
    pub num_txbytes, _: 6, 0;
}
status_register!(TxBytes, TXBYTES);

bitfield! {
    #[derive(Clone, Copy)]
    pub struct PktStatus(u8);
    pub crc_ok, _: 7;
    pub carrier_sense, _: 6;
    pub pqt_reached, _: 5;
    pub channel_clear, _: 4;
    pub start_of_frame_delimiter, _: 3;
    pub gdo2, _: 2;
    pub gdo0, _: 0;
}
status_register!(PktStatus, PKTSTATUS);

bitfield! {
    #[derive(Clone, Copy)]
    pub struct Marcstate(u8);
    marc_state_bits, _: 4, 0;
}
status_register!(Marcstate, MARCSTATE);

impl Marcstate {
    /// The decoded state, or None for the reserved encodings.
    pub fn marc_state(&self) -> Option<MarcStateValue> {
        MarcStateValue::from_u8(self.marc_state_bits())
    }
}

/// Estimated frequency offset of the carrier, in two's complement.
#[derive(Clone, Copy)]
pub struct FreqEst(pub u8);
status_register!(FreqEst, FREQEST);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_byte_counts() {
        let rxbytes = RxBytes(0x95);
        assert!(rxbytes.rxfifo_overflow());
        assert_eq!(0x15, rxbytes.num_rxbytes());

        let txbytes = TxBytes(0x03);
        assert!(!txbytes.txfifo_underflow());
        assert_eq!(3, txbytes.num_txbytes());
    }
}
