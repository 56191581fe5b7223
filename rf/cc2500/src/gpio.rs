/// Signal selection for the GDOx_CFG field of the IOCFGx registers.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GdoOutput {
    /// Asserted when the RX FIFO is filled at or above the RX FIFO threshold.
    /// De-asserted when the RX FIFO is drained below the same threshold.
    RXFIFO_THR = 0x00,
    /// Asserted when the RX FIFO is filled at or above the RX FIFO threshold or the end of packet is reached.
    /// De-asserted when the RX FIFO is empty.
    RXFIFO_THR_PKT = 0x01,
    /// Asserted when the TX FIFO is filled at or above the TX FIFO threshold.
    TXFIFO_THR = 0x02,
    /// Asserted when the TX FIFO is full.
    TXFIFO_THR_PKT = 0x03,
    RXFIFO_OVERFLOW = 0x04,
    TXFIFO_UNDERFLOW = 0x05,
    /// Asserted when sync word has been sent or received, and de-asserted at the end of the packet.
    /// In RX, the pin also de-asserts when a packet is discarded or the RX FIFO overflows.
    SYNC_WORD = 0x06,
    /// Asserted when a packet has been received with CRC OK. De-asserted when the first byte is read from the RX FIFO.
    PKT_CRC_OK = 0x07,
    PQT_REACHED = 0x08,
    CLEAR_CHANNEL = 0x09,
    PLL_LOCK = 0x0A,
    SERIAL_CLOCK = 0x0B,
    SYNC_SERIAL_DATA = 0x0C,
    ASYNC_SERIAL_DATA = 0x0D,
    CARRIER_SENSE = 0x0E,
    CRC_OK = 0x0F,
    PA_PD = 0x1B,
    LNA_PD = 0x1C,
    WOR_EVNT0 = 0x24,
    WOR_EVNT1 = 0x25,
    CHIP_RDYN = 0x29,
    XOSC_STABLE = 0x2B,
    HIGH_IMPEDANCE = 0x2E,
    HW_0 = 0x2F,
    CLK_XOSC_1 = 0x30,
    CLK_XOSC_1_5 = 0x31,
    CLK_XOSC_2 = 0x32,
    CLK_XOSC_3 = 0x33,
    CLK_XOSC_4 = 0x34,
    CLK_XOSC_6 = 0x35,
    CLK_XOSC_8 = 0x36,
    CLK_XOSC_12 = 0x37,
    CLK_XOSC_16 = 0x38,
    CLK_XOSC_24 = 0x39,
    CLK_XOSC_32 = 0x3A,
    CLK_XOSC_48 = 0x3B,
    CLK_XOSC_64 = 0x3C,
    CLK_XOSC_96 = 0x3D,
    CLK_XOSC_128 = 0x3E,
    CLK_XOSC_192 = 0x3F,
}
