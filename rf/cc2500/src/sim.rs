//! A simulated chip for protocol tests.
//!
//! The simulation runs on simulated time: delays complete immediately and advance the clock.
//! Frames put on the air are delivered when the chip listens on their channel, regardless of time.

use core::{cell::RefCell, convert::Infallible};
use std::{collections::VecDeque, rc::Rc, vec::Vec};

use embassy_time::Instant;
use embedded_hal::digital::{self, InputPin};
use embedded_hal_async::{
    delay::DelayNs,
    digital::Wait,
    spi::{self, Operation, SpiDevice},
};
use num_traits::FromPrimitive;

use crate::{
    regs::{MarcStateValue, RegisterAddress, StatusRegister},
    traits::Clock,
    Driver, Radio, RfConfiguration, State, Strobe, FIFO_SIZE,
};

/// A frame as sent by a transmitter.
#[derive(Clone, Debug)]
pub struct OnAir {
    body: Vec<u8>,
    length: Option<u8>,
    arriving: Option<usize>,
    rssi: u8,
    lqi: u8,
    crc_ok: bool,
    freqest: u8,
}

impl OnAir {
    pub fn new(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            length: None,
            arriving: None,
            rssi: 0xC0,
            lqi: 0x10,
            crc_ok: true,
            freqest: 0x00,
        }
    }

    pub fn rssi(mut self, rssi: u8) -> Self {
        self.rssi = rssi;
        self
    }

    pub fn lqi(mut self, lqi: u8) -> Self {
        self.lqi = lqi;
        self
    }

    /// Damage the frame so the hardware CRC check fails.
    pub fn corrupted(mut self) -> Self {
        self.crc_ok = false;
        self
    }

    /// Override the length byte.
    pub fn length(mut self, length: u8) -> Self {
        self.length = Some(length);
        self
    }

    /// Only the first `count` bytes are in the RX fifo when it is first read, the rest arrives afterwards.
    pub fn arriving(mut self, count: usize) -> Self {
        self.arriving = Some(count);
        self
    }

    /// Carrier frequency error the chip estimates for this frame.
    pub fn freqest(mut self, freqest: u8) -> Self {
        self.freqest = freqest;
        self
    }

    /// The bytes the chip puts in its RX fifo with status appending enabled.
    fn raw(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.body.len() + 3);
        raw.push(self.length.unwrap_or(self.body.len() as u8));
        raw.extend_from_slice(&self.body);
        raw.push(self.rssi);
        raw.push(self.lqi & 0x7F | (self.crc_ok as u8) << 7);
        raw
    }
}

struct Chip {
    regs: [u8; RegisterAddress::COUNT],
    pa_table: [u8; 8],
    state: State,
    rx_fifo: VecDeque<u8>,
    /// Bytes of the current frame still on their way to the RX fifo.
    rx_arriving: Vec<u8>,
    tx_fifo: Vec<u8>,
    irq: bool,
    freqest: u8,
    on_air: Vec<(u8, OnAir)>,
    sent: Vec<Vec<u8>>,
    strobes: Vec<Strobe>,
    delays: Vec<u32>,
    now_us: u64,
}

/// Header and byte position of the spi transaction in progress.
struct Access {
    header: Option<u8>,
    offset: usize,
}

impl Chip {
    fn new() -> Self {
        Self {
            regs: RfConfiguration::RESET.as_bytes(),
            pa_table: [0xC6, 0, 0, 0, 0, 0, 0, 0],
            state: State::IDLE,
            rx_fifo: VecDeque::new(),
            rx_arriving: Vec::new(),
            tx_fifo: Vec::new(),
            irq: false,
            freqest: 0,
            on_air: Vec::new(),
            sent: Vec::new(),
            strobes: Vec::new(),
            delays: Vec::new(),
            now_us: 1_000_000_000,
        }
    }

    fn status_byte(&self, read: bool) -> u8 {
        let fifo = if read {
            self.rx_fifo.len()
        } else {
            FIFO_SIZE.saturating_sub(self.tx_fifo.len())
        };
        (self.state as u8) << 4 | fifo.min(15) as u8
    }

    fn exchange(&mut self, access: &mut Access, mosi: u8) -> u8 {
        let Some(header) = access.header else {
            access.header = Some(mosi);
            let status = self.status_byte(mosi & 0x80 != 0);
            let address = mosi & 0x3F;
            if (0x30..=0x3D).contains(&address) && mosi & 0x40 == 0 {
                if let Some(strobe) = Strobe::from_u8(address) {
                    self.strobe(strobe);
                }
            }
            return status;
        };

        let read = header & 0x80 != 0;
        let burst = header & 0x40 != 0;
        let address = header & 0x3F;
        let offset = if burst { access.offset } else { 0 };
        access.offset += 1;

        match address {
            0x3F if read => self.rx_fifo.pop_front().unwrap_or(0),
            0x3F => {
                self.tx_fifo.push(mosi);
                0
            }
            0x3E if read => self.pa_table[offset % 8],
            0x3E => {
                self.pa_table[offset % 8] = mosi;
                0
            }
            0x30..=0x3D if read && burst => self.status_register(address),
            _ => {
                let index = address as usize + offset;
                if index < self.regs.len() {
                    if read {
                        return self.regs[index];
                    }
                    self.regs[index] = mosi;
                }
                0
            }
        }
    }

    fn status_register(&self, address: u8) -> u8 {
        const PARTNUM: u8 = StatusRegister::PARTNUM as u8;
        const VERSION: u8 = StatusRegister::VERSION as u8;
        const FREQEST: u8 = StatusRegister::FREQEST as u8;
        const RSSI: u8 = StatusRegister::RSSI as u8;
        const MARCSTATE: u8 = StatusRegister::MARCSTATE as u8;
        const PKTSTATUS: u8 = StatusRegister::PKTSTATUS as u8;
        const TXBYTES: u8 = StatusRegister::TXBYTES as u8;
        const RXBYTES: u8 = StatusRegister::RXBYTES as u8;

        match address {
            PARTNUM => 0x80,
            VERSION => 0x03,
            FREQEST => self.freqest,
            RSSI => 0x80,
            MARCSTATE => self.marc_state() as u8,
            PKTSTATUS => self.irq as u8,
            TXBYTES => {
                let underflow = (self.state == State::TXFIFO_UNDERFLOW) as u8;
                underflow << 7 | self.tx_fifo.len().min(0x7F) as u8
            }
            RXBYTES => {
                let overflow = (self.state == State::RXFIFO_OVERFLOW) as u8;
                overflow << 7 | self.rx_fifo.len().min(0x7F) as u8
            }
            _ => 0,
        }
    }

    fn marc_state(&self) -> MarcStateValue {
        match self.state {
            State::IDLE => MarcStateValue::IDLE,
            State::RX => MarcStateValue::RX,
            State::TX => MarcStateValue::TX,
            State::FSTXON => MarcStateValue::FSTXON,
            State::CALIBRATE => MarcStateValue::MANCAL,
            State::SETTLING => MarcStateValue::FS_LOCK,
            State::RXFIFO_OVERFLOW => MarcStateValue::RXFIFO_OVERFLOW,
            State::TXFIFO_UNDERFLOW => MarcStateValue::TXFIFO_UNDERFLOW,
        }
    }

    fn strobe(&mut self, strobe: Strobe) {
        self.strobes.push(strobe);
        let flushing = matches!(
            self.state,
            State::RXFIFO_OVERFLOW | State::TXFIFO_UNDERFLOW
        );

        match strobe {
            Strobe::SRES => {
                self.regs = RfConfiguration::RESET.as_bytes();
                self.pa_table = [0xC6, 0, 0, 0, 0, 0, 0, 0];
                self.state = State::IDLE;
                self.rx_fifo.clear();
                self.rx_arriving.clear();
                self.tx_fifo.clear();
                self.irq = false;
            }
            Strobe::SRX if self.state == State::IDLE => self.state = State::RX,
            Strobe::STX if matches!(self.state, State::IDLE | State::RX | State::FSTXON) => {
                self.state = if self.tx_fifo.is_empty() {
                    State::TXFIFO_UNDERFLOW
                } else {
                    State::TX
                };
            }
            Strobe::SFSTXON if self.state == State::IDLE => self.state = State::FSTXON,
            Strobe::SIDLE if !flushing => self.state = State::IDLE,
            Strobe::SFRX if matches!(self.state, State::IDLE | State::RXFIFO_OVERFLOW) => {
                self.rx_fifo.clear();
                self.state = State::IDLE;
            }
            Strobe::SFTX if matches!(self.state, State::IDLE | State::TXFIFO_UNDERFLOW) => {
                self.tx_fifo.clear();
                self.state = State::IDLE;
            }
            _ => {}
        }
    }

    /// Deliver the next frame on the current channel, if listening.
    fn deliver(&mut self) -> bool {
        if self.state != State::RX {
            return false;
        }

        let channel = self.regs[RegisterAddress::CHANNR.idx()];
        let Some(index) = self.on_air.iter().position(|(c, _)| *c == channel) else {
            return false;
        };
        let (_, frame) = self.on_air.remove(index);

        let mut raw = frame.raw();
        if let Some(count) = frame.arriving {
            self.rx_arriving = raw.split_off(count.min(raw.len()));
        }
        self.freqest = frame.freqest;
        if raw.len() > FIFO_SIZE {
            self.rx_fifo.extend(&raw[..FIFO_SIZE]);
            self.state = State::RXFIFO_OVERFLOW;
        } else {
            self.rx_fifo.extend(&raw);
            // RXOFF_MODE is IDLE
            self.state = State::IDLE;
        }
        // The sync word line is back low at the end of the packet.
        self.irq = false;
        true
    }

    fn advance(&mut self, us: u64) {
        self.now_us += us;
        if self.state == State::TX {
            self.sent.push(core::mem::take(&mut self.tx_fifo));
            // TXOFF_MODE is IDLE
            self.state = State::IDLE;
        }
    }
}

/// Handle to a simulated chip, shared by the spi device, delay, interrupt pin, and clock.
#[derive(Clone)]
pub struct Sim(Rc<RefCell<Chip>>);

impl Sim {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Chip::new())))
    }

    pub fn radio(&self) -> Radio<SimSpi, SimDelay, SimIrq> {
        Radio::new(Driver::new(
            SimSpi(self.clone()),
            SimDelay(self.clone()),
            SimIrq(self.clone()),
        ))
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.clone())
    }

    /// Queue a frame on the channel with CHANNR value `channel`.
    pub fn transmit(&self, channel: u8, frame: OnAir) {
        self.0.borrow_mut().on_air.push((channel, frame));
    }

    pub fn now(&self) -> Instant {
        Instant::from_micros(self.0.borrow().now_us)
    }

    pub fn register(&self, address: RegisterAddress) -> u8 {
        self.0.borrow().regs[address.idx()]
    }

    /// Frames taken from the TX fifo, including their length byte.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.0.borrow().sent.clone()
    }

    pub fn strobes(&self) -> Vec<Strobe> {
        self.0.borrow().strobes.clone()
    }

    /// Millisecond delays since the last call to `clear_delays`.
    pub fn delays(&self) -> Vec<u32> {
        self.0.borrow().delays.clone()
    }

    pub fn clear_delays(&self) {
        self.0.borrow_mut().delays.clear();
    }
}

pub struct SimSpi(Sim);

impl spi::ErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiDevice for SimSpi {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut chip = self.0 .0.borrow_mut();
        let mut access = Access {
            header: None,
            offset: 0,
        };

        for operation in operations.iter_mut() {
            match operation {
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = chip.exchange(&mut access, 0);
                    }
                }
                Operation::Write(buffer) => {
                    for &byte in buffer.iter() {
                        chip.exchange(&mut access, byte);
                    }
                }
                Operation::Transfer(read, write) => {
                    for i in 0..read.len().max(write.len()) {
                        let miso = chip.exchange(&mut access, write.get(i).copied().unwrap_or(0));
                        if let Some(byte) = read.get_mut(i) {
                            *byte = miso;
                        }
                    }
                }
                Operation::TransferInPlace(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = chip.exchange(&mut access, *byte);
                    }
                }
                Operation::DelayNs(ns) => chip.advance(*ns as u64 / 1000),
            }
        }

        // Reading the RX fifo makes room for the rest of the frame.
        if access.header == Some(0xFF) {
            let arriving = core::mem::take(&mut chip.rx_arriving);
            chip.rx_fifo.extend(arriving);
        }

        Ok(())
    }
}

pub struct SimDelay(Sim);

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0 .0.borrow_mut().advance(ns as u64 / 1000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.0 .0.borrow_mut().advance(us as u64);
    }

    async fn delay_ms(&mut self, ms: u32) {
        let mut chip = self.0 .0.borrow_mut();
        chip.delays.push(ms);
        chip.advance(ms as u64 * 1000);
    }
}

/// The GDO0 line, configured to assert on sync word.
pub struct SimIrq(Sim);

impl digital::ErrorType for SimIrq {
    type Error = Infallible;
}

impl InputPin for SimIrq {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0 .0.borrow().irq)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0 .0.borrow().irq)
    }
}

impl Wait for SimIrq {
    async fn wait_for_high(&mut self) -> Result<(), Infallible> {
        let delivered = self.0 .0.borrow_mut().deliver();
        if !delivered {
            // Nothing will ever arrive, the competing timeout completes instead.
            core::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
        self.wait_for_high().await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
        self.wait_for_high().await
    }
}

pub struct SimClock(Sim);

impl Clock for SimClock {
    fn now(&self) -> Instant {
        self.0.now()
    }
}
