use alloc::vec::Vec;

use bitfield::bitfield;
use embassy_time::Duration;
use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, digital::Wait, spi::SpiDevice};

use crate::{
    errors::{DriverError, FrameError, RadioError, Violation},
    freq,
    opcode::Strobe,
    regs::{RxBytes, TxBytes},
    statusbyte::State,
    Radio, Rssi, FIFO_SIZE,
};

/// The largest payload that fits in the TX fifo together with its length byte.
pub const MAX_PACKET_SIZE: usize = FIFO_SIZE - 1;

/// Length byte and the two appended status bytes.
const MIN_FRAME_SIZE: usize = 3;

/// Approximate time to transmit one byte at the configured data rate.
const BYTE_DURATION_MS: u32 = 1;

/// Number of fifo polls before the end of a packet is assumed.
const RX_POLL_BUDGET: usize = 100;

/// Number of fifo polls before a transmission is considered stuck.
const TX_POLL_BUDGET: usize = 4 * FIFO_SIZE;

/// Number of times the RX fifo is flushed and RX re-entered after an overflow within one receive.
const MAX_OVERFLOW_RETRIES: usize = 3;

bitfield! {
    /// The second status byte appended to a received packet.
    #[derive(Clone, Copy)]
    struct AppendedStatus(u8);
    crc_ok, _: 7;
    lqi, _: 6, 0;
}

/// A received packet that passed the hardware CRC and length checks.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub body: Vec<u8>,
    /// Signal strength while the packet was received, in dBm.
    pub rssi: Rssi,
    pub lqi: u8,
}

impl<Spi, Delay, Irq> Radio<Spi, Delay, Irq>
where
    Spi: SpiDevice,
    Delay: DelayNs,
    Irq: Wait + InputPin,
{
    /// Transmit `data` as a variable length packet.
    /// The radio is returned to IDLE whatever the outcome.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), RadioError> {
        if data.len() > MAX_PACKET_SIZE {
            let violation = Violation::PacketTooLarge {
                len: data.len(),
                max: MAX_PACKET_SIZE,
            };
            error!("Refusing to send: {}", violation);
            return self.record(Err(RadioError::ProtocolViolation(violation)));
        }

        debug!("Sending {}-byte packet", data.len());
        let transmitted = self.transmit(data).await;
        let idle = self.idle().await;
        let result = transmitted.and(idle).map_err(RadioError::from);

        if result.is_ok() {
            self.stats.packets.sent += 1;
            self.stats.bytes.sent += data.len() as u32;
        }
        self.record(result)
    }

    async fn transmit(&mut self, data: &[u8]) -> Result<(), DriverError> {
        let mut frame = Vec::with_capacity(data.len() + 1);
        frame.push(data.len() as u8);
        frame.extend_from_slice(data);

        self.driver.write_fifo(&frame).await?;
        self.change_state(Strobe::STX, State::TX).await?;
        self.driver
            .delay_ms(frame.len() as u32 * BYTE_DURATION_MS)
            .await;

        for _ in 0..TX_POLL_BUDGET {
            let txbytes: TxBytes = self.driver.read_status().await?;
            if txbytes.txfifo_underflow() {
                // The bytes already sent are still valid.
                warn!("TX fifo underflow");
                return Ok(());
            }
            if txbytes.num_txbytes() == 0 {
                trace!("TX fifo drained");
                return Ok(());
            }
            self.driver.delay_ms(BYTE_DURATION_MS).await;
        }

        Err(DriverError::Timeout)
    }

    /// Listen for a packet for at most `timeout`.
    ///
    /// The radio is in IDLE when this returns, so the frequency estimate of the received packet can be read.
    pub async fn receive(&mut self, timeout: Duration) -> Result<Frame, RadioError> {
        let received = self.listen(timeout).await;
        let idle = self.idle().await;

        let result = match (received, idle) {
            (Ok(raw), Ok(())) => match self.verify_frame(&raw) {
                Ok(frame) => Ok(frame),
                // The rest of a partial or corrupt frame must not end up in front of the next one.
                Err(error) => match self.driver.strobe(Strobe::SFRX).await {
                    Ok(_) => Err(error),
                    Err(flush) => Err(flush.into()),
                },
            },
            (Err(error), _) => Err(error),
            (Ok(_), Err(error)) => Err(error.into()),
        };

        match &result {
            Ok(frame) => trace!("Received {}-byte packet, RSSI {}", frame.body.len(), frame.rssi),
            Err(RadioError::ReceiveTimeout) => trace!("Receive timeout"),
            Err(error) => warn!("Receive failed: {}", error),
        }
        self.record(result)
    }

    async fn listen(&mut self, timeout: Duration) -> Result<Vec<u8>, RadioError> {
        for attempt in 0..=MAX_OVERFLOW_RETRIES {
            // Entering RX from the overflow state flushes the fifo first.
            self.change_state(Strobe::SRX, State::RX).await?;

            if self.driver.wait_for_irq(timeout).await? {
                self.wait_for_end_of_packet().await?;
            }

            let rxbytes: RxBytes = self.driver.read_status().await?;
            if rxbytes.rxfifo_overflow() {
                warn!("RX fifo overflow on attempt {}", attempt + 1);
                continue;
            }

            let count = rxbytes.num_rxbytes() as usize;
            if count == 0 {
                return Err(RadioError::ReceiveTimeout);
            }

            let mut raw = alloc::vec![0; count.min(FIFO_SIZE)];
            self.driver.read_fifo(&mut raw).await?;
            return Ok(raw);
        }

        Err(RadioError::ReceiveTimeout)
    }

    /// Poll while the sync word line is asserted, until the packet has arrived or the fifo fills up.
    async fn wait_for_end_of_packet(&mut self) -> Result<(), DriverError> {
        for _ in 0..RX_POLL_BUDGET {
            if !self.driver.irq_is_high()? {
                return Ok(());
            }

            let rxbytes: RxBytes = self.driver.read_status().await?;
            if rxbytes.rxfifo_overflow() || rxbytes.num_rxbytes() as usize >= FIFO_SIZE {
                return Ok(());
            }

            self.driver.delay_ms(BYTE_DURATION_MS).await;
        }

        trace!("Poll budget exhausted");
        Ok(())
    }

    /// Check the length byte and appended status of a raw frame and strip them.
    fn verify_frame(&mut self, raw: &[u8]) -> Result<Frame, RadioError> {
        if raw.len() < MIN_FRAME_SIZE {
            return Err(FrameError::TooShort { len: raw.len() }.into());
        }

        let declared = raw[0] as usize;
        let body = &raw[1..raw.len() - 2];
        let rssi = freq::register_to_rssi(raw[raw.len() - 2]);
        let status = AppendedStatus(raw[raw.len() - 1]);

        if !status.crc_ok() {
            return Err(FrameError::CrcMismatch { rssi }.into());
        }
        if declared != body.len() {
            return Err(FrameError::LengthMismatch {
                declared,
                actual: body.len(),
                rssi,
            }
            .into());
        }

        self.stats.packets.received += 1;
        self.stats.bytes.received += body.len() as u32;

        Ok(Frame {
            body: body.to_vec(),
            rssi,
            lqi: status.lqi(),
        })
    }

    /// Remove a frame accepted by `receive` from the statistics, after its content was found invalid.
    pub(crate) fn discard(&mut self, frame: &Frame) {
        self.stats.packets.received = self.stats.packets.received.saturating_sub(1);
        self.stats.bytes.received = self
            .stats
            .bytes
            .received
            .saturating_sub(frame.body.len() as u32);
    }
}
