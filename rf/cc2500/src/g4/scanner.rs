use core::pin::pin;

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Sender, signal::Signal};
use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, digital::Wait, spi::SpiDevice};
use futures::future::{select, Either};

use super::{decode_packet, Channel, Reading, TransmitterId, BASE_FREQUENCY, CHANNELS};
use crate::{errors::RadioError, traits::Clock, Radio};

/// The broadcast schedule of the transmitter and the listening windows derived from it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Period between two broadcasts on channel 0.
    pub reading_interval: Duration,
    /// Delay between the broadcasts of one cycle on consecutive channels.
    pub channel_interval: Duration,
    /// How long before the predicted broadcast to start listening.
    pub wakeup_margin: Duration,
    /// Listening window while searching for the transmitter.
    pub slow_wait: Duration,
    /// Listening window on the remaining channels after a miss.
    pub fast_wait: Duration,
    /// Listening window on channel 0 once synchronized.
    pub sync_wait: Duration,
}

impl Timing {
    pub const G4: Timing = Timing {
        reading_interval: Duration::from_secs(5 * 60),
        channel_interval: Duration::from_millis(500),
        wakeup_margin: Duration::from_millis(100),
        slow_wait: Duration::from_secs(6 * 60),
        fast_wait: Duration::from_millis(550),
        sync_wait: Duration::from_millis(200),
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::G4
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScannerConfig {
    pub base_frequency: u32,
    /// Only accept packets from this transmitter.
    /// Without it the scanner cannot follow the hopping sequence and only listens on channel 0.
    pub expected_transmitter: Option<TransmitterId>,
    pub timing: Timing,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_frequency: BASE_FREQUENCY,
            expected_transmitter: None,
            timing: Timing::G4,
        }
    }
}

/// Follows the transmitter across its channels and decodes its broadcasts.
pub struct Scanner<Spi, Delay, Irq, C>
where
    Spi: SpiDevice,
    Delay: DelayNs,
    Irq: Wait + InputPin,
    C: Clock,
{
    radio: Radio<Spi, Delay, Irq>,
    clock: C,
    config: ScannerConfig,
    channels: [Channel; 4],
    in_sync: bool,
    last_reading: Option<Instant>,
}

impl<Spi, Delay, Irq, C> Scanner<Spi, Delay, Irq, C>
where
    Spi: SpiDevice,
    Delay: DelayNs,
    Irq: Wait + InputPin,
    C: Clock,
{
    pub fn new(radio: Radio<Spi, Delay, Irq>, clock: C, config: ScannerConfig) -> Self {
        Self {
            radio,
            clock,
            config,
            channels: CHANNELS,
            in_sync: false,
            last_reading: None,
        }
    }

    pub async fn init(&mut self) -> Result<(), RadioError> {
        match self.config.expected_transmitter {
            Some(id) => info!("Receiving readings from transmitter {}", id),
            None => info!("Receiving readings from any transmitter"),
        }
        self.radio.init(self.config.base_frequency).await
    }

    pub fn in_sync(&self) -> bool {
        self.in_sync
    }

    /// The channels with their learned frequency offsets.
    pub fn channels(&self) -> &[Channel; 4] {
        &self.channels
    }

    pub fn radio(&mut self) -> &mut Radio<Spi, Delay, Irq> {
        &mut self.radio
    }

    /// Listen for one broadcast cycle.
    ///
    /// Frame rejections and timeouts are logged and yield `None`.
    /// Only failures of the hardware itself are returned as errors.
    pub async fn scan(&mut self) -> Result<Option<Reading>, RadioError> {
        let timing = self.config.timing;
        let expected = self.config.expected_transmitter;
        let hopping = expected.is_some();

        let mut wait = timing.slow_wait;
        let mut reading = None;

        for n in 0..self.channels.len() {
            trace!("Listening on channel {}, in sync: {}", n, self.in_sync);
            let channel = self.channels[n];
            self.radio.set_channel(&channel).await?;

            if n == 0 && self.in_sync {
                self.sync_sleep().await;
                wait = timing.sync_wait;
            }

            let decoded = match self.radio.receive(wait).await {
                Ok(frame) => {
                    let decoded = decode_packet(n, self.clock.now(), &frame, expected);
                    if let Err(RadioError::InvalidFrame(_)) = decoded {
                        self.radio.discard(&frame);
                    }
                    decoded
                }
                Err(error) => Err(error),
            };
            match decoded {
                Ok(decoded) => reading = Some(decoded),
                Err(error) if error.is_timeout() => {}
                Err(error) if error.is_rejection() => warn!("Channel {}: {}", n, error),
                Err(error) => return Err(error),
            }
            self.radio.clear_error();

            if !hopping {
                break;
            }

            if let Some(reading) = &reading {
                if !self.in_sync {
                    info!("Synchronized on channel {}", n);
                }
                self.in_sync = true;
                let offset = timing.channel_interval * n as u32;
                self.last_reading = Some(
                    reading
                        .timestamp
                        .checked_sub(offset)
                        .unwrap_or(reading.timestamp),
                );
                self.radio.adjust_frequency(&mut self.channels[n]).await?;
                break;
            }

            wait = timing.fast_wait;
        }

        if reading.is_none() && self.in_sync {
            info!("Lost synchronization");
            self.in_sync = false;
        }

        Ok(reading)
    }

    /// Sleep until just before the next broadcast on channel 0 is due.
    async fn sync_sleep(&mut self) {
        let Some(last_reading) = self.last_reading else {
            return;
        };

        let timing = self.config.timing;
        let wakeup = last_reading + timing.reading_interval;
        let now = self.clock.now() + timing.wakeup_margin;
        if wakeup > now {
            let duration = wakeup - now;
            debug!("Sleeping for {} ms", duration.as_millis());
            let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
            self.radio.driver.delay_ms(ms).await;
        }
    }

    /// Publish the outcome of every cycle, including the cycles without a reading, until `stop` is signaled.
    ///
    /// The radio is left in IDLE when this returns.
    pub async fn run<M: RawMutex, const N: usize>(
        &mut self,
        readings: Sender<'_, M, Option<Reading>, N>,
        stop: &Signal<M, ()>,
    ) -> Result<(), RadioError> {
        loop {
            let outcome = {
                let stopped = pin!(stop.wait());
                let cycle = pin!(async {
                    let reading = self.scan().await?;
                    readings.send(reading).await;
                    Ok::<(), RadioError>(())
                });

                match select(stopped, cycle).await {
                    Either::Left(_) => None,
                    Either::Right((result, _)) => Some(result),
                }
            };

            match outcome {
                Some(Ok(())) => {}
                Some(Err(error)) => {
                    error!("Scanner failed: {}", error);
                    self.radio.idle().await.ok();
                    return Err(error);
                }
                None => {
                    info!("Scanner stopped");
                    self.radio.idle().await?;
                    return Ok(());
                }
            }
        }
    }
}
