use embedded_hal::digital::InputPin;
use embedded_hal_async::{delay::DelayNs, digital::Wait, spi::SpiDevice};

use crate::{
    config::{RfConfiguration, G4_PA_TABLE},
    errors::{DriverError, RadioError},
    freq,
    g4::Channel,
    opcode::Strobe,
    regs::{FreqEst, Mdmcfg1, Mdmcfg4, RegisterAddress, StatusRegister},
    statusbyte::State,
    Driver, PartNumber, Rssi,
};

/// Maximum number of strobes issued while waiting for a state transition.
const MAX_STATE_STROBES: usize = 256;

/// Packet and byte counters for one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Counts {
    pub sent: u32,
    pub received: u32,
}

/// Cumulative traffic counters of a radio.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    pub packets: Counts,
    pub bytes: Counts,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelParams {
    /// Receiver channel filter bandwidth in Hz.
    pub bandwidth: u32,
    /// Data rate in Baud.
    pub data_rate: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig {
    pub fec: bool,
    /// Minimum number of preamble bytes transmitted.
    pub min_preamble: u8,
    /// Channel spacing in Hz.
    pub channel_spacing: u32,
}

/// A transceiver driven through its main radio control state machine.
pub struct Radio<Spi, Delay, Irq>
where
    Spi: SpiDevice,
    Delay: DelayNs,
    Irq: Wait + InputPin,
{
    pub driver: Driver<Spi, Delay, Irq>,
    pub(crate) stats: Statistics,
    last_error: Option<RadioError>,
}

impl<Spi, Delay, Irq> Radio<Spi, Delay, Irq>
where
    Spi: SpiDevice,
    Delay: DelayNs,
    Irq: Wait + InputPin,
{
    pub fn new(driver: Driver<Spi, Delay, Irq>) -> Self {
        Self {
            driver,
            stats: Statistics::default(),
            last_error: None,
        }
    }

    /// Reset the chip, load the G4 receive configuration for `frequency`, and enter IDLE.
    pub async fn init(&mut self, frequency: u32) -> Result<(), RadioError> {
        check_frequency(frequency)?;

        self.driver.reset().await?;
        match self.driver.read_part_number().await? {
            Some(PartNumber::Cc2500) => {}
            None => warn!("Unexpected part number"),
        }

        self.write_configuration(&RfConfiguration::g4(frequency))
            .await?;
        self.driver.write_pa_table(&[G4_PA_TABLE]).await?;
        self.idle().await?;

        info!("Radio initialized at {} Hz", frequency);
        Ok(())
    }

    pub async fn read_configuration(&mut self) -> Result<RfConfiguration, DriverError> {
        let mut bytes = [0; RegisterAddress::COUNT];
        self.driver
            .read_regs(RegisterAddress::MIN, &mut bytes)
            .await?;
        Ok(RfConfiguration::from_bytes(&bytes))
    }

    pub async fn write_configuration(&mut self, config: &RfConfiguration) -> Result<(), DriverError> {
        self.driver
            .write_regs(RegisterAddress::MIN, &config.as_bytes())
            .await
    }

    /// The carrier frequency in Hz.
    pub async fn frequency(&mut self) -> Result<u32, DriverError> {
        let mut regs = [0; 3];
        self.driver
            .read_regs(RegisterAddress::FREQ2, &mut regs)
            .await?;
        Ok(freq::registers_to_frequency(regs))
    }

    pub async fn set_frequency(&mut self, frequency: u32) -> Result<(), RadioError> {
        check_frequency(frequency)?;
        self.driver
            .write_regs(
                RegisterAddress::FREQ2,
                &freq::frequency_to_registers(frequency),
            )
            .await?;
        Ok(())
    }

    /// The intermediate frequency in Hz.
    pub async fn read_if(&mut self) -> Result<u32, DriverError> {
        let freq_if = self.driver.read_reg(RegisterAddress::FSCTRL1).await?;
        Ok(freq::intermediate_frequency(freq_if & 0x1F))
    }

    pub async fn read_channel_params(&mut self) -> Result<ChannelParams, DriverError> {
        let mdmcfg4: Mdmcfg4 = self.driver.read().await?;
        let drate_m = self.driver.read_reg(RegisterAddress::MDMCFG3).await?;
        Ok(ChannelParams {
            bandwidth: freq::channel_bandwidth(mdmcfg4.chanbw_e(), mdmcfg4.chanbw_m()),
            data_rate: freq::data_rate(mdmcfg4.drate_e(), drate_m),
        })
    }

    pub async fn read_modem_config(&mut self) -> Result<ModemConfig, DriverError> {
        let mdmcfg1: Mdmcfg1 = self.driver.read().await?;
        let chanspc_m = self.driver.read_reg(RegisterAddress::MDMCFG0).await?;
        Ok(ModemConfig {
            fec: mdmcfg1.fec_en(),
            min_preamble: mdmcfg1.num_preamble(),
            channel_spacing: freq::channel_spacing(mdmcfg1.chanspc_e(), chanspc_m),
        })
    }

    /// The current signal strength in dBm.
    pub async fn read_rssi(&mut self) -> Result<Rssi, DriverError> {
        let rssi = self.driver.read_status_reg(StatusRegister::RSSI).await?;
        Ok(freq::register_to_rssi(rssi))
    }

    pub async fn read_pa_table(&mut self) -> Result<[u8; 8], DriverError> {
        let mut table = [0; 8];
        self.driver.read_pa_table(&mut table).await?;
        Ok(table)
    }

    /// Read the state from the status byte of a no-op strobe.
    pub async fn read_state(&mut self) -> Result<State, DriverError> {
        Ok(self.driver.strobe(Strobe::SNOP).await?.state())
    }

    /// Issue `strobe` until the chip reports the `desired` state.
    /// FIFO overflow and underflow are flushed on the way.
    pub async fn change_state(&mut self, strobe: Strobe, desired: State) -> Result<(), DriverError> {
        let mut state = self.read_state().await?;
        if state == desired {
            return Ok(());
        }

        trace!("Change from {:?} to {:?}", state, desired);
        for _ in 0..MAX_STATE_STROBES {
            let command = match state {
                State::RXFIFO_OVERFLOW => Strobe::SFRX,
                State::TXFIFO_UNDERFLOW => Strobe::SFTX,
                _ => strobe,
            };
            state = self.driver.strobe(command).await?.state();
            trace!("  {:?}", state);
            if state == desired {
                return Ok(());
            }
        }

        error!("Stuck in {:?} while changing to {:?}", state, desired);
        Err(DriverError::Timeout)
    }

    pub async fn idle(&mut self) -> Result<(), DriverError> {
        self.change_state(Strobe::SIDLE, State::IDLE).await
    }

    /// Tune to `channel` and apply its learned frequency offset.
    pub async fn set_channel(&mut self, channel: &Channel) -> Result<(), DriverError> {
        debug!("Changing to channel {}", channel.number);
        self.driver
            .write_reg(RegisterAddress::CHANNR, channel.number)
            .await?;
        self.driver
            .write_reg(RegisterAddress::FSCTRL0, channel.offset)
            .await
    }

    /// Fold the frequency error estimated for the last received packet into the offset of `channel`.
    /// The chip must be in IDLE for the estimate to be meaningful.
    pub async fn adjust_frequency(&mut self, channel: &mut Channel) -> Result<(), DriverError> {
        let estimate: FreqEst = self.driver.read_status().await?;
        let offset = self.driver.read_reg(RegisterAddress::FSCTRL0).await?;

        channel.offset = offset.wrapping_add(estimate.0);
        self.driver
            .write_reg(RegisterAddress::FSCTRL0, channel.offset)
            .await?;

        debug!(
            "FREQEST {} Hz, FSCTRL0 {} Hz, new offset {} Hz",
            freq::register_to_frequency_offset(estimate.0),
            freq::register_to_frequency_offset(offset),
            freq::register_to_frequency_offset(channel.offset)
        );
        Ok(())
    }

    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// The error of the most recent failed send or receive.
    pub fn last_error(&self) -> Option<RadioError> {
        self.last_error
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn record<T>(&mut self, result: Result<T, RadioError>) -> Result<T, RadioError> {
        if let Err(error) = &result {
            self.last_error = Some(*error);
        }
        result
    }
}

fn check_frequency(frequency: u32) -> Result<(), RadioError> {
    if freq::FREQUENCY_RANGE.contains(&frequency) {
        Ok(())
    } else {
        Err(RadioError::FrequencyOutOfRange(frequency))
    }
}
