use core::pin::pin;

use embassy_time::Duration;
use embedded_hal::digital::{self, InputPin};
use embedded_hal_async::{
    delay::DelayNs,
    digital::Wait,
    spi::{Operation, SpiDevice},
};
use futures::future::{select, Either};

use crate::{
    errors::DriverError,
    opcode::{Opcode, Strobe},
    regs::{
        Marcstate, MarcStateValue, Register, RegisterAddress, StatusRegister, StatusRegisterValue,
    },
    statusbyte::StatusByte,
    PartNumber, FIFO_SIZE,
};

/// Number of entries in the power amplifier table.
pub const PA_TABLE_SIZE: usize = 8;

const PARTNUM_CC2500: u8 = 0x80;

/// Register level access to the chip over spi, plus the interrupt line wired to one of the GDO pins.
pub struct Driver<Spi, Delay, Irq>
where
    Spi: SpiDevice,
    Delay: DelayNs,
    Irq: Wait + InputPin,
{
    spi: Spi,
    delay: Delay,
    irq: Irq,
    last_status: Option<StatusByte>,
}

impl<Spi, Delay, Irq> Driver<Spi, Delay, Irq>
where
    Spi: SpiDevice,
    Delay: DelayNs,
    Irq: Wait + InputPin,
{
    pub fn new(spi: Spi, delay: Delay, irq: Irq) -> Self {
        Self {
            spi,
            delay,
            irq,
            last_status: None,
        }
    }

    /// Get the spi status returned by the last register read or strobe.
    /// Writing registers does not update status.
    pub fn last_status(&self) -> Option<StatusByte> {
        self.last_status
    }

    /// Reset the chip with the SRES strobe.
    pub async fn reset(&mut self) -> Result<(), DriverError> {
        self.strobe(Strobe::SRES).await?;
        // The crystal must restart before the chip accepts new commands.
        self.delay.delay_ms(1).await;
        self.last_status = None;
        Ok(())
    }

    /// Read the chip part number.
    /// This action _does_ update `last_status`.
    pub async fn read_part_number(&mut self) -> Result<Option<PartNumber>, DriverError> {
        match self.read_status_reg(StatusRegister::PARTNUM).await? {
            PARTNUM_CC2500 => Ok(Some(PartNumber::Cc2500)),
            _ => Ok(None),
        }
    }

    /// Read the chip version.
    /// This action _does_ update `last_status`.
    pub async fn read_version(&mut self) -> Result<u8, DriverError> {
        self.read_status_reg(StatusRegister::VERSION).await
    }

    /// Read the main radio control state machine state.
    pub async fn read_marc_state(&mut self) -> Result<Option<MarcStateValue>, DriverError> {
        let marcstate: Marcstate = self.read_status().await?;
        Ok(marcstate.marc_state())
    }

    /// Read a single register value from chip.
    /// This action _does_ update `last_status`.
    pub async fn read_reg(&mut self, address: RegisterAddress) -> Result<u8, DriverError> {
        let tx = [Opcode::read(address, false).as_u8(), 0];
        let mut rx = [0; 2];

        self.spi
            .transaction(&mut [Operation::Transfer(&mut rx, &tx)])
            .await?;
        self.last_status = Some(StatusByte::from(rx[0]));

        Ok(rx[1])
    }

    /// Read a sequence of register values from chip.
    /// This action _does_ update `last_status`.
    pub async fn read_regs(
        &mut self,
        first: RegisterAddress,
        buffer: &mut [u8],
    ) -> Result<(), DriverError> {
        let header = [Opcode::read(first, buffer.len() > 1).as_u8()];
        let mut status = [0];

        self.spi
            .transaction(&mut [
                Operation::Transfer(&mut status, &header),
                Operation::Read(buffer),
            ])
            .await?;
        self.last_status = Some(StatusByte::from(status[0]));

        Ok(())
    }

    /// Read a typed register.
    pub async fn read<R: Register>(&mut self) -> Result<R, DriverError> {
        self.read_reg(R::ADDRESS).await.map(R::from)
    }

    /// Write a single register value to chip.
    /// This action _does not_ update `last_status`.
    pub async fn write_reg(&mut self, address: RegisterAddress, value: u8) -> Result<(), DriverError> {
        let tx = [Opcode::write(address, false).as_u8(), value];

        self.spi.transaction(&mut [Operation::Write(&tx)]).await?;
        self.last_status = None;

        Ok(())
    }

    /// Write a sequence of register values to chip.
    /// This action _does not_ update `last_status`.
    pub async fn write_regs(
        &mut self,
        first: RegisterAddress,
        values: &[u8],
    ) -> Result<(), DriverError> {
        let header = [Opcode::write(first, values.len() > 1).as_u8()];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(values)])
            .await?;
        self.last_status = None;

        Ok(())
    }

    /// Write a typed register.
    pub async fn write<R: Register>(&mut self, value: R) -> Result<(), DriverError> {
        self.write_reg(R::ADDRESS, value.into()).await
    }

    /// Read a status register.
    /// This action _does_ update `last_status`.
    pub async fn read_status_reg(&mut self, register: StatusRegister) -> Result<u8, DriverError> {
        let tx = [Opcode::ReadStatus(register).as_u8(), 0];
        let mut rx = [0; 2];

        self.spi
            .transaction(&mut [Operation::Transfer(&mut rx, &tx)])
            .await?;
        self.last_status = Some(StatusByte::from(rx[0]));

        Ok(rx[1])
    }

    /// Read a typed status register.
    pub async fn read_status<R: StatusRegisterValue>(&mut self) -> Result<R, DriverError> {
        self.read_status_reg(R::REGISTER).await.map(R::from)
    }

    /// Strobe a command to the chip and return the status byte clocked out with it.
    /// This action _does_ update `last_status`.
    pub async fn strobe(&mut self, strobe: Strobe) -> Result<StatusByte, DriverError> {
        let tx = [Opcode::Strobe(strobe).as_u8()];
        let mut rx = [0];

        self.spi
            .transaction(&mut [Operation::Transfer(&mut rx, &tx)])
            .await?;
        let status = StatusByte::from(rx[0]);
        self.last_status = Some(status);

        Ok(status)
    }

    /// Read from the RX fifo.
    /// This action _does_ update `last_status`.
    pub async fn read_fifo(&mut self, buffer: &mut [u8]) -> Result<(), DriverError> {
        assert!(buffer.len() <= FIFO_SIZE);

        let header = [Opcode::ReadFifoBurst.as_u8()];
        let mut status = [0];

        self.spi
            .transaction(&mut [
                Operation::Transfer(&mut status, &header),
                Operation::Read(buffer),
            ])
            .await?;
        self.last_status = Some(StatusByte::from(status[0]));

        Ok(())
    }

    /// Write to the TX fifo.
    /// This action _does_ update `last_status`.
    pub async fn write_fifo(&mut self, buffer: &[u8]) -> Result<(), DriverError> {
        assert!(buffer.len() <= FIFO_SIZE);

        let header = [Opcode::WriteFifoBurst.as_u8()];
        let mut status = [0];

        self.spi
            .transaction(&mut [
                Operation::Transfer(&mut status, &header),
                Operation::Write(buffer),
            ])
            .await?;
        self.last_status = Some(StatusByte::from(status[0]));

        Ok(())
    }

    /// Read the power amplifier table, starting at entry 0.
    pub async fn read_pa_table(&mut self, buffer: &mut [u8]) -> Result<(), DriverError> {
        assert!(buffer.len() <= PA_TABLE_SIZE);

        let header = [Opcode::ReadPaTableBurst.as_u8()];
        let mut status = [0];

        self.spi
            .transaction(&mut [
                Operation::Transfer(&mut status, &header),
                Operation::Read(buffer),
            ])
            .await?;
        self.last_status = Some(StatusByte::from(status[0]));

        Ok(())
    }

    /// Write the power amplifier table, starting at entry 0.
    pub async fn write_pa_table(&mut self, values: &[u8]) -> Result<(), DriverError> {
        assert!(values.len() <= PA_TABLE_SIZE);

        let header = [Opcode::WritePaTableBurst.as_u8()];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(values)])
            .await?;
        self.last_status = None;

        Ok(())
    }

    /// Wait for the interrupt line to go high.
    /// Returns false if `timeout` expired first.
    pub async fn wait_for_irq(&mut self, timeout: Duration) -> Result<bool, DriverError> {
        let ms = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);

        let asserted = pin!(self.irq.wait_for_high());
        let expired = pin!(self.delay.delay_ms(ms));

        match select(asserted, expired).await {
            Either::Left((result, _)) => result.map(|_| true).map_err(pin_error),
            Either::Right(_) => Ok(false),
        }
    }

    /// Sample the interrupt line.
    pub fn irq_is_high(&mut self) -> Result<bool, DriverError> {
        self.irq.is_high().map_err(pin_error)
    }

    /// Sleep for `ms` milliseconds.
    pub async fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }
}

fn pin_error<E: digital::Error>(error: E) -> DriverError {
    DriverError::Pin(error.kind())
}
