mod delay;
mod digital;
mod spi;

pub use delay::MockDelay;
pub use digital::{MockIrqPin, PinError};
pub use spi::{MockOperation, MockSpiDevice, SpiError};
