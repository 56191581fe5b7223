use embedded_hal::digital::{self, InputPin};
use embedded_hal_async::digital::Wait;
use mockall::mock;

#[derive(Debug, Clone, Copy)]
pub struct PinError;

impl digital::Error for PinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

mock! {
    #[derive(Debug)]
    pub IrqPin {}

    impl digital::ErrorType for IrqPin {
        type Error = PinError;
    }

    impl InputPin for IrqPin {
        fn is_high(&mut self) -> Result<bool, PinError>;
        fn is_low(&mut self) -> Result<bool, PinError>;
    }

    impl Wait for IrqPin {
        async fn wait_for_high(&mut self) -> Result<(), PinError>;
        async fn wait_for_low(&mut self) -> Result<(), PinError>;
        async fn wait_for_rising_edge(&mut self) -> Result<(), PinError>;
        async fn wait_for_falling_edge(&mut self) -> Result<(), PinError>;
        async fn wait_for_any_edge(&mut self) -> Result<(), PinError>;
    }
}
