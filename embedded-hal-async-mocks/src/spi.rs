use embedded_hal_async::spi::{self, Operation};
use mockall::mock;

#[derive(Debug, Clone, Copy)]
pub struct SpiError;

impl spi::Error for SpiError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

/// An owned description of a single operation within an expected transaction.
///
/// `write` is what the driver is expected to clock out, `read` is what the mock clocks back in.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    Read(Vec<u8>),
    Write(Vec<u8>),
    Transfer { read: Vec<u8>, write: Vec<u8> },
    TransferInPlace { read: Vec<u8>, write: Vec<u8> },
}

mock! {
    #[derive(Debug)]
    pub SpiDevice {}

    impl spi::ErrorType for SpiDevice {
        type Error = SpiError;
    }

    impl spi::SpiDevice<u8> for SpiDevice {
        async fn transaction<'a>(&mut self, operations: &mut [Operation<'a, u8>]) -> Result<(), SpiError>;
    }
}

impl MockSpiDevice {
    pub fn expect_transaction_operations(&mut self, expected: Vec<MockOperation>) {
        let matcher = expected.clone();
        self.expect_transaction()
            .withf(move |transaction| {
                if transaction.len() != matcher.len() {
                    return false;
                }
                for (actual, expected) in transaction.iter().zip(&matcher) {
                    if !Self::is_match(actual, expected) {
                        return false;
                    }
                }

                true
            })
            .returning(move |transaction| {
                for (dest, src) in transaction.iter_mut().zip(&expected) {
                    Self::assign(dest, src);
                }
                Ok(())
            })
            .times(1);
    }

    fn is_match(x: &Operation<'_, u8>, y: &MockOperation) -> bool {
        match (x, y) {
            (Operation::Read(x), MockOperation::Read(y)) => x.len() == y.len(),
            (Operation::Write(x), MockOperation::Write(y)) => *x == y.as_slice(),
            (Operation::Transfer(read, write), MockOperation::Transfer { read: y, write: w }) => {
                read.len() == y.len() && *write == w.as_slice()
            }
            (Operation::TransferInPlace(x), MockOperation::TransferInPlace { write, .. }) => {
                *x == write.as_slice()
            }
            _ => false,
        }
    }

    fn assign(dest: &mut Operation<'_, u8>, src: &MockOperation) {
        match (dest, src) {
            (Operation::Read(dest), MockOperation::Read(src)) => dest.copy_from_slice(src),
            (Operation::Transfer(dest, _), MockOperation::Transfer { read, .. }) => {
                dest.copy_from_slice(read)
            }
            (Operation::TransferInPlace(dest), MockOperation::TransferInPlace { read, .. }) => {
                dest.copy_from_slice(read)
            }
            _ => {}
        }
    }
}
