use embedded_hal_async::delay;
use mockall::mock;

mock! {
    #[derive(Debug)]
    pub Delay {}

    impl delay::DelayNs for Delay {
        async fn delay_ns(&mut self, ns: u32);
        async fn delay_us(&mut self, us: u32);
        async fn delay_ms(&mut self, ms: u32);
    }
}

impl MockDelay {
    /// Let every delay complete immediately.
    pub fn expect_any_delay(&mut self) {
        self.expect_delay_ns().returning(|_| ());
        self.expect_delay_us().returning(|_| ());
        self.expect_delay_ms().returning(|_| ());
    }
}
