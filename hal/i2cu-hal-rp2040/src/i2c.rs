//! I2C address probing
//!
//! The RP2040 I2C block refuses zero-length writes, so an address is probed
//! with a single-byte read instead. Devices ACK the address phase either way;
//! the byte read back is discarded. Reserved addresses are rejected by the
//! driver before touching the bus and always read as absent.
//!
//! `begin` re-applies the peripheral configuration, which disables and
//! re-enables the block. A device holding SDA low mid-sweep therefore only
//! costs the remainder of that sweep.

use embassy_embedded_hal::SetConfig;
use embedded_hal::i2c::I2c;
use i2cu_hal::i2c::BusProbe;

/// Probe bus over any embassy-rp I2C master
pub struct ProbeBus<I: SetConfig> {
    i2c: I,
    config: I::Config,
}

impl<I> ProbeBus<I>
where
    I: I2c + SetConfig,
{
    pub fn new(i2c: I, config: I::Config) -> Self {
        Self { i2c, config }
    }
}

impl<I> BusProbe for ProbeBus<I>
where
    I: I2c + SetConfig,
{
    type Error = I::ConfigError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.i2c.set_config(&self.config)
    }

    fn probe(&mut self, address: u8) -> bool {
        let mut scratch = [0u8; 1];
        self.i2c.read(address, &mut scratch).is_ok()
    }

    fn end(&mut self) {}
}
