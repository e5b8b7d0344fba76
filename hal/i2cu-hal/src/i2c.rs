//! I2C bus abstractions
//!
//! The probe only ever asks one question of the bus: "does anything
//! acknowledge this address?". The trait is shaped around a sweep:
//! `begin`, a run of `probe` calls, then `end`.

/// Highest address probed by a sweep (exclusive)
pub const PROBE_ADDRESS_END: u8 = 127;

/// I2C master used for address probing
pub trait BusProbe {
    /// Error type for (re)initializing the bus
    type Error;

    /// (Re)initialize the peripheral
    ///
    /// Called at the top of every sweep so a bus left in a bad state by a
    /// misbehaving device gets reset before the next pass.
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Probe a single 7-bit address
    ///
    /// Implementations issue a zero-length write, or the closest
    /// transaction the peripheral can generate. Returns `true` if the
    /// address acknowledged. A NACK or any other bus error is `false`.
    fn probe(&mut self, address: u8) -> bool;

    /// Release the peripheral after a sweep
    fn end(&mut self);
}
