//! UART serial communication abstractions
//!
//! The probe is a passive listener: it drains whatever has arrived on the
//! monitored line and never transmits.

/// Receive side of the monitored serial line
pub trait SerialPort {
    /// Error type for receive operations
    type Error;

    /// Number of bytes that can be read without blocking
    fn available(&mut self) -> usize;

    /// Read up to `buf.len()` already-received bytes
    ///
    /// Never blocks waiting for new data. Returns the number of bytes
    /// written into `buf`, which may be zero.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Change the line rate of the live peripheral
    fn set_baud_rate(&mut self, baud: u32);
}
