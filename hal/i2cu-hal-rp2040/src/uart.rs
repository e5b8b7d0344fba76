//! Monitored serial line
//!
//! Receive-only buffered UART. The interrupt handler fills the ring buffer;
//! the probe loop drains it without ever waiting for new bytes.

use embassy_rp::uart::BufferedUartRx;
use embedded_io::{Read, ReadReady};
use i2cu_hal::uart::SerialPort;

/// Receive side of the probed UART
pub struct ProbeUart {
    rx: BufferedUartRx,
    /// Ring buffer size, reported as the upper bound of pending bytes
    capacity: usize,
}

impl ProbeUart {
    /// `capacity` is the size of the ring buffer handed to `rx`
    pub fn new(rx: BufferedUartRx, capacity: usize) -> Self {
        Self { rx, capacity }
    }
}

impl SerialPort for ProbeUart {
    type Error = embassy_rp::uart::Error;

    fn available(&mut self) -> usize {
        // The driver exposes "something pending", not a count
        match self.rx.read_ready() {
            Ok(true) => self.capacity,
            _ => 0,
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.rx.read_ready()? {
            return Ok(0);
        }
        self.rx.read(buf)
    }

    fn set_baud_rate(&mut self, baud: u32) {
        self.rx.set_baudrate(baud);
    }
}
