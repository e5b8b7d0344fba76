//! Panel flush sink
//!
//! Pixel bands go out over blocking SPI, so a transfer is complete by the
//! time `flush` returns and the gate is released right away.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;

use i2cu_display::{DisplayError, FlushGate, FlushSink};
use i2cu_hal::PanelTransport;
use i2cu_hal_rp2040::st7789::{St7789, St7789Error};

pub type PanelSpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, Delay>;
pub type Panel = St7789<PanelSpi, Output<'static>, Output<'static>>;

/// Transfer-complete handshake between the sink and the screen
pub static FLUSH_GATE: FlushGate = FlushGate::new();

pub struct PanelSink {
    panel: Panel,
    gate: &'static FlushGate,
}

impl PanelSink {
    pub fn new(panel: Panel, gate: &'static FlushGate) -> Self {
        Self { panel, gate }
    }
}

impl FlushSink for PanelSink {
    fn flush(&mut self, x: u16, y: u16, width: u16, height: u16, pixels: &[u16]) -> Result<(), DisplayError> {
        self.panel
            .write_window(x, y, width, height, pixels)
            .map_err(|_| DisplayError::Communication)?;
        self.gate.mark_flush_complete();
        Ok(())
    }
}

impl PanelTransport for PanelSink {
    type Error = St7789Error;

    fn command(&mut self, code: u8, params: &[u8]) -> Result<(), St7789Error> {
        self.panel.command(code, params)
    }
}
