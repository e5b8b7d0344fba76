//! ST7789 panel driver (135x240, 4-wire SPI)
//!
//! Only what the probe needs: bring-up, windowed RGB565 writes, and raw
//! commands for sleep/wake. The 135x240 glass sits at an offset inside the
//! controller's 240x320 RAM.
//!
//! Command byte with DC low, parameters and pixel data with DC high. Pixels
//! go out big-endian.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use i2cu_hal::panel::{PanelTransport, EXIT_SLEEP};

const SWRESET: u8 = 0x01;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

/// 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

/// Pixels converted per SPI write
const PIXEL_CHUNK: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum St7789Error {
    Spi,
    Pin,
}

/// Where the visible area starts in controller RAM
#[derive(Debug, Clone, Copy)]
pub struct PanelOffset {
    pub x: u16,
    pub y: u16,
}

impl PanelOffset {
    /// 1.14" 135x240 module, portrait
    pub const PORTRAIT_135X240: Self = Self { x: 52, y: 40 };
}

pub struct St7789<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    offset: PanelOffset,
}

impl<SPI, DC, RST> St7789<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, offset: PanelOffset) -> Self {
        Self { spi, dc, rst, offset }
    }

    /// Hardware reset and bring-up; the panel ends awake with display on
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), St7789Error> {
        self.rst.set_low().map_err(|_| St7789Error::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| St7789Error::Pin)?;
        delay.delay_ms(120);

        self.command(SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(EXIT_SLEEP, &[])?;
        delay.delay_ms(120);
        self.command(COLMOD, &[COLMOD_RGB565])?;
        self.command(MADCTL, &[0x00])?;
        // The 1.14" glass needs inversion for true colors
        self.command(INVON, &[])?;
        self.command(NORON, &[])?;
        self.command(DISPON, &[])?;
        delay.delay_ms(10);
        Ok(())
    }

    /// Write `pixels` (row-major RGB565) into the given window
    pub fn write_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), St7789Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let x0 = x + self.offset.x;
        let y0 = y + self.offset.y;
        let x1 = x0 + width - 1;
        let y1 = y0 + height - 1;
        self.command(CASET, &window_params(x0, x1))?;
        self.command(RASET, &window_params(y0, y1))?;
        self.command(RAMWR, &[])?;

        self.dc.set_high().map_err(|_| St7789Error::Pin)?;
        let mut bytes = [0u8; PIXEL_CHUNK * 2];
        for chunk in pixels.chunks(PIXEL_CHUNK) {
            for (out, px) in bytes.chunks_exact_mut(2).zip(chunk) {
                out.copy_from_slice(&px.to_be_bytes());
            }
            self.spi
                .write(&bytes[..chunk.len() * 2])
                .map_err(|_| St7789Error::Spi)?;
        }
        Ok(())
    }

    fn send_command(&mut self, code: u8, params: &[u8]) -> Result<(), St7789Error> {
        self.dc.set_low().map_err(|_| St7789Error::Pin)?;
        self.spi.write(&[code]).map_err(|_| St7789Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| St7789Error::Pin)?;
            self.spi.write(params).map_err(|_| St7789Error::Spi)?;
        }
        Ok(())
    }
}

fn window_params(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

impl<SPI, DC, RST> PanelTransport for St7789<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    type Error = St7789Error;

    fn command(&mut self, code: u8, params: &[u8]) -> Result<(), St7789Error> {
        self.send_command(code, params)
    }
}
