//! Board definition
//!
//! Raspberry Pi Pico with a 1.14" 135x240 ST7789 LCD module and two keys.
//!
//! | Function        | GPIO | Peripheral      |
//! |-----------------|------|-----------------|
//! | Probed bus SDA  | 4    | I2C0            |
//! | Probed bus SCL  | 5    | I2C0            |
//! | Monitored RX    | 1    | UART0           |
//! | LCD DC          | 8    | -               |
//! | LCD CS          | 9    | -               |
//! | LCD CLK         | 10   | SPI1            |
//! | LCD DIN         | 11   | SPI1            |
//! | LCD RST         | 12   | -               |
//! | LCD backlight   | 13   | PWM slice 6 (B) |
//! | Key A           | 15   | pull-up         |
//! | Key B           | 17   | pull-up         |

use i2cu_core::GridGeometry;
use i2cu_display::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Probed bus clock (standard mode)
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// Panel SPI clock
pub const SPI_FREQUENCY_HZ: u32 = 62_500_000;

/// UART receive ring buffer
pub const UART_RX_BUFFER: usize = 256;

/// Framebuffer size in pixels
pub const FRAMEBUFFER_PIXELS: usize = SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize;

/// Rows per flush band
pub const TRANSFER_ROWS: usize = 24;

/// Transfer buffer size in pixels
pub const TRANSFER_PIXELS: usize = SCREEN_WIDTH as usize * TRANSFER_ROWS;

/// Text grid storage; 17 rows of 15 characters, each with a newline slot
pub const GRID_STORAGE: usize = 272;

/// Serial scroll buffer storage; covers columns x rows of the label grid
pub const SERIAL_STORAGE: usize = 256;

/// Main loop period
pub const TICK_MS: u64 = 1;

/// Core 1 stack
pub const CORE1_STACK_SIZE: usize = 4096;

/// Check that the storage sizes above cover `geometry`
pub fn storage_covers(geometry: GridGeometry) -> bool {
    geometry.text_capacity() <= GRID_STORAGE && geometry.cells() <= SERIAL_STORAGE
}
