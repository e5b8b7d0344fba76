//! RP2040-specific HAL for the i2cu bus probe
//!
//! This crate provides RP2040 implementations of the shared `i2cu-hal`
//! traits:
//!
//! - I2C address probing with per-sweep peripheral reset
//! - Buffered UART receive for the monitored serial line
//! - ST7789 panel over SPI (pixel windows + command channel)
//! - PWM backlight
//! - Button inputs
//! - Flash storage driver (implements `i2cu_hal::FlashStorage`)

#![no_std]

pub mod backlight;
pub mod flash;
pub mod gpio;
pub mod i2c;
pub mod st7789;
pub mod uart;

// Re-export shared traits from i2cu-hal for convenience
pub use i2cu_hal::{FlashStorage as FlashStorageTrait, StorageKey};
