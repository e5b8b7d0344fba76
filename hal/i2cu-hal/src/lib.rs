//! i2cu Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the bus probe logic is
//! written against. Chip-specific crates (currently RP2040) implement them,
//! and host tests implement them with simple mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (i2cu-firmware)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  i2cu-core / i2cu-display               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  i2cu-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ i2cu-hal-     │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Button inputs
//! - [`uart::SerialPort`] - Monitored serial line
//! - [`i2c::BusProbe`] - I2C address probing
//! - [`panel::PanelTransport`], [`panel::Backlight`] - LCD panel control
//! - [`flash::FlashStorage`] - Persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod i2c;
pub mod panel;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::InputPin;
pub use i2c::BusProbe;
pub use panel::{Backlight, PanelTransport};
pub use uart::SerialPort;
