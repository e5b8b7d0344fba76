//! Board-agnostic core logic for the i2cu bus probe
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Address presence set and the lock-guarded copy shared across cores
//! - Bus scanner (sweep + publish)
//! - Serial ingest (scroll buffer, text/hex rendering)
//! - Change detection for the scanned address list
//! - Backlight dimmer and panel sleep guard
//! - Button click detection and input dispatch
//! - Persisted settings
//! - The probe application context tying it together

#![no_std]
#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod detector;
pub mod grid;
pub mod input;
pub mod power;
pub mod presence;
pub mod scanner;
pub mod serial;
pub mod settings;
pub mod shared;
pub mod traits;

pub use app::{ButtonLevels, ProbeApp, TickOutcome};
pub use config::ProbeConfig;
pub use detector::ChangeDetector;
pub use grid::{GridError, GridGeometry, TextGrid};
pub use presence::AddressPresenceSet;
pub use scanner::BusScanner;
pub use serial::{SerialBuffer, SerialIngest};
pub use settings::{BaudRate, SerialMode, Settings, SettingsError, SettingsStore};
pub use shared::SharedPresence;
pub use traits::{ProbeSource, ProbeView};
