//! Persisted settings
//!
//! Board constants live in `crate::board`; the only runtime configuration
//! is the baud rate and serial display mode stored in flash.

pub mod settings;

pub use settings::{load_settings, save_settings, Store};
