//! Cross-core shared state
//!
//! The only state both cores touch is the latest sweep result.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use i2cu_core::SharedPresence;

/// Written by the scanner on core 1, read by the probe loop on core 0
pub static SHARED_PRESENCE: SharedPresence<CriticalSectionRawMutex> = SharedPresence::new();
