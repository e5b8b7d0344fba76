//! Compile-time probe configuration
//!
//! Timing constants for the scanner, dimmer, overlay and button handling.
//! Pin assignments live with the board code in the firmware crate.

/// Delay between two bus sweeps
pub const SCAN_INTERVAL_MS: u32 = 1000;

/// How long a status overlay stays on screen
pub const OVERLAY_DURATION_MS: u32 = 1000;

/// Idle time before the backlight starts dimming
pub const DIM_TIMEOUT_MS: u32 = 5000;

/// Time for the backlight to fade from full to off once dimming starts
pub const FADE_DURATION_MS: u32 = 1000;

/// Button debounce interval
pub const DEBOUNCE_MS: u32 = 10;

/// Hold time after which a press counts as a long press
pub const LONG_PRESS_MS: u32 = 500;

/// Window after a release in which another press extends a multi-click
pub const MULTI_CLICK_MS: u32 = 250;

/// Probe timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeConfig {
    /// Delay between bus sweeps (ms)
    pub scan_interval_ms: u32,
    /// Overlay visibility (ms)
    pub overlay_ms: u32,
    /// Idle time before dimming (ms)
    pub dim_timeout_ms: u32,
    /// Fade duration (ms)
    pub fade_ms: u32,
    /// Button timings
    pub buttons: ButtonTiming,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: SCAN_INTERVAL_MS,
            overlay_ms: OVERLAY_DURATION_MS,
            dim_timeout_ms: DIM_TIMEOUT_MS,
            fade_ms: FADE_DURATION_MS,
            buttons: ButtonTiming::default(),
        }
    }
}

/// Button click detection timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonTiming {
    /// Minimum stable time before a level change is accepted (ms)
    pub debounce_ms: u32,
    /// Hold time for a long press (ms)
    pub long_press_ms: u32,
    /// Multi-click window (ms)
    pub multi_click_ms: u32,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            long_press_ms: LONG_PRESS_MS,
            multi_click_ms: MULTI_CLICK_MS,
        }
    }
}
