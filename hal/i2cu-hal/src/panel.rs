//! LCD panel abstractions
//!
//! Pixel transfer is owned by the display crate. What remains here is the
//! low-level command channel (used for sleep/wake) and the backlight.

/// Panel controller command: enter sleep mode (SLPIN)
pub const ENTER_SLEEP: u8 = 0x10;

/// Panel controller command: exit sleep mode (SLPOUT)
pub const EXIT_SLEEP: u8 = 0x11;

/// Settle time after `ENTER_SLEEP` before the panel accepts new commands
pub const ENTER_SLEEP_SETTLE_MS: u32 = 5;

/// Settle time after `EXIT_SLEEP` before the panel is ready
pub const EXIT_SLEEP_SETTLE_MS: u32 = 120;

/// Command channel to the panel controller
pub trait PanelTransport {
    /// Error type for transport operations
    type Error;

    /// Send a command code followed by its parameter bytes
    fn command(&mut self, code: u8, params: &[u8]) -> Result<(), Self::Error>;
}

/// Backlight brightness control
pub trait Backlight {
    /// Set the brightness (0 = off, 255 = full)
    fn set_level(&mut self, level: u8);
}
