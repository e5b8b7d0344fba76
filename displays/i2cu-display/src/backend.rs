//! Display sink trait
//!
//! Defines the interface between the screen and the panel driver.

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel
    Communication,
    /// Region outside the panel
    InvalidCoordinates,
    /// A required buffer is too small for the panel
    BufferTooSmall,
}

/// Receives finished pixel bands
///
/// `pixels` holds `width * height` RGB565 values in row-major order for the
/// window at (`x`, `y`). The transfer may complete asynchronously; whoever
/// completes it must call [`FlushGate::mark_flush_complete`]. The buffer
/// must not be read after that call.
///
/// [`FlushGate::mark_flush_complete`]: crate::FlushGate::mark_flush_complete
pub trait FlushSink {
    fn flush(&mut self, x: u16, y: u16, width: u16, height: u16, pixels: &[u16]) -> Result<(), DisplayError>;
}
