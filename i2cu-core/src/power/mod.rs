//! Display power management
//!
//! - [`PowerIdleController`] fades the backlight after a period without
//!   activity
//! - [`PanelPower`] puts the panel controller to sleep once the backlight
//!   is fully off, and wakes it again

pub mod dimmer;
pub mod panel;

pub use dimmer::{PowerIdleController, PowerState};
pub use panel::{PanelError, PanelPower};
