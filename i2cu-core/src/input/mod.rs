//! Button input
//!
//! Raw button levels go through a [`ClickDetector`] per button, the
//! resulting events through [`dispatch`]. Status messages raised by a
//! button action are timed by an [`OverlayTimer`].

pub mod click;
pub mod dispatcher;
pub mod overlay;

pub use click::{ButtonEvent, ButtonId, ClickDetector};
pub use dispatcher::{dispatch, Response};
pub use overlay::{Overlay, OverlayTimer};
