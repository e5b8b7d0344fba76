//! Button event dispatch
//!
//! | Button | Event       | Dimmed                   | Awake                       |
//! |--------|-------------|--------------------------|-----------------------------|
//! | A      | `Click(n)`  | wake, then toggle `n-1`  | toggle mode by parity of `n`|
//! | A      | `LongClick` | wake only                | next baud rate              |
//! | B      | any         | wake only                | wake only                   |
//!
//! Every event resets the idle timer. The dispatcher only decides; the
//! caller applies the [`Response`] to the hardware and the view.

use super::click::{ButtonEvent, ButtonId};
use super::overlay::Overlay;
use crate::settings::{BaudRate, Settings};

/// What the caller must do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Restart the idle timer and wake the panel
    pub wake: bool,
    /// Overlay to show
    pub overlay: Option<Overlay>,
    /// New rate for the live serial port
    pub baud: Option<BaudRate>,
    /// Settings changed and should be stored
    pub persist: bool,
    /// Redraw immediately
    pub refresh: bool,
}

impl Response {
    fn wake_only() -> Self {
        Self {
            wake: true,
            ..Self::default()
        }
    }
}

/// Apply `event` from `button` to `settings`
///
/// `dimmed` is the dimmer state before the event; a dimmed click spends
/// one click on waking the display.
pub fn dispatch(settings: &mut Settings, dimmed: bool, button: ButtonId, event: ButtonEvent) -> Response {
    match (button, event) {
        (ButtonId::A, ButtonEvent::Click(count)) => {
            let clicks = if dimmed { count.saturating_sub(1) } else { count };
            let before = settings.mode();
            let mode = settings.toggle_mode(clicks);
            Response {
                wake: true,
                overlay: Some(Overlay::Mode(mode)),
                baud: None,
                persist: mode != before,
                refresh: true,
            }
        }
        (ButtonId::A, ButtonEvent::LongClick) if dimmed => Response::wake_only(),
        (ButtonId::A, ButtonEvent::LongClick) => {
            let baud = settings.advance_baud();
            Response {
                wake: true,
                overlay: Some(Overlay::Baud(baud)),
                baud: Some(baud),
                persist: true,
                refresh: true,
            }
        }
        (ButtonId::B, _) => Response::wake_only(),
    }
}
