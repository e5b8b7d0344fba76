//! Transient status overlay
//!
//! A button action shows a two-line message (title + value) for a fixed
//! time. Only the "shown at" timestamp is kept; the message text lives in
//! the view.

use core::fmt::Write;

use heapless::String;

use crate::settings::{BaudRate, SerialMode};

/// Message shown over the probe text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overlay {
    Mode(SerialMode),
    Baud(BaudRate),
}

impl Overlay {
    pub fn title(&self) -> &'static str {
        match self {
            Overlay::Mode(_) => "[ mode ]",
            Overlay::Baud(_) => "[ baud ]",
        }
    }

    /// Second line: mode label or decimal baud rate
    pub fn value(&self) -> String<12> {
        let mut text = String::new();
        match self {
            Overlay::Mode(mode) => {
                let _ = text.push_str(mode.label());
            }
            Overlay::Baud(baud) => {
                let _ = write!(text, "{}", baud.bps());
            }
        }
        text
    }
}

/// When the current overlay was shown
#[derive(Debug, Clone, Copy)]
pub struct OverlayTimer {
    duration_ms: u32,
    shown_at_ms: Option<u32>,
}

impl OverlayTimer {
    pub const fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            shown_at_ms: None,
        }
    }

    /// (Re)start the timer
    pub fn show(&mut self, now_ms: u32) {
        self.shown_at_ms = Some(now_ms);
    }

    /// Visible while `now < shown_at + duration`
    pub fn is_visible(&self, now_ms: u32) -> bool {
        match self.shown_at_ms {
            Some(t) => now_ms.wrapping_sub(t) < self.duration_ms,
            None => false,
        }
    }

    /// Returns `true` once, on the first call after the overlay expired
    pub fn take_expired(&mut self, now_ms: u32) -> bool {
        if self.shown_at_ms.is_some() && !self.is_visible(now_ms) {
            self.shown_at_ms = None;
            return true;
        }
        false
    }
}
