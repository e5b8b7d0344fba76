//! Button click detection
//!
//! Turns a sampled button level into click-count and long-press events.
//! Sample once per loop tick with the current time.

use crate::config::ButtonTiming;

/// Logical button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    A,
    B,
}

/// Semantic button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// One or more short presses in quick succession
    Click(u8),
    /// Held past the long-press threshold (emitted once per press)
    LongClick,
}

/// Debounce + multi-click + long-press state machine for one button
#[derive(Debug, Clone)]
pub struct ClickDetector {
    timing: ButtonTiming,
    /// Last raw sample and when it last changed
    raw: bool,
    raw_since_ms: u32,
    /// Debounced level
    pressed: bool,
    pressed_at_ms: u32,
    long_fired: bool,
    /// Clicks collected in the current multi-click window
    clicks: u8,
    released_at_ms: u32,
}

impl ClickDetector {
    pub fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            raw: false,
            raw_since_ms: 0,
            pressed: false,
            pressed_at_ms: 0,
            long_fired: false,
            clicks: 0,
            released_at_ms: 0,
        }
    }

    /// Feed one sample; returns an event when one completes
    pub fn update(&mut self, raw_pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        if raw_pressed != self.raw {
            self.raw = raw_pressed;
            self.raw_since_ms = now_ms;
        }

        let stable_for = now_ms.wrapping_sub(self.raw_since_ms);
        if self.raw != self.pressed && stable_for >= self.timing.debounce_ms {
            self.pressed = self.raw;
            if self.pressed {
                self.pressed_at_ms = now_ms;
                self.long_fired = false;
            } else if !self.long_fired {
                self.clicks = self.clicks.saturating_add(1);
                self.released_at_ms = now_ms;
            }
        }

        if self.pressed {
            let held = now_ms.wrapping_sub(self.pressed_at_ms);
            if !self.long_fired && held >= self.timing.long_press_ms {
                self.long_fired = true;
                self.clicks = 0;
                return Some(ButtonEvent::LongClick);
            }
            return None;
        }

        if self.clicks > 0 && now_ms.wrapping_sub(self.released_at_ms) >= self.timing.multi_click_ms {
            let count = self.clicks;
            self.clicks = 0;
            return Some(ButtonEvent::Click(count));
        }
        None
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ClickDetector {
        ClickDetector::new(ButtonTiming {
            debounce_ms: 10,
            long_press_ms: 500,
            multi_click_ms: 250,
        })
    }

    /// Feed `pressed` from `from` to `to` (exclusive) in 1 ms steps
    fn hold(d: &mut ClickDetector, pressed: bool, from: u32, to: u32) -> Option<ButtonEvent> {
        let mut event = None;
        for t in from..to {
            if let Some(e) = d.update(pressed, t) {
                assert!(event.is_none(), "two events in one span");
                event = Some(e);
            }
        }
        event
    }

    #[test]
    fn test_single_click() {
        let mut d = detector();
        assert_eq!(hold(&mut d, true, 0, 100), None);
        assert!(d.is_pressed());
        assert_eq!(hold(&mut d, false, 100, 200), None);
        assert_eq!(hold(&mut d, false, 200, 400), Some(ButtonEvent::Click(1)));
    }

    #[test]
    fn test_double_click() {
        let mut d = detector();
        hold(&mut d, true, 0, 50);
        hold(&mut d, false, 50, 150);
        hold(&mut d, true, 150, 200);
        assert_eq!(hold(&mut d, false, 200, 600), Some(ButtonEvent::Click(2)));
    }

    #[test]
    fn test_long_press_fires_once() {
        let mut d = detector();
        assert_eq!(hold(&mut d, true, 0, 1500), Some(ButtonEvent::LongClick));
        assert_eq!(hold(&mut d, false, 1500, 2000), None);
    }

    #[test]
    fn test_bounce_is_filtered() {
        let mut d = detector();
        for t in 0..20 {
            d.update(t % 3 == 0, t);
        }
        assert!(!d.is_pressed());
        assert_eq!(hold(&mut d, false, 20, 400), None);
    }
}
