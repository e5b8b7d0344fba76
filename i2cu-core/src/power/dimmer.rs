//! Backlight idle dimmer
//!
//! Brightness stays at full for `dim_timeout_ms` of inactivity, then ramps
//! linearly to zero over `fade_ms`. Any activity calls [`wake`], which
//! restores full brightness and restarts the idle timer.
//!
//! ```text
//!  255 ─────────────┐
//!                    ╲
//!                     ╲
//!    0                 └──────────
//!      Active    │Dimming│ Faded
//!            dim_timeout  +fade
//! ```
//!
//! [`wake`]: PowerIdleController::wake

use i2cu_hal::panel::Backlight;

use crate::config::ProbeConfig;

/// Full backlight level
pub const FULL_BRIGHTNESS: u8 = 255;

/// Where the dimmer is on its idle curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Full brightness
    Active,
    /// Fading out
    Dimming,
    /// Backlight off, panel may sleep
    Faded,
}

/// Idle-driven backlight controller
pub struct PowerIdleController<L: Backlight> {
    backlight: L,
    dim_timeout_ms: u32,
    fade_ms: u32,
    idle_ms: u32,
    /// Timestamp of the previous update; `None` right after a wake
    last_update_ms: Option<u32>,
    brightness: u8,
}

impl<L: Backlight> PowerIdleController<L> {
    /// Create a controller and switch the backlight fully on
    pub fn new(mut backlight: L, dim_timeout_ms: u32, fade_ms: u32) -> Self {
        backlight.set_level(FULL_BRIGHTNESS);
        Self {
            backlight,
            dim_timeout_ms,
            fade_ms,
            idle_ms: 0,
            last_update_ms: None,
            brightness: FULL_BRIGHTNESS,
        }
    }

    pub fn from_config(backlight: L, config: &ProbeConfig) -> Self {
        Self::new(backlight, config.dim_timeout_ms, config.fade_ms)
    }

    /// Advance the idle timer to `now_ms`
    pub fn update(&mut self, now_ms: u32) {
        let elapsed = match self.last_update_ms {
            Some(last) => now_ms.wrapping_sub(last),
            None => 0,
        };
        self.last_update_ms = Some(now_ms);
        self.idle_ms = self.idle_ms.saturating_add(elapsed);
        self.apply(self.level_for(self.idle_ms));
    }

    /// Move the time reference to `now_ms` without accruing idle time
    ///
    /// Used while input holds the loop so the stall is not counted as
    /// inactivity.
    pub fn freeze(&mut self, now_ms: u32) {
        self.last_update_ms = Some(now_ms);
    }

    /// Full brightness, idle timer restarted
    pub fn wake(&mut self) {
        self.idle_ms = 0;
        self.last_update_ms = None;
        self.apply(FULL_BRIGHTNESS);
    }

    /// Idle long enough that the fade has started
    pub fn dimmed(&self) -> bool {
        self.idle_ms >= self.dim_timeout_ms
    }

    /// Backlight fully off
    pub fn faded(&self) -> bool {
        self.brightness == 0
    }

    pub fn state(&self) -> PowerState {
        if self.faded() {
            PowerState::Faded
        } else if self.dimmed() {
            PowerState::Dimming
        } else {
            PowerState::Active
        }
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    fn level_for(&self, idle_ms: u32) -> u8 {
        if idle_ms < self.dim_timeout_ms {
            return FULL_BRIGHTNESS;
        }
        let into_fade = idle_ms - self.dim_timeout_ms;
        if into_fade >= self.fade_ms {
            return 0;
        }
        let remaining = (self.fade_ms - into_fade) as u64;
        (FULL_BRIGHTNESS as u64 * remaining / self.fade_ms as u64) as u8
    }

    fn apply(&mut self, level: u8) {
        if level != self.brightness {
            self.brightness = level;
            self.backlight.set_level(level);
        }
    }
}
