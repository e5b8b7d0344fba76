//! PWM backlight
//!
//! The backlight enable line is driven from one channel of its PWM slice.
//! Brightness 0..=255 maps linearly onto the compare value.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use i2cu_hal::panel::Backlight;

/// PWM counter wrap; ~1.9 kHz at 125 MHz with no divider
pub const PWM_TOP: u16 = 0xFFFF;

/// Which output of the slice the backlight pin is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmChannel {
    /// Even GPIO
    A,
    /// Odd GPIO
    B,
}

pub struct PwmBacklight<'d> {
    pwm: Pwm<'d>,
    channel: PwmChannel,
    config: PwmConfig,
}

impl<'d> PwmBacklight<'d> {
    /// Take over `pwm` and start at `level`
    pub fn new(pwm: Pwm<'d>, channel: PwmChannel, level: u8) -> Self {
        let mut config = PwmConfig::default();
        config.top = PWM_TOP;
        let mut backlight = Self { pwm, channel, config };
        backlight.set_level(level);
        backlight
    }
}

fn compare_for(level: u8) -> u16 {
    (level as u32 * PWM_TOP as u32 / 255) as u16
}

impl Backlight for PwmBacklight<'_> {
    fn set_level(&mut self, level: u8) {
        let compare = compare_for(level);
        match self.channel {
            PwmChannel::A => self.config.compare_a = compare,
            PwmChannel::B => self.config.compare_b = compare,
        }
        self.pwm.set_config(&self.config);
    }
}
