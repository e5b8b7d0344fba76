//! Button inputs

use embassy_rp::gpio::{Input, Pin, Pull};
use embassy_rp::Peri;
use i2cu_hal::gpio::{Button, InputPin};

/// GPIO input readable through the `i2cu-hal` trait
pub struct Rp2040Input<'d>(Input<'d>);

impl<'d> Rp2040Input<'d> {
    pub fn new(pin: Peri<'d, impl Pin>, pull: Pull) -> Self {
        Self(Input::new(pin, pull))
    }
}

impl InputPin for Rp2040Input<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Push button to ground on `pin`, using the internal pull-up
pub fn pull_up_button(pin: Peri<'_, impl Pin>) -> Button<Rp2040Input<'_>> {
    Button::active_low(Rp2040Input::new(pin, Pull::Up))
}
