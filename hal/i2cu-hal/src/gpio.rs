//! GPIO pin abstractions

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// A push button wired to an input pin
///
/// Buttons on the probe are wired to ground with a pull-up, so the default
/// is active-low.
pub struct Button<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> Button<P> {
    /// Button that reads pressed when the pin is low
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Button that reads pressed when the pin is high
    pub fn active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Current physical state of the button
    pub fn is_pressed(&self) -> bool {
        self.pin.is_high() != self.active_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_low_button() {
        assert!(Button::active_low(MockPin { high: false }).is_pressed());
        assert!(!Button::active_low(MockPin { high: true }).is_pressed());
    }

    #[test]
    fn test_active_high_button() {
        assert!(Button::active_high(MockPin { high: true }).is_pressed());
        assert!(!Button::active_high(MockPin { high: false }).is_pressed());
    }
}
