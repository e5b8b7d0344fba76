//! Panel sleep guard
//!
//! Tracks whether the panel controller is asleep so repeated sleep or wake
//! requests in the same tick only reach the hardware once.

use embedded_hal::delay::DelayNs;
use i2cu_hal::panel::{
    PanelTransport, ENTER_SLEEP, ENTER_SLEEP_SETTLE_MS, EXIT_SLEEP, EXIT_SLEEP_SETTLE_MS,
};

/// Panel command failed; the guard state is unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelError<E>(pub E);

/// Idempotent sleep/wake for the panel controller
pub struct PanelPower<D: DelayNs> {
    delay: D,
    asleep: bool,
}

impl<D: DelayNs> PanelPower<D> {
    /// The panel is awake after initialization
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            asleep: false,
        }
    }

    /// Enter sleep mode unless already asleep
    pub fn sleep<T: PanelTransport>(&mut self, panel: &mut T) -> Result<(), PanelError<T::Error>> {
        if self.asleep {
            return Ok(());
        }
        panel.command(ENTER_SLEEP, &[]).map_err(PanelError)?;
        self.delay.delay_ms(ENTER_SLEEP_SETTLE_MS);
        self.asleep = true;
        Ok(())
    }

    /// Leave sleep mode unless already awake
    pub fn wake<T: PanelTransport>(&mut self, panel: &mut T) -> Result<(), PanelError<T::Error>> {
        if !self.asleep {
            return Ok(());
        }
        panel.command(EXIT_SLEEP, &[]).map_err(PanelError)?;
        self.delay.delay_ms(EXIT_SLEEP_SETTLE_MS);
        self.asleep = false;
        Ok(())
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }
}
