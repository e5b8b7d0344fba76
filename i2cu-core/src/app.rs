//! Probe application context
//!
//! Owns everything the main loop touches: the serial port, settings, text
//! grid, change detection, dimmer, panel guard, overlay timer and button
//! state. The only state shared with the scanner core is the
//! [`SharedPresence`] passed into [`ProbeApp::tick`].
//!
//! One call to `tick` is one pass of the main loop:
//!
//! 1. hide an expired overlay
//! 2. advance the dimmer
//! 3. sample buttons and dispatch their events
//! 4. bus change, else serial change: new probe text, wake
//! 5. faded: panel to sleep; otherwise panel awake and screen refreshed
//!
//! While a button is held the loop calls [`ProbeApp::stall`] instead, which
//! only services the buttons.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use i2cu_hal::panel::Backlight;
use i2cu_hal::uart::SerialPort;

use crate::config::ProbeConfig;
use crate::detector::ChangeDetector;
use crate::grid::{GridError, GridGeometry, TextGrid};
use crate::input::{dispatch, ButtonEvent, ButtonId, ClickDetector, OverlayTimer, Response};
use crate::power::{PanelPower, PowerIdleController, PowerState};
use crate::serial::SerialIngest;
use crate::settings::Settings;
use crate::shared::SharedPresence;
use crate::traits::{ProbeSource, ProbeView};

/// Raw button levels sampled this tick (`true` = pressed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLevels {
    pub a: bool,
    pub b: bool,
}

/// What happened during a tick that the caller has to follow up on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Settings changed; store these
    pub persist: Option<Settings>,
    /// The address list was rebuilt
    pub bus_changed: bool,
    /// Serial bytes arrived
    pub serial_changed: bool,
    /// A panel sleep/wake command failed
    pub panel_failed: bool,
    /// A screen refresh failed
    pub refresh_failed: bool,
    /// Serial text did not fit the grid; the view is incomplete
    pub render_overflow: bool,
}

impl TickOutcome {
    fn merge(&mut self, other: TickOutcome) {
        self.persist = other.persist.or(self.persist);
        self.bus_changed |= other.bus_changed;
        self.serial_changed |= other.serial_changed;
        self.panel_failed |= other.panel_failed;
        self.refresh_failed |= other.refresh_failed;
        self.render_overflow |= other.render_overflow;
    }
}

/// Main-loop state of the probe
///
/// `G` is the text grid storage, `B` the serial buffer storage; both must
/// cover the geometry passed to [`ProbeApp::new`].
pub struct ProbeApp<S, L, D, const G: usize, const B: usize>
where
    S: SerialPort,
    L: Backlight,
    D: DelayNs,
{
    serial: S,
    settings: Settings,
    grid: TextGrid<G>,
    detector: ChangeDetector,
    ingest: SerialIngest<B>,
    dimmer: PowerIdleController<L>,
    panel: PanelPower<D>,
    overlay: OverlayTimer,
    button_a: ClickDetector,
    button_b: ClickDetector,
}

impl<S, L, D, const G: usize, const B: usize> ProbeApp<S, L, D, G, B>
where
    S: SerialPort,
    L: Backlight,
    D: DelayNs,
{
    /// Build the context and apply the stored baud rate to the port
    pub fn new(
        config: &ProbeConfig,
        geometry: GridGeometry,
        mut serial: S,
        settings: Settings,
        backlight: L,
        delay: D,
    ) -> Result<Self, GridError> {
        let grid = TextGrid::new(geometry)?;
        let ingest = SerialIngest::new(geometry.cells())?;
        serial.set_baud_rate(settings.baud_rate().bps());

        Ok(Self {
            serial,
            settings,
            grid,
            detector: ChangeDetector::new(),
            ingest,
            dimmer: PowerIdleController::from_config(backlight, config),
            panel: PanelPower::new(delay),
            overlay: OverlayTimer::new(config.overlay_ms),
            button_a: ClickDetector::new(config.buttons),
            button_b: ClickDetector::new(config.buttons),
        })
    }

    /// One pass of the main loop
    pub fn tick<V: ProbeView, M: RawMutex>(
        &mut self,
        now_ms: u32,
        levels: ButtonLevels,
        view: &mut V,
        shared: &SharedPresence<M>,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.overlay.take_expired(now_ms) {
            view.hide_overlay();
        }

        self.dimmer.update(now_ms);
        outcome.merge(self.service_buttons(now_ms, levels, view));

        // Bus first; serial waits in the port until the bus is quiet
        let source = if self.detector.poll(shared, &mut self.grid) {
            outcome.bus_changed = true;
            Some(ProbeSource::Bus)
        } else {
            match self
                .ingest
                .poll(&mut self.serial, self.settings.mode(), &mut self.grid)
            {
                Ok(false) => None,
                Ok(true) => {
                    outcome.serial_changed = true;
                    Some(ProbeSource::Serial)
                }
                Err(_) => {
                    outcome.serial_changed = true;
                    outcome.render_overflow = true;
                    Some(ProbeSource::Serial)
                }
            }
        };
        if let Some(source) = source {
            view.set_probe_text(self.grid.as_str(), source);
            outcome.panel_failed |= self.panel.wake(view.panel()).is_err();
            self.dimmer.wake();
        }

        if self.dimmer.faded() {
            outcome.panel_failed |= self.panel.sleep(view.panel()).is_err();
        } else {
            outcome.panel_failed |= self.panel.wake(view.panel()).is_err();
            outcome.refresh_failed |= view.refresh().is_err();
        }
        outcome
    }

    /// Loop pass while a button is held: buttons only
    ///
    /// Bus and serial refresh are deferred and the stall does not count as
    /// idle time.
    pub fn stall<V: ProbeView>(&mut self, now_ms: u32, levels: ButtonLevels, view: &mut V) -> TickOutcome {
        self.dimmer.freeze(now_ms);
        self.service_buttons(now_ms, levels, view)
    }

    /// True while either button is (debounced) down
    pub fn buttons_held(&self) -> bool {
        self.button_a.is_pressed() || self.button_b.is_pressed()
    }

    fn service_buttons<V: ProbeView>(&mut self, now_ms: u32, levels: ButtonLevels, view: &mut V) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if let Some(event) = self.button_a.update(levels.a, now_ms) {
            outcome.merge(self.handle_event(ButtonId::A, event, now_ms, view));
        }
        if let Some(event) = self.button_b.update(levels.b, now_ms) {
            outcome.merge(self.handle_event(ButtonId::B, event, now_ms, view));
        }
        outcome
    }

    fn handle_event<V: ProbeView>(
        &mut self,
        button: ButtonId,
        event: ButtonEvent,
        now_ms: u32,
        view: &mut V,
    ) -> TickOutcome {
        let dimmed = self.dimmer.dimmed();
        let response = dispatch(&mut self.settings, dimmed, button, event);
        self.apply(response, now_ms, view)
    }

    fn apply<V: ProbeView>(&mut self, response: Response, now_ms: u32, view: &mut V) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if response.wake {
            outcome.panel_failed |= self.panel.wake(view.panel()).is_err();
            self.dimmer.wake();
        }
        if let Some(baud) = response.baud {
            self.serial.set_baud_rate(baud.bps());
        }
        if let Some(overlay) = response.overlay {
            view.show_overlay(overlay.title(), overlay.value().as_str());
            self.overlay.show(now_ms);
        }
        if response.persist {
            outcome.persist = Some(self.settings);
        }
        if response.refresh {
            outcome.refresh_failed |= view.refresh().is_err();
        }
        outcome
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> &TextGrid<G> {
        &self.grid
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn ingest(&self) -> &SerialIngest<B> {
        &self.ingest
    }

    pub fn power_state(&self) -> PowerState {
        self.dimmer.state()
    }

    pub fn panel_asleep(&self) -> bool {
        self.panel.is_asleep()
    }
}
