//! Probe loop task (core 0)
//!
//! One iteration per tick: buttons, bus/serial change detection, dimmer and
//! screen refresh, all inside `ProbeApp`. While a key is held the loop
//! only samples the keys. Settings writes are the one await besides the
//! tick timer.

use defmt::*;
use embassy_time::{Delay, Duration, Instant, Ticker};

use i2cu_core::{ButtonLevels, ProbeApp, ProbeConfig, SerialMode, TickOutcome};
use i2cu_display::ProbeScreen;
use i2cu_hal::gpio::Button;
use i2cu_hal_rp2040::backlight::PwmBacklight;
use i2cu_hal_rp2040::gpio::Rp2040Input;
use i2cu_hal_rp2040::uart::ProbeUart;

use crate::board::{GRID_STORAGE, SERIAL_STORAGE, TICK_MS};
use crate::channels::SHARED_PRESENCE;
use crate::config::{load_settings, save_settings, Store};
use crate::display::PanelSink;

type App = ProbeApp<ProbeUart, PwmBacklight<'static>, Delay, GRID_STORAGE, SERIAL_STORAGE>;
pub type Screen = ProbeScreen<'static, PanelSink>;

pub struct Keys {
    pub a: Button<Rp2040Input<'static>>,
    pub b: Button<Rp2040Input<'static>>,
}

impl Keys {
    fn levels(&self) -> ButtonLevels {
        ButtonLevels {
            a: self.a.is_pressed(),
            b: self.b.is_pressed(),
        }
    }
}

/// Everything the probe loop owns
pub struct ProbeResources {
    pub serial: ProbeUart,
    pub backlight: PwmBacklight<'static>,
    pub screen: Screen,
    pub keys: Keys,
    pub store: Store,
}

#[embassy_executor::task]
pub async fn probe_task(resources: ProbeResources) {
    let ProbeResources {
        serial,
        backlight,
        mut screen,
        keys,
        mut store,
    } = resources;

    let settings = load_settings(&mut store).await;
    let config = ProbeConfig::default();
    let mut app = match App::new(&config, screen.probe_geometry(), serial, settings, backlight, Delay) {
        Ok(app) => app,
        Err(e) => crate::fatal("Probe context", e),
    };

    info!("Probe loop started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        let now = Instant::now().as_millis() as u32;
        let levels = keys.levels();

        let outcome = if app.buttons_held() {
            app.stall(now, levels, &mut screen)
        } else {
            app.tick(now, levels, &mut screen, &SHARED_PRESENCE)
        };
        report(&app, &outcome);

        if let Some(settings) = outcome.persist {
            if let Err(e) = save_settings(&mut store, &settings).await {
                warn!("Failed to save settings: {:?}", e);
            }
        }

        ticker.next().await;
    }
}

/// Mirror changes to the log
fn report(app: &App, outcome: &TickOutcome) {
    if outcome.bus_changed {
        let set = app.detector().rendered();
        if set.is_empty() {
            debug!("bus: <none>");
        }
        for address in set.iter() {
            debug!("bus: 0x{=u8:02X}:{=u8}", address, address);
        }
    }
    if outcome.serial_changed {
        let bytes = app.ingest().fresh_bytes();
        match app.settings().mode() {
            SerialMode::Text => trace!("rx: {=[u8]:a}", bytes),
            SerialMode::Binary => trace!("rx: {=[u8]:X}", bytes),
        }
    }
    if outcome.panel_failed {
        warn!("Panel sleep/wake command failed");
    }
    if outcome.refresh_failed {
        warn!("Screen refresh failed");
    }
    if outcome.render_overflow {
        warn!("Serial view truncated, grid storage too small");
    }
}
