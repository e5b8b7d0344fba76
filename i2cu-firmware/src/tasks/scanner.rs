//! I2C bus scanner task (core 1)
//!
//! Sweeps the probed bus once per scan interval and publishes the result
//! for the probe loop.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Timer};

use i2cu_core::config::SCAN_INTERVAL_MS;
use i2cu_core::{AddressPresenceSet, BusScanner};
use i2cu_hal_rp2040::i2c::ProbeBus;

use crate::channels::SHARED_PRESENCE;

pub type ScanBus = ProbeBus<I2c<'static, I2C0, Blocking>>;

#[embassy_executor::task]
pub async fn scanner_task(mut bus: ScanBus) {
    info!("Bus scanner started");

    let mut scanner = BusScanner::new();
    let mut last: Option<AddressPresenceSet> = None;
    let mut failed_begins = 0;

    loop {
        let set = scanner.run_once(&mut bus, &SHARED_PRESENCE);

        if scanner.failed_begins() != failed_begins {
            failed_begins = scanner.failed_begins();
            warn!("Bus reinit failed ({} so far), sweep reported empty", failed_begins);
        }
        if last != Some(set) {
            debug!("Sweep {}: {} device(s)", scanner.sweeps(), set.len());
            last = Some(set);
        }

        Timer::after(Duration::from_millis(SCAN_INTERVAL_MS as u64)).await;
    }
}
