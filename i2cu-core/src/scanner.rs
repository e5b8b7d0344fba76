//! I2C bus scanner
//!
//! Runs on the second core. Each sweep reinitializes the bus, probes every
//! address below [`PROBE_ADDRESS_END`] and publishes the resulting presence
//! set through [`SharedPresence`].

use embassy_sync::blocking_mutex::raw::RawMutex;
use i2cu_hal::i2c::{BusProbe, PROBE_ADDRESS_END};

use crate::presence::AddressPresenceSet;
use crate::shared::SharedPresence;

/// Sweeps the bus and publishes presence sets
#[derive(Debug, Default)]
pub struct BusScanner {
    sweeps: u32,
    failed_begins: u32,
}

impl BusScanner {
    pub const fn new() -> Self {
        Self {
            sweeps: 0,
            failed_begins: 0,
        }
    }

    /// One full pass over the address range
    ///
    /// A probe that fails is simply an absent address. If the bus cannot be
    /// brought up the sweep reports nothing present.
    pub fn sweep<B: BusProbe>(&mut self, bus: &mut B) -> AddressPresenceSet {
        self.sweeps = self.sweeps.wrapping_add(1);

        let mut set = AddressPresenceSet::new();
        if bus.begin().is_err() {
            self.failed_begins = self.failed_begins.wrapping_add(1);
            return set;
        }
        for address in 0..PROBE_ADDRESS_END {
            if bus.probe(address) {
                set.insert(address);
            }
        }
        bus.end();
        set
    }

    /// Sweep, then publish the result for the main loop
    pub fn run_once<B: BusProbe, M: RawMutex>(
        &mut self,
        bus: &mut B,
        shared: &SharedPresence<M>,
    ) -> AddressPresenceSet {
        let set = self.sweep(bus);
        shared.publish(set);
        set
    }

    /// Number of sweeps started so far
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    /// Number of sweeps where the bus failed to initialize
    pub fn failed_begins(&self) -> u32 {
        self.failed_begins
    }
}
