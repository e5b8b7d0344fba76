//! Presence set shared between the scanner core and the main loop
//!
//! The scanner writes the set once per sweep, the main loop copies it out
//! once per tick. Both sides go through the accessors here, which hold the
//! lock only for the 16-byte copy.
//!
//! A separate flag records that at least one sweep has completed. It only
//! ever goes from `false` to `true`, so it is read without the lock.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::presence::AddressPresenceSet;

/// Lock-guarded presence set plus the "scanner has run" flag
///
/// Use `CriticalSectionRawMutex` when the two sides run on different cores.
pub struct SharedPresence<M: RawMutex> {
    current: Mutex<M, Cell<AddressPresenceSet>>,
    scanned: AtomicBool,
}

impl<M: RawMutex> SharedPresence<M> {
    /// Create an empty, not-yet-scanned instance
    pub const fn new() -> Self {
        Self {
            current: Mutex::new(Cell::new(AddressPresenceSet::new())),
            scanned: AtomicBool::new(false),
        }
    }

    /// Replace the current set with the result of a finished sweep
    pub fn publish(&self, set: AddressPresenceSet) {
        self.current.lock(|current| current.set(set));
        self.scanned.store(true, Ordering::Release);
    }

    /// True once at least one sweep has been published
    pub fn has_scanned(&self) -> bool {
        self.scanned.load(Ordering::Acquire)
    }

    /// Copy of the current set, or `None` before the first sweep
    pub fn snapshot(&self) -> Option<AddressPresenceSet> {
        if !self.has_scanned() {
            return None;
        }
        Some(self.with(|set| *set))
    }

    /// Run `f` against the current set with the lock held
    ///
    /// Keep `f` short: the scanner core spins on the same lock.
    pub fn with<U>(&self, f: impl FnOnce(&AddressPresenceSet) -> U) -> U {
        self.current.lock(|current| f(&current.get()))
    }
}

impl<M: RawMutex> Default for SharedPresence<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    #[test]
    fn test_snapshot_before_first_sweep() {
        let shared: SharedPresence<NoopRawMutex> = SharedPresence::new();
        assert!(!shared.has_scanned());
        assert_eq!(shared.snapshot(), None);
    }

    #[test]
    fn test_publish_sets_flag_and_value() {
        let shared: SharedPresence<NoopRawMutex> = SharedPresence::new();
        let set: AddressPresenceSet = [0x3C, 0x68].into_iter().collect();

        shared.publish(set);

        assert!(shared.has_scanned());
        assert_eq!(shared.snapshot(), Some(set));
    }

    #[test]
    fn test_empty_sweep_still_counts_as_scanned() {
        let shared: SharedPresence<NoopRawMutex> = SharedPresence::new();
        shared.publish(AddressPresenceSet::new());
        assert_eq!(shared.snapshot(), Some(AddressPresenceSet::new()));
    }

    #[test]
    fn test_cross_thread_publish() {
        static SHARED: SharedPresence<CriticalSectionRawMutex> = SharedPresence::new();

        let writer = std::thread::spawn(|| {
            for addr in 0..100u8 {
                let set: AddressPresenceSet = [addr, addr + 1].into_iter().collect();
                SHARED.publish(set);
            }
        });

        // Every snapshot must be a complete pair written by one publish
        loop {
            if let Some(set) = SHARED.snapshot() {
                assert_eq!(set.len(), 2);
                let first = set.iter().next().unwrap_or(0);
                assert!(set.contains(first + 1));
            }
            if writer.is_finished() {
                break;
            }
        }
        writer.join().unwrap();

        let last: AddressPresenceSet = [99, 100].into_iter().collect();
        assert_eq!(SHARED.snapshot(), Some(last));
    }
}
