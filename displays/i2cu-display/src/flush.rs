//! Flush handshake
//!
//! The screen claims the gate before submitting a band and the sink's
//! completion path releases it. The gate is a single atomic flag, so completion
//! can be signalled from an interrupt or another task.

use portable_atomic::{AtomicBool, Ordering};

/// Set while the panel link is free
pub struct FlushGate {
    ready: AtomicBool,
}

impl FlushGate {
    /// A gate with no transfer in flight
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
        }
    }

    /// Claim the link for one transfer; `false` if one is still in flight
    pub fn begin(&self) -> bool {
        self.ready
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Called by the sink when the submitted pixels have been consumed
    pub fn mark_flush_complete(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

impl Default for FlushGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_claims_once() {
        let gate = FlushGate::new();
        assert!(gate.begin());
        assert!(!gate.is_ready());
        assert!(!gate.begin());

        gate.mark_flush_complete();
        assert!(gate.begin());
    }
}
