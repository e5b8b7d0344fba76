//! Bus change detection
//!
//! Compares the scanner's latest presence set with the one last rendered and
//! rebuilds the address list when they differ.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::grid::{GridError, TextGrid};
use crate::presence::AddressPresenceSet;
use crate::shared::SharedPresence;

/// Text shown when no address responds
pub const NO_DEVICES: &str = "<none>";

/// Tracks the last rendered presence set
#[derive(Debug, Default)]
pub struct ChangeDetector {
    rendered: AddressPresenceSet,
}

impl ChangeDetector {
    /// Start with an empty rendered set
    ///
    /// An empty bus therefore stays on the title screen until the first
    /// device shows up.
    pub const fn new() -> Self {
        Self {
            rendered: AddressPresenceSet::new(),
        }
    }

    /// Rebuild `grid` if the bus changed since the last render
    ///
    /// Returns `false` (grid untouched) before the first sweep and when the
    /// set is unchanged.
    pub fn poll<M: RawMutex, const G: usize>(
        &mut self,
        shared: &SharedPresence<M>,
        grid: &mut TextGrid<G>,
    ) -> bool {
        let Some(current) = shared.snapshot() else {
            return false;
        };
        if current == self.rendered {
            return false;
        }

        let _ = render_addresses(&current, grid);
        self.rendered = current;
        true
    }

    /// The set the grid currently shows
    pub fn rendered(&self) -> &AddressPresenceSet {
        &self.rendered
    }
}

/// Format one `0xHH:D` entry per present address
///
/// At most `rows - 1` entries are written; the rest are dropped. A one-row
/// grid therefore lists nothing unless the bus is empty.
pub fn render_addresses<const G: usize>(
    set: &AddressPresenceSet,
    grid: &mut TextGrid<G>,
) -> Result<(), GridError> {
    grid.clear();
    if set.is_empty() {
        return grid.push_str(NO_DEVICES);
    }

    let max_entries = (grid.geometry().rows as usize).saturating_sub(1);
    for (i, address) in set.iter().take(max_entries).enumerate() {
        if i > 0 {
            grid.push('\n')?;
        }
        write!(grid, "0x{:02X}:{}", address, address).map_err(|_| GridError::Overflow)?;
    }
    Ok(())
}
