//! Property tests for address list and serial rendering

use std::fmt::Write;

use i2cu_core::detector::{render_addresses, NO_DEVICES};
use i2cu_core::grid::{GridGeometry, TextGrid};
use i2cu_core::serial::{hex_groups_per_row, printable, render_hex, render_text, SerialBuffer};
use i2cu_core::AddressPresenceSet;
use proptest::prelude::*;

fn set_from_banks(banks: [u32; 4]) -> AddressPresenceSet {
    (0u8..128)
        .filter(|&a| banks[a as usize / 32] & (1 << (a % 32)) != 0)
        .collect()
}

proptest! {
    /// One `0xHH:D` line per address, ascending, placeholder iff empty
    #[test]
    fn address_lines_match_set(banks in any::<[u32; 4]>()) {
        let set = set_from_banks(banks);
        // Enough rows that nothing is truncated
        let mut grid = TextGrid::<2048>::new(GridGeometry::new(12, 130)).unwrap();

        render_addresses(&set, &mut grid).unwrap();

        if set.is_empty() {
            prop_assert_eq!(grid.as_str(), NO_DEVICES);
        } else {
            let mut expected = String::new();
            for (i, a) in set.iter().enumerate() {
                if i > 0 {
                    expected.push('\n');
                }
                write!(expected, "0x{:02X}:{}", a, a).unwrap();
            }
            prop_assert_eq!(grid.as_str(), expected.as_str());
        }
    }

    /// Never more than `rows - 1` entries
    #[test]
    fn address_lines_capped(banks in any::<[u32; 4]>(), rows in 1u16..20) {
        let set = set_from_banks(banks);
        let mut grid = TextGrid::<512>::new(GridGeometry::new(12, rows)).unwrap();

        render_addresses(&set, &mut grid).unwrap();

        if !set.is_empty() {
            prop_assert!(grid.line_count() <= rows as usize - 1);
        }
    }

    /// After any sequence of pushes the buffer holds the newest bytes in order
    #[test]
    fn scroll_keeps_most_recent(
        capacity in 1usize..64,
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..80), 0..10),
    ) {
        let mut buffer = SerialBuffer::<64>::new(capacity).unwrap();
        let mut all = Vec::new();
        for chunk in &chunks {
            buffer.push(chunk);
            all.extend_from_slice(chunk);
        }

        let start = all.len().saturating_sub(capacity);
        prop_assert_eq!(buffer.as_slice(), &all[start..]);
        prop_assert!(buffer.len() <= capacity);
    }

    /// Text rows are exactly `columns` wide except the last
    #[test]
    fn text_rows_have_fixed_width(
        columns in 1u16..20,
        rows in 1u16..10,
        bytes in prop::collection::vec(any::<u8>(), 1..200),
    ) {
        let geometry = GridGeometry::new(columns, rows);
        let mut buffer = SerialBuffer::<256>::new(geometry.cells()).unwrap();
        buffer.push(&bytes);
        let mut grid = TextGrid::<256>::new(geometry).unwrap();

        render_text(buffer.as_slice(), &mut grid).unwrap();

        let lines: Vec<&str> = grid.as_str().split('\n').collect();
        prop_assert!(lines.len() <= rows as usize);
        for line in &lines[..lines.len() - 1] {
            prop_assert_eq!(line.len(), columns as usize);
        }
        prop_assert!(grid.as_str().chars().all(|c| c == '\n' || (' '..='~').contains(&c)));
        // The newest byte is always on screen
        let last = *bytes.last().unwrap();
        prop_assert_eq!(grid.as_str().chars().last(), Some(printable(last)));
    }

    /// Hex rows hold `max(1, columns / 3)` groups and always fit the grid
    #[test]
    fn hex_view_fits_grid(
        columns in 1u16..20,
        rows in 1u16..10,
        bytes in prop::collection::vec(any::<u8>(), 1..200),
    ) {
        let geometry = GridGeometry::new(columns, rows);
        let mut grid = TextGrid::<256>::new(geometry).unwrap();

        render_hex(&bytes, &mut grid).unwrap();

        let groups = hex_groups_per_row(columns);
        prop_assert!(grid.line_count() <= rows as usize);
        for line in grid.as_str().lines() {
            prop_assert!(line.split(' ').count() <= groups);
        }
    }
}
