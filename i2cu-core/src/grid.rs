//! Fixed-geometry text grid
//!
//! Holds the probe label text. The text is rebuilt wholesale whenever the
//! bus list or the serial view changes; it is never patched in place.
//!
//! Capacity is `rows * (columns + 1)` characters: every row plus its
//! newline slot. Rows narrower than one hex group count as two columns wide.
//! The backing storage is a `heapless::String<N>`, so `N` must cover that.

use core::fmt;

use heapless::String;

/// Character geometry of the probe label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GridGeometry {
    /// Characters per row
    pub columns: u16,
    /// Number of rows
    pub rows: u16,
}

impl GridGeometry {
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Characters the grid must be able to hold, newlines included
    pub const fn text_capacity(&self) -> usize {
        let width = if self.columns < 2 { 2 } else { self.columns as usize };
        self.rows as usize * (width + 1)
    }

    /// Number of character cells (`columns * rows`)
    pub const fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Text grid errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridError {
    /// Geometry has zero rows or zero columns
    EmptyGeometry,
    /// Backing storage cannot hold the geometry
    CapacityTooSmall { required: usize, available: usize },
    /// Text did not fit; the grid keeps what was written before
    Overflow,
}

/// Capacity-checked text buffer for one screen of probe output
#[derive(Debug, Clone)]
pub struct TextGrid<const N: usize> {
    geometry: GridGeometry,
    text: String<N>,
}

impl<const N: usize> TextGrid<N> {
    /// Create an empty grid for the given geometry
    pub fn new(geometry: GridGeometry) -> Result<Self, GridError> {
        if geometry.columns == 0 || geometry.rows == 0 {
            return Err(GridError::EmptyGeometry);
        }
        let required = geometry.text_capacity();
        if required > N {
            return Err(GridError::CapacityTooSmall {
                required,
                available: N,
            });
        }
        Ok(Self {
            geometry,
            text: String::new(),
        })
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of rows currently holding text
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.lines().count()
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Append one character
    pub fn push(&mut self, c: char) -> Result<(), GridError> {
        if self.text.len() + c.len_utf8() > self.geometry.text_capacity() {
            return Err(GridError::Overflow);
        }
        self.text.push(c).map_err(|_| GridError::Overflow)
    }

    /// Append a string, all or nothing
    pub fn push_str(&mut self, s: &str) -> Result<(), GridError> {
        if self.text.len() + s.len() > self.geometry.text_capacity() {
            return Err(GridError::Overflow);
        }
        self.text.push_str(s).map_err(|_| GridError::Overflow)
    }

    /// Replace the whole text
    pub fn set(&mut self, s: &str) -> Result<(), GridError> {
        self.clear();
        self.push_str(s)
    }
}

impl<const N: usize> fmt::Write for TextGrid<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_geometry_capacity() {
        let g = GridGeometry::new(16, 10);
        assert_eq!(g.text_capacity(), 170);
        assert_eq!(g.cells(), 160);
    }

    #[test]
    fn test_capacity_covers_full_screen() {
        // 135x240 panel label grid
        let g = GridGeometry::new(15, 17);
        assert_eq!(g.text_capacity(), 272);
        // 255 characters plus 16 separators
        assert!(g.text_capacity() >= g.cells() + g.rows as usize - 1);
        assert_eq!(GridGeometry::new(1, 3).text_capacity(), 9);
    }

    #[test]
    fn test_rejects_undersized_storage() {
        let err = TextGrid::<32>::new(GridGeometry::new(8, 4)).unwrap_err();
        assert_eq!(
            err,
            GridError::CapacityTooSmall {
                required: 36,
                available: 32
            }
        );
    }

    #[test]
    fn test_rejects_empty_geometry() {
        assert_eq!(
            TextGrid::<64>::new(GridGeometry::new(0, 4)).unwrap_err(),
            GridError::EmptyGeometry
        );
    }

    #[test]
    fn test_overflow_keeps_previous_text() {
        let mut grid = TextGrid::<64>::new(GridGeometry::new(3, 1)).unwrap();
        grid.push_str("abc").unwrap();
        assert_eq!(grid.push_str("def"), Err(GridError::Overflow));
        assert_eq!(grid.as_str(), "abc");
        assert!(grid.push('\n').is_ok());
        assert_eq!(grid.push('x'), Err(GridError::Overflow));
    }

    #[test]
    fn test_fmt_write() {
        let mut grid = TextGrid::<64>::new(GridGeometry::new(8, 2)).unwrap();
        write!(grid, "0x{:02X}:{}", 0x3C, 0x3C).unwrap();
        assert_eq!(grid.as_str(), "0x3C:60");
        assert_eq!(grid.line_count(), 1);
    }

    #[test]
    fn test_set_replaces_text() {
        let mut grid = TextGrid::<64>::new(GridGeometry::new(8, 2)).unwrap();
        grid.set("first").unwrap();
        grid.set("<none>").unwrap();
        assert_eq!(grid.as_str(), "<none>");
    }
}
