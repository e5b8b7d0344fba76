//! Serial ingest
//!
//! Drains the monitored UART into a scroll buffer and renders the buffer
//! into the text grid, either as printable text or as hex groups.
//!
//! The buffer holds one screen worth of bytes (`columns * rows`). When new
//! bytes do not fit, the oldest are shifted out so the buffer always holds
//! the most recent bytes in arrival order.

use core::fmt::Write;

use heapless::Vec;
use i2cu_hal::uart::SerialPort;

use crate::grid::{GridError, TextGrid};
use crate::settings::SerialMode;

/// Bytes read from the port per `read` call
const READ_CHUNK: usize = 32;

/// Placeholder for bytes outside printable ASCII
const NON_PRINTABLE: char = '.';

/// Fixed-capacity FIFO of the most recent serial bytes
#[derive(Debug, Clone)]
pub struct SerialBuffer<const N: usize> {
    data: Vec<u8, N>,
    capacity: usize,
}

impl<const N: usize> SerialBuffer<N> {
    /// Create a buffer holding at most `capacity` bytes
    pub fn new(capacity: usize) -> Result<Self, GridError> {
        if capacity == 0 {
            return Err(GridError::EmptyGeometry);
        }
        if capacity > N {
            return Err(GridError::CapacityTooSmall {
                required: capacity,
                available: N,
            });
        }
        Ok(Self {
            data: Vec::new(),
            capacity,
        })
    }

    /// Append bytes, shifting out the oldest on overflow
    pub fn push(&mut self, bytes: &[u8]) {
        if bytes.len() >= self.capacity {
            self.data.clear();
            let tail = &bytes[bytes.len() - self.capacity..];
            // capacity <= N, checked in new()
            let _ = self.data.extend_from_slice(tail);
            return;
        }

        let overflow = (self.data.len() + bytes.len()).saturating_sub(self.capacity);
        if overflow > 0 {
            let keep = self.data.len() - overflow;
            self.data.copy_within(overflow.., 0);
            self.data.truncate(keep);
        }
        let _ = self.data.extend_from_slice(bytes);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

/// Text-mode rendering of a single byte
///
/// Space and visible ASCII map to themselves. TAB, CR and LF become `.` like
/// any other control byte so every row stays `columns` cells wide.
pub fn printable(byte: u8) -> char {
    if (0x20..=0x7E).contains(&byte) {
        byte as char
    } else {
        NON_PRINTABLE
    }
}

/// Render bytes as text, `columns` characters per row
///
/// Rows are separated by newlines; there is no trailing newline, so exactly
/// `columns` bytes produce a single unbroken row.
pub fn render_text<const G: usize>(bytes: &[u8], grid: &mut TextGrid<G>) -> Result<(), GridError> {
    let geometry = grid.geometry();
    let columns = geometry.columns as usize;
    let max_bytes = geometry.cells();
    let start = bytes.len().saturating_sub(max_bytes);

    grid.clear();
    for (i, &byte) in bytes[start..].iter().enumerate() {
        if i > 0 && i % columns == 0 {
            grid.push('\n')?;
        }
        grid.push(printable(byte))?;
    }
    Ok(())
}

/// Hex groups that fit on one row (`"HH "` is three characters wide)
pub fn hex_groups_per_row(columns: u16) -> usize {
    (columns as usize / 3).max(1)
}

/// Render bytes as hex, newest `groups * rows` bytes only
pub fn render_hex<const G: usize>(bytes: &[u8], grid: &mut TextGrid<G>) -> Result<(), GridError> {
    let geometry = grid.geometry();
    let groups = hex_groups_per_row(geometry.columns);
    let max_bytes = groups * geometry.rows as usize;
    let start = bytes.len().saturating_sub(max_bytes);

    grid.clear();
    for (i, &byte) in bytes[start..].iter().enumerate() {
        if i > 0 {
            grid.push(if i % groups == 0 { '\n' } else { ' ' })?;
        }
        write!(grid, "{:02X}", byte).map_err(|_| GridError::Overflow)?;
    }
    Ok(())
}

/// Serial side of the probe loop
pub struct SerialIngest<const N: usize> {
    buffer: SerialBuffer<N>,
    last_mode: Option<SerialMode>,
    last_read: usize,
}

impl<const N: usize> SerialIngest<N> {
    pub fn new(capacity: usize) -> Result<Self, GridError> {
        Ok(Self {
            buffer: SerialBuffer::new(capacity)?,
            last_mode: None,
            last_read: 0,
        })
    }

    /// Drain the port and re-render if anything arrived
    ///
    /// Returns `Ok(true)` whenever at least one byte was read, even if the
    /// rendered text ends up identical. A mode change since the previous
    /// poll discards the buffered bytes first. On `Err` the bytes are still
    /// buffered and the grid holds the part of the view that fitted.
    pub fn poll<S: SerialPort, const G: usize>(
        &mut self,
        serial: &mut S,
        mode: SerialMode,
        grid: &mut TextGrid<G>,
    ) -> Result<bool, GridError> {
        if self.last_mode.is_some_and(|last| last != mode) {
            self.buffer.clear();
        }
        self.last_mode = Some(mode);

        let mut remaining = serial.available();
        let mut total = 0;
        let mut chunk = [0u8; READ_CHUNK];
        while remaining > 0 {
            let want = remaining.min(READ_CHUNK);
            match serial.read(&mut chunk[..want]) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    self.buffer.push(&chunk[..n]);
                    total += n;
                    remaining = remaining.saturating_sub(n);
                }
            }
        }
        self.last_read = total;
        if total == 0 {
            return Ok(false);
        }

        match mode {
            SerialMode::Text => render_text(self.buffer.as_slice(), grid)?,
            SerialMode::Binary => render_hex(self.buffer.as_slice(), grid)?,
        }
        Ok(true)
    }

    /// Bytes read by the last poll that are still buffered
    pub fn fresh_bytes(&self) -> &[u8] {
        let bytes = self.buffer.as_slice();
        &bytes[bytes.len() - self.last_read.min(bytes.len())..]
    }

    pub fn buffer(&self) -> &SerialBuffer<N> {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridGeometry;

    /// Port that hands out a fixed byte stream
    struct MockSerial {
        data: [u8; 512],
        len: usize,
        pos: usize,
        baud: u32,
    }

    impl MockSerial {
        fn new() -> Self {
            Self {
                data: [0; 512],
                len: 0,
                pos: 0,
                baud: 115_200,
            }
        }

        fn feed(&mut self, bytes: &[u8]) {
            self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
            self.len += bytes.len();
        }
    }

    impl SerialPort for MockSerial {
        type Error = ();

        fn available(&mut self) -> usize {
            self.len - self.pos
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = buf.len().min(self.len - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }

        fn set_baud_rate(&mut self, baud: u32) {
            self.baud = baud;
        }
    }

    fn grid(columns: u16, rows: u16) -> TextGrid<256> {
        TextGrid::new(GridGeometry::new(columns, rows)).unwrap()
    }

    #[test]
    fn test_buffer_scrolls_oldest_out() {
        let mut buffer = SerialBuffer::<16>::new(4).unwrap();
        buffer.push(b"abc");
        buffer.push(b"de");
        assert_eq!(buffer.as_slice(), b"bcde");
        buffer.push(b"fghijk");
        assert_eq!(buffer.as_slice(), b"hijk");
    }

    #[test]
    fn test_buffer_rejects_oversized_capacity() {
        assert!(SerialBuffer::<8>::new(9).is_err());
        assert!(SerialBuffer::<8>::new(0).is_err());
    }

    #[test]
    fn test_hello_wraps_at_three_columns() {
        let mut g = grid(3, 4);
        render_text(b"Hello", &mut g).unwrap();
        assert_eq!(g.as_str(), "Hel\nlo");
    }

    #[test]
    fn test_full_row_has_no_newline() {
        let mut g = grid(5, 3);
        render_text(b"abcde", &mut g).unwrap();
        assert_eq!(g.as_str().matches('\n').count(), 0);

        render_text(b"abcdef", &mut g).unwrap();
        assert_eq!(g.as_str().matches('\n').count(), 1);
    }

    #[test]
    fn test_non_printable_becomes_dot() {
        let mut g = grid(8, 2);
        render_text(&[b'a', 0x01, b' ', 0x7F, b'\n', 0xFF], &mut g).unwrap();
        assert_eq!(g.as_str(), "a. ...");
    }

    #[test]
    fn test_tab_and_carriage_return_become_dots() {
        let mut g = grid(8, 2);
        render_text(b"a\tb c\r", &mut g).unwrap();
        assert_eq!(g.as_str(), "a.b c.");
    }

    #[test]
    fn test_full_screen_shows_newest_byte() {
        // 135x240 panel label grid
        let geometry = GridGeometry::new(15, 17);
        let mut g = TextGrid::<272>::new(geometry).unwrap();
        let mut bytes = [b'x'; 255];
        bytes[254] = b'Z';

        render_text(&bytes, &mut g).unwrap();

        assert!(g.as_str().ends_with('Z'));
        assert_eq!(g.line_count(), 17);
        assert_eq!(g.as_str().matches('\n').count(), 16);
    }

    #[test]
    fn test_full_hex_screen_fits() {
        let geometry = GridGeometry::new(15, 17);
        let mut g = TextGrid::<272>::new(geometry).unwrap();
        let bytes = [0xA5; 255];

        render_hex(&bytes, &mut g).unwrap();

        // 5 groups per row, 17 rows
        assert_eq!(g.line_count(), 17);
        assert!(g.as_str().lines().all(|row| row == "A5 A5 A5 A5 A5"));
    }

    #[test]
    fn test_poll_full_buffer_renders_newest_byte() {
        let geometry = GridGeometry::new(15, 17);
        let mut ingest = SerialIngest::<255>::new(geometry.cells()).unwrap();
        let mut serial = MockSerial::new();
        let mut g = TextGrid::<272>::new(geometry).unwrap();
        serial.feed(&[b'x'; 300]);
        assert_eq!(ingest.poll(&mut serial, SerialMode::Text, &mut g), Ok(true));

        serial.feed(b"Z");
        assert_eq!(ingest.poll(&mut serial, SerialMode::Text, &mut g), Ok(true));
        assert_eq!(ingest.buffer().len(), 255);
        assert!(g.as_str().ends_with('Z'));
    }

    #[test]
    fn test_hex_rows() {
        // 10 columns -> 3 groups per row
        let mut g = grid(10, 3);
        render_hex(&[0x00, 0x1A, 0xFF, 0x42, 0x7E], &mut g).unwrap();
        assert_eq!(g.as_str(), "00 1A FF\n42 7E");
    }

    #[test]
    fn test_hex_keeps_newest_bytes() {
        // 6 columns -> 2 groups, 2 rows -> 4 bytes shown
        let mut g = grid(6, 2);
        render_hex(&[1, 2, 3, 4, 5, 6], &mut g).unwrap();
        assert_eq!(g.as_str(), "03 04\n05 06");
    }

    #[test]
    fn test_poll_without_data() {
        let mut ingest = SerialIngest::<64>::new(12).unwrap();
        let mut serial = MockSerial::new();
        let mut g = grid(4, 3);
        g.set("keep").unwrap();

        assert!(!ingest.poll(&mut serial, SerialMode::Text, &mut g).unwrap());
        assert_eq!(g.as_str(), "keep");
    }

    #[test]
    fn test_poll_reads_everything_available() {
        let mut ingest = SerialIngest::<128>::new(100).unwrap();
        let mut serial = MockSerial::new();
        let mut g = grid(10, 10);
        let bytes = [b'x'; 70];
        serial.feed(&bytes);

        assert!(ingest.poll(&mut serial, SerialMode::Text, &mut g).unwrap());
        assert_eq!(ingest.buffer().len(), 70);
        assert_eq!(ingest.fresh_bytes().len(), 70);
        assert_eq!(serial.available(), 0);
    }

    #[test]
    fn test_poll_same_bytes_still_reports_change() {
        let mut ingest = SerialIngest::<64>::new(4).unwrap();
        let mut serial = MockSerial::new();
        let mut g = grid(2, 2);

        serial.feed(b"abab");
        assert!(ingest.poll(&mut serial, SerialMode::Text, &mut g).unwrap());
        serial.feed(b"ab");
        assert!(ingest.poll(&mut serial, SerialMode::Text, &mut g).unwrap());
        assert_eq!(g.as_str(), "ab\nab");
    }

    #[test]
    fn test_mode_change_clears_buffer() {
        let mut ingest = SerialIngest::<64>::new(12).unwrap();
        let mut serial = MockSerial::new();
        let mut g = grid(4, 3);

        serial.feed(b"old");
        ingest.poll(&mut serial, SerialMode::Text, &mut g).unwrap();
        serial.feed(&[0xAB]);
        ingest.poll(&mut serial, SerialMode::Binary, &mut g).unwrap();

        assert_eq!(ingest.buffer().as_slice(), &[0xAB]);
        assert_eq!(g.as_str(), "AB");
    }

    #[test]
    fn test_mode_change_without_data_keeps_grid() {
        let mut ingest = SerialIngest::<64>::new(12).unwrap();
        let mut serial = MockSerial::new();
        let mut g = grid(4, 3);

        serial.feed(b"old");
        ingest.poll(&mut serial, SerialMode::Text, &mut g).unwrap();
        assert!(!ingest.poll(&mut serial, SerialMode::Binary, &mut g).unwrap());

        assert!(ingest.buffer().is_empty());
        assert_eq!(g.as_str(), "old");
    }
}
