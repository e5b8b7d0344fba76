//! Probe screen
//!
//! White background with the "i2cu" title. Once there is something to show,
//! the probe label covers the screen: near-black with light blue text for
//! the bus list and yellow text for serial data. Status messages sit on two
//! silver bars across the middle.
//!
//! Setters only mark the scene stale. [`ProbeView::refresh`] redraws it into
//! the framebuffer and flushes the changed region in horizontal bands, one
//! transfer buffer full at a time, while the [`FlushGate`] allows it.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_8X13, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;
use i2cu_core::grid::GridGeometry;
use i2cu_core::traits::{ProbeSource, ProbeView};
use i2cu_hal::panel::PanelTransport;

use crate::backend::{DisplayError, FlushSink};
use crate::flush::FlushGate;
use crate::framebuffer::{FrameBuffer, Region};

/// Panel width in pixels (portrait)
pub const SCREEN_WIDTH: u16 = 135;

/// Panel height in pixels (portrait)
pub const SCREEN_HEIGHT: u16 = 240;

/// Probe text storage; covers the grid of the largest supported panel
pub const PROBE_TEXT_CAPACITY: usize = 320;

const TITLE: &str = "i2cu";
const TITLE_FONT: MonoFont<'static> = FONT_10X20;
const PROBE_FONT: MonoFont<'static> = FONT_8X13;
const OVERLAY_TITLE_FONT: MonoFont<'static> = FONT_10X20;
const OVERLAY_VALUE_FONT: MonoFont<'static> = FONT_9X15;

const PROBE_PADDING: u16 = 4;
const OVERLAY_BAR_HEIGHT: u16 = 28;

const BACKGROUND: Rgb565 = Rgb565::WHITE;
const TITLE_COLOR: Rgb565 = Rgb565::BLACK;
/// Black at 85% over white
const PROBE_BACKGROUND: Rgb565 = Rgb565::new(4, 9, 4);
const BUS_TEXT: Rgb565 = Rgb565::new(21, 54, 28);
const SERIAL_TEXT: Rgb565 = Rgb565::YELLOW;
const OVERLAY_BACKGROUND: Rgb565 = Rgb565::new(24, 48, 24);
const OVERLAY_TEXT: Rgb565 = Rgb565::BLACK;

type OverlayText = String<16>;

/// The probe UI on an RGB565 panel
pub struct ProbeScreen<'a, S: FlushSink> {
    fb: FrameBuffer<'a>,
    sink: S,
    gate: &'a FlushGate,
    primary: &'a mut [u16],
    secondary: Option<&'a mut [u16]>,
    next_in_secondary: bool,
    /// Band copied into a transfer buffer but not yet submitted
    staged: Option<(Region, bool)>,
    /// Changed area not yet copied out
    pending: Option<Region>,
    probe_text: String<PROBE_TEXT_CAPACITY>,
    probe_source: Option<ProbeSource>,
    overlay: Option<(OverlayText, OverlayText)>,
    scene_stale: bool,
}

impl<'a, S: FlushSink> ProbeScreen<'a, S> {
    /// Build the screen
    ///
    /// Each transfer buffer must hold at least one framebuffer row. Without
    /// a `secondary` buffer the next band can only be prepared once the
    /// previous transfer has finished.
    pub fn new(
        fb: FrameBuffer<'a>,
        sink: S,
        gate: &'a FlushGate,
        primary: &'a mut [u16],
        secondary: Option<&'a mut [u16]>,
    ) -> Result<Self, DisplayError> {
        let row = fb.width() as usize;
        if primary.len() < row || secondary.as_ref().is_some_and(|b| b.len() < row) {
            return Err(DisplayError::BufferTooSmall);
        }
        let mut fb = fb;
        fb.mark_all_dirty();
        Ok(Self {
            fb,
            sink,
            gate,
            primary,
            secondary,
            next_in_secondary: false,
            staged: None,
            pending: None,
            probe_text: String::new(),
            probe_source: None,
            overlay: None,
            scene_stale: true,
        })
    }

    /// Character grid that fits the probe label
    pub fn probe_geometry(&self) -> GridGeometry {
        probe_geometry(self.fb.width(), self.fb.height())
    }

    pub fn is_double_buffered(&self) -> bool {
        self.secondary.is_some()
    }

    /// Nothing left to flush
    pub fn is_idle(&self) -> bool {
        !self.scene_stale && self.pending.is_none() && self.staged.is_none() && !self.fb.is_dirty()
    }

    pub fn framebuffer(&self) -> &FrameBuffer<'a> {
        &self.fb
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn render_scene(&mut self) -> Result<(), Infallible> {
        let width = self.fb.width() as i32;
        let height = self.fb.height() as i32;
        let fb = &mut self.fb;

        if let Some(source) = self.probe_source {
            fb.clear(PROBE_BACKGROUND)?;
            let color = match source {
                ProbeSource::Bus => BUS_TEXT,
                ProbeSource::Serial => SERIAL_TEXT,
            };
            // Vertically centered block, left aligned
            let lines = self.probe_text.lines().count().max(1) as i32;
            let block = lines * PROBE_FONT.character_size.height as i32;
            let top = ((height - block) / 2).max(PROBE_PADDING as i32);
            Text::with_baseline(
                &self.probe_text,
                Point::new(PROBE_PADDING as i32, top),
                MonoTextStyle::new(&PROBE_FONT, color),
                Baseline::Top,
            )
            .draw(fb)?;
        } else {
            fb.clear(BACKGROUND)?;
            let title_style = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Bottom)
                .build();
            Text::with_text_style(
                TITLE,
                Point::new(width / 2, height - PROBE_PADDING as i32 * 2),
                MonoTextStyle::new(&TITLE_FONT, TITLE_COLOR),
                title_style,
            )
            .draw(fb)?;
        }

        if let Some((title, value)) = &self.overlay {
            let bar = OVERLAY_BAR_HEIGHT as i32;
            let centered = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build();
            let fill = PrimitiveStyle::with_fill(OVERLAY_BACKGROUND);
            let top = height / 2 - bar;

            Rectangle::new(Point::new(0, top), Size::new(width as u32, 2 * bar as u32))
                .into_styled(fill)
                .draw(fb)?;
            Text::with_text_style(
                title,
                Point::new(width / 2, top + bar / 2),
                MonoTextStyle::new(&OVERLAY_TITLE_FONT, OVERLAY_TEXT),
                centered,
            )
            .draw(fb)?;
            Text::with_text_style(
                value,
                Point::new(width / 2, top + bar + bar / 2),
                MonoTextStyle::new(&OVERLAY_VALUE_FONT, OVERLAY_TEXT),
                centered,
            )
            .draw(fb)?;
        }
        Ok(())
    }

    /// Copy and submit bands until the region is done or the link is busy
    fn flush_pending(&mut self) -> Result<(), DisplayError> {
        loop {
            if self.staged.is_none() {
                let Some(pending) = self.pending else {
                    return Ok(());
                };
                let in_secondary = self.next_in_secondary && self.secondary.is_some();
                // A lone buffer may still be in use by the sink
                if self.secondary.is_none() && !self.gate.is_ready() {
                    return Ok(());
                }
                let buf: &mut [u16] = match (in_secondary, self.secondary.as_deref_mut()) {
                    (true, Some(b)) => b,
                    _ => &mut *self.primary,
                };
                let rows = (buf.len() / pending.width as usize).clamp(1, pending.height as usize);
                let (band, rest) = pending.split_rows(rows as u16);
                self.fb.copy_region(band, buf)?;
                self.pending = rest;
                self.staged = Some((band, in_secondary));
            }

            if !self.gate.begin() {
                return Ok(());
            }
            let Some((band, in_secondary)) = self.staged.take() else {
                self.gate.mark_flush_complete();
                return Ok(());
            };
            let buf: &[u16] = match (in_secondary, self.secondary.as_deref()) {
                (true, Some(b)) => b,
                _ => &*self.primary,
            };
            if let Err(e) = self
                .sink
                .flush(band.x, band.y, band.width, band.height, &buf[..band.area()])
            {
                // Keep the band for the next refresh
                self.gate.mark_flush_complete();
                self.staged = Some((band, in_secondary));
                return Err(e);
            }
            self.next_in_secondary = !in_secondary;
        }
    }
}

/// Character grid for a panel of the given size
pub fn probe_geometry(width: u16, height: u16) -> GridGeometry {
    let size = PROBE_FONT.character_size;
    GridGeometry::new(
        width.saturating_sub(2 * PROBE_PADDING) / size.width as u16,
        height.saturating_sub(2 * PROBE_PADDING) / size.height as u16,
    )
}

impl<S: FlushSink + PanelTransport> ProbeView for ProbeScreen<'_, S> {
    type Error = DisplayError;
    type Panel = S;

    fn set_probe_text(&mut self, text: &str, source: ProbeSource) {
        self.probe_text.clear();
        for c in text.chars() {
            if self.probe_text.push(c).is_err() {
                break;
            }
        }
        self.probe_source = Some(source);
        self.scene_stale = true;
    }

    fn show_overlay(&mut self, title: &str, value: &str) {
        let mut t = OverlayText::new();
        let mut v = OverlayText::new();
        let _ = t.push_str(title);
        let _ = v.push_str(value);
        self.overlay = Some((t, v));
        self.scene_stale = true;
    }

    fn hide_overlay(&mut self) {
        if self.overlay.take().is_some() {
            self.scene_stale = true;
        }
    }

    fn refresh(&mut self) -> Result<(), DisplayError> {
        if self.scene_stale {
            if let Err(e) = self.render_scene() {
                match e {}
            }
            self.scene_stale = false;
        }
        if let Some(dirty) = self.fb.take_dirty() {
            self.pending = Some(match self.pending {
                Some(p) => p.union(&dirty),
                None => dirty,
            });
        }
        self.flush_pending()
    }

    fn panel(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use embedded_graphics::pixelcolor::IntoStorage;
    use std::vec;
    use std::vec::Vec;

    struct MockSink<'g> {
        gate: &'g FlushGate,
        auto_complete: bool,
        bands: Vec<Region>,
        commands: Vec<u8>,
    }

    impl<'g> MockSink<'g> {
        fn new(gate: &'g FlushGate, auto_complete: bool) -> Self {
            Self {
                gate,
                auto_complete,
                bands: Vec::new(),
                commands: Vec::new(),
            }
        }

        fn flushed_area(&self) -> usize {
            self.bands.iter().map(|b| b.area()).sum()
        }
    }

    impl FlushSink for MockSink<'_> {
        fn flush(&mut self, x: u16, y: u16, width: u16, height: u16, pixels: &[u16]) -> Result<(), DisplayError> {
            assert_eq!(pixels.len(), width as usize * height as usize);
            self.bands.push(Region::new(x, y, width, height));
            if self.auto_complete {
                self.gate.mark_flush_complete();
            }
            Ok(())
        }
    }

    impl PanelTransport for MockSink<'_> {
        type Error = ();

        fn command(&mut self, code: u8, _params: &[u8]) -> Result<(), ()> {
            self.commands.push(code);
            Ok(())
        }
    }

    const W: u16 = SCREEN_WIDTH;
    const H: u16 = SCREEN_HEIGHT;
    const BAND_ROWS: usize = 40;

    struct Buffers {
        fb: Vec<u16>,
        primary: Vec<u16>,
        secondary: Vec<u16>,
    }

    impl Buffers {
        fn new() -> Self {
            Self {
                fb: vec![0; W as usize * H as usize],
                primary: vec![0; W as usize * BAND_ROWS],
                secondary: vec![0; W as usize * BAND_ROWS],
            }
        }
    }

    fn screen<'a>(
        buffers: &'a mut Buffers,
        gate: &'a FlushGate,
        auto_complete: bool,
        double: bool,
    ) -> ProbeScreen<'a, MockSink<'a>> {
        let fb = FrameBuffer::new(&mut buffers.fb, W, H).unwrap();
        let secondary = if double {
            Some(buffers.secondary.as_mut_slice())
        } else {
            None
        };
        ProbeScreen::new(
            fb,
            MockSink::new(gate, auto_complete),
            gate,
            &mut buffers.primary,
            secondary,
        )
        .unwrap()
    }

    #[test]
    fn test_probe_geometry() {
        assert_eq!(probe_geometry(W, H), GridGeometry::new(15, 17));
    }

    #[test]
    fn test_rejects_small_transfer_buffer() {
        let gate = FlushGate::new();
        let mut fb_storage = vec![0u16; W as usize * H as usize];
        let mut tiny = vec![0u16; 16];
        let fb = FrameBuffer::new(&mut fb_storage, W, H).unwrap();

        let result = ProbeScreen::new(fb, MockSink::new(&gate, true), &gate, &mut tiny, None);
        assert_eq!(result.err(), Some(DisplayError::BufferTooSmall));
    }

    #[test]
    fn test_first_refresh_flushes_whole_screen() {
        let gate = FlushGate::new();
        let mut buffers = Buffers::new();
        let mut screen = screen(&mut buffers, &gate, true, false);

        screen.refresh().unwrap();

        let sink = screen.sink_mut();
        assert_eq!(sink.flushed_area(), W as usize * H as usize);
        assert!(sink.bands.iter().all(|b| b.height as usize <= BAND_ROWS));
        assert_eq!(sink.bands[0], Region::new(0, 0, W, BAND_ROWS as u16));
        assert!(screen.is_idle());
    }

    #[test]
    fn test_unchanged_scene_flushes_nothing() {
        let gate = FlushGate::new();
        let mut buffers = Buffers::new();
        let mut screen = screen(&mut buffers, &gate, true, false);
        screen.refresh().unwrap();
        let before = screen.sink_mut().bands.len();

        screen.refresh().unwrap();

        assert_eq!(screen.sink_mut().bands.len(), before);
    }

    #[test]
    fn test_probe_text_covers_screen() {
        let gate = FlushGate::new();
        let mut buffers = Buffers::new();
        let mut screen = screen(&mut buffers, &gate, true, false);
        screen.refresh().unwrap();
        assert_eq!(screen.framebuffer().pixel(0, 0), Some(BACKGROUND.into_storage()));

        screen.set_probe_text("0x10:16\n0x42:66", ProbeSource::Bus);
        screen.refresh().unwrap();

        assert_eq!(
            screen.framebuffer().pixel(0, 0),
            Some(PROBE_BACKGROUND.into_storage())
        );
        let fb = screen.framebuffer();
        let has_text = (0..H).any(|y| (0..W).any(|x| fb.pixel(x, y) == Some(BUS_TEXT.into_storage())));
        assert!(has_text);
    }

    #[test]
    fn test_busy_gate_defers_remaining_bands() {
        let gate = FlushGate::new();
        let mut buffers = Buffers::new();
        let mut screen = screen(&mut buffers, &gate, false, false);

        screen.refresh().unwrap();
        assert_eq!(screen.sink_mut().bands.len(), 1);
        assert!(!screen.is_idle());

        // Still busy: nothing new goes out
        screen.refresh().unwrap();
        assert_eq!(screen.sink_mut().bands.len(), 1);

        while !screen.is_idle() {
            gate.mark_flush_complete();
            screen.refresh().unwrap();
        }
        assert_eq!(screen.sink_mut().flushed_area(), W as usize * H as usize);
    }

    #[test]
    fn test_second_buffer_stages_ahead() {
        let gate = FlushGate::new();
        let mut buffers = Buffers::new();
        let mut screen = screen(&mut buffers, &gate, false, true);
        assert!(screen.is_double_buffered());

        screen.refresh().unwrap();

        // One band in flight, the next already copied out
        assert_eq!(screen.sink_mut().bands.len(), 1);
        assert_eq!(
            screen.staged,
            Some((Region::new(0, BAND_ROWS as u16, W, BAND_ROWS as u16), true))
        );

        gate.mark_flush_complete();
        screen.refresh().unwrap();
        assert_eq!(screen.sink_mut().bands[1].y, BAND_ROWS as u16);
    }

    #[test]
    fn test_overlay_show_and_hide() {
        let gate = FlushGate::new();
        let mut buffers = Buffers::new();
        let mut screen = screen(&mut buffers, &gate, true, false);
        screen.refresh().unwrap();
        let bar_pixel = (0, H / 2 - 1);

        screen.show_overlay("[ mode ]", "bin");
        screen.refresh().unwrap();
        assert_eq!(
            screen.framebuffer().pixel(bar_pixel.0, bar_pixel.1),
            Some(OVERLAY_BACKGROUND.into_storage())
        );

        screen.hide_overlay();
        screen.refresh().unwrap();
        assert_eq!(
            screen.framebuffer().pixel(bar_pixel.0, bar_pixel.1),
            Some(BACKGROUND.into_storage())
        );
    }

    #[test]
    fn test_panel_commands_reach_sink() {
        let gate = FlushGate::new();
        let mut buffers = Buffers::new();
        let mut screen = screen(&mut buffers, &gate, true, false);

        screen.panel().command(0x10, &[]).unwrap();

        assert_eq!(screen.sink_mut().commands, vec![0x10]);
    }
}
