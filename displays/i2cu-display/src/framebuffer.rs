//! RGB565 framebuffer with dirty-region tracking
//!
//! Pixels are stored as raw RGB565 words in row-major order. Every write
//! that actually changes a pixel grows the dirty region; the screen takes
//! that region and flushes only it.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::backend::DisplayError;

/// Axis-aligned pixel region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest region covering both
    pub fn union(&self, other: &Region) -> Region {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        Region::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Split off the top `rows` rows; returns (top, rest)
    pub fn split_rows(&self, rows: u16) -> (Region, Option<Region>) {
        if rows >= self.height {
            return (*self, None);
        }
        let top = Region::new(self.x, self.y, self.width, rows);
        let rest = Region::new(self.x, self.y + rows, self.width, self.height - rows);
        (top, Some(rest))
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Drawable RGB565 framebuffer over caller-provided storage
pub struct FrameBuffer<'a> {
    pixels: &'a mut [u16],
    width: u16,
    height: u16,
    dirty: Option<Region>,
}

impl<'a> FrameBuffer<'a> {
    /// Wrap `pixels`; it must hold at least `width * height` words
    pub fn new(pixels: &'a mut [u16], width: u16, height: u16) -> Result<Self, DisplayError> {
        let needed = width as usize * height as usize;
        if pixels.len() < needed {
            return Err(DisplayError::BufferTooSmall);
        }
        Ok(Self {
            pixels: &mut pixels[..needed],
            width,
            height,
            dirty: None,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raw pixel at (`x`, `y`)
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Region changed since the last `take_dirty`
    pub fn take_dirty(&mut self) -> Option<Region> {
        self.dirty.take()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Force the whole buffer to be flushed again
    pub fn mark_all_dirty(&mut self) {
        self.dirty = Some(Region::new(0, 0, self.width, self.height));
    }

    /// Copy `region` row by row into `out`; returns the words written
    pub fn copy_region(&self, region: Region, out: &mut [u16]) -> Result<usize, DisplayError> {
        if region.x + region.width > self.width || region.y + region.height > self.height {
            return Err(DisplayError::InvalidCoordinates);
        }
        if out.len() < region.area() {
            return Err(DisplayError::BufferTooSmall);
        }
        let stride = self.width as usize;
        let w = region.width as usize;
        for (row, chunk) in out.chunks_exact_mut(w).take(region.height as usize).enumerate() {
            let start = (region.y as usize + row) * stride + region.x as usize;
            chunk.copy_from_slice(&self.pixels[start..start + w]);
        }
        Ok(region.area())
    }

    fn set(&mut self, x: u16, y: u16, raw: u16) {
        let index = y as usize * self.width as usize + x as usize;
        if self.pixels[index] != raw {
            self.pixels[index] = raw;
            let touched = Region::new(x, y, 1, 1);
            self.dirty = Some(match self.dirty {
                Some(d) => d.union(&touched),
                None => touched,
            });
        }
    }
}

impl DrawTarget for FrameBuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= self.width as i32 || point.y >= self.height as i32 {
                continue;
            }
            self.set(point.x as u16, point.y as u16, color.into_storage());
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let raw = color.into_storage();
        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                self.set(x as u16, y as u16, raw);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_rejects_short_storage() {
        let mut storage = [0u16; 10];
        assert_eq!(
            FrameBuffer::new(&mut storage, 4, 4).err(),
            Some(DisplayError::BufferTooSmall)
        );
    }

    #[test]
    fn test_dirty_covers_changed_pixels() {
        let mut storage = [0u16; 64];
        let mut fb = FrameBuffer::new(&mut storage, 8, 8).unwrap();
        assert!(!fb.is_dirty());

        Pixel(Point::new(2, 1), Rgb565::RED).draw(&mut fb).unwrap();
        Pixel(Point::new(5, 6), Rgb565::RED).draw(&mut fb).unwrap();

        assert_eq!(fb.take_dirty(), Some(Region::new(2, 1, 4, 6)));
        assert_eq!(fb.take_dirty(), None);
    }

    #[test]
    fn test_unchanged_pixels_stay_clean() {
        let mut storage = [0u16; 64];
        let mut fb = FrameBuffer::new(&mut storage, 8, 8).unwrap();

        Rectangle::new(Point::zero(), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
            .draw(&mut fb)
            .unwrap();

        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut storage = [0u16; 64];
        let mut fb = FrameBuffer::new(&mut storage, 8, 8).unwrap();

        Rectangle::new(Point::new(6, -2), Size::new(10, 4))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(&mut fb)
            .unwrap();

        assert_eq!(fb.take_dirty(), Some(Region::new(6, 0, 2, 2)));
        assert_eq!(fb.pixel(7, 1), Some(Rgb565::WHITE.into_storage()));
        assert_eq!(fb.pixel(5, 1), Some(0));
    }

    #[test]
    fn test_copy_region_rows() {
        let mut storage = [0u16; 16];
        for (i, p) in storage.iter_mut().enumerate() {
            *p = i as u16;
        }
        let fb = FrameBuffer::new(&mut storage, 4, 4).unwrap();
        let mut out = [0u16; 4];

        let n = fb.copy_region(Region::new(1, 2, 2, 2), &mut out).unwrap();

        assert_eq!(n, 4);
        assert_eq!(out, [9, 10, 13, 14]);
    }

    #[test]
    fn test_split_rows() {
        let r = Region::new(0, 10, 20, 5);
        assert_eq!(r.split_rows(2), (Region::new(0, 10, 20, 2), Some(Region::new(0, 12, 20, 3))));
        assert_eq!(r.split_rows(5), (r, None));
    }
}
