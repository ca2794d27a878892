//! In-memory render targets
//!
//! The engine draws into these; the firmware then pushes them to the LED
//! chains in one transfer.

use smart_leds::RGB8;

use crate::traits::{MatrixSurface, StripSurface};

/// Fixed-size RGB matrix buffer, row-major
#[derive(Debug, Clone)]
pub struct Framebuffer<const W: usize, const H: usize> {
    rows: [[RGB8; W]; H],
}

impl<const W: usize, const H: usize> Default for Framebuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Framebuffer<W, H> {
    /// All-black buffer
    pub fn new() -> Self {
        Self {
            rows: [[RGB8::default(); W]; H],
        }
    }

    /// Read back one pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<RGB8> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Copy the frame into `out` in serpentine chain order
    ///
    /// Even rows run left to right, odd rows right to left, matching a
    /// zig-zag wired panel. Stops at whichever of the two is shorter.
    pub fn write_serpentine(&self, out: &mut [RGB8]) {
        let mut slots = out.iter_mut();
        for (y, row) in self.rows.iter().enumerate() {
            if y % 2 == 0 {
                for (px, slot) in row.iter().zip(slots.by_ref()) {
                    *slot = *px;
                }
            } else {
                for (px, slot) in row.iter().rev().zip(slots.by_ref()) {
                    *slot = *px;
                }
            }
        }
    }
}

impl<const W: usize, const H: usize> MatrixSurface for Framebuffer<W, H> {
    fn size(&self) -> (u16, u16) {
        (W as u16, H as u16)
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: RGB8) {
        if let Some(px) = self
            .rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *px = color;
        }
    }

    fn fill(&mut self, color: RGB8) {
        for row in self.rows.iter_mut() {
            row.fill(color);
        }
    }
}

/// Fixed-size strip buffer
#[derive(Debug, Clone)]
pub struct StripBuffer<const N: usize> {
    pixels: [RGB8; N],
}

impl<const N: usize> Default for StripBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StripBuffer<N> {
    pub fn new() -> Self {
        Self {
            pixels: [RGB8::default(); N],
        }
    }

    pub fn as_slice(&self) -> &[RGB8] {
        &self.pixels
    }

    /// Pixels as a fixed-size array, the shape LED chain drivers take
    pub fn as_array(&self) -> &[RGB8; N] {
        &self.pixels
    }
}

impl<const N: usize> StripSurface for StripBuffer<N> {
    fn len(&self) -> usize {
        N
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = color;
        }
    }
}
