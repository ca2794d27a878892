//! Output sink traits driven by the render engine
//!
//! All sinks are assumed present once initialised. Writes land in the sink's
//! own buffer; the firmware pushes that buffer to hardware after each tick.

use smart_leds::RGB8;

/// Pixel-addressable 2D surface (the LED matrix)
pub trait MatrixSurface {
    /// Surface size as (width, height) in pixels
    fn size(&self) -> (u16, u16);

    /// Set one pixel
    ///
    /// Out-of-bounds coordinates must be ignored.
    fn set_pixel(&mut self, x: u16, y: u16, color: RGB8);

    /// Fill the whole surface with one colour
    fn fill(&mut self, color: RGB8) {
        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                self.set_pixel(x, y, color);
            }
        }
    }
}

/// Indexed 1D surface (the addressable LED strip)
pub trait StripSurface {
    /// Number of pixels on the strip
    fn len(&self) -> usize;

    /// Check if the strip has no pixels
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set one pixel; out-of-range indices must be ignored
    fn set_pixel(&mut self, index: usize, color: RGB8);
}

/// Single smoothed analog output (the lamp)
pub trait AnalogOutput {
    /// Set the output level, 0 = off, `u16::MAX` = full scale
    fn set_level(&mut self, level: u16);
}
