//! Colours and integer blending

use ohmlink_protocol::Band;
use smart_leds::RGB8;

pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
pub const DIM_WHITE: RGB8 = RGB8 { r: 60, g: 60, b: 60 };
pub const WIRE: RGB8 = RGB8 { r: 0, g: 80, b: 0 };
/// Battery plates
pub const BATTERY: RGB8 = RGB8 { r: 220, g: 200, b: 0 };
/// Cool particles, outside the load
pub const CYAN: RGB8 = RGB8 { r: 0, g: 200, b: 200 };
/// Hot particles, inside the load
pub const ORANGE: RGB8 = RGB8 { r: 220, g: 120, b: 0 };
/// Strip chase at zero current
pub const STRIP_COLD: RGB8 = RGB8 { r: 0, g: 0, b: 255 };
/// Strip chase at full scale
pub const STRIP_HOT: RGB8 = RGB8 { r: 255, g: 100, b: 0 };
/// Idle strip dot
pub const STRIP_IDLE: RGB8 = RGB8 { r: 0, g: 0, b: 40 };

/// Blend `from` toward `to` by `t` (0 = from, 255 = to)
pub fn blend(from: RGB8, to: RGB8, t: u8) -> RGB8 {
    let mix = |a: u8, b: u8| -> u8 {
        let t = t as u16;
        ((a as u16 * (255 - t) + b as u16 * t) / 255) as u8
    };
    RGB8 {
        r: mix(from.r, to.r),
        g: mix(from.g, to.g),
        b: mix(from.b, to.b),
    }
}

/// Scale a colour by `level` (255 = unchanged)
pub fn scale(color: RGB8, level: u8) -> RGB8 {
    blend(BLACK, color, level)
}

/// Display colour of a resistor band
pub fn band_color(band: Band) -> RGB8 {
    let (r, g, b) = band.rgb();
    RGB8 { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(CYAN, ORANGE, 0), CYAN);
        assert_eq!(blend(CYAN, ORANGE, 255), ORANGE);
    }

    #[test]
    fn test_blend_midpoint() {
        let mid = blend(BLACK, WHITE, 128);
        assert_eq!(mid, RGB8 { r: 128, g: 128, b: 128 });
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(WHITE, 0), BLACK);
        assert_eq!(scale(DIM_WHITE, 255), DIM_WHITE);
    }

    #[test]
    fn test_band_color() {
        assert_eq!(band_color(Band::Black), BLACK);
        assert_eq!(band_color(Band::White), WHITE);
    }
}
