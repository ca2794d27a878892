//! Zoned strip animation
//!
//! The strip mirrors the circuit: the outer thirds are wire (a chase whose
//! speed, density and colour follow the current) and the middle third is the
//! load, glowing with the particles' heat.

use smart_leds::RGB8;

use super::mapping::LiveParams;
use super::palette::{self, BLACK};
use crate::traits::StripSurface;

/// Chase spacing at zero current
pub const SPACING_MAX: usize = 10;

/// Chase spacing at full scale
pub const SPACING_MIN: usize = 4;

/// Largest chase step per tick
pub const MAX_STEP: usize = 8;

/// Strip chase state
#[derive(Debug, Clone, Default)]
pub struct StripAnimator {
    phase: usize,
}

impl StripAnimator {
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Restart the chase from the first pixel
    pub fn reset(&mut self) {
        self.phase = 0;
    }

    /// Live frame
    pub fn live<S: StripSurface>(&mut self, params: &LiveParams, mean_heat: u8, strip: &mut S) {
        let len = strip.len();
        if len == 0 {
            return;
        }

        self.phase = (self.phase + chase_step(params.amps)) % len;

        let t = params.fraction_u8();
        let lit = palette::blend(palette::STRIP_COLD, palette::STRIP_HOT, t);
        let glow = palette::scale(palette::ORANGE, mean_heat);
        let spacing = chase_spacing(params.fraction);
        let (zone_start, zone_end) = load_zone(len);

        for px in 0..len {
            let color = if px >= zone_start && px < zone_end {
                glow
            } else if (px + len - self.phase) % spacing == 0 {
                lit
            } else {
                BLACK
            };
            strip.set_pixel(px, color);
        }
    }

    /// Idle frame: one dim dot drifting one pixel per tick
    pub fn idle<S: StripSurface>(&mut self, strip: &mut S) {
        let len = strip.len();
        if len == 0 {
            return;
        }

        self.phase = (self.phase + 1) % len;
        for px in 0..len {
            let color: RGB8 = if px == self.phase {
                palette::STRIP_IDLE
            } else {
                BLACK
            };
            strip.set_pixel(px, color);
        }
    }
}

/// Pixels advanced per tick: 1 near zero current, up to [`MAX_STEP`]
pub fn chase_step(amps: f32) -> usize {
    let step = amps * 200.0;
    if step < 1.0 {
        1
    } else {
        (step as usize).min(MAX_STEP)
    }
}

/// Gap between lit pixels for a full-scale fraction
pub fn chase_spacing(fraction: f32) -> usize {
    let shrink = (fraction * (SPACING_MAX - SPACING_MIN) as f32) as usize;
    SPACING_MAX - shrink.min(SPACING_MAX - SPACING_MIN)
}

/// Middle third of the strip as `start..end`
pub fn load_zone(len: usize) -> (usize, usize) {
    (len / 3, len - len / 3)
}
