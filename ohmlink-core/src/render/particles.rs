//! Particle simulation along the circuit path
//!
//! A fixed set of particles, created once and moved in place. Motion is a
//! fractional accumulator per particle so slow speeds still advance
//! smoothly at any tick rate.

use crate::config::NUM_PARTICLES;

use super::path::{in_load_zone, PATH_LEN};

/// Initial gap between neighbouring particles
pub const PARTICLE_SPACING: u16 = PATH_LEN / NUM_PARTICLES as u16;

/// One particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Path index, always below [`PATH_LEN`]
    pub position: u16,
    /// Fractional step carried between ticks, 0.0..1.0
    phase: f32,
    /// 0 = cool, 255 = fully heated
    pub heat: u8,
}

impl Particle {
    const fn at(position: u16) -> Self {
        Self {
            position,
            phase: 0.0,
            heat: 0,
        }
    }

    pub fn in_load_zone(&self) -> bool {
        in_load_zone(self.position)
    }

    /// Move by `speed` steps/s for `dt_ms`
    fn advance(&mut self, speed: f32, dt_ms: u32) {
        self.phase += speed * dt_ms as f32 / 1000.0;
        if self.phase.is_nan() || self.phase < 0.0 {
            // Negative or NaN speed; hold position
            self.phase = 0.0;
            return;
        }
        let steps = self.phase as u32;
        self.phase -= steps as f32;
        self.position = ((self.position as u32 + steps) % PATH_LEN as u32) as u16;
    }
}

/// Heat adjustment applied per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatRate {
    /// Gain per tick inside the load zone
    pub rise: u8,
    /// Loss per tick elsewhere
    pub decay: u8,
}

/// All particles on the path
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: [Particle; NUM_PARTICLES],
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleField {
    /// Particles evenly spaced from the path origin, all cool
    pub fn new() -> Self {
        let mut particles = [Particle::at(0); NUM_PARTICLES];
        for (i, p) in particles.iter_mut().enumerate() {
            p.position = i as u16 * PARTICLE_SPACING;
        }
        Self { particles }
    }

    /// Live step: base speed outside the load, slowed inside it
    ///
    /// The zone check uses the position at the start of the tick, so a
    /// particle crossing the zone boundary moves at one speed for the whole
    /// tick.
    pub fn advance(&mut self, speed: f32, load_factor: f32, dt_ms: u32, heat: HeatRate) {
        for p in self.particles.iter_mut() {
            let in_zone = p.in_load_zone();
            let speed = if in_zone { speed * load_factor } else { speed };
            p.advance(speed, dt_ms);

            p.heat = if in_zone {
                p.heat.saturating_add(heat.rise)
            } else {
                p.heat.saturating_sub(heat.decay)
            };
        }
    }

    /// Idle step: uniform drift, heat bleeds off everywhere
    pub fn drift(&mut self, speed: f32, dt_ms: u32, decay: u8) {
        for p in self.particles.iter_mut() {
            p.advance(speed, dt_ms);
            p.heat = p.heat.saturating_sub(decay);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Average heat across all particles
    pub fn mean_heat(&self) -> u8 {
        let total: u32 = self.particles.iter().map(|p| p.heat as u32).sum();
        (total / NUM_PARTICLES as u32) as u8
    }
}
