//! Render configuration
//!
//! Device tunables are compile-time defaults; there is no config storage on
//! the display node.

/// LED matrix width in pixels
pub const MATRIX_WIDTH: usize = 64;

/// LED matrix height in pixels
pub const MATRIX_HEIGHT: usize = 32;

/// Pixels on the addressable strip
pub const STRIP_LEN: usize = 30;

/// Particles on the matrix path
pub const NUM_PARTICLES: usize = 8;

/// Render tick period used by the firmware
pub const TICK_MS: u64 = 80;

/// Tunables for the reading-to-animation mapping
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderConfig {
    /// Supply voltage across the measured resistor (V)
    pub supply_volts: f32,
    /// Resistance floor used to derive current (Ω)
    pub min_ohms: f32,
    /// Current at which lamp and strip reach full scale (A)
    pub full_scale_amps: f32,
    /// Particle speed per amp (path steps/s per A)
    pub speed_per_amp: f32,
    /// Slowest live particle speed (steps/s)
    pub min_speed: f32,
    /// Fastest live particle speed (steps/s)
    pub max_speed: f32,
    /// Resistance at which load-zone speed halves (Ω)
    pub load_knee_ohms: f32,
    /// Lower bound of the load-zone speed factor
    pub min_load_factor: f32,
    /// Idle drift speed (steps/s)
    pub idle_speed: f32,
    /// Heat gained per tick inside the load zone
    pub heat_rise: u8,
    /// Heat lost per tick outside the load zone
    pub heat_decay: u8,
    /// Lamp level change per tick
    pub lamp_step: u16,
    /// Idle breathing period (ms)
    pub breath_period_ms: u32,
    /// Elapsed time per tick is clamped to this (ms)
    pub max_dt_ms: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            supply_volts: 3.3,
            min_ohms: 0.1,
            full_scale_amps: 0.033,
            speed_per_amp: 12_000.0,
            min_speed: 20.0,
            max_speed: 120.0,
            load_knee_ohms: 1_000.0,
            min_load_factor: 0.2,
            // One step per 80 ms
            idle_speed: 12.5,
            heat_rise: 48,
            heat_decay: 16,
            lamp_step: 4096,
            breath_period_ms: 2_000,
            max_dt_ms: 100,
        }
    }
}
