//! Per-tick render pipeline
//!
//! Fixed update order every tick: state, particles, matrix, strip, lamp.

use ohmlink_protocol::{Band, Reading};
use smart_leds::RGB8;

use super::brightness::SlewLimiter;
use super::mapping::LiveParams;
use super::palette::{self, BLACK};
use super::particles::{HeatRate, ParticleField};
use super::path::{self, PATH_LEN};
use super::strip::StripAnimator;
use crate::config::RenderConfig;
use crate::state::{EngineState, Event};
use crate::traits::{AnalogOutput, MatrixSurface, StripSurface};

/// Resistor body outline, inclusive
const BODY_LEFT: u16 = 47;
const BODY_RIGHT: u16 = 57;
const BODY_TOP: u16 = 1;
const BODY_BOTTOM: u16 = 7;

/// Columns of the four colour bands inside the body
const BAND_COLUMNS: [u16; 4] = [49, 51, 53, 55];

/// Battery glyph on the left wire: plate columns and rows, inclusive
const BATTERY_PLATES: [u16; 2] = [3, 5];
const BATTERY_TOP: u16 = 12;
const BATTERY_BOTTOM: u16 = 20;
/// Polarity dots above (+) and below (-) the plates
const BATTERY_TERMINALS: [(u16, u16); 2] = [(4, 10), (4, 22)];

/// Corner pieces joining the horizontal wires to the verticals: (x range, y)
const CORNERS: [(u16, u16, u16); 4] = [(2, 6, 4), (60, 61, 4), (2, 6, 27), (60, 61, 27)];

/// Current-direction marks on the top and bottom wires
const DIRECTION_DOTS: [(u16, u16); 4] = [(20, 4), (35, 4), (35, 27), (20, 27)];

/// Circuit brightness while idle
const IDLE_CIRCUIT_LEVEL: u8 = 96;

/// Lowest idle breathing intensity
const BREATH_FLOOR: u8 = 64;

/// What a tick did, for the caller to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// State after the tick
    pub state: EngineState,
    /// True if this tick changed the state
    pub transitioned: bool,
}

/// Render engine
///
/// Owns all animation state. Sinks are passed into each tick so the engine
/// never holds a hardware handle.
#[derive(Debug, Clone)]
pub struct RenderEngine {
    config: RenderConfig,
    state: EngineState,
    /// Last reading accepted, kept across malformed frames and idle periods
    latest: Option<Reading>,
    params: Option<LiveParams>,
    particles: ParticleField,
    strip: StripAnimator,
    lamp: SlewLimiter,
    last_tick_ms: Option<u64>,
    /// Position within the idle breathing cycle
    idle_phase_ms: u32,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl RenderEngine {
    /// Create an engine in the idle state
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            state: EngineState::Idle,
            latest: None,
            params: None,
            particles: ParticleField::new(),
            strip: StripAnimator::new(),
            lamp: SlewLimiter::new(config.lamp_step),
            last_tick_ms: None,
            idle_phase_ms: 0,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Most recent reading the engine accepted
    pub fn latest_reading(&self) -> Option<Reading> {
        self.latest
    }

    /// Current (slewed) lamp level
    pub fn lamp_level(&self) -> u16 {
        self.lamp.current()
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Advance one frame
    ///
    /// `input` is the reading decoded this tick, if any; `connected` is the
    /// receiver's liveness verdict at `now_ms`.
    pub fn tick<M, S, A>(
        &mut self,
        input: Option<Reading>,
        connected: bool,
        now_ms: u64,
        matrix: &mut M,
        strip: &mut S,
        lamp: &mut A,
    ) -> TickReport
    where
        M: MatrixSurface,
        S: StripSurface,
        A: AnalogOutput,
    {
        let dt_ms = self.elapsed_ms(now_ms);

        if let Some(reading) = input {
            self.latest = Some(reading);
            self.params = Some(LiveParams::from_reading(&self.config, &reading));
        }

        let previous = self.state;
        let event = if !connected {
            Some(Event::LinkLost)
        } else if input.is_some() {
            Some(Event::ReadingReceived)
        } else {
            None
        };
        if let Some(event) = event {
            self.state = self.state.transition(event);
        }

        let transitioned = self.state != previous;
        if transitioned && !self.state.is_live() {
            self.enter_idle();
        }

        match (self.state, self.params) {
            (EngineState::Live, Some(params)) => self.render_live(&params, dt_ms, matrix, strip),
            _ => self.render_idle(dt_ms, matrix, strip),
        }

        lamp.set_level(self.lamp.update());

        TickReport {
            state: self.state,
            transitioned,
        }
    }

    /// Time since the previous tick, clamped
    fn elapsed_ms(&mut self, now_ms: u64) -> u32 {
        let dt = match self.last_tick_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_tick_ms = Some(now_ms);
        dt.min(self.config.max_dt_ms as u64) as u32
    }

    /// Only the idle timing restarts; particles keep their positions
    fn enter_idle(&mut self) {
        self.idle_phase_ms = 0;
        self.strip.reset();
    }

    fn render_live<M: MatrixSurface, S: StripSurface>(
        &mut self,
        params: &LiveParams,
        dt_ms: u32,
        matrix: &mut M,
        strip: &mut S,
    ) {
        let heat = HeatRate {
            rise: self.config.heat_rise,
            decay: self.config.heat_decay,
        };
        self.particles
            .advance(params.speed, params.load_factor, dt_ms, heat);

        draw_circuit(matrix, u8::MAX);
        let bands = self.latest.map(|r| r.bands());
        draw_body(matrix, palette::WHITE, bands);
        for p in self.particles.iter() {
            let (x, y) = path::point(p.position);
            matrix.set_pixel(x, y, palette::blend(palette::CYAN, palette::ORANGE, p.heat));
        }

        self.strip.live(params, self.particles.mean_heat(), strip);
        self.lamp.set_target(params.lamp_level);
    }

    fn render_idle<M: MatrixSurface, S: StripSurface>(
        &mut self,
        dt_ms: u32,
        matrix: &mut M,
        strip: &mut S,
    ) {
        let period = self.config.breath_period_ms.max(2);
        self.idle_phase_ms = (self.idle_phase_ms + dt_ms) % period;
        let level = breath_level(self.idle_phase_ms, period);

        self.particles
            .drift(self.config.idle_speed, dt_ms, self.config.heat_decay);

        draw_circuit(matrix, IDLE_CIRCUIT_LEVEL);
        draw_body(matrix, palette::DIM_WHITE, None);
        let color = palette::scale(palette::DIM_WHITE, level);
        for p in self.particles.iter() {
            let (x, y) = path::point(p.position);
            matrix.set_pixel(x, y, color);
        }

        self.strip.idle(strip);
        self.lamp.set_target(0);
    }
}

/// Triangle wave between [`BREATH_FLOOR`] and 255
fn breath_level(phase_ms: u32, period_ms: u32) -> u8 {
    let half = period_ms / 2;
    let rising = if phase_ms < half {
        phase_ms
    } else {
        period_ms - phase_ms
    };
    let span = (255 - BREATH_FLOOR) as u32;
    BREATH_FLOOR + (rising.min(half) * span / half.max(1)) as u8
}

/// Background, wire loop with its corners, battery and direction marks
fn draw_circuit<M: MatrixSurface>(matrix: &mut M, level: u8) {
    let wire = palette::scale(palette::WIRE, level);
    let battery = palette::scale(palette::BATTERY, level);
    let marks = palette::scale(palette::DIM_WHITE, level);
    let terminals = palette::scale(palette::WHITE, level);

    matrix.fill(BLACK);
    for i in 0..PATH_LEN {
        let (x, y) = path::point(i);
        matrix.set_pixel(x, y, wire);
    }
    for (left, right, y) in CORNERS {
        for x in left..=right {
            matrix.set_pixel(x, y, wire);
        }
    }

    for x in BATTERY_PLATES {
        for y in BATTERY_TOP..=BATTERY_BOTTOM {
            matrix.set_pixel(x, y, battery);
        }
    }
    for x in BATTERY_PLATES[0]..=BATTERY_PLATES[1] {
        matrix.set_pixel(x, BATTERY_TOP, battery);
        matrix.set_pixel(x, BATTERY_BOTTOM, battery);
    }
    for (x, y) in BATTERY_TERMINALS {
        matrix.set_pixel(x, y, terminals);
    }

    for (x, y) in DIRECTION_DOTS {
        matrix.set_pixel(x, y, marks);
    }
}

/// Resistor body outline, with colour bands when known
fn draw_body<M: MatrixSurface>(matrix: &mut M, outline: RGB8, bands: Option<[Band; 4]>) {
    for x in BODY_LEFT..=BODY_RIGHT {
        matrix.set_pixel(x, BODY_TOP, outline);
        matrix.set_pixel(x, BODY_BOTTOM, outline);
    }
    for y in BODY_TOP..=BODY_BOTTOM {
        matrix.set_pixel(BODY_LEFT, y, outline);
        matrix.set_pixel(BODY_RIGHT, y, outline);
    }

    if let Some(bands) = bands {
        for (&x, &band) in BAND_COLUMNS.iter().zip(bands.iter()) {
            for y in BODY_TOP + 1..BODY_BOTTOM {
                matrix.set_pixel(x, y, palette::band_color(band));
            }
        }
    }
}
