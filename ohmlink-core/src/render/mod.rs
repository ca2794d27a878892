//! Render engine
//!
//! Turns the latest reading into a particle animation on the matrix, a zoned
//! chase on the strip and a smoothed lamp level. Everything here is sized at
//! compile time; a tick does the same amount of work in every state.

pub mod brightness;
pub mod engine;
pub mod framebuffer;
pub mod mapping;
pub mod palette;
pub mod particles;
pub mod path;
pub mod strip;

pub use brightness::SlewLimiter;
pub use engine::{RenderEngine, TickReport};
pub use framebuffer::{Framebuffer, StripBuffer};
pub use mapping::LiveParams;
pub use particles::{Particle, ParticleField};
pub use strip::StripAnimator;
