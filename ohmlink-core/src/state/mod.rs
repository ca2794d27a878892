//! State machine for the render engine
//!
//! Explicit, finite and deterministic: two states, two events.

pub mod machine;

pub use machine::{EngineState, Event};
