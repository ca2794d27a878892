//! Board-agnostic core logic for the Ohmlink display node
//!
//! This crate contains all device logic that does not depend on specific
//! hardware:
//!
//! - Source/sink traits (byte source, matrix, strip, lamp)
//! - Telemetry receiver (line framing, decode, liveness)
//! - Render engine (particles, strip zones, lamp slew)
//! - Engine state machine
//! - Render configuration and defaults

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod receiver;
pub mod render;
pub mod state;
pub mod traits;

pub use config::RenderConfig;
pub use receiver::{PollOutcome, ReceiverStats, TelemetryReceiver};
pub use render::{RenderEngine, TickReport};
pub use state::{EngineState, Event};
