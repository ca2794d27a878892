//! Hardware abstraction traits
//!
//! These traits define the interface between the receiver/render logic
//! and board-specific implementations.

pub mod surface;
pub mod transport;

pub use surface::{AnalogOutput, MatrixSurface, StripSurface};
pub use transport::{ByteSource, ReadyReader};
