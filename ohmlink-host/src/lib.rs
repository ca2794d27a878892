//! Host side of the Ohmlink telemetry link
//!
//! Owns the serial transport to the display node and keeps it alive:
//! readings are encoded with the shared codec and written one line at a
//! time, write failures drop the port, and reconnects are throttled by a
//! cooldown so a missing device never stalls the caller.

pub mod clock;
pub mod config;
pub mod error;
pub mod link;
pub mod source;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{HostConfig, SerialConfig};
pub use error::{ConfigError, LinkError};
pub use link::{MeasurementLink, RECONNECT_COOLDOWN};
pub use source::{ChannelSource, ConstantSource, MeasurementSource};
pub use transport::{Connector, SerialConnector};
