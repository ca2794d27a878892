//! Host error types

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ohmlink_protocol::EncodeError;
use thiserror::Error;

/// Measurement link failure
///
/// Every variant is recoverable: the link stays usable and the next send
/// retries once the cooldown allows.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("serial transport unavailable: {0}")]
    TransportUnavailable(#[source] io::Error),

    #[error("reconnect cooling down, {remaining:?} remaining")]
    CoolingDown { remaining: Duration },

    #[error("serial write failed: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("reading cannot be encoded: {0}")]
    InvalidReading(#[from] EncodeError),
}

impl LinkError {
    /// Check if the error came from the transport rather than the reading
    pub fn is_transport_fault(&self) -> bool {
        !matches!(self, LinkError::InvalidReading(_))
    }
}

/// Config file failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
