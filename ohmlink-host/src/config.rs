//! Host configuration
//!
//! One TOML file, every field optional. A missing file means defaults.
//!
//! ```toml
//! send_interval_ms = 200
//! measurement_hold_ms = 3000
//!
//! [serial]
//! port = "/dev/ttyACM0"
//! baud = 115200
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ohmlink.toml";

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Preferred device path
    pub port: String,
    /// Baud rate; must match the display firmware
    pub baud: u32,
    /// Write timeout (ms); bounds how long a send can block
    pub timeout_ms: u64,
    /// Also try enumerated USB serial ports when `port` fails
    pub scan: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".into(),
            baud: 115_200,
            timeout_ms: 50,
            scan: true,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Complete host configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub serial: SerialConfig,
    /// Period of the send loop (ms)
    pub send_interval_ms: u64,
    /// Minimum gap between reconnect attempts (ms)
    pub reconnect_cooldown_ms: u64,
    /// Period of the link status report (ms)
    pub status_interval_ms: u64,
    /// How long the last streamed measurement is resent before idling (ms)
    pub measurement_hold_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            send_interval_ms: 200,
            reconnect_cooldown_ms: 2_000,
            status_interval_ms: 5_000,
            measurement_hold_ms: 3_000,
        }
    }
}

impl HostConfig {
    /// Load and validate a config file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the link cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.baud == 0 {
            return Err(ConfigError::Invalid("serial.baud must be non-zero"));
        }
        if self.serial.port.is_empty() && !self.serial.scan {
            return Err(ConfigError::Invalid(
                "serial.port is empty and port scanning is disabled",
            ));
        }
        if self.serial.timeout_ms == 0 {
            return Err(ConfigError::Invalid("serial.timeout_ms must be non-zero"));
        }
        if self.send_interval_ms == 0 {
            return Err(ConfigError::Invalid("send_interval_ms must be non-zero"));
        }
        if self.status_interval_ms == 0 {
            return Err(ConfigError::Invalid("status_interval_ms must be non-zero"));
        }
        if self.measurement_hold_ms < self.send_interval_ms {
            return Err(ConfigError::Invalid(
                "measurement_hold_ms must be at least send_interval_ms",
            ));
        }
        Ok(())
    }

    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    pub fn reconnect_cooldown(&self) -> Duration {
        Duration::from_millis(self.reconnect_cooldown_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn measurement_hold(&self) -> Duration {
        Duration::from_millis(self.measurement_hold_ms)
    }
}
