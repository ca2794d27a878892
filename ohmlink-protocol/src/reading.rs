//! The telemetry record carried by every frame

use core::fmt;
use core::str::FromStr;

use crate::band::Band;
use crate::codec::{self, DecodeError};
use crate::color_code;

/// One measurement: a resistance in ohms and its four colour bands
///
/// Readings are immutable once built and cheap to copy; whichever component
/// holds the latest one owns its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    value: f32,
    bands: [Band; 4],
}

impl Reading {
    /// Sent when no measurement is available, to keep the display's liveness fresh
    pub const IDLE: Reading = Reading {
        value: 0.0,
        bands: [Band::Black, Band::Black, Band::Black, Band::Gold],
    };

    /// Create a reading from a value and bands in wire order
    /// (digit-1, digit-2, multiplier, tolerance)
    pub const fn new(value: f32, bands: [Band; 4]) -> Self {
        Self { value, bands }
    }

    /// Create a reading for a resistance, deriving its colour bands
    pub fn from_ohms(ohms: f32) -> Self {
        Self::new(ohms, color_code::bands_for(ohms))
    }

    /// Measured value in ohms
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Colour bands in wire order
    pub const fn bands(&self) -> [Band; 4] {
        self.bands
    }
}

impl fmt::Display for Reading {
    /// Wire form without the line terminator
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R:{:.1}", self.value)?;
        for band in &self.bands {
            write!(f, ",{}", band.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for Reading {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::decode(s.as_bytes())
    }
}
