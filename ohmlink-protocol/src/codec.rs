//! Line encoding and decoding for the telemetry protocol.
//!
//! Frame format:
//! - PREFIX: the literal `R:`
//! - VALUE: resistance in ohms, decimal with exactly one fractional digit
//! - BANDS: four lowercase band tokens (digit-1, digit-2, multiplier, tolerance)
//! - TERMINATOR: `\n`
//!
//! Fields are separated by `,`. Nothing else is allowed on the line.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::band::Band;
use crate::reading::Reading;

/// Literal that opens every frame
pub const FRAME_PREFIX: &str = "R:";

/// Line terminator
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Number of comma-separated fields after the prefix
pub const FIELD_COUNT: usize = 5;

/// Largest encodable magnitude (1 GΩ)
///
/// Bounding the value bounds the line: prefix, sign, nine integer digits,
/// one fractional digit, four bands of at most six letters, commas and the
/// terminator all fit in [`MAX_LINE_LEN`].
pub const MAX_ABS_VALUE: f32 = 1.0e9;

/// Maximum encoded line size in bytes
pub const MAX_LINE_LEN: usize = 64;

/// An encoded frame, terminator included
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur while encoding a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Value is NaN, infinite, or beyond [`MAX_ABS_VALUE`]
    ValueOutOfRange,
    /// Formatted line did not fit in [`MAX_LINE_LEN`]
    BufferTooSmall,
}

/// Errors that can occur while decoding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Line is empty or whitespace only
    Empty,
    /// Line is not valid UTF-8
    InvalidUtf8,
    /// Line does not start with `R:`
    MissingPrefix,
    /// Wrong number of comma-separated fields (holds the count found)
    FieldCount(usize),
    /// Value field is not a number
    InvalidValue,
    /// Value field is NaN or infinite
    NonFiniteValue,
    /// Band field at `position` (0-3) is not a known token
    UnknownBand { position: u8 },
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::ValueOutOfRange => f.write_str("value is not finite or out of range"),
            EncodeError::BufferTooSmall => f.write_str("encoded line exceeds buffer"),
        }
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Empty => f.write_str("empty line"),
            DecodeError::InvalidUtf8 => f.write_str("line is not valid UTF-8"),
            DecodeError::MissingPrefix => write!(f, "line does not start with {FRAME_PREFIX:?}"),
            DecodeError::FieldCount(n) => {
                write!(f, "expected {FIELD_COUNT} fields, found {n}")
            }
            DecodeError::InvalidValue => f.write_str("value field is not a number"),
            DecodeError::NonFiniteValue => f.write_str("value field is not finite"),
            DecodeError::UnknownBand { position } => {
                write!(f, "unknown band token at position {position}")
            }
        }
    }
}

impl core::error::Error for EncodeError {}
impl core::error::Error for DecodeError {}

/// Encode a reading into a newline-terminated frame
pub fn encode(reading: &Reading) -> Result<Line, EncodeError> {
    let value = reading.value();
    if !value.is_finite() || value.abs() >= MAX_ABS_VALUE {
        return Err(EncodeError::ValueOutOfRange);
    }

    let mut text = String::<MAX_LINE_LEN>::new();
    write!(text, "{}", reading).map_err(|_| EncodeError::BufferTooSmall)?;
    text.push(FRAME_TERMINATOR as char)
        .map_err(|_| EncodeError::BufferTooSmall)?;

    Vec::from_slice(text.as_bytes()).map_err(|_| EncodeError::BufferTooSmall)
}

/// Decode one line into a reading
///
/// The line may still carry its terminator or a trailing `\r`; surrounding
/// ASCII whitespace is ignored. Every other deviation is an error.
pub fn decode(line: &[u8]) -> Result<Reading, DecodeError> {
    let text = core::str::from_utf8(line).map_err(|_| DecodeError::InvalidUtf8)?;
    let text = text.trim_matches(|c: char| c.is_ascii_whitespace());
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    let payload = text
        .strip_prefix(FRAME_PREFIX)
        .ok_or(DecodeError::MissingPrefix)?;

    let mut fields = [""; FIELD_COUNT];
    let mut count = 0;
    for field in payload.split(',') {
        if count < FIELD_COUNT {
            fields[count] = field;
        }
        count += 1;
    }
    if count != FIELD_COUNT {
        return Err(DecodeError::FieldCount(count));
    }

    let value: f32 = fields[0].parse().map_err(|_| DecodeError::InvalidValue)?;
    if !value.is_finite() {
        return Err(DecodeError::NonFiniteValue);
    }

    let mut bands = [Band::Black; 4];
    for (position, (slot, token)) in bands.iter_mut().zip(&fields[1..]).enumerate() {
        *slot = Band::from_token(token).ok_or(DecodeError::UnknownBand {
            position: position as u8,
        })?;
    }

    Ok(Reading::new(value, bands))
}
