//! Colour-band vocabulary
//!
//! The closed set of tokens allowed in the four band fields of a frame.

/// One resistor colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    Grey,
    White,
    /// x0.1 multiplier / 5% tolerance
    Gold,
    /// x0.01 multiplier / 10% tolerance
    Silver,
}

impl Band {
    /// Every band, digit colours first in digit order
    pub const ALL: [Band; 12] = [
        Band::Black,
        Band::Brown,
        Band::Red,
        Band::Orange,
        Band::Yellow,
        Band::Green,
        Band::Blue,
        Band::Violet,
        Band::Grey,
        Band::White,
        Band::Gold,
        Band::Silver,
    ];

    /// Wire token (lowercase)
    pub const fn as_str(self) -> &'static str {
        match self {
            Band::Black => "black",
            Band::Brown => "brown",
            Band::Red => "red",
            Band::Orange => "orange",
            Band::Yellow => "yellow",
            Band::Green => "green",
            Band::Blue => "blue",
            Band::Violet => "violet",
            Band::Grey => "grey",
            Band::White => "white",
            Band::Gold => "gold",
            Band::Silver => "silver",
        }
    }

    /// Look up a wire token. Matching is exact: tokens are lowercase.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|band| band.as_str() == token)
    }

    /// Band for a decimal digit (0-9)
    pub const fn from_digit(digit: u8) -> Option<Self> {
        if digit < 10 {
            Some(Self::ALL[digit as usize])
        } else {
            None
        }
    }

    /// Digit value, for the ten digit colours only
    pub const fn digit(self) -> Option<u8> {
        match self {
            Band::Gold | Band::Silver => None,
            other => Some(other as u8),
        }
    }

    /// Power-of-ten exponent when used as the multiplier band
    pub const fn multiplier_exponent(self) -> i8 {
        match self {
            Band::Gold => -1,
            Band::Silver => -2,
            other => other as i8,
        }
    }

    /// Band for a multiplier exponent (-2..=9)
    pub const fn from_multiplier_exponent(exponent: i32) -> Option<Self> {
        match exponent {
            -2 => Some(Band::Silver),
            -1 => Some(Band::Gold),
            0..=9 => Self::from_digit(exponent as u8),
            _ => None,
        }
    }

    /// Tolerance in tenths of a percent, for bands that define one
    pub const fn tolerance_permille(self) -> Option<u16> {
        match self {
            Band::Brown => Some(10),
            Band::Red => Some(20),
            Band::Gold => Some(50),
            Band::Silver => Some(100),
            _ => None,
        }
    }

    /// Display colour as (r, g, b)
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Band::Black => (0, 0, 0),
            Band::Brown => (139, 69, 19),
            Band::Red => (220, 20, 20),
            Band::Orange => (255, 140, 0),
            Band::Yellow => (255, 220, 0),
            Band::Green => (0, 160, 0),
            Band::Blue => (0, 80, 200),
            Band::Violet => (148, 0, 211),
            Band::Grey => (160, 160, 160),
            Band::White => (255, 255, 255),
            Band::Gold => (212, 175, 55),
            Band::Silver => (192, 192, 192),
        }
    }
}

impl core::fmt::Display for Band {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
