//! Resistance to colour-code conversion
//!
//! Shared by the host (to derive the bands it sends) and the display (to
//! paint them). Uses plain arithmetic only, so it runs without a float math
//! library on the device.

use crate::band::Band;

/// E24 series mantissas (one decade)
pub const E24_MANTISSAS: [f32; 24] = [
    1.0, 1.1, 1.2, 1.3, 1.5, 1.6, 1.8, 2.0, 2.2, 2.4, 2.7, 3.0, 3.3, 3.6, 3.9, 4.3, 4.7, 5.1,
    5.6, 6.2, 6.8, 7.5, 8.2, 9.1,
];

/// Bands for a missing or non-positive value
pub const ZERO_BANDS: [Band; 4] = [Band::Black, Band::Black, Band::Black, Band::Gold];

/// Relative slack when comparing a normalised mantissa against E24 entries
const MANTISSA_EPSILON: f32 = 1.0e-4;

/// Split a positive finite value into a mantissa in [1, 10) and a decade exponent
fn normalize(value: f32) -> (f32, i32) {
    let mut mantissa = value;
    let mut exponent = 0;
    while mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    while mantissa < 1.0 {
        mantissa *= 10.0;
        exponent -= 1;
    }
    (mantissa, exponent)
}

fn pow10(exponent: i32) -> f32 {
    let mut scale = 1.0f32;
    if exponent >= 0 {
        for _ in 0..exponent {
            scale *= 10.0;
        }
    } else {
        for _ in exponent..0 {
            scale /= 10.0;
        }
    }
    scale
}

/// Smallest E24 standard value that is >= `ohms`
///
/// Rounds up so a part is never under-specified. Values that are not
/// positive and finite snap to 1.0 Ω.
pub fn snap_to_e24(ohms: f32) -> f32 {
    if !ohms.is_finite() || ohms <= 0.0 {
        return E24_MANTISSAS[0];
    }

    let (mantissa, exponent) = normalize(ohms);
    let decade = pow10(exponent);
    for &e24 in &E24_MANTISSAS {
        if e24 >= mantissa - MANTISSA_EPSILON {
            return e24 * decade;
        }
    }

    // Past 9.1 in this decade: step to 1.0 of the next
    decade * 10.0
}

/// Four-band colour code for a resistance
///
/// Returns `[digit-1, digit-2, multiplier, tolerance]`; the tolerance is
/// always gold (5%). Multiplier exponents outside -2..=9 saturate to silver
/// or white.
pub fn bands_for(ohms: f32) -> [Band; 4] {
    if !ohms.is_finite() || ohms <= 0.0 {
        return ZERO_BANDS;
    }

    let (mantissa, exponent) = normalize(ohms);
    let mut significant = (mantissa * 10.0 + 0.5) as u32;
    let mut multiplier = exponent - 1;
    if significant >= 100 {
        significant /= 10;
        multiplier += 1;
    }

    let digit1 = ((significant / 10).min(9)) as u8;
    let digit2 = ((significant % 10).min(9)) as u8;
    let multiplier = Band::from_multiplier_exponent(multiplier).unwrap_or(if multiplier < 0 {
        Band::Silver
    } else {
        Band::White
    });

    [
        Band::from_digit(digit1).unwrap_or(Band::Black),
        Band::from_digit(digit2).unwrap_or(Band::Black),
        multiplier,
        Band::Gold,
    ]
}
