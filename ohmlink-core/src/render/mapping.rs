//! Reading to animation parameters
//!
//! Every output is a monotonic, saturating function of the measured
//! resistance: lower resistance means more current, faster particles, a
//! denser strip chase and a brighter lamp.

use ohmlink_protocol::Reading;

use crate::config::RenderConfig;

/// Animation parameters derived from one reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LiveParams {
    /// Current through the load (A)
    pub amps: f32,
    /// Base particle speed (path steps/s)
    pub speed: f32,
    /// Speed multiplier inside the load zone
    pub load_factor: f32,
    /// Fraction of full-scale current, 0.0..=1.0
    pub fraction: f32,
    /// Target lamp level
    pub lamp_level: u16,
}

impl LiveParams {
    /// Derive parameters for `reading`
    pub fn from_reading(config: &RenderConfig, reading: &Reading) -> Self {
        Self::from_ohms(config, reading.value())
    }

    /// Derive parameters for a resistance in ohms
    ///
    /// A non-positive (or NaN) value is the host's "nothing measured" frame
    /// and maps to zero current. Small positive values are floored at
    /// `min_ohms`.
    pub fn from_ohms(config: &RenderConfig, ohms: f32) -> Self {
        if ohms.is_nan() || ohms <= 0.0 {
            return Self::no_current(config);
        }
        let ohms = ohms.max(config.min_ohms);
        let amps = config.supply_volts / ohms;

        let speed = clamp(amps * config.speed_per_amp, config.min_speed, config.max_speed);
        let load_factor = clamp(
            config.load_knee_ohms / (config.load_knee_ohms + ohms),
            config.min_load_factor,
            1.0,
        );
        let fraction = clamp(amps / config.full_scale_amps, 0.0, 1.0);

        Self {
            amps,
            speed,
            load_factor,
            fraction,
            lamp_level: (fraction * u16::MAX as f32) as u16,
        }
    }

    /// Parameters for an open circuit
    pub fn no_current(config: &RenderConfig) -> Self {
        Self {
            amps: 0.0,
            speed: config.min_speed,
            load_factor: 1.0,
            fraction: 0.0,
            lamp_level: 0,
        }
    }

    /// Fraction of full scale as 0..=255
    pub fn fraction_u8(&self) -> u8 {
        (self.fraction * 255.0) as u8
    }
}

fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(ohms: f32) -> LiveParams {
        LiveParams::from_ohms(&RenderConfig::default(), ohms)
    }

    #[test]
    fn test_full_scale_current() {
        assert!((params(100.0).amps - 0.033).abs() < 1e-6);

        let p = params(50.0);
        assert_eq!(p.fraction, 1.0);
        assert_eq!(p.lamp_level, u16::MAX);
        assert_eq!(p.fraction_u8(), 255);
    }

    #[test]
    fn test_speed_saturates() {
        assert_eq!(params(1.0).speed, 120.0);
        assert_eq!(params(1_000_000.0).speed, 20.0);
        // 3.3 / 660 * 12000 = 60
        assert!((params(660.0).speed - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_lamp_scales_with_current() {
        let p = params(1_000.0);
        // 3.3 mA of 33 mA
        assert!((p.fraction - 0.1).abs() < 1e-4);
        assert!(p.lamp_level > 6_400 && p.lamp_level < 6_700);
    }

    #[test]
    fn test_load_factor_bounds() {
        assert!(params(0.01).load_factor > 0.999);
        assert!(params(0.01).load_factor <= 1.0);
        assert!((params(1_000.0).load_factor - 0.5).abs() < 1e-6);
        assert_eq!(params(1_000_000.0).load_factor, 0.2);
    }

    #[test]
    fn test_floor_applies_to_tiny_values() {
        assert_eq!(params(0.01), params(0.1));
        assert_eq!(params(0.01).speed, 120.0);
    }

    #[test]
    fn test_non_positive_is_open_circuit() {
        let open = LiveParams::no_current(&RenderConfig::default());
        assert_eq!(params(0.0), open);
        assert_eq!(params(-5.0), open);
        assert_eq!(params(f32::NAN), open);
        assert_eq!(open.lamp_level, 0);
        assert_eq!(open.speed, 20.0);
    }
}
