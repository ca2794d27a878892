//! Property tests for the render pipeline's numeric pieces

use ohmlink_core::config::RenderConfig;
use ohmlink_core::render::path::PATH_LEN;
use ohmlink_core::render::{LiveParams, ParticleField, SlewLimiter};
use proptest::prelude::*;

proptest! {
    #[test]
    fn slew_reaches_target_in_ceil_ticks(start: u16, target: u16, step in 1u16..=u16::MAX) {
        let mut lamp = SlewLimiter::new(step);
        lamp.reset(start);
        lamp.set_target(target);

        let distance = (start as i32 - target as i32).unsigned_abs();
        let expected = distance.div_ceil(step as u32);

        let mut ticks = 0u32;
        let mut previous = start;
        while !lamp.is_settled() {
            let level = lamp.update();
            // Never overshoots and never moves more than one step
            prop_assert!((level as i32 - previous as i32).unsigned_abs() <= step as u32);
            if start <= target {
                prop_assert!(level <= target);
            } else {
                prop_assert!(level >= target);
            }
            previous = level;
            ticks += 1;
        }
        prop_assert_eq!(ticks, expected);
        prop_assert_eq!(lamp.current(), target);
    }

    #[test]
    fn mapping_is_monotonic(a in 1e-3f32..1e9, b in 1e-3f32..1e9) {
        let config = RenderConfig::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let p_low = LiveParams::from_ohms(&config, low);
        let p_high = LiveParams::from_ohms(&config, high);

        // More resistance never means more current, speed or light
        prop_assert!(p_high.amps <= p_low.amps);
        prop_assert!(p_high.speed <= p_low.speed);
        prop_assert!(p_high.load_factor <= p_low.load_factor);
        prop_assert!(p_high.lamp_level <= p_low.lamp_level);
    }

    #[test]
    fn mapping_stays_in_range(ohms: f32) {
        let config = RenderConfig::default();
        let p = LiveParams::from_ohms(&config, ohms);
        prop_assert!(p.speed >= config.min_speed && p.speed <= config.max_speed);
        prop_assert!(p.load_factor >= config.min_load_factor && p.load_factor <= 1.0);
        prop_assert!(p.fraction >= 0.0 && p.fraction <= 1.0);
    }

    #[test]
    fn particles_stay_on_path(
        speeds in proptest::collection::vec(0.0f32..200.0, 1..50),
        dt_ms in 0u32..=100,
    ) {
        let mut field = ParticleField::new();
        for speed in speeds {
            field.drift(speed, dt_ms, 8);
            prop_assert!(field.iter().all(|p| p.position < PATH_LEN));
        }
    }
}
