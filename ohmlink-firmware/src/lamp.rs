//! PWM-driven lamp output

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use ohmlink_core::traits::AnalogOutput;

/// Lamp on PWM channel A, full 16-bit range
pub struct PwmLamp<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
}

impl<'d> PwmLamp<'d> {
    /// PWM configuration for a dark lamp at full resolution
    pub fn config() -> PwmConfig {
        let mut config = PwmConfig::default();
        config.top = u16::MAX;
        config.compare_a = 0;
        config
    }

    /// Wrap a PWM slice created with [`PwmLamp::config`]
    pub fn new(pwm: Pwm<'d>, config: PwmConfig) -> Self {
        Self { pwm, config }
    }
}

impl AnalogOutput for PwmLamp<'_> {
    fn set_level(&mut self, level: u16) {
        if self.config.compare_a == level {
            return;
        }
        self.config.compare_a = level;
        self.pwm.set_config(&self.config);
    }
}
