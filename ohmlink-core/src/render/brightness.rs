//! Slew-rate limited brightness
//!
//! The lamp never jumps: each tick moves the output at most `step` toward
//! the target.

/// Rate-limited actuator level
#[derive(Debug, Clone)]
pub struct SlewLimiter {
    current: u16,
    target: u16,
    /// Maximum change per update, at least 1
    step: u16,
}

impl SlewLimiter {
    /// Create a limiter at level 0
    pub fn new(step: u16) -> Self {
        Self {
            current: 0,
            target: 0,
            step: step.max(1),
        }
    }

    /// Set the target level
    pub fn set_target(&mut self, level: u16) {
        self.target = level;
    }

    pub fn target(&self) -> u16 {
        self.target
    }

    pub fn current(&self) -> u16 {
        self.current
    }

    pub fn step(&self) -> u16 {
        self.step
    }

    /// Check if the output has reached its target
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one tick and return the new level
    pub fn update(&mut self) -> u16 {
        if self.current < self.target {
            let delta = (self.target - self.current).min(self.step);
            self.current += delta;
        } else if self.current > self.target {
            let delta = (self.current - self.target).min(self.step);
            self.current -= delta;
        }
        self.current
    }

    /// Jump straight to `level`
    pub fn reset(&mut self, level: u16) {
        self.current = level;
        self.target = level;
    }
}
