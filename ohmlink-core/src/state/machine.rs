//! Render state machine
//!
//! The engine is either showing live data or running its idle pattern.
//! Transitions only select which per-tick routine runs.

/// Engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// No fresh data (link stale, or nothing received yet)
    #[default]
    Idle,
    /// Readings are arriving; live animation runs
    Live,
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A valid reading arrived while the link is live
    ReadingReceived,
    /// The receiver reports the link as stale
    LinkLost,
}

impl EngineState {
    /// Check if the live animation should run
    pub fn is_live(&self) -> bool {
        matches!(self, EngineState::Live)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use EngineState::*;
        use Event::*;

        match (self, event) {
            (Idle, ReadingReceived) => Live,
            (Live, LinkLost) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
