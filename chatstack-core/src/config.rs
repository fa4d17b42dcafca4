//! Simulation configuration

use crate::{Error, Result};

/// Stack behaviour for the overlay simulator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    /// Seconds a message stays visible unless pushed out
    pub hold: f64,
    /// Maximum number of messages on screen at once
    pub max_slots: usize,
}

impl SimulationConfig {
    /// Creates a new configuration
    pub fn new(hold: f64, max_slots: usize) -> Self {
        Self { hold, max_slots }
    }

    /// Checks that the stack can actually hold messages for a positive time
    pub fn validate(&self) -> Result<()> {
        if !self.hold.is_finite() || self.hold <= 0.0 {
            return Err(Error::Configuration(format!(
                "hold must be a positive number of seconds, got {}",
                self.hold
            )));
        }
        if self.max_slots < 1 {
            return Err(Error::Configuration(
                "max_slots must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hold: 10.0,
            max_slots: 6,
        }
    }
}
