//! Simulation scenario definition
//!
//! A scenario combines a physical model with the batched initial state.
use crate::error::{Result, TrojanError};
use crate::physics::{PhaseState, PhysicalModel};

/// Simulation scenario
///
/// Defines a specific case to integrate:
/// - Physical model (equations)
/// - Initial state of every particle
///
/// # Design
///
/// The same scenario can be solved with different numerical methods.
/// This is the "WHAT to solve" (not "HOW to solve").
pub struct Scenario {
    /// Physical model (equations)
    pub model: Box<dyn PhysicalModel>,

    /// Batched state at the first sample time
    pub initial: PhaseState,
}

impl Scenario {
    /// Create a scenario
    pub fn new(model: Box<dyn PhysicalModel>, initial: PhaseState) -> Self {
        Self { model, initial }
    }

    /// Verifying scenario content (non-empty, finite initial state)
    pub fn validate(&self) -> Result<()> {
        if self.initial.is_empty() {
            return Err(TrojanError::state("scenario has no particles"));
        }
        if let Some(channel) = self.initial.first_non_finite() {
            return Err(TrojanError::config(format!(
                "initial {channel} contains a non-finite value"
            )));
        }
        Ok(())
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }

    /// Number of particles integrated together
    pub fn particles(&self) -> usize {
        self.initial.particles()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.get_model_name())
            .field("particles", &self.particles())
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
