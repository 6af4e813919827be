//! Numerical solvers
//!
//! A numerical solver applies a numerical method to the equations provided by
//! a physical model within a specific scenario.
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** ([`Scenario`]) - WHAT to solve
//!    - Physical model (equations)
//!    - Initial batched state
//!
//! 2. **Configuration** ([`SolverConfiguration`]) - HOW to solve
//!    - Method and its parameters ([`SolverType`])
//!    - Sample times ([`TimeGrid`])
//!
//! 3. **Solver** ([`Solver`] trait) - The numerical method
//!    - Applies the numerical scheme
//!    - Returns a [`SimulationResult`] holding the [`Trajectory`]
//!
//! [`integrate`] picks the solver matching the configuration.
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐   ┌──────────────────────┐
//! │ EquationsOfMotion│   │ InitialConditionGrid │
//! └────────┬────────┘   └──────────┬───────────┘
//!          └───────────┬───────────┘
//!                 ┌────▼─────┐
//!                 │ Scenario │ ← WHAT to solve
//!                 └────┬─────┘
//!          ┌───────────▼───────────┐
//!          │ SolverConfiguration   │ ← HOW to solve
//!          │ (SolverType+TimeGrid) │
//!          └───────────┬───────────┘
//!          ┌───────────▼───────────┐
//!          │ RK4 / Dormand-Prince  │ ← The method
//!          └───────────┬───────────┘
//!          ┌───────────▼───────────┐
//!          │ SimulationResult      │ ← Trajectory + metadata
//!          └───────────────────────┘
//! ```
//!
//! # Quick Start Example
//!
//! ```rust
//! use trojan_rs::models::{EquationsOfMotion, FrameModel, InitialConditionGrid};
//! use trojan_rs::solver::{Scenario, SolverConfiguration, TimeGrid, integrate};
//!
//! let frame = FrameModel::jupiter();
//! let grid = InitialConditionGrid::cartesian(frame.l4(), 0.2, 3);
//!
//! let scenario = Scenario::new(Box::new(EquationsOfMotion::new(frame)), grid.initial_state());
//! let config = SolverConfiguration::fixed_step(TimeGrid::orbits(&frame, 1, 20)?);
//!
//! let result = integrate(&scenario, &config)?;
//! assert_eq!(result.trajectory.particles(), 9);
//! assert_eq!(result.trajectory.samples(), 20);
//! # Ok::<(), trojan_rs::TrojanError>(())
//! ```
//!
//! # Error Handling
//!
//! Invalid configurations are rejected before any step is taken. Once
//! integrating, every failure is a [`TrojanError::Integration`]; the solver
//! never retries with another method, that decision belongs to the caller.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod methods;
mod scenario;
mod time_grid;
mod traits;
mod trajectory;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Batches larger than this many particles are evaluated with rayon
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

// Relaxed: a tuning knob read once per force evaluation, it orders nothing
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Particle count above which [`EquationsOfMotion`](crate::models::EquationsOfMotion)
/// goes parallel (feature `parallel`)
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Change the parallel threshold for the whole process
///
/// # Panics
///
/// On `threshold == 0`.
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be positive, got 0");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

#[cfg(test)]
pub(crate) struct ThresholdGuard(usize);

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(threshold: usize) -> Self {
        let guard = Self(parallel_threshold());
        set_parallel_threshold(threshold);
        guard
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        set_parallel_threshold(self.0);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_MAX_STEP, DEFAULT_MAX_STEPS, DEFAULT_RELATIVE_TOLERANCE,
    IntegrationStats, SimulationResult, Solver, SolverConfiguration, SolverType,
};

pub use methods::{DormandPrinceSolver, RK4Solver};
pub use scenario::Scenario;
pub use time_grid::{DEFAULT_PRECISION, TimeGrid};
pub use trajectory::Trajectory;

// =================================================================================================
// Dispatch
// =================================================================================================

use crate::error::{Result, TrojanError};
use crate::physics::PhaseState;

/// Integrate `scenario` with the method selected by `config.solver_type`
///
/// - [`SolverType::FixedStep`] → [`RK4Solver`]
/// - [`SolverType::Adaptive`] → [`DormandPrinceSolver`]
pub fn integrate(scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult> {
    let solver: &dyn Solver = match config.solver_type {
        SolverType::FixedStep { .. } => &RK4Solver,
        SolverType::Adaptive { .. } => &DormandPrinceSolver,
    };

    solver.solve(scenario, config).inspect_err(|e| {
        if e.is_integration_failure() {
            log::warn!("{} failed on '{}': {e}", solver.name(), scenario.get_model_name());
        }
    })
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Reject a state containing NaN or Inf values
///
/// NaN arises from undefined operations (0/0, Inf - Inf), Inf from overflow;
/// either means the integration has become meaningless at time `t`.
pub(crate) fn validate_state(state: &PhaseState, t: f64) -> Result<()> {
    match state.first_non_finite() {
        Some(channel) => Err(TrojanError::integration(
            t,
            format!("non-finite value in {channel}, the integration is unstable"),
        )),
        None => Ok(()),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
