//! Runge-Kutta 4 (RK4) numerical solver
//!
//! # Mathematical Background
//!
//! The classical fourth-order Runge-Kutta method uses a weighted average of
//! four slope estimates:
//!
//! ```text
//! k₁ = f(yₙ)
//! k₂ = f(yₙ + h/2 · k₁)
//! k₃ = f(yₙ + h/2 · k₂)
//! k₄ = f(yₙ + h · k₃)
//!
//! yₙ₊₁ = yₙ + h/6 · (k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! # Sub-stepping
//!
//! The sample times are not required to be evenly spaced. Each interval
//! `[tᵢ, tᵢ₊₁]` is split into `ceil((tᵢ₊₁ - tᵢ) / max_step)` equal sub-steps,
//! so no step ever exceeds `max_step` and every sample time is hit exactly.
//! Bounding the step keeps the error of long oscillatory orbits in check.
//!
//! # Characteristics
//!
//! - **Order**: fourth order, global error ~ O(h⁴)
//! - **Cost**: 4 function evaluations per sub-step
//! - **Use**: dense, evenly sampled batches (wander / libration heat maps)
//!
//! # Example
//!
//! ```rust
//! use trojan_rs::models::{EquationsOfMotion, FrameModel};
//! use trojan_rs::physics::PhaseState;
//! use trojan_rs::solver::{RK4Solver, Scenario, Solver, SolverConfiguration, TimeGrid};
//!
//! let frame = FrameModel::jupiter();
//! let (lx, ly) = frame.l4();
//! let scenario = Scenario::new(
//!     Box::new(EquationsOfMotion::new(frame)),
//!     PhaseState::single(lx, ly, 0.0, 0.0),
//! );
//!
//! let config = SolverConfiguration::fixed_step(TimeGrid::orbits(&frame, 1, 100)?);
//! let result = RK4Solver::new().solve(&scenario, &config)?;
//!
//! assert_eq!(result.len(), 100);
//! # Ok::<(), trojan_rs::TrojanError>(())
//! ```

use crate::error::{Result, TrojanError};
use crate::physics::{PhaseState, PhysicalModel};
use crate::solver::{
    IntegrationStats, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
    Trajectory, validate_state,
};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Classical fourth-order Runge-Kutta solver
///
/// Stateless: one instance can integrate any number of scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    /// Create a new RK4 solver
    ///
    /// ```rust
    /// use trojan_rs::solver::{RK4Solver, Solver};
    ///
    /// assert_eq!(RK4Solver::new().name(), "Runge Kutta (RK4)");
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// One RK4 step of size `h`
    pub(crate) fn step(model: &dyn PhysicalModel, state: &PhaseState, h: f64) -> PhaseState {
        let k1 = model.compute_physics(state);

        let mut stage = state.clone();
        stage.axpy(h / 2.0, &k1);
        let k2 = model.compute_physics(&stage);

        let mut stage = state.clone();
        stage.axpy(h / 2.0, &k2);
        let k3 = model.compute_physics(&stage);

        let mut stage = state.clone();
        stage.axpy(h, &k3);
        let k4 = model.compute_physics(&stage);

        // Simpson weights: endpoints 1/6, midpoints 1/3
        let weighted_slope = k1 + k2 * 2.0 + k3 * 2.0 + k4;

        let mut next = state.clone();
        next.axpy(h / 6.0, &weighted_slope);
        next
    }
}

impl Solver for RK4Solver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let max_step = match &config.solver_type {
            SolverType::FixedStep { max_step } => *max_step,
            other => {
                return Err(TrojanError::config(format!(
                    "RK4Solver only supports FixedStep configuration, got {}",
                    other.name()
                )));
            }
        };

        // ====== Step 2: Setup ======

        let times = config.time_grid.times();
        let mut state = scenario.initial.clone();
        let mut samples = Vec::with_capacity(times.len());
        samples.push(state.clone());

        let model = scenario.model.as_ref();
        let mut flagged = vec![false; scenario.particles()];
        model.flag_unreliable(&state, &mut flagged);

        let mut stats = IntegrationStats::default();

        log::debug!(
            "RK4: {} particle(s), {} samples over [{}, {}], max step {}",
            scenario.particles(),
            times.len(),
            config.time_grid.start(),
            config.time_grid.end(),
            max_step
        );

        // ====== Step 3: Time Integration ======

        for (t0, t1) in config.time_grid.intervals() {
            let span = t1 - t0;
            let substeps = (span / max_step).ceil().max(1.0) as usize;
            let h = span / substeps as f64;

            for _ in 0..substeps {
                state = Self::step(model, &state, h);
                model.flag_unreliable(&state, &mut flagged);
            }

            stats.accepted_steps += substeps;
            stats.function_evaluations += 4 * substeps;

            validate_state(&state, t1)?;
            samples.push(state.clone());
        }

        // ====== Step 4: Build Result ======

        let trajectory = Trajectory::from_states(times.to_vec(), &samples)?;
        let mut result = SimulationResult::new(trajectory, stats, flagged);

        result.add_metadata("solver", self.name());
        result.add_metadata("samples", &times.len().to_string());
        result.add_metadata("max step", &max_step.to_string());
        result.add_metadata("steps", &stats.accepted_steps.to_string());
        result.add_metadata(
            "function evaluations",
            &stats.function_evaluations.to_string(),
        );

        log::debug!(
            "RK4: done, {} steps, {} function evaluations",
            stats.accepted_steps,
            stats.function_evaluations
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Runge Kutta (RK4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
