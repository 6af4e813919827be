//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - Central enum [`SolverType`] selects the numerical method and carries its
//!   parameters
//! - [`SolverConfiguration`] pairs the method with the sample times
//! - [`SimulationResult`] carries the trajectory plus metadata for
//!   extensibility
//!
//! The [`Solver`] trait is the stable seam between scenarios and methods.

use std::collections::HashMap;

use crate::error::{Result, TrojanError};
use crate::solver::{Scenario, TimeGrid, Trajectory};

/// Default upper bound of a fixed sub-step \[yr\]
pub const DEFAULT_MAX_STEP: f64 = 0.5;

/// Default relative tolerance of the adaptive method
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Default absolute tolerance of the adaptive method
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-12;

/// Default step budget of the adaptive method
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

// ============================================================================
// Central Solver Type Enumeration
// ============================================================================

/// Numerical integration method and its parameters
///
/// # Examples
///
/// ```rust
/// use trojan_rs::solver::SolverType;
///
/// // Dense heat-map grids
/// let fixed = SolverType::FixedStep { max_step: 0.5 };
///
/// // Long, smooth single trajectories
/// let adaptive = SolverType::default_adaptive();
///
/// assert!(fixed.validate().is_ok());
/// assert!(adaptive.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SolverType {
    /// Explicit fixed-order method (classical RK4)
    ///
    /// Each sample interval `Δt` is split into `ceil(Δt / max_step)` equal
    /// sub-steps.
    FixedStep {
        max_step: f64,
    },

    /// Embedded Runge–Kutta pair with error control
    ///
    /// Explicit Dormand–Prince 5(4). The method does not detect stiffness and
    /// never switches to an implicit scheme; on a stiff problem it keeps
    /// shrinking the step until the budget or the step-size floor is hit.
    ///
    /// # Parameters
    /// - `relative_tolerance`, `absolute_tolerance`: per-component error
    ///   scale `atol + rtol·|y|`
    /// - `max_step`: optional upper bound on the step size
    /// - `max_steps`: accepted plus rejected step budget
    Adaptive {
        relative_tolerance: f64,
        absolute_tolerance: f64,
        max_step: Option<f64>,
        max_steps: usize,
    },
}

impl SolverType {
    /// Fixed-step method with [`DEFAULT_MAX_STEP`]
    pub fn default_fixed_step() -> Self {
        SolverType::FixedStep {
            max_step: DEFAULT_MAX_STEP,
        }
    }

    /// Adaptive method with the default tolerances and budget
    pub fn default_adaptive() -> Self {
        SolverType::Adaptive {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            absolute_tolerance: DEFAULT_ABSOLUTE_TOLERANCE,
            max_step: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            SolverType::FixedStep { .. } => "FixedStep",
            SolverType::Adaptive { .. } => "Adaptive",
        }
    }

    /// Validate that parameters are numerically meaningful
    pub fn validate(&self) -> Result<()> {
        match self {
            SolverType::FixedStep { max_step } => {
                if !max_step.is_finite() || *max_step <= 0.0 {
                    return Err(TrojanError::config(format!(
                        "max step must be positive and finite, got {max_step}"
                    )));
                }
                Ok(())
            }
            SolverType::Adaptive {
                relative_tolerance,
                absolute_tolerance,
                max_step,
                max_steps,
            } => {
                if !relative_tolerance.is_finite() || *relative_tolerance <= 0.0 {
                    return Err(TrojanError::config(format!(
                        "relative tolerance must be positive, got {relative_tolerance}"
                    )));
                }
                if !absolute_tolerance.is_finite() || *absolute_tolerance < 0.0 {
                    return Err(TrojanError::config(format!(
                        "absolute tolerance must be non-negative, got {absolute_tolerance}"
                    )));
                }
                if let Some(h) = max_step
                    && (!h.is_finite() || *h <= 0.0)
                {
                    return Err(TrojanError::config(format!(
                        "max step must be positive and finite, got {h}"
                    )));
                }
                if *max_steps == 0 {
                    return Err(TrojanError::config("step budget must be greater than 0"));
                }
                Ok(())
            }
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for numerical solver
///
/// # Examples
///
/// ```rust
/// use trojan_rs::models::FrameModel;
/// use trojan_rs::solver::{SolverConfiguration, TimeGrid};
///
/// let frame = FrameModel::jupiter();
/// let times = TimeGrid::orbits(&frame, 10, 100)?;
///
/// let grid_run = SolverConfiguration::fixed_step(times.clone()).with_max_step(0.25);
/// let orbit_run = SolverConfiguration::adaptive(times).with_max_steps(1_000_000);
///
/// grid_run.validate()?;
/// orbit_run.validate()?;
/// # Ok::<(), trojan_rs::TrojanError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Type of solver and its parameters
    pub solver_type: SolverType,

    /// Times at which the trajectory is recorded
    pub time_grid: TimeGrid,
}

impl SolverConfiguration {
    /// Create a new configuration with a given solver type
    pub fn new(solver_type: SolverType, time_grid: TimeGrid) -> Self {
        Self {
            solver_type,
            time_grid,
        }
    }

    /// Fixed-step RK4 with [`DEFAULT_MAX_STEP`]
    pub fn fixed_step(time_grid: TimeGrid) -> Self {
        Self::new(SolverType::default_fixed_step(), time_grid)
    }

    /// Adaptive Dormand–Prince with default tolerances
    pub fn adaptive(time_grid: TimeGrid) -> Self {
        Self::new(SolverType::default_adaptive(), time_grid)
    }

    /// Bound the step size of either method
    pub fn with_max_step(mut self, h: f64) -> Self {
        match &mut self.solver_type {
            SolverType::FixedStep { max_step } => *max_step = h,
            SolverType::Adaptive { max_step, .. } => *max_step = Some(h),
        }
        self
    }

    /// Set the adaptive step budget (ignored by the fixed-step method)
    pub fn with_max_steps(mut self, budget: usize) -> Self {
        if let SolverType::Adaptive { max_steps, .. } = &mut self.solver_type {
            *max_steps = budget;
        }
        self
    }

    /// Set the adaptive tolerances (ignored by the fixed-step method)
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        if let SolverType::Adaptive {
            relative_tolerance,
            absolute_tolerance,
            ..
        } = &mut self.solver_type
        {
            *relative_tolerance = rtol;
            *absolute_tolerance = atol;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.solver_type.validate()
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Work counters of one integration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    /// Calls to [`PhysicalModel::compute_physics`](crate::physics::PhysicalModel::compute_physics)
    pub function_evaluations: usize,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
}

/// Result of an integration
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Sampled states of every particle
    pub trajectory: Trajectory,

    /// Free-form information (solver name, step counts, ...)
    pub metadata: HashMap<String, String>,

    pub stats: IntegrationStats,

    /// Particles the model flagged at some accepted step, see
    /// [`PhysicalModel::flag_unreliable`](crate::physics::PhysicalModel::flag_unreliable)
    pub flagged: Vec<bool>,
}

impl SimulationResult {
    pub fn new(trajectory: Trajectory, stats: IntegrationStats, flagged: Vec<bool>) -> Self {
        Self {
            trajectory,
            metadata: HashMap::new(),
            stats,
            flagged,
        }
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Number of recorded samples
    pub fn len(&self) -> usize {
        self.trajectory.samples()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recorded sample times
    pub fn time_points(&self) -> &[f64] {
        self.trajectory.times()
    }

    /// Batched state at the last sample
    pub fn final_state(&self) -> crate::physics::PhaseState {
        self.trajectory.final_state()
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Numerical method applied to a [`Scenario`]
///
/// Implementations are stateless and reusable: all run parameters come from
/// the [`SolverConfiguration`].
pub trait Solver: Send + Sync {
    /// Integrate `scenario` over `config.time_grid`
    ///
    /// The initial state is recorded as the first sample.
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult>;

    /// Human readable method name
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Tests
// =================================================================================================
