//! trojan-rs: Trojan asteroids in the restricted three-body problem
//!
//! Integrates massless test particles around the L4 Lagrange point of a
//! Sun + Planet system, in the frame co-rotating with the Planet, and
//! measures how stable their orbits are.
//!
//! # Architecture
//!
//! trojan-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Physical models define equations (what to solve)
//!    - Numerical solvers provide methods (how to solve)
//!
//! 2. **Batched, value-typed data**
//!    - A whole grid of particles is one [`PhaseState`](physics::PhaseState)
//!    - Integration returns an explicit [`Trajectory`](solver::Trajectory)
//!      that the metrics consume
//!
//! # Units
//!
//! Solar masses, astronomical units and years, so that `G = 4π²`.
//!
//! # Quick Start
//!
//! ```rust
//! use trojan_rs::prelude::*;
//!
//! // 1. Frame and starting states
//! let frame = FrameModel::jupiter();
//! let experiment = Experiment::at_l4(frame);
//!
//! // 2. Integrate five orbits with adaptive error control
//! let result = experiment.solve_orbits(5, SolverType::default_adaptive())?;
//!
//! // 3. Analyse
//! let metrics = experiment.metrics(&result)?;
//! assert!(metrics.wander[0] < 0.2);
//! assert!(metrics.libration[0] < 0.1);
//! # Ok::<(), trojan_rs::TrojanError>(())
//! ```
//!
//! # Modules
//!
//! - [`physics`]: state container and model trait
//! - [`models`]: frame constants, initial grids, equations of motion
//! - [`solver`]: numerical solvers (methods)
//! - [`analysis`]: stability metrics, experiments, mass sweeps
//! - [`error`]: error taxonomy
//!
//! # Features
//!
//! - `parallel` (default): evaluate large batches and mass sweeps with rayon

pub mod error;

// Core modules
pub mod physics;

pub mod analysis;
pub mod models;
pub mod solver;

pub use error::{Result, TrojanError};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use trojan_rs::prelude::*;
    //! ```
    pub use crate::analysis::{Experiment, StabilityMetrics, SweepPoint, mass_sweep};
    pub use crate::error::{Result, TrojanError};
    pub use crate::models::{
        EquationsOfMotion, FrameModel, GridLayout, GridWarning, InitialConditionGrid,
    };
    pub use crate::physics::{PhaseChannel, PhaseState, PhysicalModel};
    pub use crate::solver::{
        DormandPrinceSolver, RK4Solver, Scenario, SimulationResult, Solver, SolverConfiguration,
        SolverType, TimeGrid, Trajectory, integrate,
    };
}
