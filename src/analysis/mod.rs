//! Post-processing of integrated trajectories
//!
//! - [`metrics`]: wander, libration and grid reshaping of one trajectory
//! - [`experiment`]: frame + grid runs and planet-mass sweeps
//!
//! Analysis functions take a [`Trajectory`](crate::solver::Trajectory) or a
//! [`SimulationResult`](crate::solver::SimulationResult) by reference; there is
//! no hidden "last computed orbit" state.

pub mod experiment;
pub mod metrics;

pub use experiment::{Experiment, SweepPoint, mass_sweep};
pub use metrics::{StabilityMetrics, libration, polar_angle, to_grid, wander};
