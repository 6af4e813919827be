//! Experiments: frame + initial grid → trajectory → metrics
//!
//! An [`Experiment`] binds one [`FrameModel`] to one [`InitialConditionGrid`]
//! and integrates the whole grid as a single batched scenario. Results are
//! returned as values, so metrics can only ever be computed from a trajectory
//! that exists.
//!
//! [`mass_sweep`] repeats the basic L4 experiment over a range of planet
//! masses.
//!
//! # Example
//!
//! ```rust
//! use trojan_rs::analysis::Experiment;
//! use trojan_rs::models::{FrameModel, InitialConditionGrid};
//!
//! let frame = FrameModel::jupiter();
//! let experiment = Experiment::new(frame, InitialConditionGrid::cartesian(frame.l4(), 0.2, 2));
//!
//! let (wander, libration) = experiment.stability_grids(1)?;
//! assert_eq!(wander.shape(), &[2, 2]);
//! assert!(libration.iter().all(|l| *l >= 0.0));
//! # Ok::<(), trojan_rs::TrojanError>(())
//! ```

use ndarray::Array2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis::StabilityMetrics;
use crate::error::Result;
use crate::models::{EquationsOfMotion, FrameModel, InitialConditionGrid};
use crate::solver::{
    DEFAULT_PRECISION, Scenario, SimulationResult, SolverConfiguration, SolverType, TimeGrid,
    integrate,
};

/// One frame and one batch of starting states
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    frame: FrameModel,
    grid: InitialConditionGrid,
}

impl Experiment {
    pub fn new(frame: FrameModel, grid: InitialConditionGrid) -> Self {
        Self { frame, grid }
    }

    /// Single particle at rest exactly at L4
    pub fn at_l4(frame: FrameModel) -> Self {
        Self::new(frame, InitialConditionGrid::single(frame.l4()))
    }

    pub fn frame(&self) -> &FrameModel {
        &self.frame
    }

    pub fn grid(&self) -> &InitialConditionGrid {
        &self.grid
    }

    /// Batched scenario of every grid particle
    pub fn scenario(&self) -> Scenario {
        Scenario::new(
            Box::new(EquationsOfMotion::new(self.frame)),
            self.grid.initial_state(),
        )
    }

    /// Integrate the grid over explicit sample times
    pub fn solve(&self, time_grid: TimeGrid, solver_type: SolverType) -> Result<SimulationResult> {
        let config = SolverConfiguration::new(solver_type, time_grid);
        let mut result = integrate(&self.scenario(), &config)?;

        result.add_metadata("planet mass", &self.frame.planet_mass().to_string());
        result.add_metadata("radius", &self.frame.radius().to_string());
        result.add_metadata("layout", self.grid.layout().name());
        Ok(result)
    }

    /// Integrate the grid over `orbits` periods, [`DEFAULT_PRECISION`] samples each
    pub fn solve_orbits(&self, orbits: usize, solver_type: SolverType) -> Result<SimulationResult> {
        let time_grid = TimeGrid::orbits(&self.frame, orbits, DEFAULT_PRECISION)?;
        self.solve(time_grid, solver_type)
    }

    /// Metrics of every particle of `result`
    pub fn metrics(&self, result: &SimulationResult) -> Result<StabilityMetrics> {
        StabilityMetrics::from_result(&self.frame, result)
    }

    /// Wander and libration `(res × res)` fields from one fixed-step run
    pub fn stability_grids(&self, orbits: usize) -> Result<(Array2<f64>, Array2<f64>)> {
        let result = self.solve_orbits(orbits, SolverType::default_fixed_step())?;
        let metrics = self.metrics(&result)?;
        let res = self.grid.res();

        Ok((metrics.wander_grid(res)?, metrics.libration_grid(res)?))
    }

    /// Wander `(res × res)` field
    pub fn wander_grid(&self, orbits: usize) -> Result<Array2<f64>> {
        Ok(self.stability_grids(orbits)?.0)
    }

    /// Libration `(res × res)` field
    pub fn libration_grid(&self, orbits: usize) -> Result<Array2<f64>> {
        Ok(self.stability_grids(orbits)?.1)
    }
}

// =================================================================================================
// Mass sweep
// =================================================================================================

/// Metrics of a particle started at L4 for one planet mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub planet_mass: f64,

    /// `Mp / (Ms + Mp)`
    pub mass_ratio: f64,

    pub wander: f64,
    pub libration: f64,
}

fn sweep_point(mass: f64, radius: f64, orbits: usize, solver_type: &SolverType) -> Result<SweepPoint> {
    let experiment = Experiment::at_l4(FrameModel::new(mass, radius)?);
    let result = experiment.solve_orbits(orbits, solver_type.clone())?;
    let metrics = experiment.metrics(&result)?;

    Ok(SweepPoint {
        planet_mass: mass,
        mass_ratio: experiment.frame.mass_ratio(),
        wander: metrics.wander[0],
        libration: metrics.libration[0],
    })
}

/// Run the L4 experiment for every planet mass at a fixed orbital radius
///
/// Points are returned in input order. Masses are integrated in parallel with
/// the `parallel` feature. The first failing mass aborts the sweep.
pub fn mass_sweep(
    masses: &[f64],
    radius: f64,
    orbits: usize,
    solver_type: &SolverType,
) -> Result<Vec<SweepPoint>> {
    solver_type.validate()?;
    log::debug!(
        "mass sweep: {} masses at R = {radius}, {orbits} orbits, {}",
        masses.len(),
        solver_type.name()
    );

    #[cfg(feature = "parallel")]
    let points = masses
        .par_iter()
        .map(|mass| sweep_point(*mass, radius, orbits, solver_type))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let points = masses
        .iter()
        .map(|mass| sweep_point(*mass, radius, orbits, solver_type))
        .collect();

    points
}

// =================================================================================================
// Tests
// =================================================================================================
