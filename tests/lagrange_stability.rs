//! Stability of the L4 Lagrange point
//!
//! Concrete Sun + Planet scenarios: frame constants, initial grids, bounded
//! libration of a Jupiter Trojan and loss of boundedness with planet mass.

use std::f64::consts::{PI, TAU};

use trojan_rs::analysis::{Experiment, StabilityMetrics, mass_sweep, to_grid};
use trojan_rs::models::{FrameModel, GridWarning, InitialConditionGrid, POLAR_MIN_ANGLE};
use trojan_rs::solver::{SolverType, integrate};

mod common;
use common::relative_error;

// =================================================================================================
// Frame
// =================================================================================================

#[test]
fn test_jupiter_frame_constants() {
    let frame = FrameModel::new(0.001, 5.2).unwrap();
    let (lx, ly) = frame.l4();

    assert!((frame.sun_offset() - 0.0052).abs() < 1e-4);
    assert!((frame.planet_offset() - 5.1948).abs() < 1e-4);
    assert!(relative_error(frame.omega(), 2.0 * PI / 11.857) < 0.01);
    // L4 sits at R from both bodies: Lx = Rp - R/2
    assert!((lx - 2.5948).abs() < 1e-3);
    assert!((lx - (frame.planet_offset() - 2.6)).abs() < 1e-12);
    assert!((ly - 4.5033).abs() < 1e-3);
}

#[test]
fn test_l4_is_equilateral_for_any_frame() {
    for (mp, r) in [(1e-10, 0.5), (3.2e-7, 1.5), (1e-3, 5.2), (0.02, 30.0)] {
        let frame = FrameModel::new(mp, r).unwrap();
        let (lx, ly) = frame.l4();
        let (sx, sy) = frame.sun_position();
        let (px, py) = frame.planet_position();

        assert!((frame.sun_offset() + frame.planet_offset() - r).abs() < 1e-12 * r);
        assert!(((lx - sx).hypot(ly - sy) - r).abs() < 1e-9 * r);
        assert!(((lx - px).hypot(ly - py) - r).abs() < 1e-9 * r);
    }
}

#[test]
fn test_sun_dominates_for_vanishing_planet() {
    let frame = FrameModel::new(1e-12, 5.2).unwrap();
    assert!(frame.sun_offset() < 1e-11);
    assert!((frame.planet_offset() - 5.2).abs() < 1e-11);
}

// =================================================================================================
// Grids
// =================================================================================================

#[test]
fn test_degenerate_cartesian_grid_is_reference_point() {
    let reference = (2.5, 4.5);

    for grid in [
        InitialConditionGrid::cartesian(reference, 0.0, 1),
        InitialConditionGrid::cartesian(reference, 3.0, 1),
    ] {
        assert_eq!(grid.points(), vec![[2.5, 4.5, 0.0, 0.0]]);
    }
}

#[test]
fn test_zero_resolution_matches_unit_resolution() {
    let reference = FrameModel::jupiter().l4();
    let zero = InitialConditionGrid::polar(reference, 0.5, 0);
    let one = InitialConditionGrid::polar(reference, 0.5, 1);

    assert_eq!(zero.points(), one.points());
    assert_eq!(zero.warnings(), &[GridWarning::ZeroResolution]);
    assert!(one.warnings().is_empty());
    assert_eq!(zero.width(), 0.0);
}

#[test]
fn test_polar_flattening_reshapes_onto_mesh() {
    let frame = FrameModel::jupiter();
    let res = 6;
    let grid = InitialConditionGrid::polar(frame.l4(), 0.8, res);
    let (angles, radii) = grid.mesh();

    let flat_radii: Vec<f64> = grid.points().iter().map(|p| p[0].hypot(p[1])).collect();
    let flat_angles: Vec<f64> = grid.points().iter().map(|p| p[1].atan2(p[0])).collect();

    let radius_field = to_grid(&flat_radii, res).unwrap();
    let angle_field = to_grid(&flat_angles, res).unwrap();

    for ((i, j), r) in radius_field.indexed_iter() {
        assert!((r - radii[(i, j)]).abs() < 1e-12);
        assert!((angle_field[(i, j)] - angles[(i, j)]).abs() < 1e-12);
    }
    assert!((angles[(0, 0)] - POLAR_MIN_ANGLE).abs() < 1e-15);
    assert!((angles[(0, res - 1)] - PI).abs() < 1e-15);
}

// =================================================================================================
// Dynamics
// =================================================================================================

#[test]
fn test_jupiter_trojan_stays_bound_over_thirty_orbits() {
    let experiment = Experiment::at_l4(FrameModel::jupiter());

    let short = experiment
        .solve_orbits(15, SolverType::default_fixed_step())
        .unwrap();
    let long = experiment
        .solve_orbits(30, SolverType::default_fixed_step())
        .unwrap();

    let short = experiment.metrics(&short).unwrap();
    let long = experiment.metrics(&long).unwrap();

    assert!(long.wander[0] < 0.2, "wander {}", long.wander[0]);
    assert!(long.libration[0] < 0.1, "libration {}", long.libration[0]);
    // Bounded: doubling the window does not grow the excursion
    assert!(long.wander[0] < 1.05 * short.wander[0]);
    assert!(!long.close_approach[0]);
}

#[test]
fn test_metrics_are_in_range_over_a_grid() {
    let frame = FrameModel::jupiter();
    let experiment = Experiment::new(frame, InitialConditionGrid::cartesian(frame.l4(), 2.0, 4));
    let result = integrate(
        &experiment.scenario(),
        &trojan_rs::solver::SolverConfiguration::fixed_step(
            trojan_rs::solver::TimeGrid::orbits(&frame, 3, 100).unwrap(),
        ),
    )
    .unwrap();

    let metrics = StabilityMetrics::from_trajectory(&frame, &result.trajectory).unwrap();
    assert_eq!(metrics.len(), 16);
    for (w, l) in metrics.wander.iter().zip(&metrics.libration) {
        assert!(*w >= 0.0);
        assert!((0.0..TAU).contains(l));
    }
}

#[test]
fn test_mass_sweep_loses_boundedness() {
    let masses = [1e-10, 1e-6, 1e-4, 1e-3, 5e-3, 1e-2, 2e-2, 2.5e-2];
    let points = mass_sweep(&masses, 5.0, 100, &SolverType::default_fixed_step()).unwrap();

    for pair in points.windows(2) {
        assert!(
            pair[1].wander > pair[0].wander,
            "wander {} at Mp = {} not above {} at Mp = {}",
            pair[1].wander,
            pair[1].planet_mass,
            pair[0].wander,
            pair[0].planet_mass
        );
        assert!(pair[1].mass_ratio > pair[0].mass_ratio);
    }

    let lightest = points[0];
    assert!(lightest.wander < 1e-5);
    assert!(lightest.libration < 1e-5);

    // The heaviest planet ejects the particle from the L4 region
    let heaviest = points[points.len() - 1];
    assert!(heaviest.wander > 5.0, "wander {}", heaviest.wander);
    assert!(heaviest.libration > PI, "libration {}", heaviest.libration);
    assert!(heaviest.libration < TAU);
}
