//! Integration tests: equations of motion + solvers
//!
//! Exercise the full pipeline frame → grid → scenario → solver → trajectory
//! on the rotating-frame force law.

use nalgebra::DVector;
use trojan_rs::analysis::StabilityMetrics;
use trojan_rs::models::{EquationsOfMotion, FrameModel, InitialConditionGrid};
use trojan_rs::physics::PhaseState;
use trojan_rs::solver::{
    DormandPrinceSolver, RK4Solver, Scenario, Solver, SolverConfiguration, TimeGrid, integrate,
};

mod common;
use common::{ThresholdGuard, assert_states_close, compute_l2_error, l4_scenario};

#[test]
fn test_round_trip_at_l4_for_negligible_mass() {
    let frame = FrameModel::new(1e-10, 5.2).unwrap();
    let scenario = l4_scenario(frame);
    let config = SolverConfiguration::fixed_step(TimeGrid::linspace(0.0, frame.period(), 100).unwrap());

    let result = RK4Solver::new().solve(&scenario, &config).unwrap();
    let (lx, ly) = frame.l4();
    let last = result.final_state();

    assert!((last.x()[0] - lx).hypot(last.y()[0] - ly) < 1e-6);
}

#[test]
fn test_round_trip_at_l4_for_jupiter() {
    // T ignores Mp, so L4 drifts slowly; after one period the particle is
    // still well within 0.1 AU of where it started
    let frame = FrameModel::jupiter();
    let scenario = l4_scenario(frame);
    let times = TimeGrid::linspace(0.0, frame.period(), 100).unwrap();
    let (lx, ly) = frame.l4();

    for config in [
        SolverConfiguration::fixed_step(times.clone()),
        SolverConfiguration::adaptive(times.clone()),
    ] {
        let last = integrate(&scenario, &config).unwrap().final_state();
        let distance = (last.x()[0] - lx).hypot(last.y()[0] - ly);
        assert!(distance < 0.1, "{} AU from L4 after one period", distance);
    }
}

#[test]
fn test_fixed_and_adaptive_agree() {
    let frame = FrameModel::jupiter();
    let scenario = l4_scenario(frame);
    let times = TimeGrid::orbits(&frame, 1, 100).unwrap();

    let fixed = RK4Solver::new()
        .solve(&scenario, &SolverConfiguration::fixed_step(times.clone()))
        .unwrap();
    let adaptive = DormandPrinceSolver::new()
        .solve(&scenario, &SolverConfiguration::adaptive(times))
        .unwrap();

    assert_eq!(fixed.time_points(), adaptive.time_points());
    assert_states_close(
        &fixed.final_state(),
        &adaptive.final_state(),
        1e-5,
        "RK4 vs Dormand-Prince",
    );
}

#[test]
fn test_jacobi_constant_is_conserved() {
    let frame = FrameModel::jupiter();
    let equations = EquationsOfMotion::new(frame);
    let (lx, ly) = frame.l4();
    let scenario = Scenario::new(
        Box::new(equations),
        PhaseState::single(1.005 * lx, 1.005 * ly, 0.0, 0.0),
    );

    let config = SolverConfiguration::adaptive(TimeGrid::orbits(&frame, 10, 100).unwrap());
    let result = integrate(&scenario, &config).unwrap();

    let c0 = equations.jacobi_constant(&scenario.initial)[0];
    let drift = (0..result.len())
        .filter_map(|k| result.trajectory.state_at(k))
        .map(|state| (equations.jacobi_constant(&state)[0] - c0).abs() / c0.abs())
        .fold(0.0, f64::max);

    assert!(drift < 1e-6, "relative Jacobi drift {drift:e}");
}

#[test]
fn test_batched_grid_matches_single_particles() {
    let frame = FrameModel::jupiter();
    let grid = InitialConditionGrid::cartesian(frame.l4(), 0.3, 3);
    let times = TimeGrid::orbits(&frame, 1, 50).unwrap();
    let config = SolverConfiguration::fixed_step(times);

    let batched = integrate(
        &Scenario::new(Box::new(EquationsOfMotion::new(frame)), grid.initial_state()),
        &config,
    )
    .unwrap();
    assert_eq!(batched.trajectory.particles(), 9);

    for (i, [x, y, vx, vy]) in grid.points().into_iter().enumerate() {
        let single = integrate(
            &Scenario::new(
                Box::new(EquationsOfMotion::new(frame)),
                PhaseState::single(x, y, vx, vy),
            ),
            &config,
        )
        .unwrap();

        let (bx, by) = batched.trajectory.path(i).unwrap();
        let (sx, sy) = single.trajectory.path(0).unwrap();
        assert_eq!(bx, sx, "particle {i} x-path");
        assert_eq!(by, sy, "particle {i} y-path");
    }
}

#[test]
fn test_parallel_evaluation_is_deterministic() {
    let frame = FrameModel::mars();
    let n = 40;
    let (lx, ly) = frame.l4();
    let initial = PhaseState::at_rest(
        DVector::from_fn(n, |i, _| lx + 0.002 * i as f64),
        DVector::from_fn(n, |i, _| ly - 0.001 * i as f64),
    )
    .unwrap();
    let config = SolverConfiguration::fixed_step(TimeGrid::orbits(&frame, 1, 20).unwrap());
    let scenario = Scenario::new(Box::new(EquationsOfMotion::new(frame)), initial);

    let sequential = integrate(&scenario, &config).unwrap();
    let parallel = {
        let _guard = ThresholdGuard::save(4);
        integrate(&scenario, &config).unwrap()
    };

    assert_eq!(compute_l2_error(&sequential.final_state(), &parallel.final_state()), 0.0);
}

#[test]
fn test_close_approach_stays_finite() {
    // Released at rest next to the planet: falls through the clamped core
    let frame = FrameModel::jupiter();
    let (px, py) = frame.planet_position();
    let scenario = Scenario::new(
        Box::new(EquationsOfMotion::new(frame)),
        PhaseState::single(px + 0.1, py, 0.0, 0.0),
    );
    let config = SolverConfiguration::fixed_step(TimeGrid::linspace(0.0, 1.0, 200).unwrap())
        .with_max_step(0.001);

    let result = integrate(&scenario, &config).unwrap();
    assert!(result.final_state().first_non_finite().is_none());
}

#[test]
fn test_close_approach_between_samples_is_flagged() {
    // Falls through the planet's clamped core near t = 0.19, but the only
    // samples (t = 0, 1, 2) all lie outside the floor
    let frame = FrameModel::jupiter();
    let (px, py) = frame.planet_position();
    let scenario = Scenario::new(
        Box::new(EquationsOfMotion::new(frame)),
        PhaseState::single(px + 0.1, py, 0.0, 0.0),
    );
    let times = TimeGrid::linspace(0.0, 2.0, 3).unwrap();
    let equations = EquationsOfMotion::new(frame);

    for config in [
        SolverConfiguration::fixed_step(times.clone()).with_max_step(0.0005),
        SolverConfiguration::adaptive(times.clone()),
    ] {
        let result = integrate(&scenario, &config).unwrap();
        let path = result.trajectory.path(0).unwrap();
        assert!(
            path.0
                .iter()
                .zip(path.1.iter())
                .all(|(x, y)| !equations.is_near_singularity(*x, *y)),
            "a sample landed inside the floor"
        );

        assert_eq!(result.flagged, vec![true], "{}", result.metadata["solver"]);

        let sampled = StabilityMetrics::from_trajectory(&frame, &result.trajectory).unwrap();
        let stepped = StabilityMetrics::from_result(&frame, &result).unwrap();
        assert_eq!(sampled.close_approach, vec![false]);
        assert_eq!(stepped.close_approach, vec![true]);
    }
}

#[test]
fn test_distant_trojan_is_never_flagged() {
    let frame = FrameModel::jupiter();
    let config = SolverConfiguration::adaptive(TimeGrid::orbits(&frame, 2, 50).unwrap());
    let result = integrate(&l4_scenario(frame), &config).unwrap();

    assert_eq!(result.flagged, vec![false]);
}
