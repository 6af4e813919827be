//! Adaptive Dormand–Prince 5(4) solver
//!
//! # Mathematical Background
//!
//! Seven-stage embedded Runge–Kutta pair. The fifth-order solution is
//! propagated, the difference with the embedded fourth-order solution
//! estimates the local error:
//!
//! ```text
//! yₙ₊₁ = yₙ + h · Σ bᵢ kᵢ           (order 5)
//! eₙ₊₁ =      h · Σ (bᵢ - b̂ᵢ) kᵢ    (error estimate)
//! ```
//!
//! The last stage is evaluated at the accepted point, so it is reused as the
//! first stage of the next step (FSAL): 6 evaluations per attempted step.
//!
//! # Step-size control
//!
//! ```text
//! err   = maxᵢ |eᵢ| / (atol + rtol · max(|yₙ,ᵢ|, |yₙ₊₁,ᵢ|))
//! accept when err ≤ 1
//! h_new = h · clamp(0.9 · err^(-1/5), 0.2, 10)
//! ```
//!
//! After a rejection the step never grows. Steps are shortened to land
//! exactly on every sample time, so no interpolation is needed.
//!
//! # Failures
//!
//! All failures are [`TrojanError::Integration`] and are never retried:
//! step size underflow, step budget exhausted, non-finite state at a sample.

use crate::error::{Result, TrojanError};
use crate::physics::{PhaseState, PhysicalModel};
use crate::solver::{
    IntegrationStats, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
    Trajectory, validate_state,
};

// =================================================================================================
// Butcher tableau
// =================================================================================================

const A21: f64 = 1.0 / 5.0;

const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;

const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;

const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;

const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also the 7th stage row)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// b - b̂
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// =================================================================================================
// Step controller
// =================================================================================================

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = 1.0 / 5.0;

/// Step size adjustment from a normalised error
fn step_factor(error: f64) -> f64 {
    if !error.is_finite() {
        return MIN_FACTOR;
    }
    if error == 0.0 {
        return MAX_FACTOR;
    }
    (SAFETY * error.powf(-ERROR_EXPONENT)).clamp(MIN_FACTOR, MAX_FACTOR)
}

/// Smallest step distinguishable from `t`
fn min_step(t: f64) -> f64 {
    16.0 * f64::EPSILON * t.abs().max(1.0)
}

/// `state + h · Σ wᵢ kᵢ`
fn combine(state: &PhaseState, h: f64, terms: &[(f64, &PhaseState)]) -> PhaseState {
    let mut out = state.clone();
    for (weight, k) in terms {
        if *weight != 0.0 {
            out.axpy(h * weight, k);
        }
    }
    out
}

/// Max-norm of the error estimate scaled by `atol + rtol · max(|y|, |y_new|)`
fn error_norm(
    error: &PhaseState,
    y: &PhaseState,
    y_new: &PhaseState,
    rtol: f64,
    atol: f64,
) -> f64 {
    let mut worst: f64 = 0.0;
    for ((e, a), b) in error
        .channels()
        .iter()
        .zip(y.channels())
        .zip(y_new.channels())
    {
        for i in 0..e.len() {
            if e[i] == 0.0 {
                continue;
            }
            let scale = atol + rtol * a[i].abs().max(b[i].abs());
            let scaled = e[i].abs() / scale;
            if !scaled.is_finite() {
                return f64::INFINITY;
            }
            worst = worst.max(scaled);
        }
    }
    worst
}

// =================================================================================================
// Dormand–Prince Solver
// =================================================================================================

/// Outcome of one attempted step
struct Attempt {
    state: PhaseState,
    k7: PhaseState,
    error: f64,
}

/// Adaptive Dormand–Prince 5(4) solver with error control
///
/// Suited to long smooth trajectories of few particles: the step grows
/// wherever the orbit is quiet and shrinks near close approaches.
///
/// # Example
///
/// ```rust
/// use trojan_rs::models::{EquationsOfMotion, FrameModel};
/// use trojan_rs::physics::PhaseState;
/// use trojan_rs::solver::{DormandPrinceSolver, Scenario, Solver, SolverConfiguration, TimeGrid};
///
/// let frame = FrameModel::jupiter();
/// let (lx, ly) = frame.l4();
/// let scenario = Scenario::new(
///     Box::new(EquationsOfMotion::new(frame)),
///     PhaseState::single(lx, ly, 0.0, 0.0),
/// );
///
/// let config = SolverConfiguration::adaptive(TimeGrid::orbits(&frame, 2, 50)?)
///     .with_tolerances(1e-8, 1e-10);
/// let result = DormandPrinceSolver::new().solve(&scenario, &config)?;
///
/// assert_eq!(result.len(), 100);
/// assert!(result.stats.accepted_steps > 0);
/// # Ok::<(), trojan_rs::TrojanError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DormandPrinceSolver;

impl DormandPrinceSolver {
    pub fn new() -> Self {
        Self
    }

    /// Attempt one step of size `h` from `(y, k1)`
    fn attempt(
        model: &dyn PhysicalModel,
        y: &PhaseState,
        k1: &PhaseState,
        h: f64,
        rtol: f64,
        atol: f64,
    ) -> Attempt {
        let k2 = model.compute_physics(&combine(y, h, &[(A21, k1)]));
        let k3 = model.compute_physics(&combine(y, h, &[(A31, k1), (A32, &k2)]));
        let k4 = model.compute_physics(&combine(y, h, &[(A41, k1), (A42, &k2), (A43, &k3)]));
        let k5 = model.compute_physics(&combine(
            y,
            h,
            &[(A51, k1), (A52, &k2), (A53, &k3), (A54, &k4)],
        ));
        let k6 = model.compute_physics(&combine(
            y,
            h,
            &[(A61, k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
        ));

        let state = combine(
            y,
            h,
            &[(B1, k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
        );
        let k7 = model.compute_physics(&state);

        let estimate = combine(
            &PhaseState::zeros(y.particles()),
            h,
            &[(E1, k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
        );
        let error = error_norm(&estimate, y, &state, rtol, atol);

        Attempt { state, k7, error }
    }
}

impl Solver for DormandPrinceSolver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult> {
        config.validate()?;
        scenario.validate()?;

        let (rtol, atol, max_step, max_steps) = match &config.solver_type {
            SolverType::Adaptive {
                relative_tolerance,
                absolute_tolerance,
                max_step,
                max_steps,
            } => (
                *relative_tolerance,
                *absolute_tolerance,
                max_step.unwrap_or(f64::INFINITY),
                *max_steps,
            ),
            other => {
                return Err(TrojanError::config(format!(
                    "DormandPrinceSolver only supports Adaptive configuration, got {}",
                    other.name()
                )));
            }
        };

        let grid = &config.time_grid;
        let model = scenario.model.as_ref();

        log::debug!(
            "Dormand-Prince: {} particle(s), {} samples over [{}, {}], rtol {rtol:e}, atol {atol:e}",
            scenario.particles(),
            grid.len(),
            grid.start(),
            grid.end()
        );

        let mut stats = IntegrationStats::default();
        let mut samples = Vec::with_capacity(grid.len());
        let mut t = grid.start();
        let mut y = scenario.initial.clone();
        samples.push(y.clone());

        let mut flagged = vec![false; scenario.particles()];
        model.flag_unreliable(&y, &mut flagged);

        let mut k1 = model.compute_physics(&y);
        stats.function_evaluations += 1;

        // First trial step: one sample interval, bounded by max_step
        let mut h = grid
            .intervals()
            .next()
            .map(|(t0, t1)| t1 - t0)
            .unwrap_or(0.0)
            .min(max_step);

        for (_, target) in grid.intervals() {
            while t < target {
                if stats.accepted_steps + stats.rejected_steps >= max_steps {
                    return Err(TrojanError::integration(
                        t,
                        format!("step budget of {max_steps} steps exhausted"),
                    ));
                }

                let remaining = target - t;
                let lands = h >= remaining;
                let h_try = if lands { remaining } else { h.min(max_step) };

                if h_try < min_step(t) && !lands {
                    return Err(TrojanError::integration(
                        t,
                        format!("step size underflow (h = {h_try:e})"),
                    ));
                }

                let attempt = Self::attempt(model, &y, &k1, h_try, rtol, atol);
                stats.function_evaluations += 6;

                let factor = step_factor(attempt.error);

                if attempt.error <= 1.0 {
                    t = if lands { target } else { t + h_try };
                    y = attempt.state;
                    k1 = attempt.k7;
                    model.flag_unreliable(&y, &mut flagged);
                    stats.accepted_steps += 1;
                    // A step shortened to land on a sample says nothing about
                    // the next one
                    h = if lands { h.max(h_try * factor) } else { h_try * factor };
                } else {
                    stats.rejected_steps += 1;
                    log::trace!(
                        "Dormand-Prince: rejected h = {h_try:e} at t = {t} (error {:.3e})",
                        attempt.error
                    );
                    h = h_try * factor.min(1.0);
                    if h < min_step(t) {
                        return Err(TrojanError::integration(
                            t,
                            format!("step size underflow (h = {h:e})"),
                        ));
                    }
                }
                h = h.min(max_step);
            }

            validate_state(&y, target)?;
            samples.push(y.clone());
        }

        let trajectory = Trajectory::from_states(grid.times().to_vec(), &samples)?;
        let mut result = SimulationResult::new(trajectory, stats, flagged);

        result.add_metadata("solver", self.name());
        result.add_metadata("samples", &grid.len().to_string());
        result.add_metadata("relative tolerance", &rtol.to_string());
        result.add_metadata("absolute tolerance", &atol.to_string());
        result.add_metadata("accepted steps", &stats.accepted_steps.to_string());
        result.add_metadata("rejected steps", &stats.rejected_steps.to_string());
        result.add_metadata(
            "function evaluations",
            &stats.function_evaluations.to_string(),
        );

        log::debug!(
            "Dormand-Prince: done, {} accepted / {} rejected steps, {} function evaluations",
            stats.accepted_steps,
            stats.rejected_steps,
            stats.function_evaluations
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Dormand-Prince (RK45)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
