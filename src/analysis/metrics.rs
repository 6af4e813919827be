//! Stability metrics
//!
//! Scalars derived from a trajectory, per particle:
//!
//! - **wander**: `max_t |(x, y) - L4|`, always ≥ 0
//! - **libration**: spread `max_t θ - min_t θ` of the polar angle
//!   `θ = atan2(y, x)` folded into `[0, 2π)`, so always in `[0, 2π)`
//!
//! The libration angle is measured about the barycentre (the origin), not
//! about L4.

use std::f64::consts::TAU;

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{Result, TrojanError};
use crate::models::{EquationsOfMotion, FrameModel, SINGULARITY_FLOOR};
use crate::solver::{SimulationResult, Trajectory};

fn check_series(x: &ArrayView1<'_, f64>, y: &ArrayView1<'_, f64>) -> Result<()> {
    if x.is_empty() {
        return Err(TrojanError::state("no sampled positions to analyse"));
    }
    if x.len() != y.len() {
        return Err(TrojanError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    Ok(())
}

/// Largest distance from L4 over the sampled positions of one particle
///
/// # Errors
///
/// [`TrojanError::InvalidState`] on an empty series,
/// [`TrojanError::DimensionMismatch`] when `x` and `y` differ in length.
pub fn wander(frame: &FrameModel, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_series(&x, &y)?;
    let (lx, ly) = frame.l4();

    Ok(x.iter()
        .zip(y.iter())
        .map(|(x, y)| (x - lx).hypot(y - ly))
        .fold(0.0, f64::max))
}

/// Polar angle of `(x, y)` folded into `[0, 2π)`
pub fn polar_angle(x: f64, y: f64) -> f64 {
    let theta = y.atan2(x);
    if theta < 0.0 { theta + TAU } else { theta }
}

/// Angular spread about the origin over the sampled positions of one particle
///
/// # Errors
///
/// Same as [`wander`].
pub fn libration(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64> {
    check_series(&x, &y)?;

    let (low, high) = x
        .iter()
        .zip(y.iter())
        .map(|(x, y)| polar_angle(*x, *y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), theta| {
            (low.min(theta), high.max(theta))
        });

    Ok(high - low)
}

/// Reshape a per-particle vector of a `res × res` grid back onto the mesh
///
/// Element `k` lands at `(k / res, k % res)`, the inverse of the grid's
/// row-major flattening.
///
/// ```rust
/// use trojan_rs::analysis::to_grid;
///
/// let field = to_grid(&[1.0, 2.0, 3.0, 4.0], 2)?;
/// assert_eq!(field[(1, 0)], 3.0);
/// # Ok::<(), trojan_rs::TrojanError>(())
/// ```
///
/// # Errors
///
/// [`TrojanError::InvalidState`] when `values` is empty or its length is not
/// `res²`.
pub fn to_grid(values: &[f64], res: usize) -> Result<Array2<f64>> {
    if values.is_empty() {
        return Err(TrojanError::state("no values to reshape"));
    }
    Array2::from_shape_vec((res, res), values.to_vec()).map_err(|_| {
        TrojanError::state(format!(
            "cannot reshape {} values onto a {res} x {res} grid",
            values.len()
        ))
    })
}

// =================================================================================================
// Per-particle metrics
// =================================================================================================

/// Stability metrics of every particle of a trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityMetrics {
    /// Maximum distance from L4 \[AU\]
    pub wander: Vec<f64>,

    /// Angular spread about the barycentre \[rad\]
    pub libration: Vec<f64>,

    /// True when the particle came closer than the singularity floor to the
    /// Sun or the Planet: its orbit is physically unreliable
    pub close_approach: Vec<bool>,
}

impl StabilityMetrics {
    /// Analyse every particle of an integration result
    ///
    /// Close approaches combine the sampled positions with the per-step flags
    /// raised by the solver, so a pass through the floor between two samples
    /// is reported too.
    pub fn from_result(frame: &FrameModel, result: &SimulationResult) -> Result<Self> {
        let mut metrics = Self::analyse(frame, &result.trajectory)?;
        if result.flagged.len() != metrics.len() {
            return Err(TrojanError::DimensionMismatch {
                expected: metrics.len(),
                actual: result.flagged.len(),
            });
        }

        for (flag, stepped) in metrics.close_approach.iter_mut().zip(&result.flagged) {
            *flag |= *stepped;
        }
        metrics.report();
        Ok(metrics)
    }

    /// Analyse every particle of `trajectory` in the frame it was integrated in
    ///
    /// Only the recorded samples are checked for close approaches; prefer
    /// [`StabilityMetrics::from_result`] when the integration result is at hand.
    pub fn from_trajectory(frame: &FrameModel, trajectory: &Trajectory) -> Result<Self> {
        let metrics = Self::analyse(frame, trajectory)?;
        metrics.report();
        Ok(metrics)
    }

    fn analyse(frame: &FrameModel, trajectory: &Trajectory) -> Result<Self> {
        let equations = EquationsOfMotion::new(*frame);
        let n = trajectory.particles();
        if n == 0 {
            return Err(TrojanError::state("trajectory has no particles"));
        }

        let mut metrics = Self {
            wander: Vec::with_capacity(n),
            libration: Vec::with_capacity(n),
            close_approach: Vec::with_capacity(n),
        };

        for (x, y) in trajectory
            .x()
            .axis_iter(Axis(1))
            .zip(trajectory.y().axis_iter(Axis(1)))
        {
            metrics.wander.push(wander(frame, x, y)?);
            metrics.libration.push(libration(x, y)?);
            metrics.close_approach.push(
                x.iter()
                    .zip(y.iter())
                    .any(|(x, y)| equations.is_near_singularity(*x, *y)),
            );
        }

        Ok(metrics)
    }

    fn report(&self) {
        let flagged = self.close_approaches();
        if flagged > 0 {
            log::warn!(
                "{flagged} of {} particle(s) came within {SINGULARITY_FLOOR} AU of a body; their metrics are unreliable",
                self.len()
            );
        }
    }

    /// Number of analysed particles
    pub fn len(&self) -> usize {
        self.wander.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wander.is_empty()
    }

    /// Number of particles flagged for a close approach
    pub fn close_approaches(&self) -> usize {
        self.close_approach.iter().filter(|flag| **flag).count()
    }

    /// Wander reshaped onto a `res × res` grid
    pub fn wander_grid(&self, res: usize) -> Result<Array2<f64>> {
        to_grid(&self.wander, res)
    }

    /// Libration reshaped onto a `res × res` grid
    pub fn libration_grid(&self, res: usize) -> Result<Array2<f64>> {
        to_grid(&self.libration, res)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhaseState;
    use nalgebra::DVector;
    use ndarray::{Array1, array};
    use std::f64::consts::PI;

    #[test]
    fn test_wander_of_fixed_particle_at_l4_is_zero() {
        let frame = FrameModel::jupiter();
        let (lx, ly) = frame.l4();
        let x = Array1::from_elem(5, lx);
        let y = Array1::from_elem(5, ly);

        assert_eq!(wander(&frame, x.view(), y.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_wander_is_maximum_distance() {
        let frame = FrameModel::new(0.0, 2.0).unwrap();
        let (lx, ly) = frame.l4();
        let x = array![lx, lx + 0.3, lx];
        let y = array![ly, ly, ly - 0.4];

        assert!((wander(&frame, x.view(), y.view()).unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_libration_folds_negative_angles() {
        // -π/2 folds to 3π/2: spread from π/2 to 3π/2
        let x = array![0.0, -1.0, 0.0];
        let y = array![1.0, 0.0, -1.0];

        assert!((libration(x.view(), y.view()).unwrap() - PI).abs() < 1e-12);
        assert!((polar_angle(1.0, -1e-12) - TAU).abs() < 1e-9);
        assert_eq!(polar_angle(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_libration_stays_below_full_turn() {
        let samples = 360;
        let x = Array1::from_shape_fn(samples, |k| (k as f64).to_radians().cos());
        let y = Array1::from_shape_fn(samples, |k| (k as f64).to_radians().sin());
        let spread = libration(x.view(), y.view()).unwrap();

        assert!(spread >= 0.0 && spread < TAU);
        assert!(spread > 6.2);
    }

    #[test]
    fn test_empty_series_is_invalid_state() {
        let frame = FrameModel::jupiter();
        let empty = Array1::<f64>::zeros(0);

        assert!(matches!(
            wander(&frame, empty.view(), empty.view()),
            Err(TrojanError::InvalidState(_))
        ));
        assert!(matches!(
            libration(empty.view(), empty.view()),
            Err(TrojanError::InvalidState(_))
        ));
        assert!(matches!(to_grid(&[], 0), Err(TrojanError::InvalidState(_))));
    }

    #[test]
    fn test_mismatched_series() {
        let x = array![1.0, 2.0];
        let y = array![1.0];

        assert!(matches!(
            libration(x.view(), y.view()),
            Err(TrojanError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_to_grid_is_row_major() {
        let values: Vec<f64> = (0..9).map(f64::from).collect();
        let field = to_grid(&values, 3).unwrap();

        assert_eq!(field.shape(), &[3, 3]);
        assert_eq!(field[(0, 2)], 2.0);
        assert_eq!(field[(2, 0)], 6.0);
        assert!(to_grid(&values, 2).is_err());
    }

    #[test]
    fn test_metrics_flag_close_approach() {
        let frame = FrameModel::jupiter();
        let (lx, ly) = frame.l4();
        let (px, py) = frame.planet_position();

        // Particle 0 sits at L4, particle 1 passes through the planet
        let states = vec![
            PhaseState::at_rest(
                DVector::from_row_slice(&[lx, px + 1.0]),
                DVector::from_row_slice(&[ly, py]),
            )
            .unwrap(),
            PhaseState::at_rest(
                DVector::from_row_slice(&[lx, px + 0.01]),
                DVector::from_row_slice(&[ly, py]),
            )
            .unwrap(),
        ];
        let trajectory = Trajectory::from_states(vec![0.0, 1.0], &states).unwrap();
        let metrics = StabilityMetrics::from_trajectory(&frame, &trajectory).unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics.close_approach, vec![false, true]);
        assert_eq!(metrics.close_approaches(), 1);
        assert_eq!(metrics.wander[0], 0.0);
        assert_eq!(metrics.libration[0], 0.0);
        assert!(metrics.wander[1] > 0.0);
    }

    #[test]
    fn test_result_flags_add_to_sampled_close_approaches() {
        let frame = FrameModel::jupiter();
        let (lx, ly) = frame.l4();
        let state = PhaseState::at_rest(
            DVector::from_row_slice(&[lx, lx]),
            DVector::from_row_slice(&[ly, ly]),
        )
        .unwrap();
        let trajectory = Trajectory::from_states(vec![0.0, 1.0], &[state.clone(), state]).unwrap();

        // Both samples sit at L4; the solver saw particle 1 inside the floor
        let result = SimulationResult::new(
            trajectory.clone(),
            Default::default(),
            vec![false, true],
        );

        let sampled = StabilityMetrics::from_trajectory(&frame, &trajectory).unwrap();
        assert_eq!(sampled.close_approach, vec![false, false]);

        let stepped = StabilityMetrics::from_result(&frame, &result).unwrap();
        assert_eq!(stepped.close_approach, vec![false, true]);
        assert_eq!(stepped.wander, sampled.wander);

        let short = SimulationResult::new(trajectory, Default::default(), vec![true]);
        assert!(matches!(
            StabilityMetrics::from_result(&frame, &short),
            Err(TrojanError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }
}
