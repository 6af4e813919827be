//! Integrated trajectories
//!
//! A [`Trajectory`] stores the four channels of `n` particles at `m` sample
//! times. Each channel is an `(m × n)` array: row = sample time, column =
//! particle. Column `i` of `x()` is the x-path of particle `i`.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{Result, TrojanError};
use crate::physics::{PhaseChannel, PhaseState};

/// Time series of the phase-space states of `n` particles
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    channels: [Array2<f64>; 4],
}

impl Trajectory {
    /// Assemble a trajectory from one batched state per sample time
    ///
    /// # Errors
    ///
    /// - [`TrojanError::InvalidState`] when there are no samples
    /// - [`TrojanError::DimensionMismatch`] when `times` and `states` differ
    ///   in length or the states do not share one particle count
    pub fn from_states(times: Vec<f64>, states: &[PhaseState]) -> Result<Self> {
        if states.is_empty() {
            return Err(TrojanError::state("trajectory needs at least one sample"));
        }
        if times.len() != states.len() {
            return Err(TrojanError::DimensionMismatch {
                expected: times.len(),
                actual: states.len(),
            });
        }

        let n = states[0].particles();
        if let Some(state) = states.iter().find(|s| s.particles() != n) {
            return Err(TrojanError::DimensionMismatch {
                expected: n,
                actual: state.particles(),
            });
        }

        let m = states.len();
        let channel = |c: PhaseChannel| {
            Array2::from_shape_fn((m, n), |(t, p)| states[t].get(c)[p])
        };

        Ok(Self {
            times,
            channels: [
                channel(PhaseChannel::PositionX),
                channel(PhaseChannel::PositionY),
                channel(PhaseChannel::VelocityX),
                channel(PhaseChannel::VelocityY),
            ],
        })
    }

    /// Sample times
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of sample times `m`
    pub fn samples(&self) -> usize {
        self.times.len()
    }

    /// Number of particles `n`
    pub fn particles(&self) -> usize {
        self.channels[0].ncols()
    }

    /// One channel as an `(m × n)` view
    pub fn channel(&self, channel: PhaseChannel) -> ArrayView2<'_, f64> {
        self.channels[channel.index()].view()
    }

    /// x-positions `(m × n)`
    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.channel(PhaseChannel::PositionX)
    }

    /// y-positions `(m × n)`
    pub fn y(&self) -> ArrayView2<'_, f64> {
        self.channel(PhaseChannel::PositionY)
    }

    /// x-velocities `(m × n)`
    pub fn vx(&self) -> ArrayView2<'_, f64> {
        self.channel(PhaseChannel::VelocityX)
    }

    /// y-velocities `(m × n)`
    pub fn vy(&self) -> ArrayView2<'_, f64> {
        self.channel(PhaseChannel::VelocityY)
    }

    /// Position path `(x(t), y(t))` of particle `i`
    pub fn path(&self, i: usize) -> Option<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        if i >= self.particles() {
            return None;
        }
        Some((
            self.channels[0].index_axis(Axis(1), i),
            self.channels[1].index_axis(Axis(1), i),
        ))
    }

    /// Batched state at sample `t`
    pub fn state_at(&self, t: usize) -> Option<PhaseState> {
        (t < self.samples()).then(|| self.row_state(t))
    }

    /// Batched state at the last sample
    pub fn final_state(&self) -> PhaseState {
        // from_states rejects an empty series: row samples() - 1 always exists
        self.row_state(self.samples() - 1)
    }

    fn row_state(&self, t: usize) -> PhaseState {
        let row = |c: usize| nalgebra::DVector::from_iterator(
            self.particles(),
            self.channels[c].row(t).iter().copied(),
        );
        PhaseState::from_parts(row(0), row(1), row(2), row(3))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
