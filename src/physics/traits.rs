//! Physical models traits and types
//!
//! This module defines the core API shared by the equations and the solvers:
//! - `PhysicalModel`: trait for all right-hand sides dX/dt = f(X)
//! - `PhaseState`: batched phase-space state of `n` particles
//! - `PhaseChannel`: type-safe identifiers of the four state channels

use nalgebra::DVector;
use std::fmt;

use crate::error::{Result, TrojanError};

// =================================================================================================
// Phase channels (Type-safe Identifiers)
// =================================================================================================

/// The four channels of a planar phase-space state
///
/// Channel order is fixed and matches the flat layout used by
/// [`PhaseState::to_flat`]: all x-positions, then all y-positions, then
/// all x-velocities, then all y-velocities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseChannel {
    /// x-position (AU)
    PositionX,

    /// y-position (AU)
    PositionY,

    /// x-velocity (AU/yr)
    VelocityX,

    /// y-velocity (AU/yr)
    VelocityY,
}

impl PhaseChannel {
    /// All channels in storage order
    pub const ALL: [PhaseChannel; 4] = [
        PhaseChannel::PositionX,
        PhaseChannel::PositionY,
        PhaseChannel::VelocityX,
        PhaseChannel::VelocityY,
    ];

    /// Index of the channel in storage order
    pub fn index(self) -> usize {
        match self {
            PhaseChannel::PositionX => 0,
            PhaseChannel::PositionY => 1,
            PhaseChannel::VelocityX => 2,
            PhaseChannel::VelocityY => 3,
        }
    }

    /// Short symbol used in logs and metadata
    pub fn symbol(self) -> &'static str {
        match self {
            PhaseChannel::PositionX => "x",
            PhaseChannel::PositionY => "y",
            PhaseChannel::VelocityX => "vx",
            PhaseChannel::VelocityY => "vy",
        }
    }
}

impl fmt::Display for PhaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =================================================================================================
// Phase State (Batched State Container)
// =================================================================================================

/// Phase-space state of `n` independent test particles
///
/// Each channel is a vector of length `n`; particle `i` is
/// `(x[i], y[i], vx[i], vy[i])`. A single particle is simply `n = 1`.
///
/// # Invariant
///
/// All four channels always have the same length.
///
/// # Example
/// ```
/// use trojan_rs::physics::{PhaseChannel, PhaseState};
///
/// let state = PhaseState::single(2.6, 4.5, 0.0, 0.0);
/// assert_eq!(state.particles(), 1);
/// assert_eq!(state.get(PhaseChannel::PositionY)[0], 4.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    channels: [DVector<f64>; 4],
}

impl PhaseState {
    /// Create a state from its four channels
    ///
    /// Fails with [`TrojanError::DimensionMismatch`] when the channels do not
    /// all have the length of `x`.
    pub fn new(
        x: DVector<f64>,
        y: DVector<f64>,
        vx: DVector<f64>,
        vy: DVector<f64>,
    ) -> Result<Self> {
        let n = x.len();
        for channel in [&y, &vx, &vy] {
            if channel.len() != n {
                return Err(TrojanError::DimensionMismatch {
                    expected: n,
                    actual: channel.len(),
                });
            }
        }

        Ok(Self { channels: [x, y, vx, vy] })
    }

    /// Assemble channels already known to share one length
    pub(crate) fn from_parts(
        x: DVector<f64>,
        y: DVector<f64>,
        vx: DVector<f64>,
        vy: DVector<f64>,
    ) -> Self {
        debug_assert!(
            y.len() == x.len() && vx.len() == x.len() && vy.len() == x.len(),
            "channel lengths must match"
        );
        Self { channels: [x, y, vx, vy] }
    }

    /// Create a state with the given positions and zero velocity
    pub fn at_rest(x: DVector<f64>, y: DVector<f64>) -> Result<Self> {
        let n = x.len();
        Self::new(x, y, DVector::zeros(n), DVector::zeros(n))
    }

    /// Create a single-particle state
    pub fn single(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self {
            channels: [
                DVector::from_element(1, x),
                DVector::from_element(1, y),
                DVector::from_element(1, vx),
                DVector::from_element(1, vy),
            ],
        }
    }

    /// Create a state of `n` particles at the origin, at rest
    pub fn zeros(n: usize) -> Self {
        Self {
            channels: [
                DVector::zeros(n),
                DVector::zeros(n),
                DVector::zeros(n),
                DVector::zeros(n),
            ],
        }
    }

    /// Rebuild a state from the flat `4n` layout `[x.., y.., vx.., vy..]`
    pub fn from_flat(values: &[f64]) -> Result<Self> {
        if values.len() % 4 != 0 {
            return Err(TrojanError::DimensionMismatch {
                expected: values.len().next_multiple_of(4),
                actual: values.len(),
            });
        }

        let n = values.len() / 4;
        let channel = |c: usize| DVector::from_column_slice(&values[c * n..(c + 1) * n]);

        Ok(Self {
            channels: [channel(0), channel(1), channel(2), channel(3)],
        })
    }

    /// Flatten into the `4n` layout `[x.., y.., vx.., vy..]`
    pub fn to_flat(&self) -> Vec<f64> {
        self.channels
            .iter()
            .flat_map(|channel| channel.iter().copied())
            .collect()
    }

    /// Number of particles in the batch
    pub fn particles(&self) -> usize {
        self.channels[0].len()
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.particles() == 0
    }

    /// Get a channel
    pub fn get(&self, channel: PhaseChannel) -> &DVector<f64> {
        &self.channels[channel.index()]
    }

    /// Get mutable reference to a channel
    ///
    /// Resizing the returned vector breaks the length invariant; only
    /// element-wise updates are allowed.
    pub fn get_mut(&mut self, channel: PhaseChannel) -> &mut DVector<f64> {
        &mut self.channels[channel.index()]
    }

    /// x-positions
    pub fn x(&self) -> &DVector<f64> {
        &self.channels[0]
    }

    /// y-positions
    pub fn y(&self) -> &DVector<f64> {
        &self.channels[1]
    }

    /// x-velocities
    pub fn vx(&self) -> &DVector<f64> {
        &self.channels[2]
    }

    /// y-velocities
    pub fn vy(&self) -> &DVector<f64> {
        &self.channels[3]
    }

    /// All channels in storage order
    pub fn channels(&self) -> &[DVector<f64>; 4] {
        &self.channels
    }

    /// State of particle `i` as `[x, y, vx, vy]`
    pub fn particle(&self, i: usize) -> Option<[f64; 4]> {
        if i >= self.particles() {
            return None;
        }
        Some([
            self.channels[0][i],
            self.channels[1][i],
            self.channels[2][i],
            self.channels[3][i],
        ])
    }

    /// In-place `self += a * other`
    ///
    /// # Panics
    ///
    /// Panics when the particle counts differ.
    pub fn axpy(&mut self, a: f64, other: &PhaseState) {
        assert_eq!(
            self.particles(),
            other.particles(),
            "Particle counts must match"
        );
        for (lhs, rhs) in self.channels.iter_mut().zip(other.channels.iter()) {
            lhs.axpy(a, rhs, 1.0);
        }
    }

    /// First channel containing a NaN or infinite value, if any
    pub fn first_non_finite(&self) -> Option<PhaseChannel> {
        PhaseChannel::ALL
            .into_iter()
            .find(|c| self.get(*c).iter().any(|v| !v.is_finite()))
    }
}

// Operator overloading for numerical operations

impl std::ops::Add for PhaseState {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        assert_eq!(
            self.particles(),
            rhs.particles(),
            "Particle counts must match"
        );
        for (lhs, rhs) in self.channels.iter_mut().zip(rhs.channels) {
            *lhs += rhs;
        }
        self
    }
}

impl std::ops::Mul<f64> for PhaseState {
    type Output = Self;

    fn mul(mut self, scalar: f64) -> Self::Output {
        for channel in self.channels.iter_mut() {
            *channel *= scalar;
        }
        self
    }
}

// ==================================================================================================
// Physical Model Trait
// =================================================================================================

/// Trait for physical models
///
/// # Responsibility
/// Computes the right-hand side f(X) of the autonomous system dX/dt = f(X)
/// for a batch of particles. Does NOT integrate it (that's the Solver's job).
///
/// # Batching
/// Implementations must treat particles independently: the derivative of
/// particle `i` depends only on the state of particle `i`. The returned
/// state has the same particle count as the input.
pub trait PhysicalModel: Send + Sync {
    /// Computes dX/dt at the given state
    fn compute_physics(&self, state: &PhaseState) -> PhaseState;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }

    /// Raise `flags[i]` when particle `i` of `state` sits where the model is
    /// not physically faithful
    ///
    /// Solvers call this on the initial state and after every accepted step,
    /// so excursions between two samples are still caught. Flags are only
    /// ever raised, never cleared. Default: nothing is flagged.
    fn flag_unreliable(&self, _state: &PhaseState, _flags: &mut [bool]) {}
}
