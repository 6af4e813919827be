//! Sample times of an integration
//!
//! A [`TimeGrid`] is the monotonic sequence of `m` times at which the
//! trajectory is recorded. The first time is the initial time: the initial
//! state is stored as sample 0 and the solver advances from there.

use crate::error::{Result, TrojanError};
use crate::models::FrameModel;
use crate::models::grid::linspace;

/// Samples per orbital period used when none is given
pub const DEFAULT_PRECISION: usize = 100;

/// Strictly increasing, finite sample times \[yr\]
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Create from explicit sample times
    ///
    /// # Errors
    ///
    /// [`TrojanError::InvalidConfiguration`] when `times` is empty, contains a
    /// non-finite value or is not strictly increasing.
    pub fn new(times: Vec<f64>) -> Result<Self> {
        if times.is_empty() {
            return Err(TrojanError::config("time grid needs at least one sample"));
        }
        if let Some(t) = times.iter().find(|t| !t.is_finite()) {
            return Err(TrojanError::config(format!("sample time {t} is not finite")));
        }
        if let Some(pair) = times.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(TrojanError::config(format!(
                "sample times must be strictly increasing ({} then {})",
                pair[0], pair[1]
            )));
        }

        Ok(Self { times })
    }

    /// `samples` evenly spaced times over `[start, end]`
    pub fn linspace(start: f64, end: f64, samples: usize) -> Result<Self> {
        if samples > 1 && end <= start {
            return Err(TrojanError::config(format!(
                "time span [{start}, {end}] is empty"
            )));
        }
        Self::new(linspace(start, end, samples))
    }

    /// `orbits · precision` evenly spaced times over `[0, orbits · T]`
    pub fn orbits(frame: &FrameModel, orbits: usize, precision: usize) -> Result<Self> {
        if orbits == 0 || precision == 0 {
            return Err(TrojanError::config(format!(
                "need at least one orbit and one sample per orbit, got {orbits} x {precision}"
            )));
        }
        Self::linspace(0.0, orbits as f64 * frame.period(), orbits * precision)
    }

    /// Sample times
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of samples `m`
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false: a grid holds at least one sample
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Initial time
    pub fn start(&self) -> f64 {
        self.times[0]
    }

    /// Final time
    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Integrated span `end - start`
    pub fn span(&self) -> f64 {
        self.end() - self.start()
    }

    /// Consecutive sample intervals `(t_i, t_{i+1})`
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
