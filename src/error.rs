//! Error taxonomy
//!
//! Every fallible operation in the crate returns [`Result`]. The variants map
//! onto the four failure classes of the engine:
//!
//! - **Invalid configuration**: parameters that can never describe a valid
//!   run (negative planet mass, non-monotonic sample times, ...)
//! - **Invalid state**: an operation requested on data that does not exist
//!   yet (metrics on an empty time series, reshape of a wrongly sized vector)
//! - **Dimension mismatch**: batched channels of different lengths
//! - **Integration**: hard failure propagated from a numerical solver
//!
//! A zero grid resolution is *not* an error; it is normalised and reported as
//! a [`GridWarning`](crate::models::GridWarning).

use thiserror::Error;

/// Errors produced by the Trojan engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrojanError {
    /// Parameters that cannot describe a valid computation
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Operation requested before the data it needs exists
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Batched channels or arrays with incompatible lengths
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Numerical integration failed (non-finite state, step underflow, ...)
    #[error("integration failed at t = {time}: {reason}")]
    Integration { time: f64, reason: String },
}

impl TrojanError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub(crate) fn state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub(crate) fn integration(time: f64, reason: impl Into<String>) -> Self {
        Self::Integration { time, reason: reason.into() }
    }

    /// True for failures reported by a numerical solver
    pub fn is_integration_failure(&self) -> bool {
        matches!(self, Self::Integration { .. })
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TrojanError>;
