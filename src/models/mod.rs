//! Restricted three-body models
//!
//! Everything the solver needs to know about one Sun + Planet system:
//!
//! ## [`FrameModel`]: frame constants
//!
//! Barycentre offsets, period, angular velocity and Lagrange points derived
//! from `(Mp, R)`.
//!
//! ## [`InitialConditionGrid`]: starting states
//!
//! One particle, or a `res × res` Cartesian or polar batch around a reference
//! point.
//!
//! ## [`EquationsOfMotion`]: force law
//!
//! Implements [`PhysicalModel`](crate::physics::PhysicalModel): the solver
//! calls `compute_physics` at each stage, the model returns the rotating-frame
//! derivatives of every particle.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod equations;
pub mod frame;
pub mod grid;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use equations::{EquationsOfMotion, SINGULARITY_FLOOR};
pub use frame::{FrameModel, GRAVITATIONAL_CONSTANT, ROUTH_CRITICAL_MASS_RATIO, SUN_MASS};
pub use grid::{GridLayout, GridWarning, InitialConditionGrid, POLAR_MAX_ANGLE, POLAR_MIN_ANGLE};
