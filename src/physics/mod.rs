//! Physical models
//!
//! This module provides the trait and state types shared by every model.
//! A physical model encapsulates the equations of a system; here the only
//! concrete model is the rotating-frame restricted three-body force law in
//! [`crate::models`].
//!
//! # Core Concepts
//!
//! - **Physical Model**: Computes dX/dt at a given batched state
//! - **Phase State**: Positions and velocities of `n` independent particles
//! - **Phase Channel**: Type-safe identifier for one of the four channels
//!
//! # Architecture
//!
//! Physical models are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to integrate them (numerics)
//!
//! # Implementing a New Physical Model
//!
//! ```rust
//! use trojan_rs::physics::{PhaseState, PhysicalModel};
//!
//! /// Free particles: constant velocity, zero acceleration
//! struct Drift;
//!
//! impl PhysicalModel for Drift {
//!     fn compute_physics(&self, state: &PhaseState) -> PhaseState {
//!         let n = state.particles();
//!         PhaseState::new(
//!             state.vx().clone(),
//!             state.vy().clone(),
//!             nalgebra::DVector::zeros(n),
//!             nalgebra::DVector::zeros(n),
//!         )
//!         .expect("channels share the particle count")
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Drift"
//!     }
//! }
//!
//! let rate = Drift.compute_physics(&PhaseState::single(0.0, 0.0, 1.0, 2.0));
//! assert_eq!(rate.x()[0], 1.0);
//! ```

// module declaration
pub mod traits;

// re-export commonly used types for convenience
pub use traits::{PhaseChannel, PhaseState, PhysicalModel};
