//! Numerical methods for the equations of motion
//!
//! Concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Available Methods
//!
//! - **[`RK4Solver`]**: classical fourth-order Runge-Kutta with sub-steps
//!   bounded by `max_step`
//!   - Cost: 4 function evaluations per sub-step
//!   - Use: dense, evenly sampled grids of many particles (heat maps)
//!
//! - **[`DormandPrinceSolver`]**: embedded 5(4) pair with error control
//!   - Cost: 6 function evaluations per attempted step (FSAL)
//!   - Use: long smooth trajectories, tolerance-driven accuracy
//!
//! Both record the initial state as the first sample, hit every sample time
//! exactly and fail hard on a non-finite state.
//!
//! # Performance Considerations
//!
//! The force law itself switches to rayon (feature `parallel`) for batches
//! above [`parallel_threshold()`](crate::solver::parallel_threshold). One
//! batched call over a whole grid is far cheaper than one call per particle.

mod dopri;
mod rk4;

// Re-exports for convenience
pub use dopri::DormandPrinceSolver;
pub use rk4::RK4Solver;
