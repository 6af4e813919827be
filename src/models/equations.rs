//! Rotating-frame equations of motion
//!
//! Restricted three-body force law for massless test particles in the frame
//! co-rotating with the Sun and the Planet.
//!
//! # Equations
//!
//! For a particle at `(x, y)` with velocity `(vx, vy)`:
//!
//! ```text
//! r₁ = max(|(x + Rs, y)|, ε)                      Sun–particle distance
//! r₂ = max(|(x - Rp, y)|, ε)                      Planet–particle distance
//!
//! ax = -G·[(x + Rs)·Ms/r₁³ + (x - Rp)·Mp/r₂³] + x·Ω² + 2·Ω·vy
//! ay = -G·[ y·Ms/r₁³       +  y·Mp/r₂³     ] + y·Ω² - 2·Ω·vx
//!
//! dX/dt = (vx, vy, ax, ay)
//! ```
//!
//! `x·Ω²`, `y·Ω²` are the centrifugal terms and `±2·Ω·v` the Coriolis terms of
//! the non-inertial frame.
//!
//! # Singularity floor
//!
//! Both distances are clamped at `ε = 0.05` AU so the force stays finite when a
//! trajectory passes through a body. States closer than `ε` are physically
//! meaningless. The solvers check every accepted step through
//! [`PhysicalModel::flag_unreliable`] and report the affected particles in
//! [`SimulationResult::flagged`](crate::solver::SimulationResult::flagged).
//!
//! # Batching
//!
//! Particles do not interact. [`EquationsOfMotion::compute_physics`]
//! evaluates each particle independently, in parallel (feature `parallel`)
//! once the batch exceeds [`parallel_threshold()`](crate::solver::parallel_threshold).

use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::models::FrameModel;
use crate::physics::{PhaseState, PhysicalModel};

/// Clamp floor of the Sun– and Planet–particle distances \[AU\]
pub const SINGULARITY_FLOOR: f64 = 0.05;

/// Restricted three-body force law bound to one [`FrameModel`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquationsOfMotion {
    frame: FrameModel,
    floor: f64,
}

impl EquationsOfMotion {
    /// Bind the force law to a frame, with the default singularity floor
    pub fn new(frame: FrameModel) -> Self {
        Self {
            frame,
            floor: SINGULARITY_FLOOR,
        }
    }

    /// Frame the equations are bound to
    pub fn frame(&self) -> &FrameModel {
        &self.frame
    }

    /// Singularity floor ε \[AU\]
    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Unclamped Sun–particle distance
    pub fn sun_distance(&self, x: f64, y: f64) -> f64 {
        (x + self.frame.sun_offset()).hypot(y)
    }

    /// Unclamped Planet–particle distance
    pub fn planet_distance(&self, x: f64, y: f64) -> f64 {
        (x - self.frame.planet_offset()).hypot(y)
    }

    /// True when `(x, y)` lies inside the floor of either body
    pub fn is_near_singularity(&self, x: f64, y: f64) -> bool {
        self.sun_distance(x, y) < self.floor || self.planet_distance(x, y) < self.floor
    }

    /// Acceleration `(ax, ay)` of one particle
    pub fn acceleration(&self, x: f64, y: f64, vx: f64, vy: f64) -> (f64, f64) {
        let frame = &self.frame;
        let g = frame.gravitational_constant();
        let ms = frame.sun_mass();
        let mp = frame.planet_mass();
        let rs = frame.sun_offset();
        let rp = frame.planet_offset();
        let omega = frame.omega();

        let rst = self.sun_distance(x, y).max(self.floor);
        let rpt = self.planet_distance(x, y).max(self.floor);
        let sun_term = ms / rst.powi(3);
        let planet_term = mp / rpt.powi(3);

        let ax = -g * ((x + rs) * sun_term + (x - rp) * planet_term)
            + x * omega * omega
            + 2.0 * omega * vy;
        let ay = -g * (y * sun_term + y * planet_term)
            + y * omega * omega
            - 2.0 * omega * vx;

        (ax, ay)
    }

    /// Accelerations of every particle of the batch
    fn accelerations(&self, state: &PhaseState) -> (DVector<f64>, DVector<f64>) {
        let n = state.particles();
        let (x, y, vx, vy) = (state.x(), state.y(), state.vx(), state.vy());
        let single = |i: usize| self.acceleration(x[i], y[i], vx[i], vy[i]);

        #[cfg(feature = "parallel")]
        {
            if n > crate::solver::parallel_threshold() {
                let pairs: Vec<(f64, f64)> = (0..n).into_par_iter().map(single).collect();
                return (
                    DVector::from_iterator(n, pairs.iter().map(|p| p.0)),
                    DVector::from_iterator(n, pairs.iter().map(|p| p.1)),
                );
            }
        }

        let mut ax = DVector::zeros(n);
        let mut ay = DVector::zeros(n);
        for i in 0..n {
            (ax[i], ay[i]) = single(i);
        }
        (ax, ay)
    }

    /// Jacobi constant of every particle of the batch
    ///
    /// `C = 2G·Ms/r₁ + 2G·Mp/r₂ + Ω²(x² + y²) - (vx² + vy²)`, with the same
    /// clamped distances as the force law. It is an integral of motion of the
    /// rotating-frame flow, so its drift measures integration error.
    pub fn jacobi_constant(&self, state: &PhaseState) -> DVector<f64> {
        let frame = &self.frame;
        let g = frame.gravitational_constant();
        let omega = frame.omega();

        DVector::from_iterator(
            state.particles(),
            (0..state.particles()).map(|i| {
                let (x, y, vx, vy) = (state.x()[i], state.y()[i], state.vx()[i], state.vy()[i]);
                let r1 = self.sun_distance(x, y).max(self.floor);
                let r2 = self.planet_distance(x, y).max(self.floor);

                2.0 * g * frame.sun_mass() / r1
                    + 2.0 * g * frame.planet_mass() / r2
                    + omega * omega * (x * x + y * y)
                    - (vx * vx + vy * vy)
            }),
        )
    }
}

impl PhysicalModel for EquationsOfMotion {
    fn compute_physics(&self, state: &PhaseState) -> PhaseState {
        let (ax, ay) = self.accelerations(state);
        PhaseState::from_parts(state.vx().clone(), state.vy().clone(), ax, ay)
    }

    fn name(&self) -> &str {
        "Rotating-frame restricted three-body"
    }

    fn description(&self) -> Option<&str> {
        Some("Sun + Planet fixed in the co-rotating frame, massless test particles")
    }

    fn flag_unreliable(&self, state: &PhaseState, flags: &mut [bool]) {
        let (x, y) = (state.x(), state.y());
        for (i, flag) in flags.iter_mut().enumerate().take(state.particles()) {
            *flag |= self.is_near_singularity(x[i], y[i]);
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
