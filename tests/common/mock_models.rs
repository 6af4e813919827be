//! Mock physical models for testing
//!
//! These models have known analytical solutions, making them
//! ideal for validating numerical solver accuracy.

use nalgebra::DVector;
use trojan_rs::physics::{PhaseState, PhysicalModel};

// =================================================================================================
// Harmonic oscillator: d²r/dt² = -ω² r
// =================================================================================================

/// Isotropic harmonic oscillator on both axes
///
/// Analytical solution from rest at `x₀`: x(t) = x₀·cos(ωt)
pub struct HarmonicOscillator {
    pub omega: f64,
}

impl HarmonicOscillator {
    pub fn new(omega: f64) -> Self {
        Self { omega }
    }

    /// x(t) for a particle released at rest from `x0`
    pub fn analytical_solution(&self, t: f64, x0: f64) -> f64 {
        x0 * (self.omega * t).cos()
    }
}

impl PhysicalModel for HarmonicOscillator {
    fn compute_physics(&self, state: &PhaseState) -> PhaseState {
        let w2 = self.omega * self.omega;
        PhaseState::new(
            state.vx().clone(),
            state.vy().clone(),
            state.x() * -w2,
            state.y() * -w2,
        )
        .expect("channels share one length")
    }

    fn name(&self) -> &str {
        "Harmonic Oscillator"
    }
}

// =================================================================================================
// Constant drift: dr/dt = v, dv/dt = 0
// =================================================================================================

/// Free particles moving at constant velocity
///
/// Analytical solution: x(t) = x₀ + vx·t. Every Runge-Kutta method is exact.
pub struct ConstantDrift;

impl PhysicalModel for ConstantDrift {
    fn compute_physics(&self, state: &PhaseState) -> PhaseState {
        let n = state.particles();
        PhaseState::new(
            state.vx().clone(),
            state.vy().clone(),
            DVector::zeros(n),
            DVector::zeros(n),
        )
        .expect("channels share one length")
    }

    fn name(&self) -> &str {
        "Constant Drift"
    }
}
