//! Sun–Planet rotating frame
//!
//! Derives every constant of one Sun + Planet system from the planet mass and
//! the orbital radius, in normalised units:
//!
//! - mass in solar masses (`Ms = 1`)
//! - length in astronomical units (AU)
//! - time in years, so that `G = 4π²`
//!
//! The frame's origin is the Sun–Planet barycentre and its x-axis points from
//! the Sun towards the Planet. Sun and Planet are fixed at `(-Rs, 0)` and
//! `(Rp, 0)`; the frame rotates at the planet's angular velocity `Ω`.
//!
//! # Example
//!
//! ```rust
//! use trojan_rs::models::FrameModel;
//!
//! let jupiter = FrameModel::new(0.001, 5.2)?;
//! let (lx, ly) = jupiter.l4();
//!
//! assert!((jupiter.sun_offset() + jupiter.planet_offset() - 5.2).abs() < 1e-12);
//! assert!(lx > 0.0 && ly > 0.0);
//! # Ok::<(), trojan_rs::TrojanError>(())
//! ```

use std::f64::consts::PI;

use crate::error::{Result, TrojanError};

/// Gravitational constant in AU³ / (M☉ · yr²)
pub const GRAVITATIONAL_CONSTANT: f64 = 4.0 * PI * PI;

/// Mass of the Sun in solar masses
pub const SUN_MASS: f64 = 1.0;

/// Routh's critical mass ratio `μ = Mp/(Ms+Mp)` below which L4 is linearly stable
///
/// `μ_c = (1 - sqrt(23/27)) / 2 ≈ 0.03852`
pub const ROUTH_CRITICAL_MASS_RATIO: f64 = 0.038_520_896_504_551_37;

/// Constants of one Sun + Planet system in its rotating frame
///
/// Immutable once built: every field is derived in closed form by
/// [`FrameModel::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameModel {
    /// Planet mass Mp \[M☉\]
    planet_mass: f64,
    /// Sun–Planet distance R \[AU\]
    radius: f64,
    /// Sun–barycentre distance Rs \[AU\]
    sun_offset: f64,
    /// Planet–barycentre distance Rp \[AU\]
    planet_offset: f64,
    /// Orbital period T \[yr\]
    period: f64,
    /// Angular velocity Ω \[rad/yr\]
    omega: f64,
    /// L4 coordinates (Lx, Ly) \[AU\]
    l4: (f64, f64),
}

impl FrameModel {
    /// Build the frame of a planet of mass `planet_mass` (M☉) orbiting at
    /// `radius` (AU)
    ///
    /// # Errors
    ///
    /// [`TrojanError::InvalidConfiguration`] when `planet_mass` is negative or
    /// not finite, or when `radius` is not strictly positive and finite.
    pub fn new(planet_mass: f64, radius: f64) -> Result<Self> {
        if !planet_mass.is_finite() || planet_mass < 0.0 {
            return Err(TrojanError::config(format!(
                "planet mass must be finite and non-negative, got {planet_mass}"
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(TrojanError::config(format!(
                "orbital radius must be finite and positive, got {radius}"
            )));
        }

        Ok(Self::derive(planet_mass, radius))
    }

    /// Jupiter-like system: `Mp = 0.001`, `R = 5.2`
    pub fn jupiter() -> Self {
        Self::derive(0.001, 5.2)
    }

    /// Mars-like system: `Mp = 3.2e-7`, `R = 1.5`
    pub fn mars() -> Self {
        Self::derive(3.2e-7, 1.5)
    }

    fn derive(planet_mass: f64, radius: f64) -> Self {
        let total_mass = SUN_MASS + planet_mass;

        let sun_offset = radius * planet_mass / total_mass;
        let planet_offset = radius * SUN_MASS / total_mass;

        // Kepler III in these units, with the Sun mass as the only scale
        let period = SUN_MASS * radius.powf(1.5);
        let omega = 2.0 * PI / period;

        // Apex of the equilateral triangle built on the Sun–Planet segment
        let l4 = (planet_offset - radius / 2.0, 3.0_f64.sqrt() * radius / 2.0);

        Self {
            planet_mass,
            radius,
            sun_offset,
            planet_offset,
            period,
            omega,
            l4,
        }
    }

    /// Planet mass Mp \[M☉\]
    pub fn planet_mass(&self) -> f64 {
        self.planet_mass
    }

    /// Sun mass Ms \[M☉\] (always 1)
    pub fn sun_mass(&self) -> f64 {
        SUN_MASS
    }

    /// Gravitational constant G (always 4π²)
    pub fn gravitational_constant(&self) -> f64 {
        GRAVITATIONAL_CONSTANT
    }

    /// Sun–Planet distance R \[AU\]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Sun–barycentre distance Rs \[AU\]
    pub fn sun_offset(&self) -> f64 {
        self.sun_offset
    }

    /// Planet–barycentre distance Rp \[AU\]
    pub fn planet_offset(&self) -> f64 {
        self.planet_offset
    }

    /// Orbital period T \[yr\]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Angular velocity Ω = 2π/T \[rad/yr\]
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// L4 Lagrange point (Lx, Ly) \[AU\]
    pub fn l4(&self) -> (f64, f64) {
        self.l4
    }

    /// L5 Lagrange point, mirror of L4 across the Sun–Planet axis
    pub fn l5(&self) -> (f64, f64) {
        (self.l4.0, -self.l4.1)
    }

    /// Sun position in the rotating frame
    pub fn sun_position(&self) -> (f64, f64) {
        (-self.sun_offset, 0.0)
    }

    /// Planet position in the rotating frame
    pub fn planet_position(&self) -> (f64, f64) {
        (self.planet_offset, 0.0)
    }

    /// Mass ratio μ = Mp / (Ms + Mp)
    pub fn mass_ratio(&self) -> f64 {
        self.planet_mass / (SUN_MASS + self.planet_mass)
    }

    /// Routh's linear stability criterion for L4 (μ below the critical ratio)
    pub fn is_l4_linearly_stable(&self) -> bool {
        self.mass_ratio() < ROUTH_CRITICAL_MASS_RATIO
    }
}

// =================================================================================================
// Tests
// =================================================================================================
