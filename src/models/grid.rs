//! Initial-condition grids
//!
//! An [`InitialConditionGrid`] is the batch of starting states handed to the
//! integrator: `res × res` particles (or one) at rest around a reference
//! point, in one of two layouts.
//!
//! # Layouts
//!
//! - **Cartesian**: square mesh of side `width`, step `width / res`, starting
//!   at `reference - width/2` on both axes.
//! - **Polar**: `res` radii evenly spaced over `[Rin, Rin + width]`, where
//!   `Rin = |reference| - width/2` is measured from the barycentre, and `res`
//!   angles evenly spaced over `[0.1, π]`.
//!
//! # Ordering
//!
//! Points are flattened row-major: row `i` holds the `i`-th y value
//! (Cartesian) or the `i`-th radius (polar), column `j` the `j`-th x value or
//! angle. Particle `k` is at `(k / res, k % res)`, so any per-particle vector
//! reshapes back onto the mesh with [`to_grid`](crate::analysis::to_grid).
//!
//! # Zero resolution
//!
//! `res == 0` is normalised to `res = 1` (with `width = 0`) and recorded as a
//! [`GridWarning::ZeroResolution`]; it is never an error.
//!
//! # Example
//!
//! ```rust
//! use trojan_rs::models::{FrameModel, InitialConditionGrid};
//!
//! let frame = FrameModel::jupiter();
//! let grid = InitialConditionGrid::polar(frame.l4(), 0.5, 10);
//!
//! assert_eq!(grid.len(), 100);
//! assert!(grid.warnings().is_empty());
//! ```

use std::f64::consts::PI;
use std::fmt;

use nalgebra::DVector;
use ndarray::Array2;

use crate::physics::PhaseState;

/// Smallest angle of the polar layout \[rad\]
///
/// The polar layout only samples the upper half-plane `[0.1, π]`, where L4
/// lives.
pub const POLAR_MIN_ANGLE: f64 = 0.1;

/// Largest angle of the polar layout \[rad\]
pub const POLAR_MAX_ANGLE: f64 = PI;

/// Layout of an initial-condition grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridLayout {
    /// Square mesh centred on the reference point
    Cartesian { width: f64, res: usize },

    /// Annular sector through the reference point
    Polar { width: f64, res: usize },
}

impl GridLayout {
    /// Get name identifier
    pub fn name(&self) -> &'static str {
        match self {
            GridLayout::Cartesian { .. } => "Cartesian",
            GridLayout::Polar { .. } => "Polar",
        }
    }

    /// Requested width (before normalisation)
    pub fn width(&self) -> f64 {
        match self {
            GridLayout::Cartesian { width, .. } | GridLayout::Polar { width, .. } => *width,
        }
    }

    /// Requested resolution (before normalisation)
    pub fn res(&self) -> usize {
        match self {
            GridLayout::Cartesian { res, .. } | GridLayout::Polar { res, .. } => *res,
        }
    }

    fn with(&self, width: f64, res: usize) -> Self {
        match self {
            GridLayout::Cartesian { .. } => GridLayout::Cartesian { width, res },
            GridLayout::Polar { .. } => GridLayout::Polar { width, res },
        }
    }
}

/// Recoverable normalisation applied while building a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridWarning {
    /// `res == 0` was replaced by `res = 1` and the width forced to zero
    ZeroResolution,
}

impl fmt::Display for GridWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridWarning::ZeroResolution => {
                f.write_str("cannot have zero resolution (set: res=1)")
            }
        }
    }
}

/// Batch of starting states laid out on a Cartesian or polar mesh
///
/// Immutable once built. All particles start at rest.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditionGrid {
    /// Layout after normalisation
    layout: GridLayout,
    /// Reference point the grid is built around
    reference: (f64, f64),
    /// Mesh values along rows (y or radius), length `res`
    row_axis: Vec<f64>,
    /// Mesh values along columns (x or angle), length `res`
    column_axis: Vec<f64>,
    /// Flattened Cartesian x-positions, length `res²`
    x0: DVector<f64>,
    /// Flattened Cartesian y-positions, length `res²`
    y0: DVector<f64>,
    /// Normalisations applied during construction
    warnings: Vec<GridWarning>,
}

impl InitialConditionGrid {
    /// Build a grid around `reference` with the given layout
    pub fn build(reference: (f64, f64), layout: GridLayout) -> Self {
        let mut warnings = Vec::new();

        let mut res = layout.res();
        if res == 0 {
            log::warn!("{}", GridWarning::ZeroResolution);
            warnings.push(GridWarning::ZeroResolution);
            res = 1;
        }
        let width = if res == 1 { 0.0 } else { layout.width() };
        let layout = layout.with(width, res);

        let (row_axis, column_axis) = match layout {
            GridLayout::Cartesian { .. } => {
                let delta = width / res as f64;
                let axis = |centre: f64| -> Vec<f64> {
                    (0..res)
                        .map(|i| centre - width / 2.0 + delta * i as f64)
                        .collect()
                };
                (axis(reference.1), axis(reference.0))
            }
            GridLayout::Polar { .. } => {
                let inner = reference.0.hypot(reference.1) - width / 2.0;
                (
                    linspace(inner, inner + width, res),
                    linspace(POLAR_MIN_ANGLE, POLAR_MAX_ANGLE, res),
                )
            }
        };

        let count = res * res;
        let mut x0 = DVector::zeros(count);
        let mut y0 = DVector::zeros(count);
        for (i, row) in row_axis.iter().enumerate() {
            for (j, column) in column_axis.iter().enumerate() {
                let k = i * res + j;
                let (x, y) = match layout {
                    GridLayout::Cartesian { .. } => (*column, *row),
                    GridLayout::Polar { .. } => (row * column.cos(), row * column.sin()),
                };
                x0[k] = x;
                y0[k] = y;
            }
        }

        log::debug!(
            "built {} grid: {}x{} particles, width {} around ({}, {})",
            layout.name(),
            res,
            res,
            width,
            reference.0,
            reference.1
        );

        Self {
            layout,
            reference,
            row_axis,
            column_axis,
            x0,
            y0,
            warnings,
        }
    }

    /// Cartesian grid of side `width` with `res` points per axis
    pub fn cartesian(reference: (f64, f64), width: f64, res: usize) -> Self {
        Self::build(reference, GridLayout::Cartesian { width, res })
    }

    /// Polar grid of radial extent `width` with `res` radii and `res` angles
    pub fn polar(reference: (f64, f64), width: f64, res: usize) -> Self {
        Self::build(reference, GridLayout::Polar { width, res })
    }

    /// One particle at rest at `point`
    pub fn single(point: (f64, f64)) -> Self {
        Self::cartesian(point, 0.0, 1)
    }

    /// Layout after normalisation
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Reference point
    pub fn reference(&self) -> (f64, f64) {
        self.reference
    }

    /// Points per axis (`res >= 1`)
    pub fn res(&self) -> usize {
        self.row_axis.len()
    }

    /// Effective width (zero when `res == 1`)
    pub fn width(&self) -> f64 {
        self.layout.width()
    }

    /// Number of particles (`res²`)
    pub fn len(&self) -> usize {
        self.x0.len()
    }

    /// Always false: a grid holds at least one particle
    pub fn is_empty(&self) -> bool {
        self.x0.is_empty()
    }

    /// True when the grid holds more than one particle
    pub fn is_gridded(&self) -> bool {
        self.res() > 1
    }

    /// Normalisations applied during construction
    pub fn warnings(&self) -> &[GridWarning] {
        &self.warnings
    }

    /// Flattened x-positions
    pub fn x0(&self) -> &DVector<f64> {
        &self.x0
    }

    /// Flattened y-positions
    pub fn y0(&self) -> &DVector<f64> {
        &self.y0
    }

    /// Starting states as `(x, y, vx, vy)` in flattened order
    pub fn points(&self) -> Vec<[f64; 4]> {
        self.x0
            .iter()
            .zip(self.y0.iter())
            .map(|(x, y)| [*x, *y, 0.0, 0.0])
            .collect()
    }

    /// Batched starting state of all particles, at rest
    pub fn initial_state(&self) -> PhaseState {
        let n = self.len();
        PhaseState::from_parts(
            self.x0.clone(),
            self.y0.clone(),
            DVector::zeros(n),
            DVector::zeros(n),
        )
    }

    /// Mesh coordinates as `(column mesh, row mesh)`, both `res × res`
    ///
    /// Cartesian: `(x, y)`. Polar: `(angle, radius)`. Entry `(i, j)` is the
    /// coordinate of particle `i * res + j`.
    pub fn mesh(&self) -> (Array2<f64>, Array2<f64>) {
        let res = self.res();
        let columns = Array2::from_shape_fn((res, res), |(_, j)| self.column_axis[j]);
        let rows = Array2::from_shape_fn((res, res), |(i, _)| self.row_axis[i]);
        (columns, rows)
    }
}

/// `n` evenly spaced values over `[start, end]`; `[start]` when `n == 1`
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
