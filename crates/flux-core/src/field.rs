//! Per-cell storage: distribution values, obstacle mask, macroscopic field.

use crate::error::{FieldError, GridError};
use crate::grid::GridShape;

// ── DistributionField ──────────────────────────────────────────────

/// Per-cell, per-direction distribution values.
///
/// Stored cell-major: the `q` values of cell `c` occupy
/// `values[c * q .. (c + 1) * q]`. The lattice-gas variant stores
/// occupation as `0.0` / `1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct DistributionField {
    shape: GridShape,
    q: usize,
    values: Vec<f64>,
}

impl DistributionField {
    /// A zero-filled field with `q` directions per cell.
    pub fn zeros(shape: GridShape, q: usize) -> Self {
        Self {
            shape,
            q,
            values: vec![0.0; shape.cell_count() * q],
        }
    }

    /// Wrap an existing buffer.
    ///
    /// Fails if the buffer length is not `cell_count * q`.
    pub fn from_values(shape: GridShape, q: usize, values: Vec<f64>) -> Result<Self, FieldError> {
        let expected = shape.cell_count() * q;
        if values.len() != expected {
            return Err(FieldError::LengthMismatch {
                what: "distribution",
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { shape, q, values })
    }

    /// Grid shape.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Directions per cell.
    pub fn q(&self) -> usize {
        self.q
    }

    /// All values, cell-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// All values, cell-major, mutable.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// The `q` values of one cell.
    #[inline]
    pub fn cell(&self, cell: usize) -> &[f64] {
        &self.values[cell * self.q..(cell + 1) * self.q]
    }

    /// The `q` values of one cell, mutable.
    #[inline]
    pub fn cell_mut(&mut self, cell: usize) -> &mut [f64] {
        let q = self.q;
        &mut self.values[cell * q..(cell + 1) * q]
    }

    /// Value of direction `dir` at `cell`.
    #[inline]
    pub fn get(&self, cell: usize, dir: usize) -> f64 {
        self.values[cell * self.q + dir]
    }

    /// Set direction `dir` at `cell`.
    #[inline]
    pub fn set(&mut self, cell: usize, dir: usize, value: f64) {
        self.values[cell * self.q + dir] = value;
    }

    /// Sum over every cell and direction.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Set every value to zero.
    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    /// Overwrite this field with `other`.
    ///
    /// Fails when shape or direction count differ.
    pub fn copy_from(&mut self, other: &DistributionField) -> Result<(), FieldError> {
        if self.shape != other.shape || self.q != other.q {
            return Err(FieldError::LayoutMismatch {
                reason: format!(
                    "{}x{}x{} vs {}x{}x{}",
                    self.shape.rows(),
                    self.shape.cols(),
                    self.q,
                    other.shape.rows(),
                    other.shape.cols(),
                    other.q,
                ),
            });
        }
        self.values.copy_from_slice(&other.values);
        Ok(())
    }
}

// ── ObstacleMask ───────────────────────────────────────────────────

/// Solid cells that reflect rather than transmit flux.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMask {
    shape: GridShape,
    solid: Vec<bool>,
}

impl ObstacleMask {
    /// A mask with no solid cells.
    pub fn empty(shape: GridShape) -> Self {
        Self {
            shape,
            solid: vec![false; shape.cell_count()],
        }
    }

    /// Grid shape.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Mark `(row, col)` solid.
    pub fn set_solid(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let i = self.shape.checked_index(row, col)?;
        self.solid[i] = true;
        Ok(())
    }

    /// Whether the cell at flat index `cell` is solid.
    #[inline]
    pub fn is_solid(&self, cell: usize) -> bool {
        self.solid[cell]
    }

    /// Flat indices of all solid cells, ascending.
    pub fn solid_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.solid
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
    }

    /// Number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|&&s| s).count()
    }
}

// ── MacroscopicField ───────────────────────────────────────────────

/// Density and velocity derived from a [`DistributionField`].
///
/// Velocity is `[ux, uy]` with `ux` along columns and `uy` along rows.
/// Density-only variants leave the net flux direction in `velocity`.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroscopicField {
    shape: GridShape,
    /// Per-cell density (sum of all directional values).
    pub density: Vec<f64>,
    /// Per-cell velocity.
    pub velocity: Vec<[f64; 2]>,
}

impl MacroscopicField {
    /// A field of zero density and zero velocity.
    pub fn zeros(shape: GridShape) -> Self {
        let n = shape.cell_count();
        Self {
            shape,
            density: vec![0.0; n],
            velocity: vec![[0.0, 0.0]; n],
        }
    }

    /// Grid shape.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Sum of density over the grid.
    pub fn total_density(&self) -> f64 {
        self.density.iter().sum()
    }

    /// Maximum absolute per-component velocity difference from `other`.
    pub fn max_velocity_delta(&self, other: &MacroscopicField) -> f64 {
        self.velocity
            .iter()
            .zip(&other.velocity)
            .map(|(a, b)| (a[0] - b[0]).abs().max((a[1] - b[1]).abs()))
            .fold(0.0, f64::max)
    }

    /// Maximum absolute density difference from `other`.
    pub fn max_density_delta(&self, other: &MacroscopicField) -> f64 {
        self.density
            .iter()
            .zip(&other.density)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}
