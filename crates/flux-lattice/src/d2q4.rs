//! Four-direction set: the axis-aligned moves, no rest population.
//!
//! Used by the binary lattice gas (occupation per direction) and the
//! diffusion solver (scalar concentration split four ways).

use crate::error::LatticeError;
use crate::velocity_set::VelocitySet;

/// Number of directions.
pub const Q: usize = 4;

/// Toward row 0.
pub const UP: usize = 0;
/// Away from row 0.
pub const DOWN: usize = 1;
/// Toward column 0.
pub const LEFT: usize = 2;
/// Away from column 0.
pub const RIGHT: usize = 3;

/// Direction vectors `[cx, cy]` in index order.
pub const DIRECTIONS: [[i32; 2]; Q] = [[0, -1], [0, 1], [-1, 0], [1, 0]];

/// Uniform weights.
pub const WEIGHTS: [f64; Q] = [0.25; Q];

/// The validated set.
pub fn velocity_set() -> Result<VelocitySet, LatticeError> {
    VelocitySet::new("D2Q4", DIRECTIONS.to_vec(), WEIGHTS.to_vec())
}
