//! Nine-direction set: rest, four axis moves, four diagonals.

use crate::error::LatticeError;
use crate::velocity_set::VelocitySet;

/// Number of directions.
pub const Q: usize = 9;

/// The rest population.
pub const REST: usize = 0;

/// Direction vectors `[cx, cy]` in index order.
pub const DIRECTIONS: [[i32; 2]; Q] = [
    [0, 0],
    [1, 0],
    [-1, 0],
    [0, 1],
    [0, -1],
    [1, 1],
    [-1, -1],
    [-1, 1],
    [1, -1],
];

/// Standard D2Q9 quadrature weights.
pub const WEIGHTS: [f64; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// The validated set.
pub fn velocity_set() -> Result<VelocitySet, LatticeError> {
    VelocitySet::new("D2Q9", DIRECTIONS.to_vec(), WEIGHTS.to_vec())
}
