//! Grid and field fixtures.

use flux_core::{DistributionField, GridShape};
use flux_lattice::{LatticeScheme, VelocitySet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A grid shape; panics on invalid dimensions.
pub fn shape(rows: usize, cols: usize) -> GridShape {
    GridShape::new(rows, cols).expect("test grid dimensions must be valid")
}

/// A stock velocity set.
pub fn lattice(scheme: LatticeScheme) -> VelocitySet {
    VelocitySet::for_scheme(scheme).expect("stock velocity sets are valid")
}

/// Every cell at rest with density `rho`: `f_i = w_i * rho`.
pub fn rest_field(shape: GridShape, set: &VelocitySet, rho: f64) -> DistributionField {
    field_from_fn(shape, set.q(), |_, _, i| set.weight(i) * rho)
}

/// A rest field with per-slot multiplicative noise of at most `amplitude`.
///
/// With `amplitude < 1` every value stays strictly positive.
pub fn perturbed_field(
    shape: GridShape,
    set: &VelocitySet,
    rho: f64,
    amplitude: f64,
    seed: u64,
) -> DistributionField {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    field_from_fn(shape, set.q(), |_, _, i| {
        let noise: f64 = rng.random_range(-1.0..=1.0);
        set.weight(i) * rho * (1.0 + amplitude * noise)
    })
}

/// Binary occupation: each slot is `1.0` with probability `fill`.
pub fn random_occupation(shape: GridShape, q: usize, fill: f64, seed: u64) -> DistributionField {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    field_from_fn(shape, q, |_, _, _| {
        if rng.random_bool(fill) {
            1.0
        } else {
            0.0
        }
    })
}

/// A field whose value at `(row, col, dir)` is `f(row, col, dir)`.
pub fn field_from_fn(
    shape: GridShape,
    q: usize,
    mut f: impl FnMut(usize, usize, usize) -> f64,
) -> DistributionField {
    let mut field = DistributionField::zeros(shape, q);
    for cell in 0..shape.cell_count() {
        let (r, c) = shape.coords(cell);
        for i in 0..q {
            field.set(cell, i, f(r, c, i));
        }
    }
    field
}

/// Number of slots holding more than half a particle.
pub fn occupied_slots(field: &DistributionField) -> usize {
    field.values().iter().filter(|&&v| v > 0.5).count()
}
