//! Density and velocity from a distribution field.

use flux_core::{DistributionField, FieldError, MacroscopicField, ObstacleMask};
use flux_lattice::VelocitySet;

/// Densities below this are raised to it before dividing.
pub const DENSITY_FLOOR: f64 = 1e-6;

/// Density and velocity of one cell's populations.
///
/// Velocity is momentum over `max(rho, DENSITY_FLOOR)`, so an empty cell
/// reports zero velocity rather than NaN.
#[inline]
pub fn cell_moments(lattice: &VelocitySet, cell: &[f64]) -> (f64, [f64; 2]) {
    let mut rho = 0.0;
    let mut mx = 0.0;
    let mut my = 0.0;
    for (i, &f) in cell.iter().enumerate() {
        let [cx, cy] = lattice.direction(i);
        rho += f;
        mx += f * cx as f64;
        my += f * cy as f64;
    }
    let d = rho.max(DENSITY_FLOOR);
    (rho, [mx / d, my / d])
}

/// Fill `out` with per-cell density and velocity.
pub fn extract(
    lattice: &VelocitySet,
    field: &DistributionField,
    out: &mut MacroscopicField,
) -> Result<(), FieldError> {
    if field.shape() != out.shape() || field.q() != lattice.q() {
        return Err(FieldError::LayoutMismatch {
            reason: format!(
                "{} field with {} directions cannot be extracted into this grid",
                lattice.name(),
                field.q()
            ),
        });
    }
    for cell in 0..field.shape().cell_count() {
        let (rho, u) = cell_moments(lattice, field.cell(cell));
        out.density[cell] = rho;
        out.velocity[cell] = u;
    }
    Ok(())
}

/// Display grid for binary occupation: `-1` obstacle, `1` any direction
/// occupied, `0` empty.
pub fn occupancy_display(field: &DistributionField, mask: &ObstacleMask) -> Vec<i8> {
    (0..field.shape().cell_count())
        .map(|cell| {
            if mask.is_solid(cell) {
                -1
            } else if field.cell(cell).iter().any(|&v| v > 0.5) {
                1
            } else {
                0
            }
        })
        .collect()
}
