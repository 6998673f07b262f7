//! Second-order equilibrium distribution.
//!
//! ```text
//! f_i^eq = w_i * rho * (1 + 3 (c_i . u) + 4.5 (c_i . u)^2 - 1.5 |u|^2)
//! ```
//!
//! At `u = 0` this is `w_i * rho`. On D2Q9 the populations sum back to
//! `rho` and carry momentum `rho * u` for any `u`.

use flux_core::{DistributionField, FieldError};
use flux_lattice::VelocitySet;
use smallvec::SmallVec;

/// Inline buffer large enough for every stock velocity set.
pub type CellBuf = SmallVec<[f64; 9]>;

/// Write the equilibrium of `(rho, u)` into `out[..lattice.q()]`.
#[inline]
pub fn equilibrium_into(lattice: &VelocitySet, rho: f64, u: [f64; 2], out: &mut [f64]) {
    let usq = u[0] * u[0] + u[1] * u[1];
    for (i, [cx, cy], w) in lattice.iter() {
        let cu = cx as f64 * u[0] + cy as f64 * u[1];
        out[i] = w * rho * (1.0 + 3.0 * cu + 4.5 * cu * cu - 1.5 * usq);
    }
}

/// The equilibrium of `(rho, u)` as a new buffer.
pub fn equilibrium(lattice: &VelocitySet, rho: f64, u: [f64; 2]) -> CellBuf {
    let mut out: CellBuf = smallvec::smallvec![0.0; lattice.q()];
    equilibrium_into(lattice, rho, u, &mut out);
    out
}

/// Fill every cell of `out` with the equilibrium of its density and velocity.
pub fn equilibrium_field(
    lattice: &VelocitySet,
    density: &[f64],
    velocity: &[[f64; 2]],
    out: &mut DistributionField,
) -> Result<(), FieldError> {
    let n = out.shape().cell_count();
    if density.len() != n {
        return Err(FieldError::LengthMismatch {
            what: "density",
            expected: n,
            actual: density.len(),
        });
    }
    if velocity.len() != n {
        return Err(FieldError::LengthMismatch {
            what: "velocity",
            expected: n,
            actual: velocity.len(),
        });
    }
    if out.q() != lattice.q() {
        return Err(FieldError::LayoutMismatch {
            reason: format!("field has {} directions, {} has {}", out.q(), lattice.name(), lattice.q()),
        });
    }
    for cell in 0..n {
        equilibrium_into(lattice, density[cell], velocity[cell], out.cell_mut(cell));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macroscopic::cell_moments;
    use flux_lattice::LatticeScheme;
    use flux_test_utils::{lattice, shape};
    use proptest::prelude::*;

    #[test]
    fn rest_equilibrium_is_weighted_density() {
        for scheme in [LatticeScheme::D2Q4, LatticeScheme::D2Q9] {
            let set = lattice(scheme);
            let eq = equilibrium(&set, 2.5, [0.0, 0.0]);
            for i in 0..set.q() {
                assert!((eq[i] - set.weight(i) * 2.5).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn d2q9_equilibrium_carries_momentum() {
        let set = lattice(LatticeScheme::D2Q9);
        let u = [0.05, -0.02];
        let eq = equilibrium(&set, 1.1, u);
        let (rho, got) = cell_moments(&set, &eq);
        assert!((rho - 1.1).abs() < 1e-12);
        assert!((got[0] - u[0]).abs() < 1e-12);
        assert!((got[1] - u[1]).abs() < 1e-12);
    }

    #[test]
    fn field_checks_lengths() {
        let set = lattice(LatticeScheme::D2Q9);
        let s = shape(2, 2);
        let mut out = DistributionField::zeros(s, 9);
        let err = equilibrium_field(&set, &[1.0; 3], &[[0.0; 2]; 4], &mut out).unwrap_err();
        assert!(matches!(err, FieldError::LengthMismatch { what: "density", .. }));
        equilibrium_field(&set, &[1.0; 4], &[[0.0; 2]; 4], &mut out).unwrap();
        assert!((out.total() - 4.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn d2q9_equilibrium_sums_to_density(
            rho in 0.01f64..5.0,
            ux in -0.2f64..0.2,
            uy in -0.2f64..0.2,
        ) {
            let set = lattice(LatticeScheme::D2Q9);
            let sum: f64 = equilibrium(&set, rho, [ux, uy]).iter().sum();
            prop_assert!((sum - rho).abs() < 1e-12 * rho.max(1.0));
        }
    }
}
