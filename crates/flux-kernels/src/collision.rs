//! Collision rules: BGK relaxation and the binary exchange rule.
//!
//! A collision reads every cell of the current grid and writes the
//! post-collision populations of the same cell into a separate buffer.
//! Cells never interact here; that is what streaming is for.

use flux_core::{DistributionField, FieldError};
use flux_lattice::{d2q4, VelocitySet};

use crate::equilibrium::{equilibrium_into, CellBuf};
use crate::error::CollisionError;
use crate::macroscopic::cell_moments;

/// `tau / dt` below this is reported as close to the stability limit.
pub const NEAR_UNSTABLE_RATIO: f64 = 0.55;

/// Which moments the relaxation target is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Moments {
    /// Relax toward `w_i * rho`; the scalar is transported, not momentum.
    DensityOnly,
    /// Relax toward the full equilibrium of `(rho, u)`.
    DensityVelocity,
}

/// What a collision pass did, for metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Values that relaxed below zero and were clamped.
    pub clamped: usize,
    /// Cells whose occupation was rotated by the binary exchange rule.
    pub exchanges: usize,
}

// ── BGK ────────────────────────────────────────────────────────────

/// Single-relaxation-time (BGK) collision.
///
/// ```text
/// f_i' = f_i + (dt / tau) * (f_i^eq - f_i)
/// ```
///
/// Results are clamped at zero; the number of clamped values is reported
/// in [`CollisionStats::clamped`].
///
/// # Examples
///
/// ```
/// use flux_kernels::{Bgk, Moments};
///
/// let bgk = Bgk::new(0.6, 1.0, Moments::DensityVelocity).unwrap();
/// assert!(!bgk.is_near_unstable());
/// assert!(Bgk::new(0.0, 1.0, Moments::DensityOnly).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bgk {
    tau: f64,
    dt: f64,
    omega: f64,
    moments: Moments,
}

impl Bgk {
    /// Validate `tau` and `dt` and build the rule.
    pub fn new(tau: f64, dt: f64, moments: Moments) -> Result<Self, CollisionError> {
        if !tau.is_finite() || tau <= 0.0 {
            return Err(CollisionError::InvalidRelaxationTime { value: tau });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CollisionError::InvalidTimeStep { value: dt });
        }
        Ok(Self {
            tau,
            dt,
            omega: dt / tau,
            moments,
        })
    }

    /// Relaxation time.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Relaxation rate `dt / tau`.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Relaxation target.
    pub fn moments(&self) -> Moments {
        self.moments
    }

    /// Whether `tau / dt` is below [`NEAR_UNSTABLE_RATIO`].
    pub fn is_near_unstable(&self) -> bool {
        self.tau / self.dt < NEAR_UNSTABLE_RATIO
    }

    /// Relax every cell of `src` into `dst`.
    pub fn collide(
        &self,
        lattice: &VelocitySet,
        src: &DistributionField,
        dst: &mut DistributionField,
    ) -> Result<CollisionStats, CollisionError> {
        check_layout(lattice, src, dst)?;
        let q = lattice.q();

        #[cfg(feature = "parallel")]
        let clamped: usize = {
            use rayon::prelude::*;
            dst.values_mut()
                .par_chunks_mut(q)
                .zip(src.values().par_chunks(q))
                .map(|(out, cell)| self.relax_cell(lattice, cell, out))
                .sum()
        };

        #[cfg(not(feature = "parallel"))]
        let clamped: usize = dst
            .values_mut()
            .chunks_mut(q)
            .zip(src.values().chunks(q))
            .map(|(out, cell)| self.relax_cell(lattice, cell, out))
            .sum();

        Ok(CollisionStats {
            clamped,
            exchanges: 0,
        })
    }

    /// Relax one cell; returns how many values were clamped.
    #[inline]
    fn relax_cell(&self, lattice: &VelocitySet, cell: &[f64], out: &mut [f64]) -> usize {
        let (rho, u) = cell_moments(lattice, cell);
        let u = match self.moments {
            Moments::DensityOnly => [0.0, 0.0],
            Moments::DensityVelocity => u,
        };
        let mut eq: CellBuf = smallvec::smallvec![0.0; lattice.q()];
        equilibrium_into(lattice, rho, u, &mut eq);

        let mut clamped = 0;
        for i in 0..cell.len() {
            let v = cell[i] + self.omega * (eq[i] - cell[i]);
            if v < 0.0 {
                clamped += 1;
                out[i] = 0.0;
            } else {
                out[i] = v;
            }
        }
        clamped
    }
}

// ── Binary exchange ────────────────────────────────────────────────

/// Head-on collision rule for the binary lattice gas on D2Q4.
///
/// A cell with exactly one opposing pair occupied and the perpendicular
/// pair empty rotates the pair by a quarter turn. Every other
/// configuration passes through unchanged, so particle count and
/// momentum are conserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinaryExchange;

impl BinaryExchange {
    /// Name used in errors and logs.
    pub const NAME: &'static str = "binary-exchange";

    /// Check that `lattice` is the four-direction set this rule indexes.
    pub fn check_lattice(lattice: &VelocitySet) -> Result<(), CollisionError> {
        if lattice.directions() != d2q4::DIRECTIONS.as_slice() {
            return Err(CollisionError::UnsupportedLattice {
                rule: Self::NAME,
                lattice: lattice.name(),
            });
        }
        Ok(())
    }

    /// Apply the exchange to every cell of `src`, writing into `dst`.
    pub fn collide(
        &self,
        lattice: &VelocitySet,
        src: &DistributionField,
        dst: &mut DistributionField,
    ) -> Result<CollisionStats, CollisionError> {
        Self::check_lattice(lattice)?;
        check_layout(lattice, src, dst)?;

        let mut exchanges = 0;
        for (out, cell) in dst.values_mut().chunks_mut(d2q4::Q).zip(src.values().chunks(d2q4::Q)) {
            out.copy_from_slice(cell);
            let occ = |i: usize| cell[i] > 0.5;
            let vertical = occ(d2q4::UP) && occ(d2q4::DOWN);
            let horizontal = occ(d2q4::LEFT) && occ(d2q4::RIGHT);
            let vertical_empty = !occ(d2q4::UP) && !occ(d2q4::DOWN);
            let horizontal_empty = !occ(d2q4::LEFT) && !occ(d2q4::RIGHT);

            if vertical && horizontal_empty {
                out[d2q4::UP] = 0.0;
                out[d2q4::DOWN] = 0.0;
                out[d2q4::LEFT] = 1.0;
                out[d2q4::RIGHT] = 1.0;
                exchanges += 1;
            } else if horizontal && vertical_empty {
                out[d2q4::LEFT] = 0.0;
                out[d2q4::RIGHT] = 0.0;
                out[d2q4::UP] = 1.0;
                out[d2q4::DOWN] = 1.0;
                exchanges += 1;
            }
        }
        Ok(CollisionStats {
            clamped: 0,
            exchanges,
        })
    }
}

// ── Dispatch ───────────────────────────────────────────────────────

/// The collision rule a variant runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollisionRule {
    /// BGK relaxation.
    Relaxation(Bgk),
    /// Binary head-on exchange.
    BinaryExchange(BinaryExchange),
}

impl CollisionRule {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relaxation(_) => "bgk",
            Self::BinaryExchange(_) => BinaryExchange::NAME,
        }
    }

    /// Collide `src` into `dst`.
    pub fn collide(
        &self,
        lattice: &VelocitySet,
        src: &DistributionField,
        dst: &mut DistributionField,
    ) -> Result<CollisionStats, CollisionError> {
        match self {
            Self::Relaxation(bgk) => bgk.collide(lattice, src, dst),
            Self::BinaryExchange(rule) => rule.collide(lattice, src, dst),
        }
    }
}

fn check_layout(
    lattice: &VelocitySet,
    src: &DistributionField,
    dst: &DistributionField,
) -> Result<(), FieldError> {
    if src.q() != lattice.q() || dst.q() != lattice.q() || src.shape() != dst.shape() {
        return Err(FieldError::LayoutMismatch {
            reason: format!(
                "collision on {} needs matching {}-direction buffers, got {} and {}",
                lattice.name(),
                lattice.q(),
                src.q(),
                dst.q()
            ),
        });
    }
    Ok(())
}
