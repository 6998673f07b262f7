//! The three simulator variants.

use flux_kernels::{Bgk, BinaryExchange, CollisionError, CollisionRule, Moments, StreamingRule};
use flux_lattice::LatticeScheme;

/// Which simulator to run.
///
/// Each variant fixes its velocity set, collision rule and streaming rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Binary lattice gas on D2Q4: head-on exchange, reflective streaming.
    LatticeGasBinary,
    /// Scalar diffusion on D2Q4: density-only BGK, periodic streaming.
    DiffusionRelaxation,
    /// Fluid flow on D2Q9: full BGK, periodic streaming.
    FluidRelaxation,
}

impl Variant {
    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::LatticeGasBinary => "lattice-gas",
            Self::DiffusionRelaxation => "diffusion",
            Self::FluidRelaxation => "fluid",
        }
    }

    /// Velocity set.
    pub fn scheme(self) -> LatticeScheme {
        match self {
            Self::LatticeGasBinary | Self::DiffusionRelaxation => LatticeScheme::D2Q4,
            Self::FluidRelaxation => LatticeScheme::D2Q9,
        }
    }

    /// Streaming rule.
    pub fn streaming(self) -> StreamingRule {
        match self {
            Self::LatticeGasBinary => StreamingRule::Reflective,
            Self::DiffusionRelaxation | Self::FluidRelaxation => StreamingRule::Periodic,
        }
    }

    /// Whether the variant transports momentum.
    pub fn momentum(self) -> bool {
        matches!(self, Self::FluidRelaxation)
    }

    /// Whether populations are binary occupation numbers.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::LatticeGasBinary)
    }

    /// The collision rule for this variant. `tau` and `dt` are ignored by
    /// the lattice gas.
    pub fn collision_rule(self, tau: f64, dt: f64) -> Result<CollisionRule, CollisionError> {
        Ok(match self {
            Self::LatticeGasBinary => CollisionRule::BinaryExchange(BinaryExchange),
            Self::DiffusionRelaxation => {
                CollisionRule::Relaxation(Bgk::new(tau, dt, Moments::DensityOnly)?)
            }
            Self::FluidRelaxation => {
                CollisionRule::Relaxation(Bgk::new(tau, dt, Moments::DensityVelocity)?)
            }
        })
    }
}
