//! Reference scenarios, one per variant.
//!
//! Each function returns a fully populated [`SimConfig`] that validates
//! as-is. Fields are public, so callers can shrink the grid or change
//! the step budget before building a [`Driver`](crate::Driver).

use flux_kernels::{
    BoundarySpec, EdgePolicies, EdgePolicy, Side, SourceSpec, VelocityProfile, Wall,
};

use crate::config::SimConfig;
use crate::convergence::ConvergenceConfig;
use crate::init::{DenseRegion, InitialCondition, ParticleSeed, Region};
use crate::variant::Variant;

/// Seed used by [`lattice_gas_gap`].
pub const LATTICE_GAS_SEED: u64 = 0x5eed;

/// Particles confined left of a wall escape through a gap.
///
/// 100x100 closed box, wall on column 30 with an opening over rows
/// 45..65, 5000 particles left of the wall with a denser block.
pub fn lattice_gas_gap() -> SimConfig {
    let mut boundary = BoundarySpec::closed();
    boundary
        .walls
        .push(Wall::column(30, 0..100).with_opening(45..65));

    SimConfig {
        initial: InitialCondition::Particles(ParticleSeed {
            count: 5000,
            seed: LATTICE_GAS_SEED,
            region: Region::new(0..100, 0..30),
            dense: Some(DenseRegion {
                region: Region::new(20..50, 5..25),
                probability: 0.7,
            }),
        }),
        boundary,
        max_steps: 200,
        ..SimConfig::new(Variant::LatticeGasBinary, 100, 100)
    }
}

/// A concentration step diffusing through a short gap.
///
/// 100x100 periodic grid, concentration 1 left of column 50 and 0 right
/// of it, wall segment on column 50 over rows 40..60 with a two-cell gap.
pub fn diffusion_gap() -> SimConfig {
    let mut boundary = BoundarySpec::periodic();
    boundary
        .walls
        .push(Wall::column(50, 40..60).with_opening(49..51));

    SimConfig {
        tau: 1.0,
        initial: InitialCondition::ColumnSplit {
            column: 50,
            left: 1.0,
            right: 0.0,
        },
        boundary,
        max_steps: 300,
        ..SimConfig::new(Variant::DiffusionRelaxation, 100, 100)
    }
}

/// Driven channel flow past a perforated wall with a startup jet.
///
/// 128x128 grid. The top edge moves at `ux = 0.02`, the bottom edge is
/// held still, and the side edges ramp from rest to `0.02`. A reflecting
/// wall on column 30 has an opening over rows 45..65, and a source at
/// `(52, 12)` injects a diagonal jet for the first ten steps. The run
/// stops once velocity changes stay below `1e-4` for 20 steps.
pub fn fluid_channel() -> SimConfig {
    let lid = [0.02, 0.0];
    let ramp = VelocityProfile::Ramp {
        start: [0.0, 0.0],
        end: lid,
    };
    let boundary = BoundarySpec {
        edges: EdgePolicies {
            top: EdgePolicy::Velocity(VelocityProfile::Constant(lid)),
            bottom: EdgePolicy::Velocity(VelocityProfile::Constant([0.0, 0.0])),
            left: EdgePolicy::Velocity(ramp),
            right: EdgePolicy::Velocity(ramp),
        },
        walls: vec![Wall::column(30, 0..128)
            .with_opening(45..65)
            .reflecting(Side::After)],
        obstacles: Vec::new(),
        source: Some(SourceSpec {
            row: 52,
            col: 12,
            velocity: [0.5, 0.5],
            active_steps: 10,
            density: None,
        }),
    };

    SimConfig {
        tau: 0.6,
        initial: InitialCondition::ColumnSplit {
            column: 30,
            left: 0.95,
            right: 1.0,
        },
        boundary,
        convergence: Some(ConvergenceConfig::new(1e-4, 20)),
        max_steps: 100_000,
        ..SimConfig::new(Variant::FluidRelaxation, 128, 128)
    }
}

/// Every preset with its name.
pub fn all() -> [(&'static str, SimConfig); 3] {
    [
        ("lattice-gas-gap", lattice_gas_gap()),
        ("diffusion-gap", diffusion_gap()),
        ("fluid-channel", fluid_channel()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for (name, cfg) in all() {
            if let Err(e) = cfg.validate() {
                panic!("{name} does not validate: {e}");
            }
        }
    }

    #[test]
    fn presets_match_their_variant() {
        let [(_, gas), (_, diffusion), (_, fluid)] = all();
        assert_eq!(gas.variant, Variant::LatticeGasBinary);
        assert_eq!(diffusion.variant, Variant::DiffusionRelaxation);
        assert_eq!(fluid.variant, Variant::FluidRelaxation);
        assert!(fluid.convergence.is_some());
        assert!(gas.initial.is_binary());
    }
}
