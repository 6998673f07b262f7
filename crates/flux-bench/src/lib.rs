//! Benchmark profiles for the Flux lattice simulators.
//!
//! Each profile is a [`SimConfig`] sized for throughput measurement:
//!
//! - [`lattice_gas_profile`]: 128x128 closed box, wall with a gap, 20K particles
//! - [`diffusion_profile`]: 128x128 periodic grid with a concentration step
//! - [`fluid_profile`]: the channel preset with convergence disabled
//! - [`stress_profile`]: the fluid profile on a 512x512 grid

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use flux_engine::{presets, InitialCondition, ParticleSeed, Region, SimConfig, Variant};
use flux_kernels::{BoundarySpec, Wall};

/// Steps large enough that a benchmark never reaches the terminal state.
pub const UNBOUNDED: u64 = u64::MAX;

/// Binary lattice gas: 128x128 closed box with a wall on column 40.
pub fn lattice_gas_profile(seed: u64) -> SimConfig {
    let mut boundary = BoundarySpec::closed();
    boundary
        .walls
        .push(Wall::column(40, 0..128).with_opening(54..74));
    SimConfig {
        initial: InitialCondition::Particles(ParticleSeed {
            count: 20_000,
            seed,
            region: Region::new(0..128, 0..40),
            dense: None,
        }),
        boundary,
        max_steps: UNBOUNDED,
        ..SimConfig::new(Variant::LatticeGasBinary, 128, 128)
    }
}

/// Diffusion relaxation: 128x128 periodic grid, half full.
pub fn diffusion_profile() -> SimConfig {
    SimConfig {
        initial: InitialCondition::ColumnSplit {
            column: 64,
            left: 1.0,
            right: 0.0,
        },
        max_steps: UNBOUNDED,
        ..SimConfig::new(Variant::DiffusionRelaxation, 128, 128)
    }
}

/// Fluid relaxation: the 128x128 channel preset, never converging.
pub fn fluid_profile() -> SimConfig {
    SimConfig {
        convergence: None,
        max_steps: UNBOUNDED,
        ..presets::fluid_channel()
    }
}

/// Fluid relaxation on 512x512 (~262K cells) with the channel edge profiles.
pub fn stress_profile() -> SimConfig {
    let mut config = fluid_profile();
    config.rows = 512;
    config.cols = 512;
    config.boundary.walls = vec![Wall::column(120, 0..512).with_opening(200..300)];
    config.boundary.source = None;
    config.initial = InitialCondition::Uniform { density: 1.0 };
    config
}
