//! Flux: lattice-gas and lattice-Boltzmann transport on a 2D grid.
//!
//! This is the facade crate that re-exports the public API of the Flux
//! sub-crates. Three simulators share one collision, streaming and
//! boundary pipeline:
//!
//! - a binary lattice gas on four directions,
//! - a diffusion relaxation model on four directions,
//! - a fluid relaxation model on nine directions.
//!
//! # Quick start
//!
//! ```rust
//! use flux::prelude::*;
//!
//! let mut config = SimConfig::new(Variant::FluidRelaxation, 16, 16);
//! config.tau = 0.8;
//! config.boundary = BoundarySpec::closed();
//! config.boundary.walls.push(Wall::column(8, 2..14).with_opening(6..10));
//! config.initial = InitialCondition::ColumnSplit { column: 8, left: 1.02, right: 1.0 };
//! config.max_steps = 20;
//!
//! let mut driver = Driver::new(config).unwrap();
//! let mut frames = FrameLog::new();
//! let summary = driver.run(&mut frames).unwrap();
//! assert_eq!(summary.status, RunStatus::MaxStepsReached { steps: 20 });
//! assert!((summary.final_mass - summary.initial_mass).abs() < 1e-9);
//! assert_eq!(frames.frames.len(), 20);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `flux-core` | Step clock, grid shape, distribution and macroscopic fields |
//! | [`lattice`] | `flux-lattice` | Velocity sets, opposite tables, grid edges |
//! | [`kernels`] | `flux-kernels` | Equilibrium, collision, streaming, boundary enforcement, extraction |
//! | [`engine`] | `flux-engine` | Configuration, driver, convergence, renderers, presets |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core data types (`flux-core`).
///
/// [`types::DistributionField`] holds the per-direction populations;
/// [`types::MacroscopicField`] the derived density and velocity.
pub use flux_core as types;

/// Velocity sets (`flux-lattice`).
///
/// [`lattice::VelocitySet`] with the stock [`lattice::d2q4`] and
/// [`lattice::d2q9`] sets, and [`lattice::Edge`] geometry.
pub use flux_lattice as lattice;

/// Numerical kernels (`flux-kernels`).
///
/// Collision rules, streaming rules and the compiled
/// [`kernels::BoundaryPlan`] with its [`kernels::BoundaryEnforcer`].
pub use flux_kernels as kernels;

/// Simulation driver (`flux-engine`).
///
/// [`engine::Driver`] steps a [`engine::SimConfig`]; ready-made scenarios
/// are in [`engine::presets`].
pub use flux_engine as engine;

/// Common imports for typical Flux usage.
///
/// ```rust
/// use flux::prelude::*;
/// ```
///
/// Brings in the configuration types, the driver, renderers and the
/// boundary description types.
pub mod prelude {
    // Core types
    pub use flux_core::{DistributionField, GridShape, MacroscopicField, StepId};

    // Lattice
    pub use flux_lattice::{LatticeScheme, VelocitySet};

    // Boundaries
    pub use flux_kernels::{
        BoundarySpec, EdgePolicies, EdgePolicy, Side, SourceSpec, VelocityProfile, Wall,
    };

    // Errors
    pub use flux_engine::{ConfigError, StepError};

    // Engine
    pub use flux_engine::{
        presets, ConvergenceConfig, Driver, Frame, FrameLog, InitialCondition, NullRenderer,
        Renderer, RunStatus, SimConfig, StepMetrics, Variant,
    };
}
