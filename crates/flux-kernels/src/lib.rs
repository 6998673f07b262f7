//! Per-step kernels for the Flux lattice simulators.
//!
//! Every step is the same pipeline over a [`DistributionField`]:
//!
//! 1. [`collision`]: relax each cell toward its [`equilibrium`] (or apply
//!    the binary exchange rule) into a scratch buffer
//! 2. [`streaming`]: move every population one lattice step along its
//!    direction back into the grid
//! 3. [`boundary`]: patch the streamed grid in place with the compiled
//!    [`BoundaryPlan`]
//! 4. [`macroscopic`]: derive density and velocity
//!
//! Periodic streaming wraps around both axes; the boundary plan is what
//! turns that raw shift into walls, prescribed edge velocities and
//! bounce-back edges. A plan refuses to compile if any wrapped slot on a
//! closed edge would be left uncorrected.
//!
//! [`DistributionField`]: flux_core::DistributionField
//! [`BoundaryPlan`]: boundary::BoundaryPlan

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod collision;
pub mod equilibrium;
pub mod error;
pub mod macroscopic;
pub mod streaming;

pub use boundary::{
    BoundaryEnforcer, BoundaryPlan, BoundarySpec, BoundaryStats, EdgePolicies, EdgePolicy,
    PlanOptions, Side, SourceSpec, VelocityProfile, Wall, WallLine,
};
pub use collision::{Bgk, BinaryExchange, CollisionRule, CollisionStats, Moments};
pub use error::{BoundaryError, CollisionError};
pub use macroscopic::DENSITY_FLOOR;
pub use streaming::{StreamStats, StreamingRule};
