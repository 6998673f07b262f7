//! Core types for the Flux lattice simulators.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! data model every other crate in the workspace operates on: the step
//! clock, the grid shape, the per-direction distribution field, the
//! obstacle mask, the derived macroscopic field, and their error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod grid;
pub mod id;

pub use error::{FieldError, GridError};
pub use field::{DistributionField, MacroscopicField, ObstacleMask};
pub use grid::GridShape;
pub use id::StepId;
