//! Discrete velocity sets for the Flux lattice simulators.
//!
//! A [`VelocitySet`] is the ordered list of integer direction vectors a
//! cell's populations move along, the quadrature weights attached to each,
//! and the derived table of reverse directions. Two stock sets are
//! provided:
//!
//! - [`d2q4`]: the four axis-aligned moves, used by the binary lattice gas
//!   and the diffusion solver
//! - [`d2q9`]: rest plus the eight Moore moves, used by the fluid solver
//!
//! [`Edge`] names the four sides of the grid and answers which directions
//! can only reach an edge cell by wrapping around the opposite side.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod d2q4;
pub mod d2q9;
pub mod edge;
pub mod error;
pub mod velocity_set;

#[cfg(test)]
pub(crate) mod compliance;

pub use edge::Edge;
pub use error::LatticeError;
pub use velocity_set::{LatticeScheme, VelocitySet};
