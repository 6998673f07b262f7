//! Errors from kernel construction and boundary compilation.

use flux_core::{FieldError, GridError};
use flux_lattice::Edge;
use thiserror::Error;

use crate::boundary::{Side, WallLine};

/// Errors from building or running a collision rule.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CollisionError {
    /// `tau` is not a positive finite number.
    #[error("relaxation time tau = {value} must be positive and finite")]
    InvalidRelaxationTime {
        /// The rejected value.
        value: f64,
    },
    /// `dt` is not a positive finite number.
    #[error("time step dt = {value} must be positive and finite")]
    InvalidTimeStep {
        /// The rejected value.
        value: f64,
    },
    /// The rule cannot run on this velocity set.
    #[error("collision rule `{rule}` does not support the {lattice} lattice")]
    UnsupportedLattice {
        /// Rule name.
        rule: &'static str,
        /// Lattice name.
        lattice: &'static str,
    },
    /// Source and destination buffers disagree in layout.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Reasons a [`BoundarySpec`](crate::BoundarySpec) does not compile.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BoundaryError {
    /// A cell coordinate (obstacle, source) lies outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Only one edge of an axis is periodic.
    #[error("{edge:?} edge is periodic but the {opposite:?} edge is not")]
    UnpairedPeriodic {
        /// The periodic edge.
        edge: Edge,
        /// Its non-periodic partner.
        opposite: Edge,
    },
    /// A momentum-dependent rule on a variant that does not carry velocity.
    #[error("{what} needs a variant with momentum")]
    RequiresMomentum {
        /// The offending rule.
        what: &'static str,
    },
    /// Reflective streaming only supports closed bounce-back edges.
    #[error("{edge:?} edge must be bounce-back under reflective streaming")]
    OpenEdgeWithReflectiveStreaming {
        /// The offending edge.
        edge: Edge,
    },
    /// A prescribed velocity is not finite.
    #[error("{what} velocity {velocity:?} is not finite")]
    InvalidVelocity {
        /// Where the velocity was given.
        what: &'static str,
        /// The rejected velocity.
        velocity: [f64; 2],
    },
    /// The source density is not positive and finite.
    #[error("source density {value} must be positive and finite")]
    InvalidSourceDensity {
        /// The rejected value.
        value: f64,
    },
    /// An interior-mirror edge has no interior neighbour.
    #[error("{edge:?} edge mirror needs at least two cells across the grid")]
    GridTooSmall {
        /// The offending edge.
        edge: Edge,
    },
    /// A wall line lies outside the grid.
    #[error("wall {wall}: {line:?} is outside the {rows}x{cols} grid")]
    WallLineOutOfBounds {
        /// Index of the wall in `BoundarySpec::walls`.
        wall: usize,
        /// The offending line.
        line: WallLine,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
    /// A wall span is empty or runs past the grid.
    #[error("wall {wall}: span {start}..{end} is empty or exceeds length {len}")]
    InvalidWallSpan {
        /// Index of the wall in `BoundarySpec::walls`.
        wall: usize,
        /// Span start.
        start: usize,
        /// Span end (exclusive).
        end: usize,
        /// Cells available along the wall line.
        len: usize,
    },
    /// An opening is not contained in its wall's span.
    #[error("wall {wall}: opening {start}..{end} is not inside the span")]
    OpeningOutsideSpan {
        /// Index of the wall in `BoundarySpec::walls`.
        wall: usize,
        /// Opening start.
        start: usize,
        /// Opening end (exclusive).
        end: usize,
    },
    /// The reflection neighbour of a wall falls off the grid.
    #[error("wall {wall}: reflection from the {side:?} side leaves the grid")]
    ReflectOffGrid {
        /// Index of the wall in `BoundarySpec::walls`.
        wall: usize,
        /// The requested side.
        side: Side,
    },
    /// Wrapped slots on a closed edge with no correcting rule.
    #[error("{count} wrapped slots are not covered by any boundary rule (first: cell {cell}, direction {dir})")]
    UncoveredSlots {
        /// Number of uncovered slots.
        count: usize,
        /// Cell of the first uncovered slot.
        cell: usize,
        /// Direction of the first uncovered slot.
        dir: usize,
    },
}
