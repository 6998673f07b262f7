//! Declarative boundary description.

use std::ops::Range;

use flux_core::GridShape;
use flux_lattice::Edge;

/// Velocity prescribed along an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VelocityProfile {
    /// The same velocity at every cell.
    Constant([f64; 2]),
    /// Linear from `start` at the first cell to `end` at the last,
    /// inclusive at both ends.
    Ramp {
        /// Velocity at the first cell.
        start: [f64; 2],
        /// Velocity at the last cell.
        end: [f64; 2],
    },
}

impl VelocityProfile {
    /// Velocity at position `k` of an edge `len` cells long.
    ///
    /// ```
    /// use flux_kernels::VelocityProfile;
    ///
    /// let ramp = VelocityProfile::Ramp { start: [0.0, 0.0], end: [0.02, 0.0] };
    /// assert_eq!(ramp.at(0, 5), [0.0, 0.0]);
    /// assert_eq!(ramp.at(4, 5), [0.02, 0.0]);
    /// assert!((ramp.at(2, 5)[0] - 0.01).abs() < 1e-15);
    /// ```
    pub fn at(&self, k: usize, len: usize) -> [f64; 2] {
        match *self {
            Self::Constant(u) => u,
            Self::Ramp { start, end } => {
                if len <= 1 {
                    return start;
                }
                let t = k as f64 / (len - 1) as f64;
                [
                    start[0] + (end[0] - start[0]) * t,
                    start[1] + (end[1] - start[1]) * t,
                ]
            }
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Constant(u) => u.iter().all(|v| v.is_finite()),
            Self::Ramp { start, end } => start.iter().chain(end).all(|v| v.is_finite()),
        }
    }
}

/// What happens at one edge of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePolicy {
    /// Wraps to the opposite edge, which must also be periodic.
    Periodic,
    /// Populations leaving through the edge return reversed to the cell
    /// they left. Conserves mass exactly.
    BounceBack,
    /// Wrapped inward populations are replaced by the reversed outward
    /// populations of the first interior cell.
    InteriorMirror,
    /// Edge cells are reset to equilibrium at their own density and the
    /// prescribed velocity.
    Velocity(VelocityProfile),
}

impl EdgePolicy {
    /// Whether the edge holds populations in (anything but periodic).
    pub fn is_closed(&self) -> bool {
        !matches!(self, Self::Periodic)
    }
}

/// One policy per edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePolicies {
    /// Row 0.
    pub top: EdgePolicy,
    /// Last row.
    pub bottom: EdgePolicy,
    /// Column 0.
    pub left: EdgePolicy,
    /// Last column.
    pub right: EdgePolicy,
}

impl EdgePolicies {
    /// The same policy on all four edges.
    pub fn uniform(policy: EdgePolicy) -> Self {
        Self {
            top: policy,
            bottom: policy,
            left: policy,
            right: policy,
        }
    }

    /// The policy of `edge`.
    pub fn get(&self, edge: Edge) -> &EdgePolicy {
        match edge {
            Edge::Top => &self.top,
            Edge::Bottom => &self.bottom,
            Edge::Left => &self.left,
            Edge::Right => &self.right,
        }
    }
}

impl Default for EdgePolicies {
    fn default() -> Self {
        Self::uniform(EdgePolicy::Periodic)
    }
}

/// The grid line a wall runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallLine {
    /// A vertical wall at this column; span and opening index rows.
    Column(usize),
    /// A horizontal wall at this row; span and opening index columns.
    Row(usize),
}

/// Which neighbour of a wall cell its reflection is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The lower index: column - 1 or row - 1.
    Before,
    /// The higher index: column + 1 or row + 1.
    After,
}

impl Side {
    fn offset(self) -> i32 {
        match self {
            Self::Before => -1,
            Self::After => 1,
        }
    }
}

/// A straight solid segment, optionally with a gap.
///
/// Cells on `line` whose position along it is in `span` but not in
/// `opening` are solid. With `reflect` set, every solid cell is also
/// overwritten each step with the reversed populations of its neighbour
/// on that side.
///
/// ```
/// use flux_kernels::{Side, Wall};
///
/// let wall = Wall::column(30, 0..100).with_opening(45..65).reflecting(Side::After);
/// assert!(wall.is_solid_at(44));
/// assert!(!wall.is_solid_at(45));
/// assert!(wall.is_solid_at(65));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wall {
    /// The line the wall runs along.
    pub line: WallLine,
    /// Positions along the line covered by the wall (half-open).
    pub span: Range<usize>,
    /// Positions inside the span left open (half-open).
    pub opening: Option<Range<usize>>,
    /// Neighbour side for the reflection rule.
    pub reflect: Option<Side>,
}

impl Wall {
    /// A vertical wall at `col` covering rows `span`.
    pub fn column(col: usize, span: Range<usize>) -> Self {
        Self {
            line: WallLine::Column(col),
            span,
            opening: None,
            reflect: None,
        }
    }

    /// A horizontal wall at `row` covering columns `span`.
    pub fn row(row: usize, span: Range<usize>) -> Self {
        Self {
            line: WallLine::Row(row),
            span,
            opening: None,
            reflect: None,
        }
    }

    /// Leave `opening` passable.
    pub fn with_opening(mut self, opening: Range<usize>) -> Self {
        self.opening = Some(opening);
        self
    }

    /// Reflect from the neighbour on `side`.
    pub fn reflecting(mut self, side: Side) -> Self {
        self.reflect = Some(side);
        self
    }

    /// Whether position `k` along the line is solid.
    pub fn is_solid_at(&self, k: usize) -> bool {
        self.span.contains(&k) && !self.opening.as_ref().is_some_and(|o| o.contains(&k))
    }

    /// `(row, col)` of position `k` along the line.
    pub fn cell_at(&self, k: usize) -> (usize, usize) {
        match self.line {
            WallLine::Column(c) => (k, c),
            WallLine::Row(r) => (r, k),
        }
    }

    /// Cells available along the line on `shape`.
    pub(crate) fn line_len(&self, shape: GridShape) -> usize {
        match self.line {
            WallLine::Column(_) => shape.rows(),
            WallLine::Row(_) => shape.cols(),
        }
    }

    /// Whether the line itself is on the grid.
    pub(crate) fn line_in_bounds(&self, shape: GridShape) -> bool {
        match self.line {
            WallLine::Column(c) => c < shape.cols(),
            WallLine::Row(r) => r < shape.rows(),
        }
    }

    /// Step from a wall cell to its reflection neighbour.
    pub(crate) fn side_step(&self, side: Side) -> [i32; 2] {
        match self.line {
            WallLine::Column(_) => [side.offset(), 0],
            WallLine::Row(_) => [0, side.offset()],
        }
    }

    /// `(row, col)` of every solid cell, in order along the line.
    pub fn solid_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.span
            .clone()
            .filter(|&k| self.is_solid_at(k))
            .map(|k| self.cell_at(k))
    }
}

/// A cell held at equilibrium for the first few steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceSpec {
    /// Source row.
    pub row: usize,
    /// Source column.
    pub col: usize,
    /// Velocity imposed while active.
    pub velocity: [f64; 2],
    /// The source acts on steps `0..active_steps`.
    pub active_steps: u64,
    /// Density imposed while active; the cell's own density if `None`.
    pub density: Option<f64>,
}

/// Everything the boundary enforcer needs to know.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundarySpec {
    /// Per-edge behaviour.
    pub edges: EdgePolicies,
    /// Wall segments.
    pub walls: Vec<Wall>,
    /// Extra solid cells, `(row, col)`.
    pub obstacles: Vec<(usize, usize)>,
    /// Optional transient source.
    pub source: Option<SourceSpec>,
}

impl BoundarySpec {
    /// Periodic on every edge, no walls.
    pub fn periodic() -> Self {
        Self::default()
    }

    /// Bounce-back on every edge, no walls.
    pub fn closed() -> Self {
        Self {
            edges: EdgePolicies::uniform(EdgePolicy::BounceBack),
            ..Self::default()
        }
    }
}
