//! The four sides of a rectangular grid.

use flux_core::GridShape;

/// One side of the grid. Row 0 is the top edge, column 0 the left edge.
///
/// # Examples
///
/// ```
/// use flux_lattice::Edge;
///
/// // A population moving down (`cy = +1`) can only be at the top row
/// // after streaming by wrapping around from the bottom.
/// assert!(Edge::Top.is_inward([0, 1]));
/// assert!(Edge::Top.is_inward([1, 1]));
/// assert!(!Edge::Top.is_inward([1, 0]));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    /// Row 0.
    Top,
    /// The last row.
    Bottom,
    /// Column 0.
    Left,
    /// The last column.
    Right,
}

impl Edge {
    /// All edges, in enforcement order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Unit vector pointing from this edge into the grid.
    pub fn inward_normal(self) -> [i32; 2] {
        match self {
            Self::Top => [0, 1],
            Self::Bottom => [0, -1],
            Self::Left => [1, 0],
            Self::Right => [-1, 0],
        }
    }

    /// Whether `direction` has a component pointing into the grid from
    /// this edge.
    pub fn is_inward(self, direction: [i32; 2]) -> bool {
        let [nx, ny] = self.inward_normal();
        direction[0] * nx + direction[1] * ny > 0
    }

    /// The edge across the grid.
    pub fn opposite(self) -> Edge {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Number of cells along this edge.
    pub fn len(self, shape: GridShape) -> usize {
        match self {
            Self::Top | Self::Bottom => shape.cols(),
            Self::Left | Self::Right => shape.rows(),
        }
    }

    /// `(row, col)` of the `k`-th cell along this edge.
    ///
    /// Top and bottom run left to right; left and right run top to bottom.
    pub fn cell(self, shape: GridShape, k: usize) -> (usize, usize) {
        match self {
            Self::Top => (0, k),
            Self::Bottom => (shape.rows() - 1, k),
            Self::Left => (k, 0),
            Self::Right => (k, shape.cols() - 1),
        }
    }

    /// Flat indices of the cells along this edge, in order.
    pub fn cells(self, shape: GridShape) -> impl Iterator<Item = usize> {
        (0..self.len(shape)).map(move |k| {
            let (r, c) = self.cell(shape, k);
            shape.index(r, c)
        })
    }

    /// Whether `(row, col)` lies on this edge.
    pub fn contains(self, shape: GridShape, row: usize, col: usize) -> bool {
        match self {
            Self::Top => row == 0,
            Self::Bottom => row + 1 == shape.rows(),
            Self::Left => col == 0,
            Self::Right => col + 1 == shape.cols(),
        }
    }
}
