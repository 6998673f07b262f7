//! Fixed rectangular grid geometry.

use crate::error::GridError;

/// Dimensions of a rectangular 2D grid.
///
/// Each cell has coordinate `(row, col)` where `0 <= row < rows` and
/// `0 <= col < cols`; its flat index is `row * cols + col`. Direction
/// vectors are written `[cx, cy]`: `cx` moves along columns and `cy`
/// along rows.
///
/// # Examples
///
/// ```
/// use flux_core::GridShape;
///
/// let shape = GridShape::new(3, 4).unwrap();
/// assert_eq!(shape.cell_count(), 12);
/// assert_eq!(shape.index(1, 2), 6);
/// assert_eq!(shape.coords(6), (1, 2));
/// // Moving one column left from column 0 wraps to the last column.
/// assert_eq!(shape.wrapped(0, 0, [-1, 0]), shape.index(0, 3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

impl GridShape {
    /// Maximum dimension size: direction offsets are `i32`, so each axis must fit.
    pub const MAX_DIM: usize = i32::MAX as usize;

    /// Create a grid of `rows * cols` cells.
    ///
    /// Returns `Err(GridError::EmptyGrid)` if either dimension is 0, or
    /// `Err(GridError::DimensionTooLarge)` if either exceeds [`Self::MAX_DIM`].
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }
        if rows > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "rows",
                value: rows,
                max: Self::MAX_DIM,
            });
        }
        if cols > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "cols",
                value: cols,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index of `(row, col)`. Callers must pass in-bounds coordinates.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// `(row, col)` of a flat index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Flat index of `(row, col)`, or an error naming the bad coordinate.
    pub fn checked_index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(GridError::CellOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// The cell reached from `(row, col)` by `step`, or `None` when it
    /// falls outside the grid.
    #[inline]
    pub fn offset(&self, row: usize, col: usize, step: [i32; 2]) -> Option<usize> {
        let r = row as i64 + step[1] as i64;
        let c = col as i64 + step[0] as i64;
        if r < 0 || c < 0 || r >= self.rows as i64 || c >= self.cols as i64 {
            None
        } else {
            Some(r as usize * self.cols + c as usize)
        }
    }

    /// The cell reached from `(row, col)` by `step` on the periodic
    /// (torus) closure of the grid.
    #[inline]
    pub fn wrapped(&self, row: usize, col: usize, step: [i32; 2]) -> usize {
        let r = wrap_axis(row as i64 + step[1] as i64, self.rows);
        let c = wrap_axis(col as i64 + step[0] as i64, self.cols);
        r * self.cols + c
    }
}

/// Resolve one axis value onto `0..len` periodically.
#[inline]
fn wrap_axis(val: i64, len: usize) -> usize {
    val.rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(GridShape::new(0, 4), Err(GridError::EmptyGrid));
        assert_eq!(GridShape::new(4, 0), Err(GridError::EmptyGrid));
    }

    #[test]
    fn rejects_oversized() {
        match GridShape::new(GridShape::MAX_DIM + 1, 1) {
            Err(GridError::DimensionTooLarge { name: "rows", .. }) => {}
            other => panic!("expected DimensionTooLarge(rows), got {other:?}"),
        }
    }

    #[test]
    fn checked_index_bounds() {
        let s = GridShape::new(2, 3).unwrap();
        assert_eq!(s.checked_index(1, 2), Ok(5));
        assert!(matches!(
            s.checked_index(2, 0),
            Err(GridError::CellOutOfBounds { row: 2, col: 0, .. })
        ));
    }

    #[test]
    fn offset_stays_inside() {
        let s = GridShape::new(3, 3).unwrap();
        assert_eq!(s.offset(1, 1, [1, 0]), Some(s.index(1, 2)));
        assert_eq!(s.offset(1, 1, [0, -1]), Some(s.index(0, 1)));
        assert_eq!(s.offset(0, 0, [-1, 0]), None);
        assert_eq!(s.offset(2, 2, [1, 1]), None);
    }

    #[test]
    fn wrapped_is_periodic() {
        let s = GridShape::new(3, 5).unwrap();
        assert_eq!(s.wrapped(0, 0, [-1, -1]), s.index(2, 4));
        assert_eq!(s.wrapped(2, 4, [1, 1]), s.index(0, 0));
        assert_eq!(s.wrapped(1, 2, [0, 0]), s.index(1, 2));
    }

    proptest! {
        #[test]
        fn index_coords_roundtrip(rows in 1usize..40, cols in 1usize..40, seed in 0usize..10_000) {
            let s = GridShape::new(rows, cols).unwrap();
            let i = seed % s.cell_count();
            let (r, c) = s.coords(i);
            prop_assert_eq!(s.index(r, c), i);
        }

        #[test]
        fn wrapped_step_is_invertible(
            rows in 1usize..20,
            cols in 1usize..20,
            seed in 0usize..10_000,
            dx in -1i32..=1,
            dy in -1i32..=1,
        ) {
            let s = GridShape::new(rows, cols).unwrap();
            let i = seed % s.cell_count();
            let (r, c) = s.coords(i);
            let j = s.wrapped(r, c, [dx, dy]);
            let (jr, jc) = s.coords(j);
            prop_assert_eq!(s.wrapped(jr, jc, [-dx, -dy]), i);
        }
    }
}
