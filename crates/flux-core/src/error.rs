//! Error types for grid construction and field access.

use thiserror::Error;

/// Errors arising from grid construction or cell addressing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Attempted to construct a grid with zero cells.
    #[error("grid must have at least one row and one column")]
    EmptyGrid,
    /// A dimension exceeds the addressable range.
    #[error("{name} = {value} exceeds the maximum of {max}")]
    DimensionTooLarge {
        /// Which dimension (`"rows"` or `"cols"`).
        name: &'static str,
        /// The requested size.
        value: usize,
        /// The largest accepted size.
        max: usize,
    },
    /// A cell coordinate lies outside the grid.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
}

/// Errors from building or combining per-cell fields.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FieldError {
    /// A buffer does not have the length the grid requires.
    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending buffer.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// Two fields were combined with different shapes or direction counts.
    #[error("field layout mismatch: {reason}")]
    LayoutMismatch {
        /// What differs.
        reason: String,
    },
    /// A value is negative or not finite.
    #[error("{what}[{index}] = {value} is not a finite non-negative number")]
    InvalidValue {
        /// Name of the offending buffer.
        what: &'static str,
        /// Index of the first invalid entry.
        index: usize,
        /// The invalid value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_messages_name_the_problem() {
        let e = GridError::CellOutOfBounds {
            row: 5,
            col: 9,
            rows: 4,
            cols: 4,
        };
        assert_eq!(e.to_string(), "cell (5, 9) is outside the 4x4 grid");

        let e = GridError::DimensionTooLarge {
            name: "rows",
            value: 10,
            max: 5,
        };
        assert!(e.to_string().contains("rows = 10"));
    }

    #[test]
    fn field_error_reports_lengths() {
        let e = FieldError::LengthMismatch {
            what: "density",
            expected: 16,
            actual: 4,
        };
        assert_eq!(e.to_string(), "density has 4 entries, expected 16");
    }
}
