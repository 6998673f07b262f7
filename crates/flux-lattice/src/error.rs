//! Errors from velocity-set construction.

use thiserror::Error;

/// Reasons a velocity set is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LatticeError {
    /// No directions were supplied.
    #[error("velocity set `{name}` has no directions")]
    Empty {
        /// Set name.
        name: &'static str,
    },
    /// Direction and weight lists differ in length.
    #[error("velocity set `{name}` has {directions} directions but {weights} weights")]
    CountMismatch {
        /// Set name.
        name: &'static str,
        /// Number of directions.
        directions: usize,
        /// Number of weights.
        weights: usize,
    },
    /// A weight is zero, negative, or not finite.
    #[error("velocity set `{name}`: weight {index} = {value} must be positive and finite")]
    InvalidWeight {
        /// Set name.
        name: &'static str,
        /// Direction index.
        index: usize,
        /// The offending weight.
        value: f64,
    },
    /// Weights do not sum to one.
    #[error("velocity set `{name}`: weights sum to {sum}, expected 1")]
    WeightSum {
        /// Set name.
        name: &'static str,
        /// Actual sum.
        sum: f64,
    },
    /// The same vector appears twice.
    #[error("velocity set `{name}`: direction {direction:?} appears more than once")]
    DuplicateDirection {
        /// Set name.
        name: &'static str,
        /// The repeated vector.
        direction: [i32; 2],
    },
    /// A direction has no exact reverse in the set.
    #[error("velocity set `{name}`: direction {direction:?} has no opposite")]
    MissingOpposite {
        /// Set name.
        name: &'static str,
        /// The direction lacking a reverse.
        direction: [i32; 2],
    },
}
