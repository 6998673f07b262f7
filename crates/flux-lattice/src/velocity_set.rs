//! The [`VelocitySet`] type and scheme selection.

use crate::error::LatticeError;
use crate::{d2q4, d2q9};

/// Tolerance for the weight-sum check.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// The stock velocity sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LatticeScheme {
    /// Four axis-aligned directions, no rest population.
    D2Q4,
    /// Rest, four axis-aligned and four diagonal directions.
    D2Q9,
}

impl LatticeScheme {
    /// Number of directions in the scheme.
    pub fn q(self) -> usize {
        match self {
            Self::D2Q4 => d2q4::Q,
            Self::D2Q9 => d2q9::Q,
        }
    }
}

/// An ordered set of discrete velocities with weights and reverses.
///
/// Directions are `[cx, cy]`: `cx` moves along columns, `cy` along rows
/// (row 0 is the top edge). The opposite table is derived from the vectors
/// at construction, so it is always an involution that maps every
/// direction to its exact reverse.
///
/// # Examples
///
/// ```
/// use flux_lattice::{LatticeScheme, VelocitySet};
///
/// let d2q9 = VelocitySet::for_scheme(LatticeScheme::D2Q9).unwrap();
/// assert_eq!(d2q9.q(), 9);
/// assert_eq!(d2q9.rest_direction(), Some(0));
/// for i in 0..d2q9.q() {
///     let [cx, cy] = d2q9.direction(i);
///     assert_eq!(d2q9.direction(d2q9.opposite(i)), [-cx, -cy]);
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct VelocitySet {
    name: &'static str,
    directions: Vec<[i32; 2]>,
    weights: Vec<f64>,
    opposite: Vec<usize>,
}

impl VelocitySet {
    /// Build and validate a velocity set.
    pub fn new(
        name: &'static str,
        directions: Vec<[i32; 2]>,
        weights: Vec<f64>,
    ) -> Result<Self, LatticeError> {
        if directions.len() != weights.len() {
            return Err(LatticeError::CountMismatch {
                name,
                directions: directions.len(),
                weights: weights.len(),
            });
        }
        if directions.is_empty() {
            return Err(LatticeError::Empty { name });
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(LatticeError::InvalidWeight { name, index, value });
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(LatticeError::WeightSum { name, sum });
        }
        for (i, d) in directions.iter().enumerate() {
            if directions[..i].contains(d) {
                return Err(LatticeError::DuplicateDirection {
                    name,
                    direction: *d,
                });
            }
        }

        let mut opposite = Vec::with_capacity(directions.len());
        for &[cx, cy] in &directions {
            let rev = directions
                .iter()
                .position(|&d| d == [-cx, -cy])
                .ok_or(LatticeError::MissingOpposite {
                    name,
                    direction: [cx, cy],
                })?;
            opposite.push(rev);
        }

        Ok(Self {
            name,
            directions,
            weights,
            opposite,
        })
    }

    /// One of the stock sets.
    pub fn for_scheme(scheme: LatticeScheme) -> Result<Self, LatticeError> {
        match scheme {
            LatticeScheme::D2Q4 => d2q4::velocity_set(),
            LatticeScheme::D2Q9 => d2q9::velocity_set(),
        }
    }

    /// Human-readable name, e.g. `"D2Q9"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of directions.
    #[inline]
    pub fn q(&self) -> usize {
        self.directions.len()
    }

    /// Vector of direction `i`.
    #[inline]
    pub fn direction(&self, i: usize) -> [i32; 2] {
        self.directions[i]
    }

    /// Weight of direction `i`.
    #[inline]
    pub fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }

    /// Index of the reverse of direction `i`.
    #[inline]
    pub fn opposite(&self, i: usize) -> usize {
        self.opposite[i]
    }

    /// All direction vectors, in index order.
    pub fn directions(&self) -> &[[i32; 2]] {
        &self.directions
    }

    /// All weights, in index order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index of the zero vector, if the set has one.
    pub fn rest_direction(&self) -> Option<usize> {
        self.directions.iter().position(|&d| d == [0, 0])
    }

    /// `(index, vector, weight)` for every direction.
    pub fn iter(&self) -> impl Iterator<Item = (usize, [i32; 2], f64)> + '_ {
        self.directions
            .iter()
            .zip(&self.weights)
            .enumerate()
            .map(|(i, (&d, &w))| (i, d, w))
    }
}
