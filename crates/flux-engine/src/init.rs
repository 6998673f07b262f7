//! Initial distribution fields.

use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use flux_core::{DistributionField, FieldError, GridShape, ObstacleMask};
use flux_kernels::equilibrium::equilibrium_into;
use flux_lattice::VelocitySet;

use crate::config::ConfigError;

/// A rectangular block of cells, half-open on both axes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Row range.
    pub rows: Range<usize>,
    /// Column range.
    pub cols: Range<usize>,
}

impl Region {
    /// A block covering `rows` x `cols`.
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    fn fits(&self, shape: GridShape) -> bool {
        self.rows.start < self.rows.end
            && self.cols.start < self.cols.end
            && self.rows.end <= shape.rows()
            && self.cols.end <= shape.cols()
    }

    fn cells(&self, shape: GridShape) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .clone()
            .flat_map(move |r| self.cols.clone().map(move |c| shape.index(r, c)))
    }
}

/// A sub-region that receives a share of the particles.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseRegion {
    /// The favoured block.
    pub region: Region,
    /// Probability that any one particle is placed here.
    pub probability: f64,
}

/// Random binary population for the lattice gas.
///
/// Each particle picks the dense region with probability
/// `dense.probability` (falling back to `region` once the dense region
/// is full), then a free `(cell, direction)` slot uniformly. Solid cells
/// are never populated. The same seed always gives the same field.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSeed {
    /// Number of particles.
    pub count: usize,
    /// RNG seed.
    pub seed: u64,
    /// Where particles may be placed.
    pub region: Region,
    /// Optional denser sub-region.
    pub dense: Option<DenseRegion>,
}

/// How the distribution field starts.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialCondition {
    /// Rest equilibrium at one density everywhere.
    Uniform {
        /// Density of every cell.
        density: f64,
    },
    /// Rest equilibrium at `left` for columns below `column`, `right` from
    /// `column` on.
    ColumnSplit {
        /// First column of the right part.
        column: usize,
        /// Density left of `column`.
        left: f64,
        /// Density from `column` on.
        right: f64,
    },
    /// Equilibrium of one density and velocity everywhere.
    Equilibrium {
        /// Density.
        density: f64,
        /// Velocity `[ux, uy]`.
        velocity: [f64; 2],
    },
    /// Explicit cell-major values.
    Distribution(Vec<f64>),
    /// Random binary particles.
    Particles(ParticleSeed),
}

impl InitialCondition {
    /// Whether this condition yields binary occupation.
    pub fn is_binary(&self) -> bool {
        match self {
            Self::Particles(_) => true,
            Self::Distribution(values) => values.iter().all(|&v| v == 0.0 || v == 1.0),
            _ => false,
        }
    }

    /// Check parameters against the grid without building the field.
    pub fn validate(&self, shape: GridShape, q: usize) -> Result<(), ConfigError> {
        let check = |what: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::from(FieldError::InvalidValue {
                    what,
                    index: 0,
                    value,
                }))
            }
        };
        match self {
            Self::Uniform { density } => check("density", *density),
            Self::ColumnSplit {
                column,
                left,
                right,
            } => {
                if *column > shape.cols() {
                    return Err(ConfigError::InvalidInitial {
                        reason: format!(
                            "split column {column} is beyond the {} columns",
                            shape.cols()
                        ),
                    });
                }
                check("left density", *left)?;
                check("right density", *right)
            }
            Self::Equilibrium { density, velocity } => {
                check("density", *density)?;
                if velocity.iter().all(|v| v.is_finite()) {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidInitial {
                        reason: format!("velocity {velocity:?} is not finite"),
                    })
                }
            }
            Self::Distribution(values) => {
                let expected = shape.cell_count() * q;
                if values.len() != expected {
                    return Err(FieldError::LengthMismatch {
                        what: "initial distribution",
                        expected,
                        actual: values.len(),
                    }
                    .into());
                }
                match values
                    .iter()
                    .enumerate()
                    .find(|(_, v)| !v.is_finite() || **v < 0.0)
                {
                    Some((index, &value)) => Err(FieldError::InvalidValue {
                        what: "initial distribution",
                        index,
                        value,
                    }
                    .into()),
                    None => Ok(()),
                }
            }
            Self::Particles(seed) => {
                if !seed.region.fits(shape) {
                    return Err(ConfigError::InvalidInitial {
                        reason: format!("particle region {:?} does not fit the grid", seed.region),
                    });
                }
                if let Some(dense) = &seed.dense {
                    if !dense.region.fits(shape) {
                        return Err(ConfigError::InvalidInitial {
                            reason: format!(
                                "dense region {:?} does not fit the grid",
                                dense.region
                            ),
                        });
                    }
                    if !(0.0..=1.0).contains(&dense.probability) {
                        return Err(ConfigError::InvalidInitial {
                            reason: format!(
                                "dense probability {} is outside [0, 1]",
                                dense.probability
                            ),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Build the starting field.
    pub fn build(
        &self,
        shape: GridShape,
        lattice: &VelocitySet,
        mask: &ObstacleMask,
    ) -> Result<DistributionField, ConfigError> {
        self.validate(shape, lattice.q())?;
        let q = lattice.q();
        let mut field = DistributionField::zeros(shape, q);
        match self {
            Self::Uniform { density } => {
                for cell in 0..shape.cell_count() {
                    equilibrium_into(lattice, *density, [0.0, 0.0], field.cell_mut(cell));
                }
            }
            Self::ColumnSplit {
                column,
                left,
                right,
            } => {
                for cell in 0..shape.cell_count() {
                    let (_, c) = shape.coords(cell);
                    let rho = if c < *column { *left } else { *right };
                    equilibrium_into(lattice, rho, [0.0, 0.0], field.cell_mut(cell));
                }
            }
            Self::Equilibrium { density, velocity } => {
                for cell in 0..shape.cell_count() {
                    equilibrium_into(lattice, *density, *velocity, field.cell_mut(cell));
                }
            }
            Self::Distribution(values) => {
                field = DistributionField::from_values(shape, q, values.clone())?;
            }
            Self::Particles(seed) => seed_particles(seed, shape, q, mask, &mut field)?,
        }
        Ok(field)
    }
}

fn seed_particles(
    seed: &ParticleSeed,
    shape: GridShape,
    q: usize,
    mask: &ObstacleMask,
    field: &mut DistributionField,
) -> Result<(), ConfigError> {
    let free_slots = |region: &Region| -> Vec<usize> {
        region
            .cells(shape)
            .filter(|&cell| !mask.is_solid(cell))
            .flat_map(|cell| (0..q).map(move |i| cell * q + i))
            .collect()
    };
    let mut main = free_slots(&seed.region);
    let mut dense = seed
        .dense
        .as_ref()
        .map(|d| (free_slots(&d.region), d.probability));

    let mut available: Vec<usize> = main.clone();
    if let Some((slots, _)) = &dense {
        available.extend(slots);
    }
    available.sort_unstable();
    available.dedup();
    if available.len() < seed.count {
        return Err(ConfigError::TooManyParticles {
            requested: seed.count,
            available: available.len(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed.seed);
    let values = field.values_mut();
    let mut placed = 0;
    while placed < seed.count {
        let use_dense = match &dense {
            Some((slots, p)) if !slots.is_empty() => rng.random_bool(*p),
            _ => false,
        };
        let pool = match (&mut dense, use_dense) {
            (Some((slots, _)), true) => slots,
            _ if !main.is_empty() => &mut main,
            (Some((slots, _)), false) => slots,
            (None, _) => break,
        };
        let pick = rng.random_range(0..pool.len());
        let slot = pool.swap_remove(pick);
        if values[slot] == 0.0 {
            values[slot] = 1.0;
            placed += 1;
        }
    }
    Ok(())
}
