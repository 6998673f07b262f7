//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for constructing a
//! [`Driver`](crate::Driver). [`validate()`](SimConfig::validate) checks
//! every structural invariant up front; the driver constructor runs the
//! same checks while building the state, so an invalid configuration
//! never reaches the first step.

use thiserror::Error;

use flux_core::{FieldError, GridError, GridShape};
use flux_kernels::{BoundaryError, BoundaryPlan, BoundarySpec, CollisionError, PlanOptions};
use flux_lattice::{LatticeError, VelocitySet};

use crate::convergence::ConvergenceConfig;
use crate::init::InitialCondition;
use crate::variant::Variant;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`SimConfig`] or building a driver.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Grid dimensions are invalid.
    #[error("grid: {0}")]
    Grid(#[from] GridError),
    /// The velocity set failed validation.
    #[error("lattice: {0}")]
    Lattice(#[from] LatticeError),
    /// `tau` or `dt` is invalid.
    #[error("collision: {0}")]
    Collision(#[from] CollisionError),
    /// The boundary description does not compile.
    #[error("boundary: {0}")]
    Boundary(#[from] BoundaryError),
    /// An initial buffer has the wrong length or a bad value.
    #[error("field: {0}")]
    Field(#[from] FieldError),
    /// The initial condition does not fit the grid or variant.
    #[error("initial condition: {reason}")]
    InvalidInitial {
        /// What is wrong.
        reason: String,
    },
    /// More particles requested than free slots in their region.
    #[error("{requested} particles requested but only {available} free slots")]
    TooManyParticles {
        /// Requested count.
        requested: usize,
        /// Free slots in the placement regions.
        available: usize,
    },
    /// Convergence threshold or patience is invalid.
    #[error("convergence threshold {threshold} and patience {patience} must both be positive")]
    InvalidConvergence {
        /// Configured threshold.
        threshold: f64,
        /// Configured patience.
        patience: u32,
    },
    /// `max_steps` is zero.
    #[error("max_steps must be at least 1")]
    NoSteps,
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration of one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub cols: usize,
    /// Which simulator.
    pub variant: Variant,
    /// Relaxation time. Ignored by the lattice gas.
    pub tau: f64,
    /// Time step. Ignored by the lattice gas.
    pub dt: f64,
    /// Starting field.
    pub initial: InitialCondition,
    /// Edges, walls, obstacles and source.
    pub boundary: BoundarySpec,
    /// Stop early once the observable settles. `None` runs to `max_steps`.
    pub convergence: Option<ConvergenceConfig>,
    /// Upper bound on steps. Default: 1000.
    pub max_steps: u64,
}

impl SimConfig {
    /// A periodic, uniform-density configuration for `variant`.
    ///
    /// The lattice gas needs a binary initial condition and closed edges;
    /// set [`initial`](Self::initial) and [`boundary`](Self::boundary)
    /// before validating one.
    pub fn new(variant: Variant, rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            variant,
            tau: 1.0,
            dt: 1.0,
            initial: InitialCondition::Uniform { density: 1.0 },
            boundary: BoundarySpec::periodic(),
            convergence: None,
            max_steps: 1000,
        }
    }

    /// Grid shape.
    pub fn shape(&self) -> Result<GridShape, ConfigError> {
        Ok(GridShape::new(self.rows, self.cols)?)
    }

    /// Plan options implied by the variant.
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            streaming: self.variant.streaming(),
            momentum: self.variant.momentum(),
        }
    }

    /// Validate every structural invariant.
    ///
    /// This is a pure validation pass; nothing it builds is kept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid.
        let shape = self.shape()?;
        // 2. Velocity set and collision parameters.
        let lattice = VelocitySet::for_scheme(self.variant.scheme())?;
        self.variant.collision_rule(self.tau, self.dt)?;
        // 3. Run length and convergence.
        if self.max_steps == 0 {
            return Err(ConfigError::NoSteps);
        }
        if let Some(c) = self.convergence {
            if !c.is_valid() {
                return Err(ConfigError::InvalidConvergence {
                    threshold: c.threshold,
                    patience: c.patience,
                });
            }
        }
        // 4. Boundary compiles for this variant.
        BoundaryPlan::compile(shape, &lattice, &self.boundary, self.plan_options())?;
        // 5. Initial condition matches the grid and the variant.
        self.initial.validate(shape, lattice.q())?;
        match (self.variant.is_binary(), self.initial.is_binary()) {
            (true, false) => Err(ConfigError::InvalidInitial {
                reason: "the lattice gas needs binary occupation".to_string(),
            }),
            (false, true) if matches!(self.initial, InitialCondition::Particles(_)) => {
                Err(ConfigError::InvalidInitial {
                    reason: format!("particle seeding is only for the lattice gas, not {}", self.variant.name()),
                })
            }
            _ => Ok(()),
        }
    }
}
