//! Run lifecycle: stepping, convergence and termination.
//!
//! [`Driver`] is the user-facing API. Each [`step()`](Driver::step) runs
//! one full collision, streaming, boundary and extraction cycle, consults
//! the convergence monitor, and updates the [`RunStatus`]. Once the status
//! is terminal further steps are refused.
//!
//! ```text
//! Running ──(monitor converged)──▶ Converged { steps }
//!    │
//!    └────(step budget spent)────▶ MaxStepsReached { steps }
//! ```
//!
//! Convergence on the last permitted step is reported as converged.

use std::time::Instant;

use log::{debug, info, warn};
use thiserror::Error;

use flux_core::FieldError;
use flux_kernels::{CollisionError, CollisionRule};

use crate::config::{ConfigError, SimConfig};
use crate::convergence::{ConvergenceMonitor, Verdict};
use crate::metrics::StepMetrics;
use crate::render::Renderer;
use crate::state::{SimulationState, STAGES};

// ── RunStatus ──────────────────────────────────────────────────────

/// Where a run is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// More steps may be taken.
    Running,
    /// The convergence monitor reported a steady state.
    Converged {
        /// Steps executed.
        steps: u64,
    },
    /// The step budget ran out first.
    MaxStepsReached {
        /// Steps executed.
        steps: u64,
    },
}

impl RunStatus {
    /// Whether no further steps are allowed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

// ── StepError ──────────────────────────────────────────────────────

/// Errors from [`Driver::step`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StepError {
    /// The run already finished.
    #[error("run has terminated: {status:?}")]
    Terminated {
        /// The terminal status.
        status: RunStatus,
    },
    /// The collision kernel failed.
    #[error("collision: {0}")]
    Collision(#[from] CollisionError),
    /// A kernel was handed buffers of the wrong layout.
    #[error("field: {0}")]
    Field(#[from] FieldError),
}

// ── StepResult / RunSummary ────────────────────────────────────────

/// Result of a successful [`Driver::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// Status after this step.
    pub status: RunStatus,
    /// Monitor verdict, when convergence is configured.
    pub verdict: Option<Verdict>,
    /// Metrics for this step.
    pub metrics: StepMetrics,
}

/// Outcome of [`Driver::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Terminal status.
    pub status: RunStatus,
    /// Steps executed.
    pub steps: u64,
    /// Total mass before the first step.
    pub initial_mass: f64,
    /// Total mass after the last step.
    pub final_mass: f64,
    /// Wall-clock time for the run in microseconds.
    pub elapsed_us: u64,
}

// ── Driver ─────────────────────────────────────────────────────────

/// Owns the simulation state and steps it until it terminates.
///
/// # Examples
///
/// ```
/// use flux_engine::{Driver, NullRenderer, RunStatus, SimConfig, Variant};
///
/// let mut config = SimConfig::new(Variant::DiffusionRelaxation, 8, 8);
/// config.max_steps = 5;
/// let mut driver = Driver::new(config).unwrap();
/// let summary = driver.run(&mut NullRenderer).unwrap();
/// assert_eq!(summary.status, RunStatus::MaxStepsReached { steps: 5 });
/// assert!(driver.step().is_err());
/// ```
#[derive(Debug)]
pub struct Driver {
    state: SimulationState,
    monitor: Option<ConvergenceMonitor>,
    status: RunStatus,
    max_steps: u64,
    initial_mass: f64,
    last_metrics: StepMetrics,
}

impl Driver {
    /// Validate `config` and build a ready-to-step driver.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let state = SimulationState::new(&config)?;
        let monitor = config
            .convergence
            .map(|c| ConvergenceMonitor::new(c, state.grid().shape()));

        if let CollisionRule::Relaxation(bgk) = state.collision() {
            if bgk.is_near_unstable() {
                warn!(
                    "tau/dt = {:.3} is close to the stability limit of 0.5",
                    bgk.tau() / bgk.dt()
                );
            }
        }
        let initial_mass = state.total_mass();
        info!(
            "{} driver ready: {}x{} {}, {} obstacle cells, max {} steps, initial mass {:.6}",
            config.variant.name(),
            config.rows,
            config.cols,
            state.lattice().name(),
            state.mask().solid_count(),
            config.max_steps,
            initial_mass,
        );

        Ok(Self {
            state,
            monitor,
            status: RunStatus::Running,
            max_steps: config.max_steps,
            initial_mass,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Execute one step.
    ///
    /// # Errors
    ///
    /// [`StepError::Terminated`] once the run has finished; kernel errors
    /// otherwise, which leave the status unchanged.
    pub fn step(&mut self) -> Result<StepResult, StepError> {
        if self.status.is_terminal() {
            return Err(StepError::Terminated {
                status: self.status,
            });
        }
        let start = Instant::now();
        let report = self.state.advance()?;
        let verdict = self
            .monitor
            .as_mut()
            .map(|m| m.observe(self.state.macroscopic()));

        let steps = self.state.clock().0;
        self.status = match verdict {
            Some(v) if v.is_converged() => RunStatus::Converged { steps },
            _ if steps >= self.max_steps => RunStatus::MaxStepsReached { steps },
            _ => RunStatus::Running,
        };

        let metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            stage_us: STAGES.iter().copied().zip(report.stage_us).collect(),
            total_mass: self.state.total_mass(),
            clamped: report.collision.clamped,
            exchanges: report.collision.exchanges,
            reflected: report.streaming.reflected,
            boundary: report.boundary,
            convergence_delta: verdict.map(|v| v.delta()),
        };
        debug!(
            "step {steps}: mass {:.6}, delta {:?}, clamped {}",
            metrics.total_mass, metrics.convergence_delta, metrics.clamped
        );
        if self.status.is_terminal() {
            info!("run finished: {:?}, final mass {:.6}", self.status, metrics.total_mass);
        }
        self.last_metrics = metrics.clone();

        Ok(StepResult {
            status: self.status,
            verdict,
            metrics,
        })
    }

    /// Step until the run terminates, handing every frame to `renderer`.
    pub fn run<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<RunSummary, StepError> {
        let start = Instant::now();
        loop {
            let result = self.step()?;
            renderer.render(&self.state.frame());
            if result.status.is_terminal() {
                break;
            }
        }
        Ok(RunSummary {
            status: self.status,
            steps: self.state.clock().0,
            initial_mass: self.initial_mass,
            final_mass: self.state.total_mass(),
            elapsed_us: start.elapsed().as_micros() as u64,
        })
    }

    /// Current status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// The owned state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Metrics of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// The step budget.
    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }
}
