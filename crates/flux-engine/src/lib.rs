//! Simulation driver for the Flux lattice simulators.
//!
//! Ties the kernels together into a stepping loop. A [`SimConfig`]
//! describes one run; [`Driver::new`] validates it, builds the
//! [`SimulationState`], and [`Driver::step`] executes one collision,
//! streaming, boundary and extraction cycle followed by the convergence
//! check. Frames are handed to a [`Renderer`] after each step of
//! [`Driver::run`].
//!
//! Ready-made scenarios live in [`presets`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod convergence;
pub mod driver;
pub mod init;
pub mod metrics;
pub mod presets;
pub mod render;
pub mod state;
pub mod variant;

pub use config::{ConfigError, SimConfig};
pub use convergence::{ConvergenceConfig, ConvergenceMonitor, Observable, Verdict};
pub use driver::{Driver, RunStatus, RunSummary, StepError, StepResult};
pub use init::{DenseRegion, InitialCondition, ParticleSeed, Region};
pub use metrics::StepMetrics;
pub use render::{ChannelRenderer, Every, Frame, FrameLog, NullRenderer, Renderer};
pub use state::{SimulationState, StageReport, STAGES};
pub use variant::Variant;
