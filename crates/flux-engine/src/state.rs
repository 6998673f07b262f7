//! Owned simulation state and the per-step pipeline.

use std::time::Instant;

use log::trace;

use flux_core::{DistributionField, MacroscopicField, ObstacleMask, StepId};
use flux_kernels::macroscopic::{extract, occupancy_display};
use flux_kernels::{
    BoundaryEnforcer, BoundaryPlan, BoundaryStats, CollisionRule, CollisionStats, StreamStats,
    StreamingRule,
};
use flux_lattice::VelocitySet;

use crate::config::{ConfigError, SimConfig};
use crate::driver::StepError;
use crate::render::Frame;
use crate::variant::Variant;

/// Pipeline stage names, in execution order.
pub const STAGES: [&str; 4] = ["collision", "streaming", "boundary", "extraction"];

/// What one pass through the pipeline did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageReport {
    /// Collision statistics.
    pub collision: CollisionStats,
    /// Streaming statistics.
    pub streaming: StreamStats,
    /// Boundary statistics.
    pub boundary: BoundaryStats,
    /// Microseconds per stage, aligned with [`STAGES`].
    pub stage_us: [u64; 4],
}

/// Everything a run mutates, owned in one place.
///
/// The distribution field lives in `grid`; collision writes into
/// `scratch` (obstacle cells are carried over unchanged), streaming
/// writes back into `grid`, and the boundary enforcer patches `grid` in
/// place.
#[derive(Debug)]
pub struct SimulationState {
    variant: Variant,
    lattice: VelocitySet,
    collision: CollisionRule,
    streaming: StreamingRule,
    enforcer: BoundaryEnforcer,
    grid: DistributionField,
    scratch: DistributionField,
    macroscopic: MacroscopicField,
    clock: StepId,
}

impl SimulationState {
    /// Build and initialise the state for `config`.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let shape = config.shape()?;
        let lattice = VelocitySet::for_scheme(config.variant.scheme())?;
        let collision = config.variant.collision_rule(config.tau, config.dt)?;
        let plan = BoundaryPlan::compile(shape, &lattice, &config.boundary, config.plan_options())?;
        let grid = config.initial.build(shape, &lattice, plan.mask())?;
        let scratch = DistributionField::zeros(shape, lattice.q());
        let mut macroscopic = MacroscopicField::zeros(shape);
        extract(&lattice, &grid, &mut macroscopic)?;

        Ok(Self {
            variant: config.variant,
            lattice,
            collision,
            streaming: config.variant.streaming(),
            enforcer: BoundaryEnforcer::new(plan),
            grid,
            scratch,
            macroscopic,
            clock: StepId(0),
        })
    }

    /// Run collision, streaming, boundary and extraction once and advance
    /// the clock.
    pub fn advance(&mut self) -> Result<StageReport, StepError> {
        let mut report = StageReport::default();

        let t = Instant::now();
        report.collision = self
            .collision
            .collide(&self.lattice, &self.grid, &mut self.scratch)?;
        self.enforcer.hold_obstacles(&self.grid, &mut self.scratch)?;
        report.stage_us[0] = t.elapsed().as_micros() as u64;

        let t = Instant::now();
        report.streaming = self.streaming.stream(
            &self.lattice,
            self.enforcer.plan().mask(),
            &self.scratch,
            &mut self.grid,
        )?;
        report.stage_us[1] = t.elapsed().as_micros() as u64;

        let t = Instant::now();
        report.boundary = self
            .enforcer
            .apply(&self.lattice, &mut self.grid, self.clock)?;
        report.stage_us[2] = t.elapsed().as_micros() as u64;

        let t = Instant::now();
        extract(&self.lattice, &self.grid, &mut self.macroscopic)?;
        report.stage_us[3] = t.elapsed().as_micros() as u64;

        for (stage, us) in STAGES.iter().zip(report.stage_us) {
            trace!("step {}: {stage} took {us}us", self.clock);
        }
        self.clock = self.clock.next();
        Ok(report)
    }

    /// The running variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The velocity set.
    pub fn lattice(&self) -> &VelocitySet {
        &self.lattice
    }

    /// The collision rule.
    pub fn collision(&self) -> &CollisionRule {
        &self.collision
    }

    /// The distribution field.
    pub fn grid(&self) -> &DistributionField {
        &self.grid
    }

    /// Density and velocity after the last step (or of the initial field).
    pub fn macroscopic(&self) -> &MacroscopicField {
        &self.macroscopic
    }

    /// Solid cells.
    pub fn mask(&self) -> &ObstacleMask {
        self.enforcer.plan().mask()
    }

    /// The compiled boundary plan.
    pub fn plan(&self) -> &BoundaryPlan {
        self.enforcer.plan()
    }

    /// Steps completed.
    pub fn clock(&self) -> StepId {
        self.clock
    }

    /// Sum of every population.
    pub fn total_mass(&self) -> f64 {
        self.grid.total()
    }

    /// An owned copy of the displayable state.
    pub fn frame(&self) -> Frame {
        Frame {
            step: self.clock,
            shape: self.grid.shape(),
            density: self.macroscopic.density.clone(),
            velocity: self.macroscopic.velocity.clone(),
            occupancy: self
                .variant
                .is_binary()
                .then(|| occupancy_display(&self.grid, self.mask())),
        }
    }
}
