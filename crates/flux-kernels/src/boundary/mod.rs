//! Boundary conditions.
//!
//! A [`BoundarySpec`] says what each edge, wall and source should do. It
//! is compiled once into a [`BoundaryPlan`]: the explicit list of slots
//! every rule rewrites, validated so that no slot filled by periodic
//! wraparound on a closed edge goes uncorrected. The [`BoundaryEnforcer`]
//! replays that plan after every streaming pass.
//!
//! # Rule order
//!
//! Later rules overwrite earlier ones where they touch the same slot:
//!
//! 1. obstacle bounce-back
//! 2. prescribed edge velocity (top, bottom, left, right)
//! 3. edge fallback (bounce-back or interior mirror)
//! 4. wall reflection
//! 5. transient source

mod enforcer;
mod plan;
mod spec;

pub use enforcer::{BoundaryEnforcer, BoundaryStats};
pub use plan::{BoundaryPlan, PlanOptions, SlotRule, SourceRule, VelocityEdgeRule, WallReflection};
pub use spec::{
    BoundarySpec, EdgePolicies, EdgePolicy, Side, SourceSpec, VelocityProfile, Wall, WallLine,
};
