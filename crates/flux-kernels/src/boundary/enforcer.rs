//! Applies a [`BoundaryPlan`] to a streamed field.

use log::trace;

use flux_core::{DistributionField, FieldError, StepId};
use flux_lattice::VelocitySet;

use super::plan::BoundaryPlan;
use crate::equilibrium::{equilibrium_into, CellBuf};

/// Slots rewritten by one enforcement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundaryStats {
    /// Slots reversed in obstacle cells.
    pub obstacle_slots: usize,
    /// Slots reset on prescribed-velocity edges.
    pub velocity_slots: usize,
    /// Wrapped slots restored by edge fallback rules.
    pub fallback_slots: usize,
    /// Slots overwritten by wall reflection.
    pub wall_slots: usize,
    /// Whether the source was active this step.
    pub source_active: bool,
}

impl BoundaryStats {
    /// All rewritten slots, source excluded.
    pub fn total_slots(&self) -> usize {
        self.obstacle_slots + self.velocity_slots + self.fallback_slots + self.wall_slots
    }
}

/// Owns a compiled plan and the snapshot buffer it reads from.
#[derive(Debug)]
pub struct BoundaryEnforcer {
    plan: BoundaryPlan,
    pre: DistributionField,
}

impl BoundaryEnforcer {
    /// Wrap a compiled plan.
    pub fn new(plan: BoundaryPlan) -> Self {
        let pre = DistributionField::zeros(plan.shape(), plan.q());
        Self { plan, pre }
    }

    /// The plan being enforced.
    pub fn plan(&self) -> &BoundaryPlan {
        &self.plan
    }

    /// Copy every obstacle cell of `pre` into `post`.
    ///
    /// Run between collision and streaming: solid cells skip collision and
    /// keep the reversed populations the previous pass left them, so flux
    /// that entered a wall leaves it on the side it came from. Returns the
    /// number of slots copied.
    pub fn hold_obstacles(
        &self,
        pre: &DistributionField,
        post: &mut DistributionField,
    ) -> Result<usize, FieldError> {
        let plan = &self.plan;
        for f in [pre, &*post] {
            if f.shape() != plan.shape() || f.q() != plan.q() {
                return Err(FieldError::LayoutMismatch {
                    reason: format!(
                        "obstacle hold for {}x{}x{} given {}x{}x{}",
                        plan.shape().rows(),
                        plan.shape().cols(),
                        plan.q(),
                        f.shape().rows(),
                        f.shape().cols(),
                        f.q()
                    ),
                });
            }
        }
        for &cell in plan.obstacle_cells() {
            post.cell_mut(cell).copy_from_slice(pre.cell(cell));
        }
        Ok(plan.obstacle_cells().len() * plan.q())
    }

    /// Patch `field` in place for step `clock`.
    ///
    /// Obstacle, velocity and fallback rules read the field as it was on
    /// entry; wall and source rules read it as the earlier rules left it.
    /// Obstacle and bounce-back rules together only move populations
    /// around.
    pub fn apply(
        &mut self,
        lattice: &VelocitySet,
        field: &mut DistributionField,
        clock: StepId,
    ) -> Result<BoundaryStats, FieldError> {
        let plan = &self.plan;
        if field.shape() != plan.shape() || field.q() != plan.q() || lattice.q() != plan.q() {
            return Err(FieldError::LayoutMismatch {
                reason: format!(
                    "boundary plan for {}x{}x{} applied to {}x{}x{}",
                    plan.shape().rows(),
                    plan.shape().cols(),
                    plan.q(),
                    field.shape().rows(),
                    field.shape().cols(),
                    field.q()
                ),
            });
        }
        let q = plan.q();
        let mut stats = BoundaryStats::default();

        if !plan.obstacle_slots().is_empty()
            || !plan.velocity_edges().is_empty()
            || !plan.fallback().is_empty()
        {
            self.pre.copy_from(field)?;
        }
        let pre = &self.pre;

        for r in plan.obstacle_slots() {
            field.set(r.cell, r.dir, pre.get(r.from_cell, r.from_dir));
        }
        stats.obstacle_slots = plan.obstacle_slots().len();

        let mut arrived: CellBuf = smallvec::smallvec![0.0; q];
        for rule in plan.velocity_edges() {
            let mut returns = rule.returns.iter().peekable();
            for &(cell, u) in &rule.cells {
                arrived.copy_from_slice(pre.cell(cell));
                while let Some(r) = returns.next_if(|r| r.cell == cell) {
                    arrived[r.dir] = pre.get(r.from_cell, r.from_dir);
                }
                let rho: f64 = arrived.iter().sum();
                equilibrium_into(lattice, rho, u, field.cell_mut(cell));
            }
            stats.velocity_slots += rule.cells.len() * q;
        }

        for rules in plan.fallback().values() {
            for r in rules {
                field.set(r.cell, r.dir, pre.get(r.from_cell, r.from_dir));
            }
            stats.fallback_slots += rules.len();
        }

        let mut reflected: CellBuf = smallvec::smallvec![0.0; q];
        for pair in plan.wall_reflections() {
            for (i, v) in reflected.iter_mut().enumerate() {
                *v = field.get(pair.neighbour, lattice.opposite(i));
            }
            field.cell_mut(pair.cell).copy_from_slice(&reflected);
            stats.wall_slots += q;
        }

        if let Some(source) = plan.source() {
            if clock.0 < source.active_steps {
                let rho = source
                    .density
                    .unwrap_or_else(|| field.cell(source.cell).iter().sum());
                equilibrium_into(lattice, rho, source.velocity, field.cell_mut(source.cell));
                stats.source_active = true;
            }
        }

        trace!(
            "boundary step {clock}: {} slots rewritten, source active: {}",
            stats.total_slots(),
            stats.source_active
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::plan::PlanOptions;
    use crate::boundary::spec::{BoundarySpec, EdgePolicies, EdgePolicy, Side, SourceSpec, VelocityProfile, Wall};
    use crate::macroscopic::cell_moments;
    use crate::streaming::StreamingRule;
    use flux_lattice::{d2q4, LatticeScheme};
    use flux_test_utils::{assert_close, lattice, perturbed_field, rest_field, shape};

    fn enforcer(
        set: &VelocitySet,
        rows: usize,
        cols: usize,
        spec: &BoundarySpec,
        momentum: bool,
    ) -> BoundaryEnforcer {
        let plan = BoundaryPlan::compile(
            shape(rows, cols),
            set,
            spec,
            PlanOptions {
                streaming: StreamingRule::Periodic,
                momentum,
            },
        )
        .unwrap();
        BoundaryEnforcer::new(plan)
    }

    #[test]
    fn obstacle_reverses_in_place() {
        let set = lattice(LatticeScheme::D2Q4);
        let spec = BoundarySpec {
            obstacles: vec![(1, 1)],
            ..BoundarySpec::periodic()
        };
        let mut e = enforcer(&set, 3, 3, &spec, false);
        let s = shape(3, 3);
        let mut f = perturbed_field(s, &set, 1.0, 0.5, 4);
        let before = f.clone();
        let stats = e.apply(&set, &mut f, StepId(0)).unwrap();
        let c = s.index(1, 1);
        for i in 0..4 {
            assert_eq!(f.get(c, i), before.get(c, set.opposite(i)));
        }
        assert_eq!(stats.obstacle_slots, 4);
        assert_eq!(f.total(), before.total());
    }

    #[test]
    fn bounce_back_swaps_wrapped_slots() {
        let set = lattice(LatticeScheme::D2Q4);
        let s = shape(3, 4);
        let mut e = enforcer(&set, 3, 4, &BoundarySpec::closed(), false);
        let mut f = DistributionField::zeros(s, 4);
        // A population that left (1, 3) through the right edge arrives at
        // (1, 0) after periodic streaming.
        f.set(s.index(1, 0), d2q4::RIGHT, 0.7);
        e.apply(&set, &mut f, StepId(0)).unwrap();
        assert_eq!(f.get(s.index(1, 3), d2q4::LEFT), 0.7);
        assert_eq!(f.get(s.index(1, 0), d2q4::RIGHT), 0.0);
        assert_eq!(f.total(), 0.7);
    }

    #[test]
    fn closed_edges_conserve_mass() {
        let set = lattice(LatticeScheme::D2Q9);
        let s = shape(5, 7);
        let mut e = enforcer(&set, 5, 7, &BoundarySpec::closed(), true);
        let mut f = perturbed_field(s, &set, 1.0, 0.4, 21);
        let before = f.total();
        let stats = e.apply(&set, &mut f, StepId(0)).unwrap();
        assert!(stats.fallback_slots > 0);
        assert_close(f.total(), before, 1e-13);
    }

    #[test]
    fn velocity_edge_sets_local_equilibrium() {
        let set = lattice(LatticeScheme::D2Q9);
        let s = shape(4, 5);
        let spec = BoundarySpec {
            edges: EdgePolicies {
                top: EdgePolicy::Velocity(VelocityProfile::Constant([0.02, 0.0])),
                ..EdgePolicies::uniform(EdgePolicy::BounceBack)
            },
            ..BoundarySpec::default()
        };
        let mut e = enforcer(&set, 4, 5, &spec, true);
        let mut f = rest_field(s, &set, 1.2);
        e.apply(&set, &mut f, StepId(0)).unwrap();
        let (rho, u) = cell_moments(&set, f.cell(s.index(0, 2)));
        assert_close(rho, 1.2, 1e-12);
        assert!((u[0] - 0.02).abs() < 1e-12);
        assert!(u[1].abs() < 1e-12);
    }

    /// Stream periodically and enforce `steps` times.
    fn run(
        e: &mut BoundaryEnforcer,
        set: &VelocitySet,
        mut f: DistributionField,
        steps: u64,
    ) -> DistributionField {
        let mut streamed = DistributionField::zeros(f.shape(), f.q());
        for step in 0..steps {
            StreamingRule::Periodic
                .stream(set, e.plan().mask(), &f, &mut streamed)
                .unwrap();
            e.apply(set, &mut streamed, StepId(step)).unwrap();
            std::mem::swap(&mut f, &mut streamed);
        }
        f
    }

    fn sorted(f: &DistributionField) -> Vec<f64> {
        let mut v = f.values().to_vec();
        v.sort_by(f64::total_cmp);
        v
    }

    #[test]
    fn velocity_edge_density_ignores_opposite_edge() {
        let set = lattice(LatticeScheme::D2Q9);
        let s = shape(10, 6);
        let spec = BoundarySpec {
            edges: EdgePolicies {
                top: EdgePolicy::Velocity(VelocityProfile::Constant([0.0, 0.0])),
                ..EdgePolicies::uniform(EdgePolicy::BounceBack)
            },
            ..BoundarySpec::default()
        };
        let top_density = |bottom_rho: f64| {
            let mut f = rest_field(s, &set, 1.0);
            for c in 0..6 {
                equilibrium_into(&set, bottom_rho, [0.0, 0.0], f.cell_mut(s.index(9, c)));
            }
            let before = f.total();
            let mut e = enforcer(&set, 10, 6, &spec, true);
            let f = run(&mut e, &set, f, 1);
            assert_close(f.total(), before, 1e-12);
            (0..6)
                .map(|c| f.cell(s.index(0, c)).iter().sum::<f64>())
                .collect::<Vec<_>>()
        };
        let light = top_density(1.0);
        let heavy = top_density(3.0);
        assert_eq!(light, heavy);
        for rho in light {
            assert_close(rho, 1.0, 1e-12);
        }
    }

    #[test]
    fn obstacles_on_closed_edges_only_move_populations() {
        for scheme in [LatticeScheme::D2Q4, LatticeScheme::D2Q9] {
            let set = lattice(scheme);
            let s = shape(8, 8);
            let spec = BoundarySpec {
                obstacles: vec![(0, 3), (7, 0), (4, 7), (3, 3)],
                ..BoundarySpec::closed()
            };
            let mut e = enforcer(&set, 8, 8, &spec, false);
            let f = perturbed_field(s, &set, 1.0, 0.3, 13);
            let after = run(&mut e, &set, f.clone(), 50);
            assert_eq!(sorted(&after), sorted(&f));
        }
    }

    #[test]
    fn obstacle_on_edge_returns_what_it_sent_out() {
        let set = lattice(LatticeScheme::D2Q4);
        let s = shape(4, 4);
        let spec = BoundarySpec {
            obstacles: vec![(0, 1)],
            ..BoundarySpec::closed()
        };
        let mut e = enforcer(&set, 4, 4, &spec, false);
        let o = s.index(0, 1);
        // What the solid cell held leaves upward, wraps to the bottom row
        // and must come straight back.
        let mut f = DistributionField::zeros(s, 4);
        f.set(o, d2q4::UP, 0.6);
        let f = run(&mut e, &set, f, 1);
        assert_eq!(f.get(o, d2q4::UP), 0.6);
        assert_eq!(f.total(), 0.6);
    }

    #[test]
    fn interior_mirror_copies_first_interior_cell() {
        let set = lattice(LatticeScheme::D2Q4);
        let s = shape(4, 4);
        let spec = BoundarySpec {
            edges: EdgePolicies {
                left: EdgePolicy::InteriorMirror,
                right: EdgePolicy::InteriorMirror,
                ..EdgePolicies::uniform(EdgePolicy::BounceBack)
            },
            ..BoundarySpec::default()
        };
        let mut e = enforcer(&set, 4, 4, &spec, false);
        let mut f = perturbed_field(s, &set, 1.0, 0.4, 17);
        let pre = f.clone();
        let stats = e.apply(&set, &mut f, StepId(0)).unwrap();
        for r in 0..4 {
            assert_eq!(f.get(s.index(r, 0), d2q4::RIGHT), pre.get(s.index(r, 1), d2q4::LEFT));
            assert_eq!(f.get(s.index(r, 3), d2q4::LEFT), pre.get(s.index(r, 2), d2q4::RIGHT));
            // Outward slots are left alone.
            assert_eq!(f.get(s.index(r, 0), d2q4::LEFT), pre.get(s.index(r, 0), d2q4::LEFT));
        }
        assert_eq!(stats.fallback_slots, 4 * 4);
    }

    #[test]
    fn wall_wins_on_velocity_edge() {
        let set = lattice(LatticeScheme::D2Q9);
        let s = shape(8, 8);
        let spec = BoundarySpec {
            edges: EdgePolicies::uniform(EdgePolicy::Velocity(VelocityProfile::Constant([
                0.02, 0.0,
            ]))),
            walls: vec![Wall::column(3, 0..8).with_opening(3..5).reflecting(Side::After)],
            ..BoundarySpec::default()
        };
        let mut e = enforcer(&set, 8, 8, &spec, true);
        let mut f = perturbed_field(s, &set, 1.0, 0.2, 8);
        e.apply(&set, &mut f, StepId(0)).unwrap();
        let (w, n) = (s.index(0, 3), s.index(0, 4));
        for i in 0..9 {
            assert_eq!(f.get(w, i), f.get(n, set.opposite(i)));
        }
        // Opening cells are left to the flow.
        let open = s.index(3, 3);
        let (_, u) = cell_moments(&set, f.cell(open));
        assert!(u.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn source_is_transient() {
        let set = lattice(LatticeScheme::D2Q9);
        let s = shape(5, 5);
        let spec = BoundarySpec {
            source: Some(SourceSpec {
                row: 2,
                col: 2,
                velocity: [0.1, -0.05],
                active_steps: 2,
                density: Some(1.5),
            }),
            ..BoundarySpec::periodic()
        };
        let mut e = enforcer(&set, 5, 5, &spec, true);
        let c = s.index(2, 2);

        let mut f = perturbed_field(s, &set, 1.0, 0.1, 2);
        assert!(e.apply(&set, &mut f, StepId(1)).unwrap().source_active);
        let (rho, u) = cell_moments(&set, f.cell(c));
        assert_close(rho, 1.5, 1e-12);
        assert!((u[0] - 0.1).abs() < 1e-12 && (u[1] + 0.05).abs() < 1e-12);

        let mut g = perturbed_field(s, &set, 1.0, 0.1, 2);
        let before = g.clone();
        assert!(!e.apply(&set, &mut g, StepId(2)).unwrap().source_active);
        assert_eq!(g, before);
    }

    #[test]
    fn held_obstacles_skip_collision() {
        let set = lattice(LatticeScheme::D2Q4);
        let s = shape(3, 3);
        let spec = BoundarySpec {
            obstacles: vec![(0, 2)],
            ..BoundarySpec::periodic()
        };
        let e = enforcer(&set, 3, 3, &spec, false);
        let pre = perturbed_field(s, &set, 1.0, 0.3, 11);
        let mut post = DistributionField::zeros(s, 4);
        assert_eq!(e.hold_obstacles(&pre, &mut post).unwrap(), 4);
        assert_eq!(post.cell(s.index(0, 2)), pre.cell(s.index(0, 2)));
        assert_eq!(post.cell(s.index(1, 1)), &[0.0; 4]);

        let mut wrong = DistributionField::zeros(shape(3, 4), 4);
        assert!(e.hold_obstacles(&pre, &mut wrong).is_err());
    }

    #[test]
    fn rejects_foreign_field() {
        let set = lattice(LatticeScheme::D2Q4);
        let mut e = enforcer(&set, 3, 3, &BoundarySpec::closed(), false);
        let mut f = DistributionField::zeros(shape(4, 3), 4);
        assert!(e.apply(&set, &mut f, StepId(0)).is_err());
    }
}
