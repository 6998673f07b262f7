//! Compilation of a [`BoundarySpec`] into explicit slot rules.

use indexmap::IndexMap;
use log::{debug, warn};

use flux_core::{GridShape, ObstacleMask};
use flux_lattice::{Edge, VelocitySet};

use super::spec::{BoundarySpec, EdgePolicy, VelocityProfile};
use crate::equilibrium::equilibrium;
use crate::error::BoundaryError;
use crate::streaming::{wrapped_slots, StreamingRule};

/// What the variant running the plan can support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanOptions {
    /// How the variant streams.
    pub streaming: StreamingRule,
    /// Whether the variant carries velocity. Prescribed edge velocities,
    /// wall reflection and the source all need it.
    pub momentum: bool,
}

/// Restore slot `(cell, dir)` from the pre-boundary value at
/// `(from_cell, from_dir)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRule {
    /// Cell to write.
    pub cell: usize,
    /// Direction to write.
    pub dir: usize,
    /// Cell to read.
    pub from_cell: usize,
    /// Direction to read.
    pub from_dir: usize,
}

/// Equilibrium reset of every cell on one edge.
///
/// The density of each cell is taken after bouncing back whatever it
/// lost through a closed edge, so the reset neither sees nor keeps
/// populations that wrapped in from the opposite side.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityEdgeRule {
    /// The edge.
    pub edge: Edge,
    /// `(cell, velocity)` along the edge, in edge order.
    pub cells: Vec<(usize, [f64; 2])>,
    /// Wrapped slots of those cells and the bounce-back slot each is read
    /// from when summing density, grouped by cell in `cells` order.
    pub returns: Vec<SlotRule>,
}

/// Wall cell that takes the reversed populations of its neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallReflection {
    /// The solid wall cell.
    pub cell: usize,
    /// The neighbour read from.
    pub neighbour: usize,
}

/// The compiled transient source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRule {
    /// Source cell.
    pub cell: usize,
    /// Imposed velocity.
    pub velocity: [f64; 2],
    /// Active on steps `0..active_steps`.
    pub active_steps: u64,
    /// Imposed density, or the local density when `None`.
    pub density: Option<f64>,
}

impl SourceRule {
    /// Whether the imposed equilibrium holds a negative population.
    ///
    /// The sign does not depend on density, so a unit density stands in
    /// when the source takes the local one.
    pub fn has_negative_equilibrium(&self, lattice: &VelocitySet) -> bool {
        equilibrium(lattice, self.density.unwrap_or(1.0), self.velocity)
            .iter()
            .any(|&f| f < 0.0)
    }
}

/// A validated, exhaustive list of boundary rewrites.
///
/// Built by [`BoundaryPlan::compile`]. Fallback rules are grouped by
/// `(edge, direction)` in the order the enforcer applies them.
#[derive(Clone, Debug)]
pub struct BoundaryPlan {
    shape: GridShape,
    q: usize,
    streaming: StreamingRule,
    crossing: [bool; 4],
    mask: ObstacleMask,
    obstacle_cells: Vec<usize>,
    obstacle_slots: Vec<SlotRule>,
    velocity_edges: Vec<VelocityEdgeRule>,
    fallback: IndexMap<(Edge, usize), Vec<SlotRule>>,
    wall_reflections: Vec<WallReflection>,
    source: Option<SourceRule>,
}

impl BoundaryPlan {
    /// Validate `spec` against the grid and variant and build the rules.
    ///
    /// # Errors
    ///
    /// Any [`BoundaryError`]: geometry outside the grid, unpaired periodic
    /// edges, momentum rules on a density-only variant, open edges under
    /// reflective streaming, or wrapped slots left uncovered.
    pub fn compile(
        shape: GridShape,
        lattice: &VelocitySet,
        spec: &BoundarySpec,
        options: PlanOptions,
    ) -> Result<Self, BoundaryError> {
        check_edges(shape, spec, options)?;

        // ── Obstacles and walls ────────────────────────────────────
        let mut mask = ObstacleMask::empty(shape);
        let mut wall_reflections = Vec::new();
        for (w, wall) in spec.walls.iter().enumerate() {
            if !wall.line_in_bounds(shape) {
                return Err(BoundaryError::WallLineOutOfBounds {
                    wall: w,
                    line: wall.line,
                    rows: shape.rows(),
                    cols: shape.cols(),
                });
            }
            let len = wall.line_len(shape);
            if wall.span.start >= wall.span.end || wall.span.end > len {
                return Err(BoundaryError::InvalidWallSpan {
                    wall: w,
                    start: wall.span.start,
                    end: wall.span.end,
                    len,
                });
            }
            if let Some(o) = &wall.opening {
                if o.start > o.end || o.start < wall.span.start || o.end > wall.span.end {
                    return Err(BoundaryError::OpeningOutsideSpan {
                        wall: w,
                        start: o.start,
                        end: o.end,
                    });
                }
            }
            for (r, c) in wall.solid_cells() {
                mask.set_solid(r, c)?;
            }
            if let Some(side) = wall.reflect {
                if !options.momentum {
                    return Err(BoundaryError::RequiresMomentum {
                        what: "wall reflection",
                    });
                }
                let step = wall.side_step(side);
                for (r, c) in wall.solid_cells() {
                    let neighbour = shape
                        .offset(r, c, step)
                        .ok_or(BoundaryError::ReflectOffGrid { wall: w, side })?;
                    wall_reflections.push(WallReflection {
                        cell: shape.index(r, c),
                        neighbour,
                    });
                }
            }
        }
        for &(r, c) in &spec.obstacles {
            mask.set_solid(r, c)?;
        }
        let obstacle_cells: Vec<usize> = mask.solid_cells().collect();

        // Edges whose wrapped populations must be sent back. Reflective
        // streaming never wraps.
        let crossing = match options.streaming {
            StreamingRule::Periodic => Edge::ALL.map(|e| spec.edges.get(e).is_closed()),
            StreamingRule::Reflective => [false; 4],
        };

        // Solid cells reverse what arrived, reading the bounce-back slot
        // in place of anything that wrapped across a closed edge.
        let mut obstacle_slots = Vec::with_capacity(obstacle_cells.len() * lattice.q());
        for &cell in &obstacle_cells {
            for k in 0..lattice.q() {
                let (from_cell, from_dir) =
                    arrival(shape, lattice, crossing, cell, lattice.opposite(k));
                obstacle_slots.push(SlotRule {
                    cell,
                    dir: k,
                    from_cell,
                    from_dir,
                });
            }
        }

        // ── Prescribed edge velocities ─────────────────────────────
        let mut on_velocity_edge = vec![false; shape.cell_count()];
        let mut velocity_edges = Vec::new();
        for edge in Edge::ALL {
            if let EdgePolicy::Velocity(profile) = spec.edges.get(edge) {
                let len = edge.len(shape);
                let mut cells = Vec::with_capacity(len);
                let mut returns = Vec::new();
                for k in 0..len {
                    let (r, c) = edge.cell(shape, k);
                    let cell = shape.index(r, c);
                    on_velocity_edge[cell] = true;
                    cells.push((cell, profile.at(k, len)));
                    for i in 0..lattice.q() {
                        let (from_cell, from_dir) = arrival(shape, lattice, crossing, cell, i);
                        if (from_cell, from_dir) != (cell, i) {
                            returns.push(SlotRule {
                                cell,
                                dir: i,
                                from_cell,
                                from_dir,
                            });
                        }
                    }
                }
                velocity_edges.push(VelocityEdgeRule {
                    edge,
                    cells,
                    returns,
                });
            }
        }

        // ── Edge fallback ──────────────────────────────────────────
        let mut fallback: IndexMap<(Edge, usize), Vec<SlotRule>> = IndexMap::new();
        if options.streaming == StreamingRule::Periodic {
            for edge in Edge::ALL {
                let policy = spec.edges.get(edge);
                if matches!(policy, EdgePolicy::Periodic | EdgePolicy::Velocity(_)) {
                    continue;
                }
                for (cell, i) in wrapped_slots(shape, lattice) {
                    if on_velocity_edge[cell] || mask.is_solid(cell) {
                        continue;
                    }
                    let (r, c) = shape.coords(cell);
                    let [cx, cy] = lattice.direction(i);
                    if !edge.contains(shape, r, c) || !edge.is_inward([cx, cy]) {
                        continue;
                    }
                    let from_cell = match policy {
                        EdgePolicy::InteriorMirror => shape
                            .offset(r, c, edge.inward_normal())
                            .ok_or(BoundaryError::GridTooSmall { edge })?,
                        _ => shape.wrapped(r, c, [-cx, -cy]),
                    };
                    fallback.entry((edge, i)).or_default().push(SlotRule {
                        cell,
                        dir: i,
                        from_cell,
                        from_dir: lattice.opposite(i),
                    });
                }
            }
        }

        // ── Source ─────────────────────────────────────────────────
        let source = match spec.source {
            Some(s) => {
                if !options.momentum {
                    return Err(BoundaryError::RequiresMomentum { what: "source" });
                }
                let cell = shape.checked_index(s.row, s.col)?;
                if !s.velocity.iter().all(|v| v.is_finite()) {
                    return Err(BoundaryError::InvalidVelocity {
                        what: "source",
                        velocity: s.velocity,
                    });
                }
                if let Some(d) = s.density {
                    if !d.is_finite() || d <= 0.0 {
                        return Err(BoundaryError::InvalidSourceDensity { value: d });
                    }
                }
                let rule = SourceRule {
                    cell,
                    velocity: s.velocity,
                    active_steps: s.active_steps,
                    density: s.density,
                };
                if rule.has_negative_equilibrium(lattice) {
                    warn!(
                        "source velocity {:?} drives some populations negative while active",
                        rule.velocity
                    );
                }
                Some(rule)
            }
            None => None,
        };

        let plan = Self {
            shape,
            q: lattice.q(),
            streaming: options.streaming,
            crossing,
            mask,
            obstacle_cells,
            obstacle_slots,
            velocity_edges,
            fallback,
            wall_reflections,
            source,
        };

        let uncovered = plan.uncovered_slots(lattice);
        if let Some(&(cell, dir)) = uncovered.first() {
            return Err(BoundaryError::UncoveredSlots {
                count: uncovered.len(),
                cell,
                dir,
            });
        }

        debug!(
            "boundary plan: {} obstacle cells, {} velocity edges, {} fallback slots, {} wall reflections, source: {}",
            plan.obstacle_cells.len(),
            plan.velocity_edges.len(),
            plan.fallback_slot_count(),
            plan.wall_reflections.len(),
            plan.source.is_some(),
        );
        Ok(plan)
    }

    /// Wrapped slots on a closed edge that no rule rewrites.
    ///
    /// Empty for every plan [`compile`](Self::compile) returns.
    pub fn uncovered_slots(&self, lattice: &VelocitySet) -> Vec<(usize, usize)> {
        if self.streaming == StreamingRule::Reflective {
            return Vec::new();
        }
        let mut covered = vec![false; self.shape.cell_count() * self.q];
        for rule in &self.obstacle_slots {
            covered[rule.cell * self.q + rule.dir] = true;
        }
        for rule in &self.velocity_edges {
            for &(cell, _) in &rule.cells {
                covered[cell * self.q..(cell + 1) * self.q].fill(true);
            }
        }
        for rule in self.fallback.values().flatten() {
            covered[rule.cell * self.q + rule.dir] = true;
        }
        wrapped_slots(self.shape, lattice)
            .into_iter()
            .filter(|&(cell, i)| {
                crosses_closed(self.shape, self.crossing, lattice.direction(i), cell)
                    && !covered[cell * self.q + i]
            })
            .collect()
    }

    /// Grid shape.
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Directions per cell.
    pub fn q(&self) -> usize {
        self.q
    }

    /// Solid cells from walls and explicit obstacles.
    pub fn mask(&self) -> &ObstacleMask {
        &self.mask
    }

    /// Flat indices of solid cells.
    pub fn obstacle_cells(&self) -> &[usize] {
        &self.obstacle_cells
    }

    /// Obstacle reversal rules, `q` per solid cell.
    pub fn obstacle_slots(&self) -> &[SlotRule] {
        &self.obstacle_slots
    }

    /// Velocity edge rules in enforcement order.
    pub fn velocity_edges(&self) -> &[VelocityEdgeRule] {
        &self.velocity_edges
    }

    /// Fallback rules keyed by `(edge, direction)`.
    pub fn fallback(&self) -> &IndexMap<(Edge, usize), Vec<SlotRule>> {
        &self.fallback
    }

    /// Total number of fallback slot rewrites.
    pub fn fallback_slot_count(&self) -> usize {
        self.fallback.values().map(Vec::len).sum()
    }

    /// Wall reflection pairs.
    pub fn wall_reflections(&self) -> &[WallReflection] {
        &self.wall_reflections
    }

    /// The source, if any.
    pub fn source(&self) -> Option<&SourceRule> {
        self.source.as_ref()
    }
}

/// Whether `cell` holds, along `dir`, a population that wrapped across
/// one of the `crossing` edges.
fn crosses_closed(shape: GridShape, crossing: [bool; 4], dir: [i32; 2], cell: usize) -> bool {
    let (r, c) = shape.coords(cell);
    Edge::ALL
        .iter()
        .zip(crossing)
        .any(|(e, on)| on && e.contains(shape, r, c) && e.is_inward(dir))
}

/// The slot holding what really arrived at `cell` along `i` after
/// periodic streaming.
///
/// In place, unless it wrapped across a closed edge: then the population
/// `cell` itself lost through that edge, which lands on the partner slot
/// `(cell - c_i, opp(i))`.
fn arrival(
    shape: GridShape,
    lattice: &VelocitySet,
    crossing: [bool; 4],
    cell: usize,
    i: usize,
) -> (usize, usize) {
    let [cx, cy] = lattice.direction(i);
    if crosses_closed(shape, crossing, [cx, cy], cell) {
        let (r, c) = shape.coords(cell);
        (shape.wrapped(r, c, [-cx, -cy]), lattice.opposite(i))
    } else {
        (cell, i)
    }
}

fn check_edges(
    shape: GridShape,
    spec: &BoundarySpec,
    options: PlanOptions,
) -> Result<(), BoundaryError> {
    for edge in [Edge::Top, Edge::Left] {
        let opposite = edge.opposite();
        match (
            spec.edges.get(edge).is_closed(),
            spec.edges.get(opposite).is_closed(),
        ) {
            (false, true) => return Err(BoundaryError::UnpairedPeriodic { edge, opposite }),
            (true, false) => {
                return Err(BoundaryError::UnpairedPeriodic {
                    edge: opposite,
                    opposite: edge,
                })
            }
            _ => {}
        }
    }

    for edge in Edge::ALL {
        let policy = spec.edges.get(edge);
        if options.streaming == StreamingRule::Reflective && *policy != EdgePolicy::BounceBack {
            return Err(BoundaryError::OpenEdgeWithReflectiveStreaming { edge });
        }
        match policy {
            EdgePolicy::Velocity(profile) => {
                if !options.momentum {
                    return Err(BoundaryError::RequiresMomentum {
                        what: "prescribed edge velocity",
                    });
                }
                if !profile.is_finite() {
                    return Err(BoundaryError::InvalidVelocity {
                        what: "edge",
                        velocity: representative(profile),
                    });
                }
            }
            EdgePolicy::InteriorMirror => {
                let across = match edge {
                    Edge::Top | Edge::Bottom => shape.rows(),
                    Edge::Left | Edge::Right => shape.cols(),
                };
                if across < 2 {
                    return Err(BoundaryError::GridTooSmall { edge });
                }
            }
            EdgePolicy::Periodic | EdgePolicy::BounceBack => {}
        }
    }
    Ok(())
}

/// The offending endpoint of a non-finite profile.
fn representative(profile: &VelocityProfile) -> [f64; 2] {
    match *profile {
        VelocityProfile::Constant(u) => u,
        VelocityProfile::Ramp { start, end } => {
            if start.iter().all(|v| v.is_finite()) {
                end
            } else {
                start
            }
        }
    }
}
