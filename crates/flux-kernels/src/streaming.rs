//! Streaming: move every population one step along its direction.

use flux_core::{DistributionField, FieldError, GridShape, ObstacleMask};
use flux_lattice::VelocitySet;

/// How populations that would leave the grid are handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamingRule {
    /// Shift with wraparound on both axes. Closed edges are corrected
    /// afterwards by the boundary plan.
    Periodic,
    /// A population whose destination is off-grid or solid stays in its
    /// cell with its direction reversed.
    Reflective,
}

/// What a streaming pass did, for metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Non-zero populations turned back by reflective streaming.
    pub reflected: usize,
}

impl StreamingRule {
    /// Stream `src` into `dst`. `dst` is fully overwritten.
    ///
    /// `mask` is only read by [`StreamingRule::Reflective`]; periodic
    /// streaming leaves obstacles to the boundary plan.
    pub fn stream(
        self,
        lattice: &VelocitySet,
        mask: &ObstacleMask,
        src: &DistributionField,
        dst: &mut DistributionField,
    ) -> Result<StreamStats, FieldError> {
        let shape = src.shape();
        if dst.shape() != shape || mask.shape() != shape || src.q() != lattice.q() || dst.q() != lattice.q() {
            return Err(FieldError::LayoutMismatch {
                reason: format!(
                    "streaming on {} needs matching buffers and mask",
                    lattice.name()
                ),
            });
        }
        match self {
            Self::Periodic => {
                stream_periodic(lattice, shape, src, dst);
                Ok(StreamStats::default())
            }
            Self::Reflective => Ok(stream_reflective(lattice, shape, mask, src, dst)),
        }
    }
}

fn stream_periodic(
    lattice: &VelocitySet,
    shape: GridShape,
    src: &DistributionField,
    dst: &mut DistributionField,
) {
    for cell in 0..shape.cell_count() {
        let (r, c) = shape.coords(cell);
        for (i, dir, _) in lattice.iter() {
            dst.set(shape.wrapped(r, c, dir), i, src.get(cell, i));
        }
    }
}

fn stream_reflective(
    lattice: &VelocitySet,
    shape: GridShape,
    mask: &ObstacleMask,
    src: &DistributionField,
    dst: &mut DistributionField,
) -> StreamStats {
    dst.clear();
    let mut reflected = 0;
    for cell in 0..shape.cell_count() {
        let (r, c) = shape.coords(cell);
        for (i, dir, _) in lattice.iter() {
            let v = src.get(cell, i);
            if v == 0.0 {
                continue;
            }
            match shape.offset(r, c, dir) {
                Some(target) if !mask.is_solid(target) => {
                    let cur = dst.get(target, i);
                    dst.set(target, i, cur + v);
                }
                _ => {
                    let o = lattice.opposite(i);
                    let cur = dst.get(cell, o);
                    dst.set(cell, o, cur + v);
                    reflected += 1;
                }
            }
        }
    }
    StreamStats { reflected }
}

/// Every `(cell, direction)` slot that periodic streaming fills by
/// wrapping around the grid, in cell-major order.
///
/// These are exactly the slots whose upstream cell `cell - c_i` lies
/// off-grid.
pub fn wrapped_slots(shape: GridShape, lattice: &VelocitySet) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for cell in 0..shape.cell_count() {
        let (r, c) = shape.coords(cell);
        for (i, [cx, cy], _) in lattice.iter() {
            if shape.offset(r, c, [-cx, -cy]).is_none() {
                out.push((cell, i));
            }
        }
    }
    out
}
