//! Per-step performance and health metrics.

use flux_kernels::BoundaryStats;

/// Timing and bookkeeping for a single step.
///
/// All durations are in microseconds. The driver fills these after each
/// [`step()`](crate::Driver::step); the latest value is kept on the driver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the whole step.
    pub total_us: u64,
    /// Per-stage execution times: `(stage, microseconds)`, in pipeline order.
    pub stage_us: Vec<(&'static str, u64)>,
    /// Sum of every population after the step.
    pub total_mass: f64,
    /// Values clamped at zero by the collision.
    pub clamped: usize,
    /// Cells rotated by the binary exchange rule.
    pub exchanges: usize,
    /// Populations turned back by reflective streaming.
    pub reflected: usize,
    /// Slots rewritten by the boundary enforcer.
    pub boundary: BoundaryStats,
    /// Largest change seen by the convergence monitor, if one is running.
    pub convergence_delta: Option<f64>,
}

impl StepMetrics {
    /// Time spent in `stage`, if it ran.
    pub fn stage(&self, stage: &str) -> Option<u64> {
        self.stage_us
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|&(_, us)| us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert!(m.stage_us.is_empty());
        assert_eq!(m.total_mass, 0.0);
        assert_eq!(m.clamped, 0);
        assert_eq!(m.boundary.total_slots(), 0);
        assert!(m.convergence_delta.is_none());
    }

    #[test]
    fn stage_lookup() {
        let m = StepMetrics {
            stage_us: vec![("collision", 12), ("streaming", 4)],
            ..StepMetrics::default()
        };
        assert_eq!(m.stage("streaming"), Some(4));
        assert_eq!(m.stage("boundary"), None);
    }
}
