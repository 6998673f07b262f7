//! Steady-state detection.

use flux_core::{GridShape, MacroscopicField};

/// The field a convergence monitor compares step to step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Observable {
    /// Per-cell density.
    Density,
    /// Both velocity components.
    #[default]
    Velocity,
}

/// When to call a run converged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceConfig {
    /// Largest per-cell change that still counts as settled.
    pub threshold: f64,
    /// Consecutive settled steps required.
    pub patience: u32,
    /// What is compared. Velocity unless opted out.
    pub observable: Observable,
}

impl ConvergenceConfig {
    /// Compare velocity, stopping after `patience` steps with every change
    /// below `threshold`.
    pub fn new(threshold: f64, patience: u32) -> Self {
        Self {
            threshold,
            patience,
            observable: Observable::Velocity,
        }
    }

    /// Compare `observable` instead.
    pub fn observing(mut self, observable: Observable) -> Self {
        self.observable = observable;
        self
    }

    /// Whether `threshold` is positive and finite and `patience` at least one.
    pub fn is_valid(&self) -> bool {
        self.threshold.is_finite() && self.threshold > 0.0 && self.patience >= 1
    }
}

/// Outcome of one observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    /// Still changing, or not settled for long enough.
    Settling {
        /// Consecutive settled steps so far.
        streak: u32,
        /// Largest change this step.
        delta: f64,
    },
    /// Settled for `patience` consecutive steps.
    Converged {
        /// Largest change this step.
        delta: f64,
    },
}

impl Verdict {
    /// Largest change this step.
    pub fn delta(&self) -> f64 {
        match *self {
            Self::Settling { delta, .. } | Self::Converged { delta } => delta,
        }
    }

    /// Whether this is [`Verdict::Converged`].
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Tracks the largest step-to-step change and a streak of quiet steps.
///
/// The first observation is compared against an all-zero field.
///
/// # Examples
///
/// ```
/// use flux_core::{GridShape, MacroscopicField};
/// use flux_engine::{ConvergenceConfig, ConvergenceMonitor, Observable, Verdict};
///
/// let shape = GridShape::new(2, 2).unwrap();
/// let cfg = ConvergenceConfig::new(1e-3, 2);
/// assert_eq!(cfg.observable);
/// let mut monitor = ConvergenceMonitor::new(cfg, shape);
/// let still = MacroscopicField::zeros(shape);
/// assert!(matches!(monitor.observe(&still), Verdict::Settling { streak: 1, .. }));
/// assert!(monitor.observe(&still).is_converged());
/// ```
#[derive(Clone, Debug)]
pub struct ConvergenceMonitor {
    config: ConvergenceConfig,
    previous: MacroscopicField,
    streak: u32,
}

impl ConvergenceMonitor {
    /// A monitor with no history.
    pub fn new(config: ConvergenceConfig, shape: GridShape) -> Self {
        Self {
            config,
            previous: MacroscopicField::zeros(shape),
            streak: 0,
        }
    }

    /// The configuration.
    pub fn config(&self) -> ConvergenceConfig {
        self.config
    }

    /// Current streak of settled steps.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Compare `current` with the previous observation and remember it.
    pub fn observe(&mut self, current: &MacroscopicField) -> Verdict {
        let delta = match self.config.observable {
            Observable::Density => current.max_density_delta(&self.previous),
            Observable::Velocity => current.max_velocity_delta(&self.previous),
        };
        self.previous.clone_from(current);

        if delta < self.config.threshold {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        if self.streak >= self.config.patience {
            Verdict::Converged { delta }
        } else {
            Verdict::Settling {
                streak: self.streak,
                delta,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> GridShape {
        GridShape::new(1, 2).unwrap()
    }

    fn with_ux(v: f64) -> MacroscopicField {
        let mut m = MacroscopicField::zeros(shape());
        m.velocity[1][0] = v;
        m
    }

    #[test]
    fn first_sample_compares_against_zero() {
        let cfg = ConvergenceConfig::new(0.01, 1);
        let mut mon = ConvergenceMonitor::new(cfg, shape());
        let v = mon.observe(&with_ux(0.5));
        assert_eq!(
            v,
            Verdict::Settling {
                streak: 0,
                delta: 0.5
            }
        );
    }

    #[test]
    fn streak_resets_on_a_jump() {
        let cfg = ConvergenceConfig::new(0.01, 3);
        let mut mon = ConvergenceMonitor::new(cfg, shape());
        let quiet = with_ux(0.0);
        mon.observe(&quiet);
        mon.observe(&quiet);
        assert_eq!(mon.streak(), 2);
        mon.observe(&with_ux(0.2));
        assert_eq!(mon.streak(), 0);
        mon.observe(&with_ux(0.2));
        mon.observe(&with_ux(0.2));
        let v = mon.observe(&with_ux(0.2));
        assert!(v.is_converged());
    }

    #[test]
    fn density_observable_ignores_velocity() {
        let cfg = ConvergenceConfig::new(0.01, 1).observing(Observable::Density);
        let mut mon = ConvergenceMonitor::new(cfg, shape());
        assert!(mon.observe(&with_ux(0.9)).is_converged());
    }

    #[test]
    fn threshold_is_strict() {
        let cfg = ConvergenceConfig::new(0.5, 1);
        let mut mon = ConvergenceMonitor::new(cfg, shape());
        assert!(!mon.observe(&with_ux(0.5)).is_converged());
    }

    #[test]
    fn validity() {
        assert!(!ConvergenceConfig::new(0.0, 1).is_valid());
        assert!(!ConvergenceConfig::new(1e-4, 0).is_valid());
        assert!(ConvergenceConfig::new(1e-4, 1)
            .observing(Observable::Density)
            .is_valid());
    }
}
