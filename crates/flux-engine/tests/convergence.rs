//! Integration test: driver lifecycle.
//!
//! A run ends exactly once, either converged or out of steps, and every
//! later `step()` is refused with the terminal status.

use flux_engine::{
    ConvergenceConfig, Driver, FrameLog, InitialCondition, Observable, RunStatus, SimConfig,
    StepError, Variant, Verdict,
};

fn with_convergence(variant: Variant, threshold: f64, patience: u32, max_steps: u64) -> SimConfig {
    SimConfig {
        convergence: Some(ConvergenceConfig::new(threshold, patience)),
        max_steps,
        ..SimConfig::new(variant, 6, 6)
    }
}

#[test]
fn fluid_at_rest_converges_after_patience_steps() {
    let mut driver = Driver::new(with_convergence(Variant::FluidRelaxation, 1e-8, 3, 100)).unwrap();
    let mut log = FrameLog::new();
    let summary = driver.run(&mut log).unwrap();
    assert_eq!(summary.status, RunStatus::Converged { steps: 3 });
    assert_eq!(summary.steps, 3);
    assert_eq!(log.frames.len(), 3);
    assert_eq!(
        driver.step(),
        Err(StepError::Terminated {
            status: RunStatus::Converged { steps: 3 }
        })
    );
}

#[test]
fn diffusion_is_judged_on_velocity_by_default() {
    // A uniform field at rest has zero velocity from the first step.
    let mut driver =
        Driver::new(with_convergence(Variant::DiffusionRelaxation, 1e-8, 2, 100)).unwrap();
    let first = driver.step().unwrap();
    assert!(matches!(
        first.verdict,
        Some(Verdict::Settling { streak: 1, delta }) if delta == 0.0
    ));
    assert_eq!(
        driver.step().unwrap().status,
        RunStatus::Converged { steps: 2 }
    );
}

#[test]
fn density_observable_starts_from_an_empty_field() {
    // Opting into density: the first delta is the whole density, so a
    // uniform field needs one extra step.
    let mut config = with_convergence(Variant::DiffusionRelaxation, 1e-8, 2, 100);
    config.convergence = config
        .convergence
        .map(|c| c.observing(Observable::Density));
    let mut driver = Driver::new(config).unwrap();
    let first = driver.step().unwrap();
    assert!(matches!(
        first.verdict,
        Some(Verdict::Settling { streak: 0, delta }) if (delta - 1.0).abs() < 1e-12
    ));
    assert_eq!(driver.step().unwrap().status, RunStatus::Running);
    assert_eq!(
        driver.step().unwrap().status,
        RunStatus::Converged { steps: 3 }
    );
}

#[test]
fn unsettled_run_stops_at_max_steps() {
    let config = SimConfig {
        initial: InitialCondition::ColumnSplit {
            column: 3,
            left: 1.0,
            right: 0.0,
        },
        ..with_convergence(Variant::DiffusionRelaxation, 1e-14, 5, 8)
    };
    let mut driver = Driver::new(config).unwrap();
    let summary = driver.run(&mut FrameLog::new()).unwrap();
    assert_eq!(summary.status, RunStatus::MaxStepsReached { steps: 8 });
    assert!((summary.final_mass - summary.initial_mass).abs() < 1e-12);
    assert!(driver.last_metrics().convergence_delta.unwrap() >= 1e-14);
}

#[test]
fn run_without_monitor_uses_the_whole_budget() {
    let config = SimConfig {
        max_steps: 7,
        ..SimConfig::new(Variant::FluidRelaxation, 5, 5)
    };
    let mut driver = Driver::new(config).unwrap();
    let summary = driver.run(&mut FrameLog::new()).unwrap();
    assert_eq!(summary.status, RunStatus::MaxStepsReached { steps: 7 });
    assert!(driver.last_metrics().convergence_delta.is_none());
}
