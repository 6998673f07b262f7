//! Integration test: the transient source.
//!
//! While active the source cell carries exactly the prescribed velocity;
//! afterwards it is left to the flow.

use flux_engine::{presets, Driver, SimConfig, Variant};
use flux_kernels::{BoundarySpec, SourceSpec};
use flux_test_utils::assert_close;

#[test]
fn source_cell_holds_its_velocity_while_active() {
    let config = SimConfig {
        boundary: BoundarySpec {
            source: Some(SourceSpec {
                row: 5,
                col: 4,
                velocity: [0.05, -0.02],
                active_steps: 3,
                density: Some(1.2),
            }),
            ..BoundarySpec::periodic()
        },
        max_steps: 10,
        ..SimConfig::new(Variant::FluidRelaxation, 10, 10)
    };
    let mut driver = Driver::new(config).unwrap();
    let cell = driver.state().grid().shape().index(5, 4);

    for step in 0..3 {
        let result = driver.step().unwrap();
        assert!(result.metrics.boundary.source_active, "step {step}");
        let macroscopic = driver.state().macroscopic();
        assert_close(macroscopic.density[cell], 1.2, 1e-12);
        assert!((macroscopic.velocity[cell][0] - 0.05).abs() < 1e-12);
        assert!((macroscopic.velocity[cell][1] + 0.02).abs() < 1e-12);
    }
    let result = driver.step().unwrap();
    assert!(!result.metrics.boundary.source_active);
    assert!((driver.state().macroscopic().velocity[cell][0] - 0.05).abs() > 1e-6);
}

#[test]
fn channel_preset_jet_runs_for_ten_steps() {
    let config = SimConfig {
        max_steps: 12,
        ..presets::fluid_channel()
    };
    let mut driver = Driver::new(config).unwrap();
    let cell = driver.state().grid().shape().index(52, 12);

    let mut active = Vec::new();
    while !driver.status().is_terminal() {
        let result = driver.step().unwrap();
        active.push(result.metrics.boundary.source_active);
        if result.metrics.boundary.source_active {
            let u = driver.state().macroscopic().velocity[cell];
            assert!((u[0] - 0.5).abs() < 1e-9 && (u[1] - 0.5).abs() < 1e-9);
        }
    }
    let mut expected = vec![true; 10];
    expected.extend([false, false]);
    assert_eq!(active, expected);
    assert!(driver.state().grid().values().iter().all(|v| v.is_finite()));
}
