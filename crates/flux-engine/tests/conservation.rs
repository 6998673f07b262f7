//! Integration test: mass and particle conservation through the driver.
//!
//! Closed or periodic domains without sources must keep their total mass,
//! whether obstacles sit inside or on the edges and whether an edge
//! drives the flow. The lattice gas must also keep every slot binary.

use flux_engine::{Driver, InitialCondition, ParticleSeed, Region, SimConfig, Variant};
use flux_kernels::{BoundarySpec, EdgePolicies, EdgePolicy, VelocityProfile, Wall};
use flux_lattice::LatticeScheme;
use proptest::prelude::*;

use flux_test_utils::{
    assert_close, assert_non_negative, lattice, occupied_slots, perturbed_field, shape,
};

fn run_and_check_mass(config: SimConfig, steps: u64, rel: f64) {
    let mut driver = Driver::new(config).unwrap();
    let initial = driver.state().total_mass();
    for _ in 0..steps {
        let result = driver.step().unwrap();
        assert_close(result.metrics.total_mass, initial, rel);
        assert_eq!(result.metrics.clamped, 0);
    }
    assert_non_negative(driver.state().grid().values());
}

#[test]
fn lattice_gas_keeps_every_particle() {
    let mut boundary = BoundarySpec::closed();
    boundary.walls.push(Wall::column(8, 0..20).with_opening(8..12));
    let config = SimConfig {
        initial: InitialCondition::Particles(ParticleSeed {
            count: 300,
            seed: 7,
            region: Region::new(0..20, 0..8),
            dense: None,
        }),
        boundary,
        max_steps: 100,
        ..SimConfig::new(Variant::LatticeGasBinary, 20, 20)
    };
    let mut driver = Driver::new(config).unwrap();
    assert_eq!(driver.state().total_mass(), 300.0);

    let mut exchanges = 0;
    for _ in 0..60 {
        let result = driver.step().unwrap();
        assert_eq!(result.metrics.total_mass, 300.0);
        exchanges += result.metrics.exchanges;
    }
    assert!(exchanges > 0, "a 300-particle gas should see head-on collisions");
    assert!(driver
        .state()
        .grid()
        .values()
        .iter()
        .all(|&v| v == 0.0 || v == 1.0));
    assert_eq!(occupied_slots(driver.state().grid()), 300);
}

#[test]
fn periodic_diffusion_with_walls_conserves_mass() {
    let s = shape(16, 16);
    let field = perturbed_field(s, &lattice(LatticeScheme::D2Q4), 1.0, 0.3, 3);
    let mut boundary = BoundarySpec::periodic();
    boundary.walls.push(Wall::column(8, 4..12).with_opening(7..9));
    boundary.obstacles.push((2, 2));
    let config = SimConfig {
        tau: 0.9,
        initial: InitialCondition::Distribution(field.values().to_vec()),
        boundary,
        ..SimConfig::new(Variant::DiffusionRelaxation, 16, 16)
    };
    run_and_check_mass(config, 100, 1e-12);
}

#[test]
fn closed_fluid_box_conserves_mass() {
    let s = shape(12, 14);
    let field = perturbed_field(s, &lattice(LatticeScheme::D2Q9), 1.0, 0.05, 9);
    let mut boundary = BoundarySpec::closed();
    boundary.obstacles.extend([(5, 5), (5, 6), (6, 5), (6, 6)]);
    let config = SimConfig {
        tau: 0.8,
        initial: InitialCondition::Distribution(field.values().to_vec()),
        boundary,
        ..SimConfig::new(Variant::FluidRelaxation, 12, 14)
    };
    run_and_check_mass(config, 100, 1e-12);
}

#[test]
fn uniform_diffusion_is_unchanged_after_one_step() {
    let mut driver = Driver::new(SimConfig::new(Variant::DiffusionRelaxation, 4, 4)).unwrap();
    driver.step().unwrap();
    for &v in driver.state().grid().values() {
        assert_close(v, 0.25, 1e-15);
    }
}

#[test]
fn obstacle_on_closed_edge_conserves_mass() {
    let s = shape(8, 8);
    let field = perturbed_field(s, &lattice(LatticeScheme::D2Q4), 1.0, 0.3, 4);
    let mut boundary = BoundarySpec::closed();
    boundary.obstacles.extend([(0, 3), (7, 7)]);
    let config = SimConfig {
        initial: InitialCondition::Distribution(field.values().to_vec()),
        boundary,
        ..SimConfig::new(Variant::DiffusionRelaxation, 8, 8)
    };
    run_and_check_mass(config, 50, 1e-12);
}

#[test]
fn lid_driven_box_conserves_mass() {
    let s = shape(12, 12);
    let field = perturbed_field(s, &lattice(LatticeScheme::D2Q9), 1.0, 0.05, 6);
    let boundary = BoundarySpec {
        edges: EdgePolicies {
            top: EdgePolicy::Velocity(VelocityProfile::Constant([0.05, 0.0])),
            ..EdgePolicies::uniform(EdgePolicy::BounceBack)
        },
        ..BoundarySpec::default()
    };
    let config = SimConfig {
        tau: 0.8,
        initial: InitialCondition::Distribution(field.values().to_vec()),
        boundary,
        ..SimConfig::new(Variant::FluidRelaxation, 12, 12)
    };
    run_and_check_mass(config, 60, 1e-10);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn closed_box_with_random_obstacles_conserves_mass(
        obstacles in proptest::collection::vec((0usize..10, 0usize..10), 0..12),
        seed in 0u64..1000,
        fluid in any::<bool>(),
    ) {
        let variant = if fluid {
            Variant::FluidRelaxation
        } else {
            Variant::DiffusionRelaxation
        };
        let s = shape(10, 10);
        let field = perturbed_field(s, &lattice(variant.scheme()), 1.0, 0.2, seed);
        let config = SimConfig {
            initial: InitialCondition::Distribution(field.values().to_vec()),
            boundary: BoundarySpec {
                obstacles,
                ..BoundarySpec::closed()
            },
            ..SimConfig::new(variant, 10, 10)
        };
        let mut driver = Driver::new(config).unwrap();
        let initial = driver.state().total_mass();
        for _ in 0..20 {
            driver.step().unwrap();
        }
        let drift = (driver.state().total_mass() - initial).abs();
        prop_assert!(drift < 1e-10 * initial, "mass drifted by {drift}");
    }
}
