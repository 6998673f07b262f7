//! Flux quickstart: diffusion through a gap in a wall.
//!
//! Demonstrates:
//!   1. Building a configuration by hand
//!   2. Stepping a driver and reading per-step metrics
//!   3. Inspecting the macroscopic field
//!
//! Run with:
//!   RUST_LOG=info cargo run --example quickstart

use flux_engine::{Driver, InitialCondition, SimConfig, Variant};
use flux_kernels::{BoundarySpec, EdgePolicies, EdgePolicy, Wall};

// ─── Grid parameters ────────────────────────────────────────────

const ROWS: usize = 32;
const COLS: usize = 48;
const WALL: usize = 24;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut boundary = BoundarySpec {
        edges: EdgePolicies::uniform(EdgePolicy::BounceBack),
        ..BoundarySpec::default()
    };
    boundary
        .walls
        .push(Wall::column(WALL, 0..ROWS).with_opening(14..18));

    let config = SimConfig {
        tau: 1.0,
        initial: InitialCondition::ColumnSplit {
            column: WALL,
            left: 1.0,
            right: 0.0,
        },
        boundary,
        max_steps: 400,
        ..SimConfig::new(Variant::DiffusionRelaxation, ROWS, COLS)
    };

    let mut driver = Driver::new(config)?;
    let shape = driver.state().grid().shape();

    for _ in 0..4 {
        for _ in 0..99 {
            driver.step()?;
        }
        let result = driver.step()?;
        let density = &driver.state().macroscopic().density;
        let far_side: f64 = (0..ROWS)
            .flat_map(|r| (WALL + 1..COLS).map(move |c| (r, c)))
            .map(|(r, c)| density[shape.index(r, c)])
            .sum();
        println!(
            "step {:>4}: mass {:.6}, far side {:.4}, step took {}us",
            driver.state().clock(),
            result.metrics.total_mass,
            far_side,
            result.metrics.total_us,
        );
    }
    println!("final status: {:?}", driver.status());
    Ok(())
}
