//! Channel flow past a perforated wall, rendered on a separate thread.
//!
//! Runs the fluid channel preset with a bounded frame channel. The
//! consumer thread prints a coarse speed profile through the opening
//! every 200 steps; frames that arrive while the channel is full are
//! dropped rather than stalling the simulation.
//!
//! Run with:
//!   RUST_LOG=info cargo run --release --example channel_flow

use std::thread;

use flux_engine::{presets, ChannelRenderer, Driver, Every, Frame, SimConfig};

const MAX_STEPS: u64 = 2_000;
const WALL: usize = 30;

fn profile(frame: &Frame) -> String {
    let speed = frame.speed();
    (40..70)
        .step_by(3)
        .map(|r| format!("{:.4}", speed[frame.shape.index(r, WALL + 1)]))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimConfig {
        max_steps: MAX_STEPS,
        ..presets::fluid_channel()
    };
    let mut driver = Driver::new(config)?;

    let (renderer, frames) = ChannelRenderer::bounded(4);
    let consumer = thread::spawn(move || {
        let mut seen = 0u64;
        for frame in frames {
            seen += 1;
            println!("step {:>5} | {}", frame.step, profile(&frame));
        }
        seen
    });

    let mut renderer = Every::new(200, renderer);
    let summary = driver.run(&mut renderer)?;
    let renderer = renderer.into_inner();
    let dropped = renderer.dropped();
    drop(renderer);

    let seen = consumer.join().map_err(|_| "render thread panicked")?;
    println!(
        "{:?} after {} steps in {}ms; mass {:.4} -> {:.4}; {} frames shown, {} dropped",
        summary.status,
        summary.steps,
        summary.elapsed_us / 1000,
        summary.initial_mass,
        summary.final_mass,
        seen,
        dropped,
    );
    Ok(())
}
