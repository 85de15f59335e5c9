//! Headless simulation run

use crate::commands::presets;
use crate::config::SimulationConfig;
use anyhow::{Context, Result};
use pyre_core::{FrameClock, Vec2};
use pyre_particles::ParticleSystem;

pub struct RunArgs {
    pub config: Option<String>,
    pub preset: Option<String>,
    pub frames: Option<u32>,
    pub dt: Option<f32>,
    pub seed: Option<u64>,
    pub burst: Option<usize>,
    pub dump_vertices: bool,
}

/// What a finished run looked like
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub simulated_time: f64,
    pub alive: usize,
    pub capacity: usize,
    pub peak_alive: usize,
    pub vertex_count: usize,
    /// Min and max vertex position of the last frame
    pub bounds: Option<(Vec2, Vec2)>,
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path))?,
        (None, Some(name)) => presets::load(name).context("Failed to load preset")?,
        (None, None) => anyhow::bail!("either a config path or --preset is required"),
    };

    if let Some(frames) = args.frames {
        config.run.frames = frames;
    }
    if let Some(dt) = args.dt {
        config.run.dt = dt;
    }
    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
    }
    if let Some(burst) = args.burst {
        config.run.burst = burst;
    }
    config.validate().context("Invalid configuration")?;

    let mut system = config.build_system();
    let (spawners, generators, updaters) = system.stage_counts();
    println!(
        "Simulating {} frames at dt={} ({} rendering, {} slots)",
        config.run.frames,
        config.run.dt,
        system.render_mode().name(),
        system.num_all_particles()
    );
    println!(
        "Pipeline: {} spawner(s), {} generator(s), {} updater(s)",
        spawners, generators, updaters
    );

    let summary = simulate(&mut system, &config);

    println!("Frames: {}", summary.frames);
    println!("Simulated time: {:.3}s", summary.simulated_time);
    println!("Alive: {} / {}", summary.alive, summary.capacity);
    println!("Peak alive: {}", summary.peak_alive);
    println!("Vertices: {}", summary.vertex_count);
    if let Some((min, max)) = summary.bounds {
        println!(
            "Bounds: ({:.1}, {:.1}) - ({:.1}, {:.1})",
            min.x, min.y, max.x, max.y
        );
    }

    if args.dump_vertices {
        for (i, v) in system.vertices().iter().enumerate() {
            println!(
                "{:>6}  pos=({:.2}, {:.2})  uv=({}, {})  rgba={:?}",
                i, v.position[0], v.position[1], v.tex_coords[0], v.tex_coords[1], v.color
            );
        }
    }

    Ok(())
}

/// Step `system` through the configured frames on a fixed clock
pub fn simulate(system: &mut ParticleSystem, config: &SimulationConfig) -> RunSummary {
    let mut clock = FrameClock::fixed(config.run.dt as f64);

    if config.run.burst > 0 {
        let emitted = system.emit(config.run.burst);
        log::info!("burst: emitted {} of {}", emitted, config.run.burst);
    }

    let mut peak_alive = system.num_alive_particles();
    for _ in 0..config.run.frames {
        let dt = clock.tick();
        system.update(dt);
        peak_alive = peak_alive.max(system.num_alive_particles());
        log::debug!(
            "frame {}: {} alive",
            clock.frame,
            system.num_alive_particles()
        );
    }

    let bounds = system.vertices().iter().fold(None, |acc, v| {
        let p = Vec2::from(v.position);
        Some(match acc {
            None => (p, p),
            Some((min, max)) => (p.min(min), p.max(max)),
        })
    });

    RunSummary {
        frames: config.run.frames,
        simulated_time: clock.total_time,
        alive: system.num_alive_particles(),
        capacity: system.num_all_particles(),
        peak_alive,
        vertex_count: system.vertices().len(),
        bounds,
    }
}
