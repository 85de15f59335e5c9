//! Configuration validation command

use crate::config::SimulationConfig;
use anyhow::{Context, Result};

pub fn run(path: &str) -> Result<()> {
    let config =
        SimulationConfig::load(path).with_context(|| format!("Failed to load config '{}'", path))?;
    config
        .validate()
        .with_context(|| format!("'{}' is not a valid configuration", path))?;

    let system = config.build_system();
    let (spawners, generators, updaters) = system.stage_counts();
    println!("{}: OK", path);
    println!(
        "  {} slots, {} rendering, emit rate {}/s",
        config.system.capacity,
        system.render_mode().name(),
        config.system.emit_rate
    );
    println!(
        "  {} spawner(s), {} generator(s), {} updater(s)",
        spawners, generators, updaters
    );
    Ok(())
}
