//! Pyre CLI - headless driver for the Pyre particle system

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, presets, run};

#[derive(Parser)]
#[command(name = "pyre")]
#[command(about = "Run and inspect 2D particle simulations headlessly", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a configuration for a number of frames and report the result
    Run {
        /// Path to a TOML run configuration
        #[arg(required_unless_present = "preset")]
        config: Option<String>,

        /// Use a built-in configuration instead of a file
        #[arg(long, conflicts_with = "config")]
        preset: Option<String>,

        /// Number of frames to simulate
        #[arg(long)]
        frames: Option<u32>,

        /// Fixed timestep in seconds
        #[arg(long, value_parser = parse_dt)]
        dt: Option<f32>,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Particles emitted before the first frame
        #[arg(long)]
        burst: Option<usize>,

        /// Print every vertex of the final frame
        #[arg(long)]
        dump_vertices: bool,
    },

    /// Validate a configuration without running it
    Check {
        /// Path to a TOML run configuration
        config: String,
    },

    /// List the built-in configurations
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Run {
            config,
            preset,
            frames,
            dt,
            seed,
            burst,
            dump_vertices,
        } => run::run(run::RunArgs {
            config,
            preset,
            frames,
            dt,
            seed,
            burst,
            dump_vertices,
        }),
        Commands::Check { config } => check::run(&config),
        Commands::Presets => presets::run(),
    }
}

fn parse_dt(s: &str) -> Result<f32, String> {
    let dt: f32 = s.parse().map_err(|e| format!("invalid dt '{}': {}", s, e))?;
    if dt > 0.0 && dt <= 1.0 {
        Ok(dt)
    } else {
        Err(format!("dt must be in (0, 1], got {}", dt))
    }
}
