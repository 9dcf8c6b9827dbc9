mod commands;
mod progress;
mod summary;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fieldrot", about = "Field-rotation de-rotation for alt-az planetary imaging")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for frame de-rotation (0 = one per core)
    #[arg(long, global = true, default_value_t = 0)]
    threads: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate field rotation and de-rotate every frame in a directory
    Run(commands::pipeline::RunArgs),
    /// Integrate field rotation over a capture sequence without de-rotating
    Trajectory(commands::trajectory::TrajectoryArgs),
    /// Show a body's altitude, azimuth and rotation rate at one instant
    Observe(commands::observe::ObserveArgs),
    /// Print a default session config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match &cli.command {
        Commands::Run(args) => commands::pipeline::run(args),
        Commands::Trajectory(args) => commands::trajectory::run(args),
        Commands::Observe(args) => commands::observe::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
