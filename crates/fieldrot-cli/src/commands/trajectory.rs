use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fieldrot_core::ephemeris::open_ephemeris;
use fieldrot_core::observer::Gazetteer;
use fieldrot_core::pipeline::integrate_session;

use crate::progress::BarReporter;
use crate::summary::{print_series_table, print_session_summary};

use super::{parse_extensions, SessionArgs};

#[derive(Args)]
pub struct TrajectoryArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Comma-separated capture extensions
    #[arg(long, default_value = "ser")]
    pub ext: String,

    /// Write the integrated series to a TOML file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Integrate field rotation over a capture sequence without touching pixels.
pub fn run(args: &TrajectoryArgs) -> Result<()> {
    let config = if args.session.config.is_some() {
        args.session.to_config(&[])?
    } else {
        args.session.to_config(&parse_extensions(&args.ext))?
    };

    print_session_summary(&config, "Field Rotation Trajectory");

    let ephemeris = open_ephemeris(&config.ephemeris).context("Failed to open ephemeris")?;
    let gazetteer = Gazetteer::new(&config.places);
    let reporter = BarReporter::new();

    let session = integrate_session(&config, ephemeris.as_ref(), &gazetteer, &reporter)?;
    reporter.finish();

    println!();
    print_series_table(&session);

    if let Some(ref path) = args.output {
        let toml_str = toml::to_string_pretty(&session)?;
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write series to {}", path.display()))?;
        println!("\nSeries saved to {}", path.display());
    }

    Ok(())
}
