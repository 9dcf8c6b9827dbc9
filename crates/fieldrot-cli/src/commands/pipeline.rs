use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use fieldrot_core::derotate::BorderStamp;
use fieldrot_core::ephemeris::open_ephemeris;
use fieldrot_core::observer::Gazetteer;
use fieldrot_core::pipeline::run_session_reported;
use tracing::warn;

use crate::progress::BarReporter;
use crate::summary::{print_series_table, print_session_summary};

use super::{parse_extensions, SessionArgs};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Comma-separated frame extensions
    #[arg(long, default_value = "tif,tiff")]
    pub ext: String,

    /// Output directory for de-rotated frames
    #[arg(short, long, default_value = "derotated")]
    pub output: PathBuf,

    /// Fixed rotation added to every frame, in degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub base_angle: f64,

    /// Stamp a sentinel border on each frame before rotating
    #[arg(long)]
    pub border: bool,

    /// Border width in pixels
    #[arg(long, default_value = "4", requires = "border")]
    pub border_width: usize,

    /// Suffix appended to each output file stem
    #[arg(long, default_value = "_derot")]
    pub suffix: String,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if args.session.config.is_some() {
        args.session.to_config(&[])?
    } else {
        let mut config = args.session.to_config(&parse_extensions(&args.ext))?;
        config.output_dir = args.output.clone();
        config.derotation.base_angle_deg = args.base_angle;
        config.derotation.output_suffix = args.suffix.clone();
        if args.border {
            config.derotation.border = Some(BorderStamp {
                width: args.border_width,
                ..Default::default()
            });
        }
        config
    };

    print_session_summary(&config, "Field De-rotation");

    let ephemeris = open_ephemeris(&config.ephemeris).context("Failed to open ephemeris")?;
    let gazetteer = Gazetteer::new(&config.places);
    let reporter = Arc::new(BarReporter::new());

    let report = run_session_reported(&config, ephemeris.as_ref(), &gazetteer, reporter.clone())?;
    reporter.finish();

    for issue in &report.session.issues {
        warn!(path = %issue.path.display(), "{}", issue.message);
    }

    println!();
    print_series_table(&report.session);
    println!(
        "\n{} frame(s) written to {}",
        report.outputs.len(),
        config.output_dir.display()
    );

    Ok(())
}
