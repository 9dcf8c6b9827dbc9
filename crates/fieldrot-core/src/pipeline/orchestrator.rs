use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::derotate::derotate;
use crate::ephemeris::{open_ephemeris, Ephemeris};
use crate::error::{FieldRotError, Result};
use crate::io::image_io::{load_raster, save_raster};
use crate::io::scan::{list_frames, output_path};
use crate::observer::{resolve_observer, Gazetteer, Geocoder};
use crate::session::{build_series, Session, SessionSample};

use super::config::SessionConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter, SessionReport};

/// Scan the input directory, resolve the observer and integrate the rotation series.
///
/// This is the whole run for trajectory-only analysis; [`run_session_reported`]
/// continues from here with de-rotation.
pub fn integrate_session(
    config: &SessionConfig,
    ephemeris: &dyn Ephemeris,
    geocoder: &dyn Geocoder,
    reporter: &dyn ProgressReporter,
) -> Result<Session> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Scanning, None);
    let paths = list_frames(&config.input_dir, &config.extensions)?;
    reporter.finish_stage();
    if paths.is_empty() {
        return Err(FieldRotError::EmptySequence);
    }
    info!(
        dir = %config.input_dir.display(),
        frames = paths.len(),
        "Found frames"
    );

    reporter.begin_stage(PipelineStage::ResolvingObserver, None);
    let observer = resolve_observer(&config.observer, geocoder)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Integrating, None);
    let session = build_series(
        &paths,
        config.body,
        &observer,
        ephemeris,
        &config.integration,
    )?;
    reporter.finish_stage();

    Ok(session)
}

/// Run the full de-rotation pipeline with injected collaborators.
pub fn run_session_reported(
    config: &SessionConfig,
    ephemeris: &dyn Ephemeris,
    geocoder: &dyn Geocoder,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<SessionReport> {
    let session = integrate_session(config, ephemeris, geocoder, reporter.as_ref())?;

    std::fs::create_dir_all(&config.output_dir)?;

    let total = session.frame_count();
    reporter.begin_stage(PipelineStage::Derotating, Some(total));
    let done = AtomicUsize::new(0);

    let process = |(sample, &angle): (&SessionSample, &f64)| -> Result<PathBuf> {
        let out = derotate_one(config, sample, angle)?;
        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(n);
        Ok(out)
    };

    let outputs: Vec<PathBuf> = if total >= PARALLEL_FRAME_THRESHOLD {
        session
            .samples
            .par_iter()
            .zip(session.cumulative.par_iter())
            .map(process)
            .collect::<Result<_>>()?
    } else {
        session
            .samples
            .iter()
            .zip(session.cumulative.iter())
            .map(process)
            .collect::<Result<_>>()?
    };
    reporter.finish_stage();

    info!(
        outputs = outputs.len(),
        dir = %config.output_dir.display(),
        "De-rotation complete"
    );
    Ok(SessionReport { session, outputs })
}

/// Run the full pipeline with the ephemeris and gazetteer described by `config`.
pub fn run_session(config: &SessionConfig) -> Result<SessionReport> {
    let ephemeris = open_ephemeris(&config.ephemeris)?;
    let gazetteer = Gazetteer::new(&config.places);
    run_session_reported(config, ephemeris.as_ref(), &gazetteer, Arc::new(NoOpReporter))
}

fn derotate_one(config: &SessionConfig, sample: &SessionSample, angle: f64) -> Result<PathBuf> {
    let frame = load_raster(&sample.path).map_err(|e| e.for_frame(&sample.path))?;
    let canvas = derotate(
        &frame,
        config.derotation.base_angle_deg,
        angle,
        config.derotation.border.as_ref(),
    );

    let out = output_path(
        &sample.path,
        &config.output_dir,
        &config.derotation.output_suffix,
    );
    save_raster(&canvas, &out).map_err(|e| e.for_frame(&sample.path))?;
    debug!(
        input = %sample.path.display(),
        output = %out.display(),
        angle,
        side = canvas.width(),
        "Wrote de-rotated frame"
    );
    Ok(out)
}
