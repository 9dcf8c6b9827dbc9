use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ephemeris::{Body, Ephemeris};
use crate::error::{FieldRotError, Result};
use crate::frame::{CaptureFrame, HorizontalPosition};
use crate::integrate::{FitMode, RateSpline};
use crate::observer::Observer;
use crate::rotation::rotation_rate;
use crate::timestamp::parse_capture_time;

/// What to do with a frame whose name carries no timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Leave the frame out of the session and record an issue.
    #[default]
    Skip,
    Abort,
}

/// What to do with a sample whose rotation rate is undefined (cos(alt) = 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedRatePolicy {
    /// Keep the frame but leave its sample out of the fit.
    #[default]
    Exclude,
    Abort,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default)]
    pub fit: FitMode,
    #[serde(default)]
    pub malformed: MalformedPolicy,
    #[serde(default)]
    pub undefined_rate: UndefinedRatePolicy,
}

/// One frame's position and rate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSample {
    pub path: PathBuf,
    pub instant: DateTime<Utc>,
    /// Whole seconds since the first frame.
    pub elapsed_seconds: i64,
    /// Degrees per second; `None` where the rate is undefined.
    pub rotation_rate: Option<f64>,
    pub position: HorizontalPosition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MalformedFilename,
    UndefinedRotationRate,
}

/// A per-frame problem that did not abort the session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameIssue {
    pub path: PathBuf,
    pub kind: IssueKind,
    pub message: String,
}

/// Time-ordered samples plus cumulative rotation at every frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub body: Body,
    /// Degree of the fitted rate curve; `None` for single-frame sessions.
    pub fit_degree: Option<usize>,
    /// Degrees rotated since the first frame, one per sample.
    pub cumulative: Vec<f64>,
    pub observer: Observer,
    pub samples: Vec<SessionSample>,
    pub issues: Vec<FrameIssue>,
}

impl Session {
    pub fn frame_count(&self) -> usize {
        self.samples.len()
    }

    /// Total rotation accumulated over the session, in degrees.
    pub fn total_rotation(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

/// Parse capture instants from file names, applying the malformed-name policy.
pub fn capture_frames(
    paths: &[PathBuf],
    policy: MalformedPolicy,
) -> Result<(Vec<CaptureFrame>, Vec<FrameIssue>)> {
    let mut frames = Vec::with_capacity(paths.len());
    let mut issues = Vec::new();

    for path in paths {
        let name = file_name(path);
        match parse_capture_time(&name) {
            Ok(instant) => frames.push(CaptureFrame {
                path: path.clone(),
                instant,
            }),
            Err(e) => match policy {
                MalformedPolicy::Abort => return Err(e.for_frame(path)),
                MalformedPolicy::Skip => {
                    warn!(path = %path.display(), "Skipping frame without capture timestamp");
                    issues.push(FrameIssue {
                        path: path.clone(),
                        kind: IssueKind::MalformedFilename,
                        message: e.to_string(),
                    });
                }
            },
        }
    }

    Ok((frames, issues))
}

/// Sort frames by capture instant, rejecting equal instants.
pub fn order_frames(frames: &mut [CaptureFrame]) -> Result<()> {
    frames.sort_by(|a, b| a.instant.cmp(&b.instant).then_with(|| a.path.cmp(&b.path)));
    if let Some(pair) = frames.windows(2).find(|w| w[0].instant == w[1].instant) {
        return Err(FieldRotError::DuplicateTimestamp {
            instant: pair[0].instant.to_rfc3339(),
            first: pair[0].path.clone(),
            second: pair[1].path.clone(),
        });
    }
    Ok(())
}

/// Build the rate series for a batch of frame files and integrate it.
pub fn build_series(
    paths: &[PathBuf],
    body: Body,
    observer: &Observer,
    ephemeris: &dyn Ephemeris,
    config: &IntegrationConfig,
) -> Result<Session> {
    let (mut frames, mut issues) = capture_frames(paths, config.malformed)?;
    if frames.is_empty() {
        return Err(FieldRotError::EmptySequence);
    }
    order_frames(&mut frames)?;

    let start = frames[0].instant;
    let mut samples = Vec::with_capacity(frames.len());
    for frame in &frames {
        let position = ephemeris
            .observe(body, frame.instant, observer)
            .map_err(|e| e.for_frame(&frame.path))?;

        let rate = match rotation_rate(observer.latitude, position.altitude, position.azimuth) {
            Ok(rate) => Some(rate),
            Err(e) => match config.undefined_rate {
                UndefinedRatePolicy::Abort => return Err(e.for_frame(&frame.path)),
                UndefinedRatePolicy::Exclude => {
                    warn!(
                        path = %frame.path.display(),
                        altitude = position.altitude,
                        "Excluding sample with undefined rotation rate from fit"
                    );
                    issues.push(FrameIssue {
                        path: frame.path.clone(),
                        kind: IssueKind::UndefinedRotationRate,
                        message: e.to_string(),
                    });
                    None
                }
            },
        };

        let elapsed_seconds = (frame.instant - start).num_seconds();
        debug!(
            elapsed = elapsed_seconds,
            altitude = position.altitude,
            azimuth = position.azimuth,
            rate = ?rate,
            "Sample"
        );
        samples.push(SessionSample {
            path: frame.path.clone(),
            instant: frame.instant,
            elapsed_seconds,
            rotation_rate: rate,
            position,
        });
    }

    let (cumulative, fit_degree) = cumulative_rotation(&samples, config.fit)?;
    info!(
        body = %body,
        frames = samples.len(),
        total_rotation = cumulative.last().copied().unwrap_or(0.0),
        "Integrated field rotation"
    );

    Ok(Session {
        body,
        fit_degree,
        cumulative,
        observer: *observer,
        samples,
        issues,
    })
}

/// Integrate a time-ordered series into cumulative rotation per sample.
///
/// Returns the cumulative values and the degree of the fitted curve. A single
/// sample integrates over a zero-width interval and needs no fit.
pub fn cumulative_rotation(
    samples: &[SessionSample],
    fit: FitMode,
) -> Result<(Vec<f64>, Option<usize>)> {
    match samples.len() {
        0 => return Err(FieldRotError::EmptySequence),
        1 => return Ok((vec![0.0], None)),
        _ => {}
    }

    let (t, rates): (Vec<f64>, Vec<f64>) = samples
        .iter()
        .filter_map(|s| s.rotation_rate.map(|r| (s.elapsed_seconds as f64, r)))
        .unzip();
    let spline = RateSpline::fit(&t, &rates, fit)?;

    let all_t: Vec<f64> = samples.iter().map(|s| s.elapsed_seconds as f64).collect();
    Ok((spline.cumulative(&all_t), Some(spline.degree())))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
