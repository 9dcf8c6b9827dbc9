use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::Array3;

use fieldrot_core::ephemeris::{Body, Ephemeris};
use fieldrot_core::error::Result;
use fieldrot_core::frame::{HorizontalPosition, RasterFrame};
use fieldrot_core::io::image_io::save_raster;
use fieldrot_core::observer::Observer;

/// Ephemeris returning the same position for every query.
pub struct FixedEphemeris {
    pub position: HorizontalPosition,
}

impl FixedEphemeris {
    pub fn new(altitude: f64, azimuth: f64) -> Self {
        Self {
            position: HorizontalPosition { altitude, azimuth },
        }
    }
}

impl Ephemeris for FixedEphemeris {
    fn observe(&self, _: Body, _: DateTime<Utc>, _: &Observer) -> Result<HorizontalPosition> {
        Ok(self.position)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Ephemeris computed from the query instant by a closure.
pub struct FnEphemeris<F>(pub F);

impl<F> Ephemeris for FnEphemeris<F>
where
    F: Fn(DateTime<Utc>) -> HorizontalPosition + Send + Sync,
{
    fn observe(&self, _: Body, instant: DateTime<Utc>, _: &Observer) -> Result<HorizontalPosition> {
        Ok((self.0)(instant))
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Frame names one minute apart starting at 2020-08-22 13:15:00.
pub fn minute_names(count: usize, suffix: &str) -> Vec<String> {
    (0..count)
        .map(|i| format!("2020-08-22-13{:02}_0{}", 15 + i, suffix))
        .collect()
}

pub fn paths_in(dir: &Path, names: &[String]) -> Vec<PathBuf> {
    names.iter().map(|n| dir.join(n)).collect()
}

/// A frame with a bright rectangle in the top-left quadrant on a dark background.
pub fn marked_frame(height: usize, width: usize, channels: usize) -> RasterFrame {
    let mut data = Array3::<f32>::from_elem((height, width, channels), 0.1);
    for row in 0..height / 2 {
        for col in 0..width / 2 {
            for c in 0..channels {
                data[[row, col, c]] = 0.8;
            }
        }
    }
    RasterFrame::new(data, 16)
}

/// Write `frame` under each name in `dir`.
pub fn write_frames(dir: &Path, names: &[String], frame: &RasterFrame) -> Vec<PathBuf> {
    names
        .iter()
        .map(|n| {
            let path = dir.join(n);
            save_raster(frame, &path).expect("write test frame");
            path
        })
        .collect()
}
