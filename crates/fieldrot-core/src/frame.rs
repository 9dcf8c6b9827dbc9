use ndarray::Array3;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// A multi-channel image buffer.
/// Samples are f32 in [0.0, 1.0], shape = (height, width, channels).
#[derive(Clone, Debug)]
pub struct RasterFrame {
    pub data: Array3<f32>,
    /// Sample depth of the source file (8 or 16); outputs are written at the same depth.
    pub bit_depth: u8,
}

impl RasterFrame {
    pub fn new(data: Array3<f32>, bit_depth: u8) -> Self {
        Self { data, bit_depth }
    }

    /// A black frame with the given geometry.
    pub fn black(height: usize, width: usize, channels: usize, bit_depth: u8) -> Self {
        Self::new(Array3::zeros((height, width, channels)), bit_depth)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }
}

/// A frame file discovered on disk, with its parsed capture instant.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureFrame {
    pub path: PathBuf,
    pub instant: DateTime<Utc>,
}

/// Apparent horizontal coordinates, in degrees.
/// Azimuth is measured clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HorizontalPosition {
    pub altitude: f64,
    pub azimuth: f64,
}
