use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldRotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("No capture timestamp (YYYY-MM-DD-HHMM_S) in file name: {0}")]
    MalformedFilename(String),

    #[error("Ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),

    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("Duplicate capture timestamp {instant} in {first} and {second}")]
    DuplicateTimestamp {
        instant: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Insufficient samples for cubic fit: {usable} usable, need {required}")]
    InsufficientSamples { usable: usize, required: usize },

    #[error("Invalid fit samples: {0}")]
    InvalidSamples(String),

    #[error("Rotation rate undefined at altitude {altitude_deg} deg")]
    UndefinedRotationRate { altitude_deg: f64 },

    #[error("Geocoding failed for '{place}': {reason}")]
    GeocodeFailure { place: String, reason: String },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Frame {path}: {source}")]
    Frame {
        path: PathBuf,
        #[source]
        source: Box<FieldRotError>,
    },
}

impl FieldRotError {
    /// Attach the offending frame's path to an error.
    pub fn for_frame(self, path: impl Into<PathBuf>) -> Self {
        Self::Frame {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FieldRotError>;
