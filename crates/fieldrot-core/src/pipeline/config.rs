use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_OUTPUT_SUFFIX;
use crate::derotate::BorderStamp;
use crate::ephemeris::{Body, EphemerisSource};
use crate::error::{FieldRotError, Result};
use crate::observer::{Observer, ObserverSource};
use crate::session::IntegrationConfig;

/// Everything one de-rotation run needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub body: Body,
    /// Frame file extensions to pick up, case-insensitive.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub observer: ObserverSource,
    #[serde(default)]
    pub ephemeris: EphemerisSource,
    #[serde(default)]
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub derotation: DerotationConfig,
    /// Known sites for place-name observers.
    #[serde(default)]
    pub places: BTreeMap<String, Observer>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("derotated"),
            body: Body::Jupiter,
            extensions: default_extensions(),
            observer: ObserverSource::default(),
            ephemeris: EphemerisSource::default(),
            integration: IntegrationConfig::default(),
            derotation: DerotationConfig::default(),
            places: BTreeMap::new(),
        }
    }
}

impl SessionConfig {
    /// Extensions of raw video captures, used for trajectory-only analysis.
    pub fn trajectory_extensions() -> Vec<String> {
        vec!["ser".to_string()]
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(FieldRotError::InvalidConfig(
                "at least one frame extension is required".into(),
            ));
        }
        if !self.derotation.base_angle_deg.is_finite() {
            return Err(FieldRotError::InvalidConfig(
                "base_angle_deg must be finite".into(),
            ));
        }
        if let ObserverSource::Literal(obs) = &self.observer {
            if !(-90.0..=90.0).contains(&obs.latitude) {
                return Err(FieldRotError::InvalidConfig(format!(
                    "observer latitude {} outside [-90, 90]",
                    obs.latitude
                )));
            }
        }
        Ok(())
    }
}

fn default_extensions() -> Vec<String> {
    vec!["tif".to_string(), "tiff".to_string()]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerotationConfig {
    /// Fixed rotation added to every frame, in degrees.
    pub base_angle_deg: f64,
    /// Appended to each input stem to name its output.
    pub output_suffix: String,
    /// Stamp a sentinel border before rotating.
    pub border: Option<BorderStamp>,
}

impl Default for DerotationConfig {
    fn default() -> Self {
        Self {
            base_angle_deg: 0.0,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            border: None,
        }
    }
}
