use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::{DEFAULT_LATITUDE_DEG, DEFAULT_LONGITUDE_DEG};
use crate::error::{FieldRotError, Result};

/// Geodetic observer position. Longitude is east-positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64, elevation: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    /// Location used when a place name cannot be resolved.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_LATITUDE_DEG, DEFAULT_LONGITUDE_DEG, None)
    }
}

/// Resolves free-text place names to observer positions.
pub trait Geocoder: Send + Sync {
    fn locate(&self, place: &str) -> Result<Observer>;
}

/// Offline geocoder backed by a name -> position table.
/// Lookups ignore case and surrounding whitespace.
#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    places: BTreeMap<String, Observer>,
}

impl Gazetteer {
    pub fn new(places: &BTreeMap<String, Observer>) -> Self {
        Self {
            places: places
                .iter()
                .map(|(name, obs)| (normalize(name), *obs))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn locate(&self, place: &str) -> Result<Observer> {
        self.places
            .get(&normalize(place))
            .copied()
            .ok_or_else(|| FieldRotError::GeocodeFailure {
                place: place.to_string(),
                reason: format!("not among {} known places", self.places.len()),
            })
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Where the session's observer comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObserverSource {
    Literal(Observer),
    Place {
        name: String,
        #[serde(default)]
        on_failure: GeocodeFallback,
    },
}

impl Default for ObserverSource {
    fn default() -> Self {
        Self::Literal(Observer::fallback())
    }
}

/// What to do when a place name cannot be geocoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeFallback {
    /// Fail the run.
    #[default]
    Abort,
    /// Continue with [`Observer::fallback`], logging a warning.
    UseDefault,
}

impl std::fmt::Display for GeocodeFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "Abort"),
            Self::UseDefault => write!(f, "Use Default Location"),
        }
    }
}

/// Build the session observer, applying the configured geocoding fallback.
pub fn resolve_observer(source: &ObserverSource, geocoder: &dyn Geocoder) -> Result<Observer> {
    match source {
        ObserverSource::Literal(obs) => Ok(*obs),
        ObserverSource::Place { name, on_failure } => match geocoder.locate(name) {
            Ok(obs) => {
                info!(
                    place = %name,
                    latitude = obs.latitude,
                    longitude = obs.longitude,
                    "Resolved observer location"
                );
                Ok(obs)
            }
            Err(e @ FieldRotError::GeocodeFailure { .. })
                if *on_failure == GeocodeFallback::UseDefault =>
            {
                let obs = Observer::fallback();
                warn!(
                    error = %e,
                    latitude = obs.latitude,
                    longitude = obs.longitude,
                    "Geocoding failed, using default observer location"
                );
                Ok(obs)
            }
            Err(e) => Err(e),
        },
    }
}
