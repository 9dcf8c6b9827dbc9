mod analytic;
mod tabulated;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldRotError, Result};
use crate::frame::HorizontalPosition;
use crate::observer::Observer;

pub use analytic::{julian_day_ut, AnalyticEphemeris};
pub use tabulated::{EphemerisSample, EphemerisTable, TabulatedEphemeris};

/// Source of apparent horizontal coordinates for a body.
///
/// Implementations must be deterministic: identical inputs give identical outputs.
pub trait Ephemeris: Send + Sync {
    fn observe(
        &self,
        body: Body,
        instant: DateTime<Utc>,
        observer: &Observer,
    ) -> Result<HorizontalPosition>;

    /// Short name used in logs and summaries.
    fn name(&self) -> &str;
}

/// Bodies in the catalog. Outer planets are treated as their system barycenters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const ALL: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
        }
    }
}

impl FromStr for Body {
    type Err = FieldRotError;

    /// Accepts `jupiter`, `Jupiter` and the catalog form `JUPITER BARYCENTER`.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        let key = lowered
            .strip_suffix("barycenter")
            .map(str::trim_end)
            .unwrap_or(&lowered);
        Body::ALL
            .into_iter()
            .find(|b| b.key() == key)
            .ok_or_else(|| FieldRotError::UnknownBody(s.to_string()))
    }
}

impl TryFrom<String> for Body {
    type Error = FieldRotError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Body> for String {
    fn from(b: Body) -> Self {
        b.key().to_string()
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = self.key();
        let mut chars = key.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

/// Which ephemeris backs a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EphemerisSource {
    #[default]
    Analytic,
    Tabulated { path: std::path::PathBuf },
}

impl std::fmt::Display for EphemerisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analytic => write!(f, "Analytic"),
            Self::Tabulated { path } => write!(f, "Tabulated ({})", path.display()),
        }
    }
}

/// Instantiate the configured ephemeris.
pub fn open_ephemeris(source: &EphemerisSource) -> Result<Box<dyn Ephemeris>> {
    match source {
        EphemerisSource::Analytic => Ok(Box::new(AnalyticEphemeris::new())),
        EphemerisSource::Tabulated { path } => Ok(Box::new(TabulatedEphemeris::load(path)?)),
    }
}
