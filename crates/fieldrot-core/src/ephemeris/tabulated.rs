use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FieldRotError, Result};
use crate::frame::HorizontalPosition;
use crate::observer::Observer;

use super::{Body, Ephemeris};

/// Observer positions closer than this (degrees) are considered the same site.
const SITE_TOLERANCE_DEG: f64 = 1e-4;

/// On-disk dataset: one body, one site, apparent positions at known instants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EphemerisTable {
    pub body: Body,
    /// Site the table was computed for. When absent, any observer is accepted.
    #[serde(default)]
    pub observer: Option<Observer>,
    pub samples: Vec<EphemerisSample>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EphemerisSample {
    /// RFC 3339 string in the dataset, e.g. `"2020-08-22T13:15:00Z"`.
    pub time: DateTime<Utc>,
    pub altitude: f64,
    pub azimuth: f64,
}

/// Ephemeris backed by a precomputed table, linearly interpolated in time.
#[derive(Clone, Debug)]
pub struct TabulatedEphemeris {
    table: EphemerisTable,
}

impl TabulatedEphemeris {
    /// Load a TOML dataset. Any failure to read or parse it is `EphemerisUnavailable`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            FieldRotError::EphemerisUnavailable(format!("{}: {e}", path.display()))
        })?;
        let table: EphemerisTable = toml::from_str(&contents).map_err(|e| {
            FieldRotError::EphemerisUnavailable(format!("{}: {e}", path.display()))
        })?;
        debug!(
            path = %path.display(),
            body = %table.body,
            samples = table.samples.len(),
            "Loaded ephemeris table"
        );
        Self::from_table(table)
    }

    pub fn from_table(mut table: EphemerisTable) -> Result<Self> {
        if table.samples.is_empty() {
            return Err(FieldRotError::EphemerisUnavailable(
                "ephemeris table has no samples".into(),
            ));
        }
        table.samples.sort_by_key(|s| s.time);
        Ok(Self { table })
    }

    pub fn body(&self) -> Body {
        self.table.body
    }

    /// First and last covered instants.
    pub fn coverage(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let samples = &self.table.samples;
        (samples[0].time, samples[samples.len() - 1].time)
    }
}

impl Ephemeris for TabulatedEphemeris {
    fn observe(
        &self,
        body: Body,
        instant: DateTime<Utc>,
        observer: &Observer,
    ) -> Result<HorizontalPosition> {
        if body != self.table.body {
            return Err(FieldRotError::EphemerisUnavailable(format!(
                "table covers {}, not {}",
                self.table.body, body
            )));
        }
        if let Some(site) = &self.table.observer {
            if (site.latitude - observer.latitude).abs() > SITE_TOLERANCE_DEG
                || (site.longitude - observer.longitude).abs() > SITE_TOLERANCE_DEG
            {
                return Err(FieldRotError::EphemerisUnavailable(format!(
                    "table computed for ({}, {}), observer is ({}, {})",
                    site.latitude, site.longitude, observer.latitude, observer.longitude
                )));
            }
        }

        let samples = &self.table.samples;
        let (first, last) = self.coverage();
        if instant < first || instant > last {
            return Err(FieldRotError::EphemerisUnavailable(format!(
                "{instant} outside table coverage {first} .. {last}"
            )));
        }

        // Index of the first sample strictly after `instant`.
        let upper = samples.partition_point(|s| s.time <= instant);
        if upper == samples.len() {
            let s = &samples[upper - 1];
            return Ok(HorizontalPosition {
                altitude: s.altitude,
                azimuth: s.azimuth,
            });
        }
        let (a, b) = (&samples[upper - 1], &samples[upper]);
        let span = (b.time - a.time).num_milliseconds() as f64;
        let t = if span > 0.0 {
            (instant - a.time).num_milliseconds() as f64 / span
        } else {
            0.0
        };

        let mut daz = b.azimuth - a.azimuth;
        if daz > 180.0 {
            daz -= 360.0;
        } else if daz < -180.0 {
            daz += 360.0;
        }

        Ok(HorizontalPosition {
            altitude: a.altitude + t * (b.altitude - a.altitude),
            azimuth: (a.azimuth + t * daz).rem_euclid(360.0),
        })
    }

    fn name(&self) -> &str {
        "tabulated"
    }
}
