pub mod config;
pub mod observe;
pub mod pipeline;
pub mod trajectory;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use fieldrot_core::ephemeris::{Body, EphemerisSource};
use fieldrot_core::integrate::FitMode;
use fieldrot_core::observer::{GeocodeFallback, Observer, ObserverSource};
use fieldrot_core::pipeline::config::SessionConfig;
use fieldrot_core::session::{IntegrationConfig, MalformedPolicy, UndefinedRatePolicy};

/// Options shared by every command that integrates a session.
#[derive(Args)]
pub struct SessionArgs {
    /// Directory holding the frames
    pub input: Option<PathBuf>,

    /// Session config file (TOML); replaces the flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Body to track (sun, moon, mercury ... pluto)
    #[arg(long, default_value = "jupiter")]
    pub body: String,

    /// Observer latitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Observer longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Observer elevation in metres
    #[arg(long)]
    pub elevation: Option<f64>,

    /// Place name to geocode instead of --lat/--lon
    #[arg(long, conflicts_with = "lat")]
    pub place: Option<String>,

    /// Use the default location if --place cannot be resolved
    #[arg(long, requires = "place")]
    pub fallback_location: bool,

    /// Precomputed ephemeris table (TOML) instead of the analytic theories
    #[arg(long)]
    pub ephemeris_table: Option<PathBuf>,

    /// Allow linear/quadratic fits when fewer than four samples are usable
    #[arg(long)]
    pub degraded_fit: bool,

    /// Fail on frames whose name carries no timestamp instead of skipping them
    #[arg(long)]
    pub abort_on_malformed: bool,

    /// Fail on samples with undefined rotation rate instead of excluding them
    #[arg(long)]
    pub abort_on_undefined: bool,
}

impl SessionArgs {
    /// Load the config file, or build a config from flags.
    pub fn to_config(&self, extensions: &[String]) -> Result<SessionConfig> {
        if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: SessionConfig = toml::from_str(&contents).context("Invalid session config")?;
            return Ok(config);
        }

        let Some(ref input) = self.input else {
            bail!("an input directory is required when no --config is given");
        };

        let observer = match (&self.place, self.lat, self.lon) {
            (Some(name), _, _) => ObserverSource::Place {
                name: name.clone(),
                on_failure: if self.fallback_location {
                    GeocodeFallback::UseDefault
                } else {
                    GeocodeFallback::Abort
                },
            },
            (None, Some(lat), Some(lon)) => {
                ObserverSource::Literal(Observer::new(lat, lon, self.elevation))
            }
            _ => ObserverSource::default(),
        };

        let ephemeris = match self.ephemeris_table {
            Some(ref path) => EphemerisSource::Tabulated { path: path.clone() },
            None => EphemerisSource::Analytic,
        };

        Ok(SessionConfig {
            input_dir: input.clone(),
            body: self.body()?,
            extensions: extensions.to_vec(),
            observer,
            ephemeris,
            integration: IntegrationConfig {
                fit: if self.degraded_fit {
                    FitMode::AllowDegraded
                } else {
                    FitMode::Cubic
                },
                malformed: if self.abort_on_malformed {
                    MalformedPolicy::Abort
                } else {
                    MalformedPolicy::Skip
                },
                undefined_rate: if self.abort_on_undefined {
                    UndefinedRatePolicy::Abort
                } else {
                    UndefinedRatePolicy::Exclude
                },
            },
            ..Default::default()
        })
    }

    pub fn body(&self) -> Result<Body> {
        Ok(self.body.parse::<Body>()?)
    }
}

/// Split a comma-separated extension list, dropping leading dots.
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect()
}
