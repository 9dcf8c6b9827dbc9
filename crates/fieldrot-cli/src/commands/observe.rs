use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use fieldrot_core::ephemeris::{open_ephemeris, Body, EphemerisSource};
use fieldrot_core::observer::Observer;
use fieldrot_core::rotation::rotation_rate;
use fieldrot_core::timestamp::parse_capture_time;

#[derive(Args)]
pub struct ObserveArgs {
    /// Capture time: RFC 3339 (2020-08-22T13:15:00Z) or a frame name (2020-08-22-1315_0)
    pub time: String,

    /// Body to observe
    #[arg(long, default_value = "jupiter")]
    pub body: String,

    /// Observer latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Observer longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Precomputed ephemeris table (TOML) instead of the analytic theories
    #[arg(long)]
    pub ephemeris_table: Option<PathBuf>,
}

/// Print a body's horizontal position and field-rotation rate at one instant.
pub fn run(args: &ObserveArgs) -> Result<()> {
    let body: Body = args.body.parse()?;
    let instant = parse_instant(&args.time)?;
    let observer = Observer::new(args.lat, args.lon, None);

    let source = match args.ephemeris_table {
        Some(ref path) => EphemerisSource::Tabulated { path: path.clone() },
        None => EphemerisSource::Analytic,
    };
    let ephemeris = open_ephemeris(&source).context("Failed to open ephemeris")?;
    let position = ephemeris.observe(body, instant, &observer)?;

    println!("Body:        {}", body);
    println!("Time (UTC):  {}", instant.to_rfc3339());
    println!("Observer:    {:.5}, {:.5}", observer.latitude, observer.longitude);
    println!("Altitude:    {:.4}\u{b0}", position.altitude);
    println!("Azimuth:     {:.4}\u{b0}", position.azimuth);
    match rotation_rate(observer.latitude, position.altitude, position.azimuth) {
        Ok(rate) => {
            println!("Rate:        {:.6e}\u{b0}/s", rate);
            println!("             {:.4}\u{b0}/min", rate * 60.0);
        }
        Err(e) => println!("Rate:        {}", e),
    }

    Ok(())
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    parse_capture_time(text).with_context(|| format!("Unrecognised time '{text}'"))
}
