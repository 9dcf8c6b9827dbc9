use std::f64::consts::PI;

use astro::angle::limit_to_two_PI;
use astro::coords::{alt_frm_eq, asc_frm_ecl, az_frm_eq, dec_frm_ecl};
use astro::ecliptic::mn_oblq_IAU;
use astro::planet::{heliocent_coords, Planet};
use astro::time::{julian_day, mn_sidr, CalType, Date};
use astro::{lunar, pluto, precess, sun};
use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::consts::{
    DELTA_T_SECONDS, J2000_JD, LIGHT_TIME_DAYS_PER_AU, LIGHT_TIME_ITERATIONS, SECONDS_PER_DAY,
};
use crate::error::Result;
use crate::frame::HorizontalPosition;
use crate::observer::Observer;

use super::{Body, Ephemeris};

/// Ephemeris evaluated from series theories (VSOP87 planets, ELP-2000 Moon,
/// Meeus' periodic terms for Pluto).
///
/// Positions are geocentric with planetary light-time applied; topocentric
/// parallax, nutation, aberration and refraction are ignored.
#[derive(Clone, Debug, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Geocentric right ascension and declination of date in degrees, for
    /// dynamical time `jde`. Right ascension is in `[0, 360)`.
    pub fn equatorial(&self, body: Body, jde: f64) -> (f64, f64) {
        let (ra, dec) = equatorial_of_date(body, jde);
        (ra.to_degrees(), dec.to_degrees())
    }
}

impl Ephemeris for AnalyticEphemeris {
    fn observe(
        &self,
        body: Body,
        instant: DateTime<Utc>,
        observer: &Observer,
    ) -> Result<HorizontalPosition> {
        let jd_ut = julian_day_ut(&instant);
        let jde = jd_ut + DELTA_T_SECONDS / SECONDS_PER_DAY;

        let (ra, dec) = equatorial_of_date(body, jde);

        let (altitude, azimuth) = horizontal_from_equatorial(
            ra,
            dec,
            observer.latitude.to_radians(),
            observer.longitude.to_radians(),
            jd_ut,
        );

        Ok(HorizontalPosition {
            altitude: altitude.to_degrees(),
            azimuth: azimuth.to_degrees(),
        })
    }

    fn name(&self) -> &str {
        "analytic"
    }
}

/// Julian day (UT) of a UTC instant, including the fraction of the day.
pub fn julian_day_ut(instant: &DateTime<Utc>) -> f64 {
    let seconds = f64::from(instant.num_seconds_from_midnight())
        + f64::from(instant.nanosecond()) * 1e-9;
    let date = Date {
        year: instant.year() as i16,
        month: instant.month() as u8,
        decimal_day: f64::from(instant.day()) + seconds / SECONDS_PER_DAY,
        cal_type: CalType::Gregorian,
    };
    julian_day(&date)
}

/// Returns (ra, dec) of date in radians.
fn equatorial_of_date(body: Body, jde: f64) -> (f64, f64) {
    let (long, lat) = geocentric_ecliptic(body, jde);
    let obliquity = mn_oblq_IAU(jde);
    (
        limit_to_two_PI(asc_frm_ecl(long, lat, obliquity)),
        dec_frm_ecl(long, lat, obliquity),
    )
}

/// Geocentric ecliptic (longitude, latitude) of date, radians.
fn geocentric_ecliptic(body: Body, jde: f64) -> (f64, f64) {
    let planet = match body {
        Body::Sun => {
            let (point, _) = sun::geocent_ecl_pos(jde);
            return (point.long, point.lat);
        }
        Body::Moon => {
            let (point, _) = lunar::geocent_ecl_pos(jde);
            return (point.long, point.lat);
        }
        Body::Mercury => Planet::Mercury,
        Body::Venus => Planet::Venus,
        Body::Mars => Planet::Mars,
        Body::Jupiter => Planet::Jupiter,
        Body::Saturn => Planet::Saturn,
        Body::Uranus => Planet::Uranus,
        Body::Neptune => Planet::Neptune,
        Body::Pluto => return light_time_corrected(jde, pluto_heliocentric_xyz),
    };

    light_time_corrected(jde, |t| heliocentric_xyz(&planet, t))
}

/// Geocentric ecliptic (longitude, latitude) of a body whose heliocentric
/// rectangular position of date is given by `position`.
fn light_time_corrected(jde: f64, position: impl Fn(f64) -> [f64; 3]) -> (f64, f64) {
    let earth = heliocentric_xyz(&Planet::Earth, jde);
    let mut geo = sub(position(jde), earth);
    for _ in 0..LIGHT_TIME_ITERATIONS {
        let tau = LIGHT_TIME_DAYS_PER_AU * norm(geo);
        geo = sub(position(jde - tau), earth);
    }

    let long = limit_to_two_PI(geo[1].atan2(geo[0]));
    let lat = geo[2].atan2(geo[0].hypot(geo[1]));
    (long, lat)
}

fn heliocentric_xyz(planet: &Planet, jde: f64) -> [f64; 3] {
    let (long, lat, rad) = heliocent_coords(planet, jde);
    rectangular(long, lat, rad)
}

/// The Pluto theory is referred to the J2000.0 ecliptic; precess to the
/// ecliptic of date so it shares Earth's frame.
fn pluto_heliocentric_xyz(jde: f64) -> [f64; 3] {
    let (long, lat, rad) = pluto::heliocent_pos(jde);
    let (long, lat) = precess::precess_ecl_coords(long, lat, J2000_JD, jde);
    rectangular(long, lat, rad)
}

fn rectangular(long: f64, lat: f64, rad: f64) -> [f64; 3] {
    [
        rad * lat.cos() * long.cos(),
        rad * lat.cos() * long.sin(),
        rad * lat.sin(),
    ]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Returns (alt, az) in radians, azimuth clockwise from north.
fn horizontal_from_equatorial(ra: f64, dec: f64, lat: f64, long: f64, jd_ut: f64) -> (f64, f64) {
    // astro::coords::hr_angl_frm_observer_long() has the wrong sign convention
    // for east-positive longitudes.
    let hour_angle = mn_sidr(jd_ut) + long - ra;

    // Meeus measures azimuth westward from south.
    let meeus_az = az_frm_eq(hour_angle, dec, lat);
    let az = limit_to_two_PI(meeus_az + PI);

    (alt_frm_eq(hour_angle, dec, lat), az)
}
