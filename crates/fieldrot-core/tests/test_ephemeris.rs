use approx::assert_abs_diff_eq;
use chrono::{DateTime, TimeZone, Utc};

use fieldrot_core::ephemeris::{
    julian_day_ut, open_ephemeris, AnalyticEphemeris, Body, Ephemeris, EphemerisSample, EphemerisSource,
    EphemerisTable, TabulatedEphemeris,
};
use fieldrot_core::error::FieldRotError;
use fieldrot_core::observer::Observer;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 8, 22, hour, minute, 0).unwrap()
}

#[test]
fn test_body_parsing() {
    assert_eq!("jupiter".parse::<Body>().unwrap(), Body::Jupiter);
    assert_eq!("Saturn".parse::<Body>().unwrap(), Body::Saturn);
    assert_eq!("JUPITER BARYCENTER".parse::<Body>().unwrap(), Body::Jupiter);
    assert_eq!(" moon ".parse::<Body>().unwrap(), Body::Moon);

    assert_eq!("PLUTO BARYCENTER".parse::<Body>().unwrap(), Body::Pluto);

    let err = "Vulcan".parse::<Body>().unwrap_err();
    assert!(matches!(err, FieldRotError::UnknownBody(ref s) if s == "Vulcan"));
    assert!("".parse::<Body>().is_err());
}

#[test]
fn test_body_display_and_keys_round_trip() {
    assert_eq!(Body::Jupiter.to_string(), "Jupiter");
    for body in Body::ALL {
        assert_eq!(body.key().parse::<Body>().unwrap(), body);
        assert_eq!(body.to_string().parse::<Body>().unwrap(), body);
    }
}

fn sample(time: DateTime<Utc>, altitude: f64, azimuth: f64) -> EphemerisSample {
    EphemerisSample {
        time,
        altitude,
        azimuth,
    }
}

fn table() -> EphemerisTable {
    EphemerisTable {
        body: Body::Jupiter,
        observer: Some(Observer::new(-37.814, 144.96332, None)),
        // Deliberately out of order.
        samples: vec![
            sample(at(13, 10), 42.0, 10.0),
            sample(at(13, 0), 40.0, 350.0),
            sample(at(13, 20), 43.0, 20.0),
        ],
    }
}

#[test]
fn test_tabulated_interpolates_across_north() {
    let eph = TabulatedEphemeris::from_table(table()).unwrap();
    assert_eq!(eph.body(), Body::Jupiter);
    assert_eq!(eph.coverage(), (at(13, 0), at(13, 20)));

    let obs = Observer::fallback();
    let pos = eph.observe(Body::Jupiter, at(13, 5), &obs).unwrap();
    assert_abs_diff_eq!(pos.altitude, 41.0, epsilon = 1e-9);
    assert_abs_diff_eq!(pos.azimuth, 0.0, epsilon = 1e-9);

    let pos = eph.observe(Body::Jupiter, at(13, 2), &obs).unwrap();
    assert_abs_diff_eq!(pos.azimuth, 354.0, epsilon = 1e-9);

    let pos = eph.observe(Body::Jupiter, at(13, 15), &obs).unwrap();
    assert_abs_diff_eq!(pos.altitude, 42.5, epsilon = 1e-9);
    assert_abs_diff_eq!(pos.azimuth, 15.0, epsilon = 1e-9);
}

#[test]
fn test_tabulated_endpoints_are_exact() {
    let eph = TabulatedEphemeris::from_table(table()).unwrap();
    let obs = Observer::fallback();
    assert_eq!(eph.observe(Body::Jupiter, at(13, 0), &obs).unwrap().altitude, 40.0);
    assert_eq!(eph.observe(Body::Jupiter, at(13, 20), &obs).unwrap().altitude, 43.0);
}

#[test]
fn test_tabulated_rejects_out_of_coverage() {
    let eph = TabulatedEphemeris::from_table(table()).unwrap();
    let obs = Observer::fallback();
    for instant in [at(12, 59), at(13, 21)] {
        let err = eph.observe(Body::Jupiter, instant, &obs).unwrap_err();
        assert!(matches!(err, FieldRotError::EphemerisUnavailable(_)));
    }
}

#[test]
fn test_tabulated_rejects_other_body_and_site() {
    let eph = TabulatedEphemeris::from_table(table()).unwrap();
    let err = eph
        .observe(Body::Saturn, at(13, 5), &Observer::fallback())
        .unwrap_err();
    assert!(matches!(err, FieldRotError::EphemerisUnavailable(_)));

    let err = eph
        .observe(Body::Jupiter, at(13, 5), &Observer::new(51.5, 0.0, None))
        .unwrap_err();
    assert!(matches!(err, FieldRotError::EphemerisUnavailable(_)));
}

#[test]
fn test_tabulated_without_site_accepts_any_observer() {
    let mut t = table();
    t.observer = None;
    let eph = TabulatedEphemeris::from_table(t).unwrap();
    assert!(eph
        .observe(Body::Jupiter, at(13, 5), &Observer::new(51.5, 0.0, None))
        .is_ok());
}

#[test]
fn test_empty_table_rejected() {
    let mut t = table();
    t.samples.clear();
    assert!(matches!(
        TabulatedEphemeris::from_table(t),
        Err(FieldRotError::EphemerisUnavailable(_))
    ));
}

#[test]
fn test_tabulated_load_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jupiter.toml");
    std::fs::write(
        &path,
        r#"
body = "JUPITER BARYCENTER"

[[samples]]
time = "2020-08-22T13:00:00Z"
altitude = 30.0
azimuth = 100.0

[[samples]]
time = "2020-08-22T13:10:00Z"
altitude = 32.0
azimuth = 102.0
"#,
    )
    .unwrap();

    let eph = open_ephemeris(&EphemerisSource::Tabulated { path: path.clone() }).unwrap();
    assert_eq!(eph.name(), "tabulated");
    let pos = eph
        .observe(Body::Jupiter, at(13, 5), &Observer::fallback())
        .unwrap();
    assert_abs_diff_eq!(pos.altitude, 31.0, epsilon = 1e-9);
    assert_abs_diff_eq!(pos.azimuth, 101.0, epsilon = 1e-9);
}

#[test]
fn test_tabulated_load_failures_are_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = TabulatedEphemeris::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, FieldRotError::EphemerisUnavailable(_)));

    let garbled = dir.path().join("garbled.toml");
    std::fs::write(&garbled, "body = 42\n").unwrap();
    let err = TabulatedEphemeris::load(&garbled).unwrap_err();
    assert!(matches!(err, FieldRotError::EphemerisUnavailable(_)));
}

#[test]
fn test_analytic_sun_at_june_solstice_noon() {
    let eph = AnalyticEphemeris::new();
    let instant = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
    let pos = eph
        .observe(Body::Sun, instant, &Observer::new(0.0, 0.0, None))
        .unwrap();
    // Declination ~ +23.4 deg, so the Sun culminates north of the zenith.
    assert_abs_diff_eq!(pos.altitude, 66.5, epsilon = 2.0);
    assert!(pos.azimuth.to_radians().cos() > 0.9, "azimuth {}", pos.azimuth);
}

#[test]
fn test_analytic_sun_below_horizon_at_midnight() {
    let eph = AnalyticEphemeris::new();
    let instant = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
    let pos = eph
        .observe(Body::Sun, instant, &Observer::new(0.0, 0.0, None))
        .unwrap();
    assert!(pos.altitude < -80.0, "altitude {}", pos.altitude);
}

#[test]
fn test_analytic_is_deterministic_and_in_range() {
    let eph = AnalyticEphemeris::new();
    let obs = Observer::fallback();
    for body in Body::ALL {
        let a = eph.observe(body, at(13, 15), &obs).unwrap();
        let b = eph.observe(body, at(13, 15), &obs).unwrap();
        assert_eq!(a, b);
        assert!((-90.0..=90.0).contains(&a.altitude), "{body}: {a:?}");
        assert!((0.0..360.0).contains(&a.azimuth), "{body}: {a:?}");
    }
}

#[test]
fn test_analytic_positions_drift_smoothly() {
    let eph = AnalyticEphemeris::new();
    let obs = Observer::fallback();
    let a = eph.observe(Body::Jupiter, at(13, 15), &obs).unwrap();
    let b = eph.observe(Body::Jupiter, at(13, 16), &obs).unwrap();
    // One minute of diurnal motion is at most a quarter degree of arc.
    assert!((a.altitude - b.altitude).abs() < 0.3);
    assert!((a.altitude - b.altitude).abs() > 0.0);
}

#[test]
fn test_julian_day_of_utc_instants() {
    let noon = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    assert_abs_diff_eq!(julian_day_ut(&noon), 2_451_545.0, epsilon = 1e-9);

    let midnight = Utc.with_ymd_and_hms(1992, 12, 20, 0, 0, 0).unwrap();
    assert_abs_diff_eq!(julian_day_ut(&midnight), 2_448_976.5, epsilon = 1e-9);

    let later = noon + chrono::Duration::milliseconds(1500);
    assert_abs_diff_eq!(
        julian_day_ut(&later) - julian_day_ut(&noon),
        1.5 / 86_400.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_analytic_venus_matches_meeus_33a() {
    // Meeus, Astronomical Algorithms, example 33.a: 1992 December 20, 0h TD.
    let (ra, dec) = AnalyticEphemeris::new().equatorial(Body::Venus, 2_448_976.5);
    assert_abs_diff_eq!(ra, 316.1727, epsilon = 0.02);
    assert_abs_diff_eq!(dec, -18.8880, epsilon = 0.02);
}

#[test]
fn test_analytic_pluto_near_meeus_37a() {
    // Meeus example 37.a gives J2000 coordinates for 1992 October 13.0 TD;
    // of-date coordinates differ by under 0.1 deg of precession.
    let eph = AnalyticEphemeris::new();
    let (ra, dec) = eph.equatorial(Body::Pluto, 2_448_908.5);
    assert_abs_diff_eq!(ra, 232.9325, epsilon = 0.25);
    assert_abs_diff_eq!(dec, -4.4581, epsilon = 0.25);

    let pos = eph
        .observe(Body::Pluto, at(13, 15), &Observer::fallback())
        .unwrap();
    assert!((-90.0..=90.0).contains(&pos.altitude), "{pos:?}");
    assert!((0.0..360.0).contains(&pos.azimuth), "{pos:?}");
}
