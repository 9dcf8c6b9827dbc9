use std::collections::BTreeMap;

use fieldrot_core::error::FieldRotError;
use fieldrot_core::observer::{
    resolve_observer, Gazetteer, GeocodeFallback, Geocoder, Observer, ObserverSource,
};

fn gazetteer() -> Gazetteer {
    let mut places = BTreeMap::new();
    places.insert("Melbourne".to_string(), Observer::new(-37.814, 144.96332, None));
    places.insert("Mauna Kea".to_string(), Observer::new(19.8207, -155.468, Some(4205.0)));
    Gazetteer::new(&places)
}

#[test]
fn test_gazetteer_lookup_ignores_case_and_whitespace() {
    let g = gazetteer();
    assert_eq!(g.len(), 2);
    assert!(!g.is_empty());

    let obs = g.locate("  mauna KEA ").unwrap();
    assert_eq!(obs.latitude, 19.8207);
    assert_eq!(obs.elevation, Some(4205.0));
}

#[test]
fn test_gazetteer_unknown_place() {
    let err = gazetteer().locate("Atlantis").unwrap_err();
    assert!(matches!(err, FieldRotError::GeocodeFailure { ref place, .. } if place == "Atlantis"));
}

#[test]
fn test_literal_observer_passes_through() {
    let obs = Observer::new(51.5, -0.1, None);
    let resolved = resolve_observer(&ObserverSource::Literal(obs), &Gazetteer::default()).unwrap();
    assert_eq!(resolved, obs);
}

#[test]
fn test_place_resolves_through_geocoder() {
    let source = ObserverSource::Place {
        name: "melbourne".into(),
        on_failure: GeocodeFallback::Abort,
    };
    let obs = resolve_observer(&source, &gazetteer()).unwrap();
    assert_eq!(obs.longitude, 144.96332);
}

#[test]
fn test_geocode_failure_aborts_by_default() {
    let source = ObserverSource::Place {
        name: "Nowhere".into(),
        on_failure: GeocodeFallback::default(),
    };
    let err = resolve_observer(&source, &gazetteer()).unwrap_err();
    assert!(matches!(err, FieldRotError::GeocodeFailure { .. }));
}

#[test]
fn test_geocode_failure_can_fall_back() {
    let source = ObserverSource::Place {
        name: "Nowhere".into(),
        on_failure: GeocodeFallback::UseDefault,
    };
    let obs = resolve_observer(&source, &gazetteer()).unwrap();
    assert_eq!(obs, Observer::fallback());
    assert_eq!(obs.latitude, -37.814);
}

struct BrokenGeocoder;

impl Geocoder for BrokenGeocoder {
    fn locate(&self, _: &str) -> fieldrot_core::error::Result<Observer> {
        Err(FieldRotError::InvalidConfig("service misconfigured".into()))
    }
}

#[test]
fn test_only_geocode_failures_fall_back() {
    let source = ObserverSource::Place {
        name: "Melbourne".into(),
        on_failure: GeocodeFallback::UseDefault,
    };
    let err = resolve_observer(&source, &BrokenGeocoder).unwrap_err();
    assert!(matches!(err, FieldRotError::InvalidConfig(_)));
}

#[test]
fn test_observer_source_toml_forms() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        observer: ObserverSource,
    }

    let literal: Wrapper =
        toml::from_str("[observer]\nkind = \"literal\"\nlatitude = 10.0\nlongitude = 20.0\n")
            .unwrap();
    assert_eq!(literal.observer, ObserverSource::Literal(Observer::new(10.0, 20.0, None)));

    let place: Wrapper = toml::from_str("[observer]\nkind = \"place\"\nname = \"Melbourne\"\n").unwrap();
    assert_eq!(
        place.observer,
        ObserverSource::Place {
            name: "Melbourne".into(),
            on_failure: GeocodeFallback::Abort,
        }
    );
}

#[test]
fn test_fallback_display() {
    assert_eq!(GeocodeFallback::Abort.to_string(), "Abort");
    assert_eq!(GeocodeFallback::UseDefault.to_string(), "Use Default Location");
}
