//! Integration tests for the sun and moon calculations
//!
//! These tests combine the ephemeris with decoded reports and observer
//! coordinates, as the weather display does when choosing an icon.

use chrono::{DateTime, Duration, TimeZone, Utc};
use mateweather::app::services::astronomy::{
    moon_position, next_sun_event, sun_times, upcoming_moon_phases,
};
use mateweather::app::services::summary::icon_name;
use mateweather::{Coordinates, MetarParser, Report, Sky};

const SYNODIC_MONTH_SECONDS: i64 = 2_551_443;

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

fn clear_sky() -> Report {
    Report {
        sky: Some(Sky::Clear),
        ..Report::default()
    }
}

/// Test station-notation coordinates give the same sun times as decimals
///
/// Purpose: Validate DMS parsing feeds the rise/set calculation correctly
/// Benefit: Ensures both CLI location forms agree
#[test]
fn test_dms_and_decimal_greenwich_agree() {
    let dms = Coordinates::parse("51-28-37N 000-00-02W").unwrap();
    let decimal = Coordinates::from_degrees(51.4769, -0.0005).unwrap();
    let at = utc(2024, 6, 21, 12, 0);

    let from_dms = sun_times(Some(&dms), at);
    let from_decimal = sun_times(Some(&decimal), at);

    let sunrise_gap = (from_dms.sunrise.unwrap() - from_decimal.sunrise.unwrap()).num_seconds();
    let sunset_gap = (from_dms.sunset.unwrap() - from_decimal.sunset.unwrap()).num_seconds();
    assert!(sunrise_gap.abs() <= 5);
    assert!(sunset_gap.abs() <= 5);

    let expected_sunrise = utc(2024, 6, 21, 3, 43);
    assert!((from_dms.sunrise.unwrap() - expected_sunrise).num_seconds().abs() <= 180);
}

/// Test the clear-sky icon switches between day and night at Greenwich
///
/// Purpose: Validate sun times and moon phase combine into the icon name
/// Benefit: Covers the night icon near full moon, which carries no suffix
#[test]
fn test_clear_sky_icon_day_and_night() {
    let greenwich = Coordinates::from_degrees(51.4769, -0.0005).unwrap();
    let report = clear_sky();

    let noon = utc(2024, 6, 21, 12, 0);
    let sun = sun_times(Some(&greenwich), noon);
    let moon = moon_position(noon);
    assert_eq!(
        icon_name(&report, &sun, Some((&moon, &greenwich)), noon),
        "weather-clear"
    );

    // Two hours before the full moon of 22 June 2024
    let night = utc(2024, 6, 21, 23, 0);
    let sun = sun_times(Some(&greenwich), night);
    let moon = moon_position(night);
    assert_eq!(
        icon_name(&report, &sun, Some((&moon, &greenwich)), night),
        "weather-clear-night"
    );
}

/// Test the polar night shows a night icon at noon
///
/// Purpose: Validate that a day with no sunrise counts as night
/// Benefit: Ensures high-latitude stations never show a daytime sun in December
#[test]
fn test_polar_night_icon_at_noon() {
    let svalbard = Coordinates::from_degrees(80.0, 15.0).unwrap();
    let noon = utc(2024, 12, 21, 12, 0);
    let sun = sun_times(Some(&svalbard), noon);
    assert!(sun.polar_night);

    let moon = moon_position(noon);
    let icon = icon_name(&clear_sky(), &sun, Some((&moon, &svalbard)), noon);
    assert!(icon.starts_with("weather-clear-night"), "got {}", icon);
}

/// Test sun times serialize with RFC 3339 instants
///
/// Purpose: Validate the JSON shape used by `sun --format json`
/// Benefit: Keeps the machine-readable output stable
#[test]
fn test_sun_times_json() {
    let greenwich = Coordinates::from_degrees(51.4769, -0.0005).unwrap();
    let times = sun_times(Some(&greenwich), utc(2024, 6, 21, 12, 0));
    let value = serde_json::to_value(times).unwrap();

    assert_eq!(value["midnight_sun"], serde_json::json!(false));
    assert_eq!(value["polar_night"], serde_json::json!(false));
    let sunrise = value["sunrise"].as_str().unwrap();
    assert!(sunrise.starts_with("2024-06-21T03:4"), "got {}", sunrise);
}

/// Test moon phases are computed from a report's observation time
///
/// Purpose: Validate the decoded time can drive the lunar calculation
/// Benefit: Ensures upcoming phases always fall in the next lunation
#[test]
fn test_moon_phases_after_observation() {
    let report = MetarParser::new()
        .with_reference_time(utc(2024, 3, 25, 0, 0))
        .parse("221751Z 18015G25KT 1/4SM +TSRA BKN008 OVC015 18/17 A2992");
    let observed = report.observation_time.unwrap();

    let phases = upcoming_moon_phases(observed);
    for (name, at) in phases.chronological() {
        assert!(at > observed, "{} precedes the observation", name);
        assert!(
            (at - observed).num_seconds() < SYNODIC_MONTH_SECONDS,
            "{} is more than a lunation away",
            name
        );
    }
}

/// Test the next sun event is always within a day
///
/// Purpose: Validate the refresh delay used by a periodic display
/// Benefit: Guards against a negative or multi-day wait
#[test]
fn test_next_sun_event_within_a_day() {
    let sydney = Coordinates::from_degrees(-33.87, 151.21).unwrap();
    let start = utc(2024, 1, 1, 0, 0);

    for hour in 0..48 {
        let now = start + Duration::hours(hour);
        let wait = next_sun_event(Some(&sydney), now).unwrap();
        assert!(wait > Duration::zero(), "hour {}: {:?}", hour, wait);
        assert!(wait <= Duration::hours(24), "hour {}: {:?}", hour, wait);
    }

    assert!(next_sun_event(None, start).is_none());
}
