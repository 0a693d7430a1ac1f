//! Tests for solar position and sunrise/sunset

use super::*;
use crate::app::services::astronomy::{
    SunTimes, ecliptic_obliquity, ecliptic_to_equatorial, is_daytime, next_sun_event,
    solar_ecliptic_longitude, sun_times,
};
use chrono::{Datelike, Duration};

#[test]
fn test_solar_longitude_at_equinox_and_solstice() {
    let equinox = solar_ecliptic_longitude(utc(2024, 3, 20, 3, 6, 0));
    assert!(equinox.converged);
    assert!(angle_difference(equinox.degrees(), 0.0).abs() < 1.0);

    let solstice = solar_ecliptic_longitude(utc(2024, 6, 20, 20, 51, 0));
    assert!(angle_difference(solstice.degrees(), 90.0).abs() < 1.0);
    assert!(solstice.radians >= 0.0 && solstice.radians < std::f64::consts::TAU);
}

#[test]
fn test_kepler_solver_converges_quickly() {
    for month in 1..=12 {
        let longitude = solar_ecliptic_longitude(utc(2024, month, 1, 0, 0, 0));
        assert!(longitude.converged);
        assert!(longitude.iterations <= 5, "took {} iterations", longitude.iterations);
    }
}

#[test]
fn test_obliquity_at_j2000() {
    let obliquity = ecliptic_obliquity(utc(2000, 1, 1, 12, 0, 0)).to_degrees();
    assert!((obliquity - 23.439_291).abs() < 1e-4);
}

#[test]
fn test_ecliptic_to_equatorial_cardinal_points() {
    let at = utc(2024, 1, 1, 0, 0, 0);

    let vernal = ecliptic_to_equatorial(at, 0.0, 0.0);
    assert!(vernal.right_ascension.abs() < 1e-9);
    assert!(vernal.declination.abs() < 1e-9);

    let summer = ecliptic_to_equatorial(at, std::f64::consts::FRAC_PI_2, 0.0);
    assert!((summer.right_ascension - 6.0).abs() < 1e-9);
    assert!((summer.declination - ecliptic_obliquity(at)).abs() < 1e-9);

    let autumn = ecliptic_to_equatorial(at, 1.5 * std::f64::consts::PI, 0.0);
    assert!((autumn.right_ascension - 18.0).abs() < 1e-9);
}

#[test]
fn test_sun_times_without_location() {
    let times = sun_times(None, utc(2024, 6, 21, 12, 0, 0));
    assert_eq!(times, SunTimes::unavailable());
    assert!(!times.is_valid());
    assert!(next_sun_event(None, utc(2024, 6, 21, 12, 0, 0)).is_none());
}

/// Test sunrise/sunset at the equator throughout the year
///
/// Purpose: The equator must always report two instants about 12 hours apart
/// Benefit: Exercises the interpolation and correction steps across seasons
#[test]
fn test_equator_day_length_all_year() {
    let equator = location(0.0, 0.0);

    for month in 1..=12 {
        let times = sun_times(Some(&equator), utc(2023, month, 15, 12, 0, 0));
        assert!(times.is_valid(), "month {} has no rise/set", month);
        assert!(!times.midnight_sun && !times.polar_night);

        let hours = times.day_length().unwrap().num_seconds() as f64 / 3600.0;
        assert!((hours - 12.0).abs() < 0.25, "month {}: {} hours", month, hours);
    }
}

#[test]
fn test_equator_equinox_times() {
    let times = sun_times(Some(&location(0.0, 0.0)), utc(2024, 3, 20, 12, 0, 0));

    assert_near_instant(times.sunrise.unwrap(), utc(2024, 3, 20, 6, 4, 48), 120);
    assert_near_instant(times.sunset.unwrap(), utc(2024, 3, 20, 18, 11, 16), 120);
}

#[test]
fn test_greenwich_solstices() {
    let june = sun_times(Some(&greenwich()), utc(2024, 6, 21, 12, 0, 0));
    assert_near_instant(june.sunrise.unwrap(), utc(2024, 6, 21, 3, 43, 0), 180);
    assert_near_instant(june.sunset.unwrap(), utc(2024, 6, 21, 20, 21, 0), 180);

    let december = sun_times(Some(&greenwich()), utc(2024, 12, 21, 12, 0, 0));
    assert_near_instant(december.sunrise.unwrap(), utc(2024, 12, 21, 8, 4, 0), 180);
    assert_near_instant(december.sunset.unwrap(), utc(2024, 12, 21, 15, 53, 0), 180);
}

#[test]
fn test_western_longitude_sunset_after_utc_midnight() {
    let new_york = location(40.7128, -74.006);
    let times = sun_times(Some(&new_york), utc(2024, 6, 21, 18, 0, 0));

    assert_near_instant(times.sunrise.unwrap(), utc(2024, 6, 21, 9, 25, 0), 180);
    assert_near_instant(times.sunset.unwrap(), utc(2024, 6, 22, 0, 31, 0), 180);
    assert_eq!(times.sunset.unwrap().day(), 22);
}

#[test]
fn test_midnight_sun_at_high_latitudes() {
    let north = sun_times(Some(&location(80.0, 0.0)), utc(2024, 6, 21, 12, 0, 0));
    assert!(north.midnight_sun);
    assert!(!north.polar_night);
    assert!(north.sunrise.is_none() && north.sunset.is_none());

    let south = sun_times(Some(&location(-80.0, 0.0)), utc(2024, 12, 21, 12, 0, 0));
    assert!(south.midnight_sun);
    assert!(south.sunrise.is_none() && south.sunset.is_none());
}

#[test]
fn test_polar_night_at_high_latitudes() {
    let north = sun_times(Some(&location(80.0, 0.0)), utc(2024, 12, 21, 12, 0, 0));
    assert!(north.polar_night);
    assert!(!north.midnight_sun);
    assert!(!north.is_valid());

    let south = sun_times(Some(&location(-80.0, 0.0)), utc(2024, 6, 21, 12, 0, 0));
    assert!(south.polar_night);
}

/// Test the polar flags never both hold, including across an equinox
///
/// Purpose: Validates that a day where the declination changes sign is
/// neither midnight sun nor polar night at the poles
/// Benefit: Keeps `SunTimes` in a single state for icon and CLI output
#[test]
fn test_polar_flags_exclusive_at_equinox() {
    for latitude in [-90.0, 90.0] {
        let times = sun_times(Some(&location(latitude, 0.0)), utc(2024, 3, 20, 12, 0, 0));
        assert!(!times.midnight_sun, "latitude {}: {:?}", latitude, times);
        assert!(!times.polar_night, "latitude {}: {:?}", latitude, times);
        assert!(times.sunrise.is_none() && times.sunset.is_none());
    }

    let start = utc(2024, 3, 10, 12, 0, 0);
    for day in 0..400 {
        let at = start + Duration::days(day);
        for latitude in [-90.0, -85.0, -70.0, 70.0, 85.0, 90.0] {
            let times = sun_times(Some(&location(latitude, 0.0)), at);
            assert!(
                !(times.midnight_sun && times.polar_night),
                "latitude {} at {}: {:?}",
                latitude,
                at,
                times
            );
        }
    }
}

/// Test the poles switch state on either side of the March equinox
///
/// Purpose: Validates the south pole uses the same bounding declinations
/// Benefit: Catches a swapped minimum/maximum in the southern checks
#[test]
fn test_poles_after_march_equinox() {
    let at = utc(2024, 4, 1, 12, 0, 0);
    let north = sun_times(Some(&location(90.0, 0.0)), at);
    assert!(north.midnight_sun && !north.polar_night);

    let south = sun_times(Some(&location(-90.0, 0.0)), at);
    assert!(south.polar_night && !south.midnight_sun);
}

#[test]
fn test_next_sun_event() {
    let greenwich = greenwich();

    // Before sunrise
    let wait = next_sun_event(Some(&greenwich), utc(2024, 6, 21, 2, 0, 0)).unwrap();
    assert!((wait - Duration::minutes(103)).num_seconds().abs() <= 180);

    // Daytime, next event is sunset
    let wait = next_sun_event(Some(&greenwich), utc(2024, 6, 21, 12, 0, 0)).unwrap();
    assert!((wait - Duration::minutes(501)).num_seconds().abs() <= 180);

    // After sunset, next event is local midnight
    let wait = next_sun_event(Some(&greenwich), utc(2024, 6, 21, 22, 0, 0)).unwrap();
    assert_eq!(wait, Duration::hours(2));
}

#[test]
fn test_is_daytime() {
    let greenwich = greenwich();
    let noon = utc(2024, 6, 21, 12, 0, 0);
    let times = sun_times(Some(&greenwich), noon);

    assert!(is_daytime(&times, noon));
    assert!(!is_daytime(&times, utc(2024, 6, 21, 23, 0, 0)));
    assert!(!is_daytime(&times, utc(2024, 6, 21, 1, 0, 0)));

    let polar = sun_times(Some(&location(80.0, 0.0)), noon);
    assert!(is_daytime(&polar, utc(2024, 6, 21, 0, 0, 0)));
    assert!(!is_daytime(&SunTimes::unavailable(), noon));
}
