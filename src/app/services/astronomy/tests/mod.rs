//! Test utilities for the ephemeris routines
//!
//! Reference values come from published almanac times; tolerances reflect
//! the low-precision formulae.

use chrono::{DateTime, TimeZone, Utc};

use crate::app::models::Coordinates;

// Test modules
mod lunar_tests;
mod solar_tests;

/// UTC instant helper
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}

/// Observer at the given decimal degrees
pub fn location(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::from_degrees(latitude, longitude).unwrap()
}

/// Royal Observatory, Greenwich
pub fn greenwich() -> Coordinates {
    location(51.4769, -0.0005)
}

/// Assert two instants agree within `seconds`
pub fn assert_near_instant(actual: DateTime<Utc>, expected: DateTime<Utc>, seconds: i64) {
    let difference = (actual - expected).num_seconds().abs();
    assert!(
        difference <= seconds,
        "expected {} ± {}s, got {} ({}s off)",
        expected,
        seconds,
        actual,
        difference
    );
}

/// Signed angular difference in degrees, in [-180, 180)
pub fn angle_difference(a: f64, b: f64) -> f64 {
    (a - b + 540.0).rem_euclid(360.0) - 180.0
}
