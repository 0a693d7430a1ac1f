//! Low-precision sun and moon ephemeris
//!
//! Classical formulae good to a few minutes for rise/set and a degree or two
//! for lunar phase, which is all a weather display needs.
//!
//! ## Architecture
//!
//! - [`solar`] - Solar longitude, equatorial conversion, sunrise/sunset
//! - [`lunar`] - Lunar phase and latitude, upcoming phase instants
//!
//! Every routine is a pure function of its inputs. Conditions with no answer
//! (polar day, polar night, a missing location) are reported through the
//! returned values rather than as errors.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use mateweather::Coordinates;
//! use mateweather::app::services::astronomy::sun_times;
//!
//! let quito = Coordinates::from_degrees(-0.18, -78.47).unwrap();
//! let at = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
//! let times = sun_times(Some(&quito), at);
//!
//! assert!(times.sunrise.is_some() && times.sunset.is_some());
//! assert!(!times.midnight_sun && !times.polar_night);
//! ```

pub mod lunar;
pub mod solar;

#[cfg(test)]
pub mod tests;

pub use lunar::{moon_position, upcoming_moon_phases};
pub use solar::{
    Equatorial, SolarLongitude, ecliptic_obliquity, ecliptic_to_equatorial, is_daytime,
    next_sun_event, solar_ecliptic_longitude, sun_times,
};

use crate::constants::{J2000_EPOCH_SECONDS, SECONDS_PER_DAY};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Sunrise and sunset for the local day containing an instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SunTimes {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    /// The sun stays above the horizon all day
    pub midnight_sun: bool,
    /// The sun stays below the horizon all day
    pub polar_night: bool,
}

impl SunTimes {
    /// No rise or set could be computed
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Both instants are known
    pub fn is_valid(&self) -> bool {
        self.sunrise.is_some() && self.sunset.is_some()
    }

    /// Length of daylight, when both instants are known
    pub fn day_length(&self) -> Option<chrono::Duration> {
        let (sunrise, sunset) = (self.sunrise?, self.sunset?);
        let length = sunset - sunrise;
        if length < chrono::Duration::zero() {
            Some(length + chrono::Duration::days(1))
        } else {
            Some(length)
        }
    }
}

/// Lunar phase and latitude at an instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonPosition {
    /// Elongation from the sun in degrees: 0 new, 90 first quarter, 180 full
    pub phase: f64,
    /// Declination in degrees
    pub latitude: f64,
    /// Ecliptic latitude in degrees
    pub ecliptic_latitude: f64,
}

impl MoonPosition {
    /// Fraction of the disc illuminated
    pub fn illumination(&self) -> f64 {
        (1.0 - self.phase.to_radians().cos()) / 2.0
    }
}

/// Next instants of each principal lunar phase after a reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoonPhases {
    pub new: DateTime<Utc>,
    pub first_quarter: DateTime<Utc>,
    pub full: DateTime<Utc>,
    pub third_quarter: DateTime<Utc>,
}

impl MoonPhases {
    /// Phases in chronological order, with their names
    pub fn chronological(&self) -> Vec<(&'static str, DateTime<Utc>)> {
        let mut phases = vec![
            ("New moon", self.new),
            ("First quarter", self.first_quarter),
            ("Full moon", self.full),
            ("Third quarter", self.third_quarter),
        ];
        phases.sort_by_key(|(_, at)| *at);
        phases
    }
}

// =============================================================================
// Time Helpers
// =============================================================================

/// Unix seconds, including the fractional part
pub(crate) fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) / 1e9
}

/// Instant from fractional Unix seconds
pub(crate) fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Seconds since J2000
pub(crate) fn seconds_since_j2000(seconds: f64) -> f64 {
    seconds - J2000_EPOCH_SECONDS
}

/// Days since J2000
pub(crate) fn days_since_j2000(seconds: f64) -> f64 {
    seconds_since_j2000(seconds) / SECONDS_PER_DAY
}

/// Floating-point remainder that is never negative
pub(crate) fn positive_fmod(value: f64, modulus: f64) -> f64 {
    let remainder = value % modulus;
    if remainder < 0.0 {
        remainder + modulus
    } else {
        remainder
    }
}
