//! Lunar phase, latitude and upcoming phase instants

use super::solar::{
    ecliptic_to_equatorial_at, mean_ecliptic_longitude, perigee_longitude, solar_longitude_at,
};
use super::{MoonPhases, MoonPosition, days_since_j2000, from_unix_seconds, positive_fmod, unix_seconds};
use crate::constants::lunar::*;
use crate::constants::solar::PROGRESSION as SOLAR_PROGRESSION;
use crate::constants::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES, SECONDS_PER_DAY};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

fn sin_degrees(degrees: f64) -> f64 {
    (degrees * DEGREES_TO_RADIANS).sin()
}

/// Moon's phase and latitude at `at`
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use mateweather::app::services::astronomy::moon_position;
///
/// // Full moon of 25 January 2024
/// let moon = moon_position(Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap());
/// assert!((moon.phase - 180.0).abs() < 2.0);
/// ```
pub fn moon_position(at: DateTime<Utc>) -> MoonPosition {
    moon_position_at(unix_seconds(at))
}

fn moon_position_at(seconds: f64) -> MoonPosition {
    let days = days_since_j2000(seconds);

    let sun_anomaly = (mean_ecliptic_longitude(days) - perigee_longitude(days)) % 360.0;
    let sun_longitude = solar_longitude_at(seconds).radians;
    let sun_longitude_degrees = sun_longitude * RADIANS_TO_DEGREES;

    let mean_longitude = (MEAN_LONGITUDE + PROGRESSION * days) % 360.0;
    let mut mean_anomaly = (mean_longitude
        - PERIGEE_PROGRESSION * days
        - (PERIGEE_MEAN_LONGITUDE + NODE_MEAN_LONGITUDE))
        % 360.0;

    // Evection, annual equation and the third correction
    let evection = 1.2739 * sin_degrees(2.0 * (mean_longitude - sun_longitude_degrees) - mean_anomaly);
    let annual_equation = 0.1858 * sin_degrees(sun_anomaly);
    let third_correction = 0.37 * sin_degrees(sun_anomaly);
    mean_anomaly += evection - annual_equation - third_correction;

    // Equation of centre, fourth correction, variation
    let centre = 6.2886 * sin_degrees(mean_anomaly);
    let mut true_longitude = mean_longitude + evection + centre - annual_equation
        + 0.214 * sin_degrees(2.0 * mean_anomaly);
    true_longitude += 0.6583 * sin_degrees(2.0 * (true_longitude - sun_longitude_degrees));

    let node = ((NODE_MEAN_LONGITUDE - NODE_REGRESSION * days) % 360.0
        - 0.16 * sin_degrees(sun_anomaly))
        * DEGREES_TO_RADIANS;
    let from_node = true_longitude * DEGREES_TO_RADIANS - node;

    let ecliptic_longitude = (from_node.sin() * INCLINATION.cos()).atan2(from_node.cos()) + node;
    let ecliptic_latitude = (from_node.sin() * INCLINATION.sin()).asin();
    let equatorial = ecliptic_to_equatorial_at(seconds, ecliptic_longitude, ecliptic_latitude);

    let phase = positive_fmod((ecliptic_longitude - sun_longitude) * RADIANS_TO_DEGREES, 360.0);

    MoonPosition {
        phase,
        latitude: equatorial.declination * RADIANS_TO_DEGREES,
        ecliptic_latitude: ecliptic_latitude * RADIANS_TO_DEGREES,
    }
}

/// Next new, first quarter, full and third quarter moons after `at`
///
/// Each instant is first estimated from the current phase and the mean
/// relative motion of moon and sun, then refined until the correction is
/// under ten seconds.
pub fn upcoming_moon_phases(at: DateTime<Utc>) -> MoonPhases {
    let start = unix_seconds(at);
    let phase = moon_position_at(start).phase;
    let seconds_per_degree = SECONDS_PER_DAY / (PROGRESSION - SOLAR_PROGRESSION);

    let find = |target: f64| -> DateTime<Utc> {
        let mut estimate = start + positive_fmod(target - phase, 360.0) * seconds_per_degree;

        for iteration in 1..=PHASE_MAX_ITERATIONS {
            let current = moon_position_at(estimate).phase;
            let error = positive_fmod(target - current + 180.0, 360.0) - 180.0;
            let correction = error * seconds_per_degree;
            estimate += correction;
            trace!(
                "Phase {} iteration {}: correction {:.1}s",
                target, iteration, correction
            );
            if correction.abs() < PHASE_TOLERANCE_SECONDS {
                break;
            }
        }

        from_unix_seconds(estimate).unwrap_or(at)
    };

    let phases = MoonPhases {
        new: find(0.0),
        first_quarter: find(90.0),
        full: find(180.0),
        third_quarter: find(270.0),
    };
    debug!("Upcoming moon phases after {}: {:?}", at, phases);
    phases
}
