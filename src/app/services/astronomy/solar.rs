//! Solar position and sunrise/sunset

use super::{
    SunTimes, days_since_j2000, from_unix_seconds, positive_fmod, seconds_since_j2000,
    unix_seconds,
};
use crate::app::models::Coordinates;
use crate::constants::solar::*;
use crate::constants::{
    DAYS_PER_JULIAN_CENTURY, DEGREES_TO_RADIANS, RADIANS_TO_DEGREES, RADIANS_TO_HOURS,
    SECONDS_PER_DAY,
};
use chrono::{DateTime, Duration, Utc};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::{debug, warn};

/// Sun's ecliptic longitude and how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarLongitude {
    /// Longitude in radians, in [0, 2π)
    pub radians: f64,
    /// Kepler's equation was solved within tolerance
    pub converged: bool,
    pub iterations: u32,
}

impl SolarLongitude {
    pub fn degrees(&self) -> f64 {
        self.radians * RADIANS_TO_DEGREES
    }
}

/// Equatorial coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    /// Right ascension in hours, in [0, 24)
    pub right_ascension: f64,
    /// Declination in radians
    pub declination: f64,
}

fn julian_centuries(days: f64) -> f64 {
    days / DAYS_PER_JULIAN_CENTURY
}

/// Mean ecliptic longitude in degrees, `days` after J2000
pub(crate) fn mean_ecliptic_longitude(days: f64) -> f64 {
    MEAN_ECLIPTIC_LONGITUDE + julian_centuries(days) * MEAN_ECLIPTIC_LONGITUDE_RATE
}

/// Longitude of perigee in degrees, `days` after J2000
pub(crate) fn perigee_longitude(days: f64) -> f64 {
    PERIGEE_LONGITUDE + julian_centuries(days) * PERIGEE_LONGITUDE_RATE
}

fn eccentricity(days: f64) -> f64 {
    ECCENTRICITY - julian_centuries(days) * ECCENTRICITY_RATE
}

/// Sun's ecliptic longitude at `at`
pub fn solar_ecliptic_longitude(at: DateTime<Utc>) -> SolarLongitude {
    solar_longitude_at(unix_seconds(at))
}

pub(crate) fn solar_longitude_at(seconds: f64) -> SolarLongitude {
    let days = days_since_j2000(seconds);
    let mean_anomaly = (mean_ecliptic_longitude(days) - perigee_longitude(days)) * DEGREES_TO_RADIANS;
    let e = eccentricity(days);

    // Newton's method on E - e sin E = M
    let mut eccentric_anomaly = mean_anomaly;
    let mut converged = false;
    let mut iterations = 0;
    while iterations < KEPLER_MAX_ITERATIONS {
        let delta = eccentric_anomaly - e * eccentric_anomaly.sin() - mean_anomaly;
        if delta.abs() <= KEPLER_TOLERANCE {
            converged = true;
            break;
        }
        eccentric_anomaly -= delta / (1.0 - e * eccentric_anomaly.cos());
        iterations += 1;
    }

    if !converged {
        warn!(
            "Kepler solver did not converge after {} iterations at t={}",
            iterations, seconds
        );
    }

    let true_anomaly = 2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (eccentric_anomaly / 2.0).tan()).atan();
    let radians = positive_fmod(perigee_longitude(days) * DEGREES_TO_RADIANS + true_anomaly, TAU);

    SolarLongitude {
        radians,
        converged,
        iterations,
    }
}

/// Obliquity of the ecliptic in radians
pub fn ecliptic_obliquity(at: DateTime<Utc>) -> f64 {
    obliquity_at(unix_seconds(at))
}

fn obliquity_at(seconds: f64) -> f64 {
    let centuries = seconds_since_j2000(seconds) / (DAYS_PER_JULIAN_CENTURY * SECONDS_PER_DAY);
    let [c0, c1, c2, c3] = OBLIQUITY_COEFFICIENTS;
    let arcseconds = c0 + centuries * (c1 + centuries * (c2 + centuries * c3));
    arcseconds / 3600.0 * DEGREES_TO_RADIANS
}

/// Convert ecliptic longitude/latitude (radians) to equatorial coordinates
pub fn ecliptic_to_equatorial(at: DateTime<Utc>, longitude: f64, latitude: f64) -> Equatorial {
    ecliptic_to_equatorial_at(unix_seconds(at), longitude, latitude)
}

pub(crate) fn ecliptic_to_equatorial_at(seconds: f64, longitude: f64, latitude: f64) -> Equatorial {
    let obliquity = obliquity_at(seconds);
    let (sin_obl, cos_obl) = obliquity.sin_cos();

    let right_ascension = RADIANS_TO_HOURS
        * (longitude.sin() * cos_obl - latitude.tan() * sin_obl).atan2(longitude.cos());
    let declination =
        (latitude.sin() * cos_obl + latitude.cos() * sin_obl * longitude.sin()).asin();

    Equatorial {
        right_ascension: positive_fmod(right_ascension, 24.0),
        declination,
    }
}

/// Sidereal rise and set times in hours, or `None` if the body never
/// crosses the horizon at this latitude
fn sidereal_rise_set(position: &Equatorial, latitude: f64, longitude: f64) -> Option<(f64, f64)> {
    let argument = -latitude.tan() * position.declination.tan();
    if !(-1.0..=1.0).contains(&argument) {
        return None;
    }

    let hour_angle = RADIANS_TO_HOURS * argument.acos();
    let offset = position.right_ascension - RADIANS_TO_HOURS * longitude;
    let rise = positive_fmod(24.0 - hour_angle + offset, 24.0);
    let set = positive_fmod(hour_angle + offset, 24.0);
    Some((rise, set))
}

/// Greenwich sidereal time at 0h UT of the day containing `seconds`, in hours
fn sidereal_time_at_midnight(seconds: f64) -> f64 {
    let centuries = (seconds_since_j2000(seconds) / SECONDS_PER_DAY).trunc() / DAYS_PER_JULIAN_CENTURY;
    positive_fmod(
        6.697_374_558 + 2400.051_366 * centuries + 2.5862e-5 * centuries * centuries,
        24.0,
    )
}

/// Sunrise and sunset for the local day containing `at`
///
/// The local day runs from the midnight of the nominal time zone implied by
/// the longitude (15° per hour). Without a location nothing is computed.
pub fn sun_times(coordinates: Option<&Coordinates>, at: DateTime<Utc>) -> SunTimes {
    let Some(coordinates) = coordinates else {
        return SunTimes::unavailable();
    };
    let result = compute_sun_times(coordinates, unix_seconds(at));
    debug!(
        "Sun times at ({:.3}, {:.3}): {:?}",
        coordinates.latitude_degrees(),
        coordinates.longitude_degrees(),
        result
    );
    result
}

/// Local-zone midnight at or before `seconds`, and the zone offset in hours
fn local_midnight(longitude: f64, seconds: f64) -> (f64, f64) {
    let utc_midnight = seconds - seconds.rem_euclid(SECONDS_PER_DAY);
    let zone_offset = ((longitude * RADIANS_TO_DEGREES + 7.5) / 15.0).floor();

    let mut midnight = utc_midnight - 3600.0 * zone_offset;
    if seconds - midnight >= SECONDS_PER_DAY {
        midnight += SECONDS_PER_DAY;
    } else if midnight > seconds {
        midnight -= SECONDS_PER_DAY;
    }
    (midnight, zone_offset)
}

fn compute_sun_times(coordinates: &Coordinates, seconds: f64) -> SunTimes {
    let latitude = coordinates.latitude;
    let longitude = coordinates.longitude;
    let (midnight, zone_offset) = local_midnight(longitude, seconds);

    // Sun's position at the bounding midnights
    let lambda = solar_longitude_at(midnight).radians;
    let today = ecliptic_to_equatorial_at(midnight, lambda, 0.0);
    let tomorrow = ecliptic_to_equatorial_at(
        midnight + SECONDS_PER_DAY,
        lambda + PROGRESSION * DEGREES_TO_RADIANS,
        0.0,
    );

    // Each flag needs the sun on the same side of the horizon at both
    // midnights, so the two can never hold together
    let min_declination = today.declination.min(tomorrow.declination);
    let max_declination = today.declination.max(tomorrow.declination);

    let midnight_sun =
        latitude > FRAC_PI_2 - min_declination || latitude < -FRAC_PI_2 - max_declination;
    let polar_night =
        latitude > FRAC_PI_2 + max_declination || latitude < -FRAC_PI_2 + min_declination;

    if midnight_sun || polar_night {
        return SunTimes {
            sunrise: None,
            sunset: None,
            midnight_sun,
            polar_night,
        };
    }

    rise_and_set(
        latitude,
        longitude,
        midnight,
        zone_offset,
        (&today, &tomorrow),
    )
    .unwrap_or_else(|| {
        debug!("No valid rise/set for latitude {:.4} rad", latitude);
        SunTimes::unavailable()
    })
}

fn rise_and_set(
    latitude: f64,
    longitude: f64,
    midnight: f64,
    zone_offset: f64,
    (today, tomorrow): (&Equatorial, &Equatorial),
) -> Option<SunTimes> {
    let zone_longitude = longitude - zone_offset * PI / 12.0;
    let (mut rise1, mut set1) = sidereal_rise_set(today, latitude, zone_longitude)?;
    let (mut rise2, mut set2) = sidereal_rise_set(tomorrow, latitude, zone_longitude)?;

    if rise2 < rise1 {
        rise2 += 24.0;
    }
    if set2 < set1 {
        set2 += 24.0;
    }

    let gst_midnight = sidereal_time_at_midnight(midnight);
    let mut gst_local = gst_midnight - (zone_offset + RADIANS_TO_HOURS * longitude) * SIDEREAL_RATE;
    if gst_local < 0.0 {
        gst_local += 24.0;
    }

    if rise1 < gst_local {
        rise1 += 24.0;
        rise2 += 24.0;
    }
    if set1 < gst_local {
        set1 += 24.0;
        set2 += 24.0;
    }

    // Interpolate between the two days' sidereal times
    let rise = (24.07 * rise1 - gst_local * (rise2 - rise1)) / (24.07 + rise1 - rise2);
    let set = (24.07 * set1 - gst_local * (set2 - set1)) / (24.07 + set1 - set2);

    // Refraction, parallax and semi-diameter
    let declination = (today.declination + tomorrow.declination) / 2.0;
    let correction = HORIZON_CORRECTION * DEGREES_TO_RADIANS;
    let u_argument = latitude.sin() / declination.cos();
    if !(-1.0..=1.0).contains(&u_argument) {
        return None;
    }
    let u = u_argument.acos();
    let shift_argument = correction.sin() / u.sin();
    if !(-1.0..=1.0).contains(&shift_argument) {
        return None;
    }
    let shift = RADIANS_TO_HOURS * shift_argument.asin() / declination.cos();

    let rise_hours = positive_fmod((rise - shift - gst_midnight) * SOLAR_RATE, 24.0);
    let set_hours = positive_fmod((set + shift - gst_midnight) * SOLAR_RATE, 24.0);

    Some(SunTimes {
        sunrise: from_unix_seconds(midnight + rise_hours * 3600.0),
        sunset: from_unix_seconds(midnight + set_hours * 3600.0),
        midnight_sun: false,
        polar_night: false,
    })
}

/// Time until the next sunrise, sunset or local-zone midnight
///
/// Returns `None` without a location.
pub fn next_sun_event(coordinates: Option<&Coordinates>, now: DateTime<Utc>) -> Option<Duration> {
    let coordinates = coordinates?;
    let seconds = unix_seconds(now);
    let (midnight, _) = local_midnight(coordinates.longitude, seconds);
    let next_midnight = from_unix_seconds(midnight + SECONDS_PER_DAY)?;

    let times = sun_times(Some(coordinates), now);
    [times.sunrise, times.sunset, Some(next_midnight)]
        .into_iter()
        .flatten()
        .filter(|event| *event > now)
        .min()
        .map(|event| event - now)
}

/// Whether the sun is up at `now` for the day described by `times`
pub fn is_daytime(times: &SunTimes, now: DateTime<Utc>) -> bool {
    if times.midnight_sun {
        return true;
    }
    if times.polar_night {
        return false;
    }
    match (times.sunrise, times.sunset) {
        (Some(sunrise), Some(sunset)) if sunrise <= sunset => now >= sunrise && now < sunset,
        (Some(sunrise), Some(sunset)) => now >= sunrise || now < sunset,
        _ => false,
    }
}
