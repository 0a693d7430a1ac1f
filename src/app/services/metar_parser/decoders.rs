//! Field decoders for METAR tokens
//!
//! Each decoder takes the text of a single token and returns a typed value,
//! or `None` when the token cannot be interpreted. Decoders never fail
//! loudly; a malformed token simply leaves its report field unknown.

use super::tokenizer::{FieldKind, pattern};
use crate::app::models::units::celsius_to_fahrenheit;
use crate::app::models::{
    Condition, DuplicateFieldPolicy, Intensity, Phenomenon, Qualifier, Report, Sky, WindDirection,
};
use crate::constants::conversions::{HPA_TO_INCH, KNOTS_TO_MS, MILES_TO_M};
use crate::constants::{BELOW_MINIMUM_VISIBILITY_MILES, CAVOK_VISIBILITY_METERS};
use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use tracing::debug;

/// Decoded wind group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    /// `None` for a bearing outside 0–360
    pub direction: Option<WindDirection>,
    pub speed_knots: f64,
    pub gust_knots: Option<f64>,
}

/// Decoded visibility group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    pub miles: f64,
    /// CAVOK also reports a clear sky
    pub cavok: bool,
}

/// Decoded temperature/dew point group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    pub temperature_f: f64,
    pub dew_point_f: Option<f64>,
}

/// Value produced by one of the field decoders
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded {
    Time(DateTime<Utc>),
    Wind(Wind),
    Visibility(Visibility),
    Condition(Condition),
    Cloud(Sky),
    Temperature(Temperatures),
    Pressure(f64),
}

/// Dispatch a token to the decoder for its field kind
pub fn decode(kind: FieldKind, token: &str, reference: DateTime<Utc>) -> Option<Decoded> {
    match kind {
        FieldKind::Time => decode_time(token, reference).map(Decoded::Time),
        FieldKind::Wind => decode_wind(token).map(Decoded::Wind),
        FieldKind::Visibility => decode_visibility(token).map(Decoded::Visibility),
        FieldKind::Condition => Some(Decoded::Condition(decode_condition(token))),
        FieldKind::Cloud => decode_cloud(token).map(Decoded::Cloud),
        FieldKind::Temperature => decode_temperature(token).map(Decoded::Temperature),
        FieldKind::Pressure => decode_pressure(token).map(Decoded::Pressure),
    }
}

impl Decoded {
    /// Write the decoded value into the fields of `report` it owns
    pub fn apply(self, report: &mut Report, policy: DuplicateFieldPolicy) {
        fn set<T>(field: &mut Option<T>, value: T, policy: DuplicateFieldPolicy) {
            if policy.allows(field) {
                *field = Some(value);
            }
        }

        match self {
            Decoded::Time(time) => set(&mut report.observation_time, time, policy),
            Decoded::Wind(wind) => {
                // Direction, speed and gust are one group and are replaced together
                if policy.allows(&report.wind_speed_knots) {
                    report.wind_direction = wind.direction;
                    report.wind_speed_knots = Some(wind.speed_knots);
                    report.wind_gust_knots = wind.gust_knots;
                }
            }
            Decoded::Visibility(visibility) => {
                set(&mut report.visibility_miles, visibility.miles, policy);
                if visibility.cavok {
                    set(&mut report.sky, Sky::Clear, policy);
                }
            }
            Decoded::Condition(condition) => set(&mut report.condition, condition, policy),
            Decoded::Cloud(sky) => set(&mut report.sky, sky, policy),
            Decoded::Temperature(temperatures) => {
                if policy.allows(&report.temperature_f) {
                    report.temperature_f = Some(temperatures.temperature_f);
                    report.dew_point_f = temperatures.dew_point_f;
                }
            }
            Decoded::Pressure(inches) => set(&mut report.pressure_inhg, inches, policy),
        }
    }
}

// =============================================================================
// Time
// =============================================================================

/// Decode `DDHHMMZ` into the most recent matching instant
///
/// The month and year are taken from `reference`. A day later than the
/// reference day while the reference is on the 1st is read as last month's
/// report; the day is clamped to that month's length.
pub fn decode_time(token: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = pattern(FieldKind::Time).captures(token)?;
    let day: u32 = caps.name("day")?.as_str().parse().ok()?;
    let hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
    let minute: u32 = caps.name("minute")?.as_str().parse().ok()?;

    if day == 0 || day > 31 {
        debug!("Ignoring time group '{}': day {} out of range", token, day);
        return None;
    }

    let this_month = NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1)?;
    let date = if day > reference.day() && reference.day() == 1 {
        let last_month = this_month.checked_sub_months(Months::new(1))?;
        let days_in_month = this_month.signed_duration_since(last_month).num_days() as u32;
        last_month.with_day(day.min(days_in_month))?
    } else {
        this_month.with_day(day)?
    };

    let observed = date.and_hms_opt(hour, minute, 0)?;
    Some(Utc.from_utc_datetime(&observed))
}

// =============================================================================
// Wind
// =============================================================================

/// Decode `dddss[Ggg][KT|MPS]` or `VRBss...`; no unit means knots
pub fn decode_wind(token: &str) -> Option<Wind> {
    let caps = pattern(FieldKind::Wind).captures(token)?;
    let direction = caps.name("direction")?.as_str();
    let mut speed: f64 = caps.name("speed")?.as_str().parse().ok()?;
    let mut gust: Option<f64> = match caps.name("gust") {
        Some(gust) => Some(gust.as_str().parse().ok()?),
        None => None,
    };

    if caps.name("unit").is_some_and(|unit| unit.as_str() == "MPS") {
        speed /= KNOTS_TO_MS;
        gust = gust.map(|g| g / KNOTS_TO_MS);
    }

    let direction = if direction == "VRB" {
        Some(WindDirection::Variable)
    } else {
        let degrees: u16 = direction.parse().ok()?;
        if degrees == 0 && speed == 0.0 {
            Some(WindDirection::Calm)
        } else {
            let point = WindDirection::from_degrees(degrees);
            if point.is_none() {
                debug!("Wind bearing {} out of range in '{}'", degrees, token);
            }
            point
        }
    };

    Some(Wind {
        direction,
        speed_knots: speed,
        gust_knots: gust,
    })
}

// =============================================================================
// Visibility
// =============================================================================

/// Decode statute, metric or CAVOK visibility into statute miles
pub fn decode_visibility(token: &str) -> Option<Visibility> {
    let caps = pattern(FieldKind::Visibility).captures(token)?;

    if caps.name("cavok").is_some() {
        return Some(Visibility {
            miles: CAVOK_VISIBILITY_METERS / MILES_TO_M,
            cavok: true,
        });
    }

    let miles = if let Some(num) = caps.name("num") {
        if caps.name("less").is_some() {
            BELOW_MINIMUM_VISIBILITY_MILES
        } else {
            let numerator: f64 = num.as_str().parse().ok()?;
            let denominator: f64 = caps.name("den")?.as_str().parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            let whole: f64 = match caps.name("whole") {
                Some(whole) => whole.as_str().parse().ok()?,
                None => 0.0,
            };
            whole + numerator / denominator
        }
    } else if let Some(miles) = caps.name("miles") {
        miles.as_str().parse().ok()?
    } else {
        // Directional minimum replaces the prevailing value when present
        let meters = caps.name("minimum").or_else(|| caps.name("meters"))?;
        let meters: f64 = meters.as_str().parse().ok()?;
        meters / MILES_TO_M
    };

    Some(Visibility {
        miles,
        cavok: false,
    })
}

// =============================================================================
// Present Weather
// =============================================================================

/// Decode a present-weather group
///
/// Unrecognised groups yield a condition that is present but not
/// significant.
pub fn decode_condition(token: &str) -> Condition {
    let Some(caps) = pattern(FieldKind::Condition).captures(token) else {
        debug!("Unrecognised condition group '{}'", token);
        return Condition::insignificant();
    };

    let prefix = caps.name("intensity").and_then(|m| m.as_str().chars().next());
    let Some(intensity) = Intensity::from_prefix(prefix) else {
        return Condition::insignificant();
    };

    let descriptor = caps.name("descriptor").map(|m| m.as_str());
    let code = caps.name("phenomenon").map(|m| m.as_str()).unwrap_or_default();

    // `+FC` is the tornado code, not a heavy funnel cloud
    if code == "FC" && intensity == Intensity::Heavy && descriptor.is_none() {
        return Condition::new(Intensity::Moderate, Qualifier::None, Phenomenon::Tornado);
    }

    let Some(phenomenon) = Phenomenon::from_code(code) else {
        debug!("Unknown phenomenon '{}' in '{}'", code, token);
        return Condition::insignificant();
    };

    let qualifier = match descriptor {
        Some(code) => Qualifier::from_descriptor(code).unwrap_or(Qualifier::None),
        None => Qualifier::from(intensity),
    };

    Condition::new(intensity, qualifier, phenomenon)
}

// =============================================================================
// Cloud
// =============================================================================

/// Decode a cloud group's cover; height and cloud type are dropped
pub fn decode_cloud(token: &str) -> Option<Sky> {
    let caps = pattern(FieldKind::Cloud).captures(token)?;
    if caps.name("height").is_some() || caps.name("kind").is_some() {
        debug!(
            "Discarding cloud detail height={:?} type={:?}",
            caps.name("height").map(|m| m.as_str()),
            caps.name("kind").map(|m| m.as_str())
        );
    }
    Sky::from_code(caps.name("cover")?.as_str())
}

// =============================================================================
// Temperature
// =============================================================================

/// Decode `TT/DD` (°C, `M` prefix for negative) into Fahrenheit
pub fn decode_temperature(token: &str) -> Option<Temperatures> {
    let caps = pattern(FieldKind::Temperature).captures(token)?;
    let temperature = parse_signed_celsius(caps.name("temperature")?.as_str())?;
    let dew_point = caps
        .name("dew_point")
        .and_then(|m| parse_signed_celsius(m.as_str()));

    Some(Temperatures {
        temperature_f: celsius_to_fahrenheit(temperature),
        dew_point_f: dew_point.map(celsius_to_fahrenheit),
    })
}

fn parse_signed_celsius(value: &str) -> Option<f64> {
    match value.strip_prefix('M') {
        Some(magnitude) => magnitude.parse::<f64>().ok().map(|v| -v),
        None => value.parse().ok(),
    }
}

// =============================================================================
// Pressure
// =============================================================================

/// Decode `Annnn` (hundredths of inHg) or `Qnnnn` (hPa) into inches of mercury
pub fn decode_pressure(token: &str) -> Option<f64> {
    let caps = pattern(FieldKind::Pressure).captures(token)?;
    let value: f64 = caps.name("value")?.as_str().parse().ok()?;
    match caps.name("unit")?.as_str() {
        "A" => Some(value / 100.0),
        "Q" => Some(value * HPA_TO_INCH),
        _ => None,
    }
}
