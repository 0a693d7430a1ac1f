//! Derived values and English presentation of a decoded report
//!
//! Humidity and apparent temperature are derived from the decoded fields;
//! every other value is formatted in the caller's display units. Missing
//! values format as `"Unknown"`.

use crate::app::models::units::{SpeedUnit, fahrenheit_to_celsius};
use crate::app::models::{
    Condition, Coordinates, DisplayUnits, DistanceUnit, Phenomenon, Qualifier, Report, Sky,
    WindDirection,
};
use crate::app::services::astronomy::{MoonPosition, SunTimes};
use crate::constants::lunar::ICON_PHASES;
use chrono::{DateTime, Utc};
use serde::Serialize;

const UNKNOWN: &str = "Unknown";

// =============================================================================
// Derived Values
// =============================================================================

/// Relative humidity in percent from temperature and dew point (°F)
pub fn relative_humidity(temperature_f: f64, dew_point_f: f64) -> f64 {
    fn saturation_pressure(celsius: f64) -> f64 {
        6.11 * 10f64.powf(7.5 * celsius / (237.7 + celsius))
    }

    let saturation = saturation_pressure(fahrenheit_to_celsius(temperature_f));
    let actual = saturation_pressure(fahrenheit_to_celsius(dew_point_f));
    actual / saturation * 100.0
}

/// Relative humidity of a report, when both temperatures are known
pub fn humidity(report: &Report) -> Option<f64> {
    Some(relative_humidity(report.temperature_f?, report.dew_point_f?))
}

/// Apparent ("feels like") temperature in °F
///
/// Wind chill at or below 50 °F with more than 3 mph of wind, heat index at
/// or above 80 °F, otherwise the air temperature. Wind chill needs a known
/// wind speed and heat index a known dew point.
pub fn apparent_temperature(report: &Report) -> Option<f64> {
    let temperature = report.temperature_f?;

    if temperature <= 50.0 {
        let wind_mph = SpeedUnit::Mph.from_knots(report.wind_speed_knots?);
        if wind_mph > 3.0 {
            let v = wind_mph.powf(0.16);
            Some(35.74 + 0.6215 * temperature - 35.75 * v + 0.4275 * temperature * v)
        } else {
            Some(temperature)
        }
    } else if temperature >= 80.0 {
        let humidity = humidity(report)?;
        Some(heat_index(temperature, humidity))
    } else {
        Some(temperature)
    }
}

fn heat_index(t: f64, h: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h2 = h * h;
    let h3 = h2 * h;

    16.923 + 0.185212 * t + 5.37941 * h - 0.100254 * t * h + 9.41695e-3 * t2 + 7.28898e-3 * h2
        + 3.45372e-4 * t2 * h
        - 8.14971e-4 * t * h2
        + 1.02102e-5 * t2 * h2
        - 3.8646e-5 * t3
        + 2.91583e-5 * h3
        + 1.42721e-6 * t3 * h
        + 1.97483e-7 * t * h3
        - 2.18429e-8 * t3 * h2
        + 8.43296e-10 * t2 * h3
        - 4.81975e-11 * t3 * h3
}

// =============================================================================
// Descriptions
// =============================================================================

/// English description of a present-weather condition
///
/// Returns `None` for insignificant conditions and for qualifier/phenomenon
/// combinations that do not occur in practice.
pub fn condition_description(condition: &Condition) -> Option<&'static str> {
    if !condition.significant {
        return None;
    }

    // A bare code carries moderate intensity; fall back to the plain name
    description_entry(condition.phenomenon, condition.qualifier).or_else(|| {
        (condition.qualifier == Qualifier::Moderate)
            .then(|| description_entry(condition.phenomenon, Qualifier::None))
            .flatten()
    })
}

fn description_entry(phenomenon: Phenomenon, qualifier: Qualifier) -> Option<&'static str> {
    use Phenomenon as P;
    use Qualifier as Q;

    let description = match (phenomenon, qualifier) {
        (P::None, Q::Thunderstorm) => "Thunderstorm",

        (P::Drizzle, Q::None) => "Drizzle",
        (P::Drizzle, Q::Light) => "Light drizzle",
        (P::Drizzle, Q::Moderate) => "Moderate drizzle",
        (P::Drizzle, Q::Heavy) => "Heavy drizzle",
        (P::Drizzle, Q::Freezing) => "Freezing drizzle",

        (P::Rain, Q::None) => "Rain",
        (P::Rain, Q::Light) => "Light rain",
        (P::Rain, Q::Moderate) => "Moderate rain",
        (P::Rain, Q::Heavy) => "Heavy rain",
        (P::Rain, Q::Thunderstorm) => "Thunderstorm",
        (P::Rain, Q::Showers) => "Rain showers",
        (P::Rain, Q::Freezing) => "Freezing rain",

        (P::Snow, Q::None) => "Snow",
        (P::Snow, Q::Light) => "Light snow",
        (P::Snow, Q::Moderate) => "Moderate snow",
        (P::Snow, Q::Heavy) => "Heavy snow",
        (P::Snow, Q::Thunderstorm) => "Snowstorm",
        (P::Snow, Q::Blowing) => "Blowing snowfall",
        (P::Snow, Q::Showers) => "Snow showers",
        (P::Snow, Q::Drifting) => "Drifting snow",

        (P::SnowGrains, Q::None) => "Snow grains",
        (P::SnowGrains, Q::Light) => "Light snow grains",
        (P::SnowGrains, Q::Moderate) => "Moderate snow grains",
        (P::SnowGrains, Q::Heavy) => "Heavy snow grains",

        (P::IceCrystals, Q::None | Q::Moderate) => "Ice crystals",

        (P::IcePellets, Q::None) => "Ice pellets",
        (P::IcePellets, Q::Light) => "Few ice pellets",
        (P::IcePellets, Q::Moderate) => "Moderate ice pellets",
        (P::IcePellets, Q::Heavy) => "Heavy ice pellets",
        (P::IcePellets, Q::Thunderstorm) => "Ice pellet storm",
        (P::IcePellets, Q::Showers) => "Showers of ice pellets",

        (P::Hail, Q::None | Q::Moderate) => "Hail",
        (P::Hail, Q::Thunderstorm) => "Hailstorm",
        (P::Hail, Q::Showers) => "Hail showers",

        (P::SmallHail, Q::None | Q::Moderate) => "Small hail",
        (P::SmallHail, Q::Thunderstorm) => "Small hailstorm",
        (P::SmallHail, Q::Showers) => "Showers of small hail",

        (P::UnknownPrecipitation, Q::None) => "Unknown precipitation",

        (P::Mist, Q::None | Q::Moderate) => "Mist",

        (P::Fog, Q::None | Q::Moderate) => "Fog",
        (P::Fog, Q::Vicinity) => "Fog in the vicinity",
        (P::Fog, Q::Shallow) => "Shallow fog",
        (P::Fog, Q::Patches) => "Patches of fog",
        (P::Fog, Q::Partial) => "Partial fog",
        (P::Fog, Q::Freezing) => "Freezing fog",

        (P::Smoke, Q::None | Q::Moderate) => "Smoke",
        (P::VolcanicAsh, Q::None | Q::Moderate) => "Volcanic ash",

        (P::Sand, Q::None | Q::Moderate) => "Sand",
        (P::Sand, Q::Blowing) => "Blowing sand",
        (P::Sand, Q::Drifting) => "Drifting sand",

        (P::Haze, Q::None | Q::Moderate) => "Haze",
        (P::Spray, Q::Blowing) => "Blowing sprays",

        (P::Dust, Q::None | Q::Moderate) => "Dust",
        (P::Dust, Q::Blowing) => "Blowing dust",
        (P::Dust, Q::Drifting) => "Drifting dust",

        (P::Squall, Q::None | Q::Moderate) => "Squall",

        (P::Sandstorm, Q::None | Q::Moderate) => "Sandstorm",
        (P::Sandstorm, Q::Vicinity) => "Sandstorm in the vicinity",
        (P::Sandstorm, Q::Heavy) => "Heavy sandstorm",

        (P::Duststorm, Q::None | Q::Moderate) => "Duststorm",
        (P::Duststorm, Q::Vicinity) => "Duststorm in the vicinity",
        (P::Duststorm, Q::Heavy) => "Heavy duststorm",

        (P::FunnelCloud, Q::None) => "Funnel cloud",
        (P::Tornado, Q::None) => "Tornado",

        (P::DustWhirls, Q::None | Q::Moderate) => "Dust whirls",
        (P::DustWhirls, Q::Vicinity) => "Dust whirls in the vicinity",

        _ => return None,
    };
    Some(description)
}

/// Format a temperature given in °F
pub fn format_temperature(value_f: f64, units: &DisplayUnits) -> String {
    format!(
        "{:.1} {}",
        units.temperature.from_fahrenheit(value_f),
        units.temperature.symbol()
    )
}

/// Format a speed given in knots
pub fn format_speed(knots: f64, units: &DisplayUnits) -> String {
    let value = units.speed.from_knots(knots);
    match units.speed {
        SpeedUnit::Bft => format!("{} {:.1}", units.speed.symbol(), value),
        _ => format!("{:.1} {}", value, units.speed.symbol()),
    }
}

/// Format wind direction and speed, `"Calm"` for zero speed
pub fn format_wind(report: &Report, units: &DisplayUnits) -> String {
    let (Some(direction), Some(speed)) = (report.wind_direction, report.wind_speed_knots) else {
        return UNKNOWN.to_string();
    };
    if speed == 0.0 || direction == WindDirection::Calm {
        return WindDirection::Calm.to_string();
    }

    let mut wind = format!("{} / {}", direction, format_speed(speed, units));
    if let Some(gust) = report.wind_gust_knots {
        wind.push_str(&format!(", gusting {}", format_speed(gust, units)));
    }
    wind
}

/// Format a pressure given in inches of mercury
pub fn format_pressure(inches: f64, units: &DisplayUnits) -> String {
    format!(
        "{:.*} {}",
        units.pressure.precision(),
        units.pressure.from_inches(inches),
        units.pressure.symbol()
    )
}

/// Format a visibility given in statute miles
pub fn format_visibility(miles: f64, units: &DisplayUnits) -> String {
    let value = units.distance.from_miles(miles);
    match units.distance {
        DistanceUnit::Meters => format!("{:.0}{}", value, units.distance.symbol()),
        _ => format!("{:.1} {}", value, units.distance.symbol()),
    }
}

/// Every report value formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub observed: String,
    pub conditions: String,
    pub sky: String,
    pub temperature: String,
    pub dew_point: String,
    pub humidity: String,
    pub apparent_temperature: String,
    pub wind: String,
    pub pressure: String,
    pub visibility: String,
}

impl WeatherSummary {
    pub fn new(report: &Report, units: &DisplayUnits) -> Self {
        let or_unknown = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            observed: or_unknown(
                report
                    .observation_time
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
            ),
            conditions: report
                .condition
                .as_ref()
                .and_then(condition_description)
                .unwrap_or("-")
                .to_string(),
            sky: or_unknown(report.sky.map(|sky| sky.to_string())),
            temperature: or_unknown(report.temperature_f.map(|t| format_temperature(t, units))),
            dew_point: or_unknown(report.dew_point_f.map(|t| format_temperature(t, units))),
            humidity: or_unknown(humidity(report).map(|h| format!("{:.0}%", h))),
            apparent_temperature: or_unknown(
                apparent_temperature(report).map(|t| format_temperature(t, units)),
            ),
            wind: format_wind(report, units),
            pressure: or_unknown(report.pressure_inhg.map(|p| format_pressure(p, units))),
            visibility: or_unknown(report.visibility_miles.map(|v| format_visibility(v, units))),
        }
    }
}

/// One-line summary: the conditions, or the sky when nothing significant
pub fn weather_summary(location: &str, report: &Report) -> String {
    let description = report
        .condition
        .as_ref()
        .and_then(condition_description)
        .map(str::to_string)
        .or_else(|| report.sky.map(|sky| sky.to_string()))
        .unwrap_or_else(|| UNKNOWN.to_string());
    format!("{}: {}", location, description)
}

// =============================================================================
// Icons
// =============================================================================

/// Name of the freedesktop weather icon for a report
///
/// Night icons for a clear or partly cloudy sky carry the moon's phase angle
/// as a `-NNN` suffix (omitted at full moon), mirrored for observers south of
/// the moon.
pub fn icon_name(
    report: &Report,
    sun: &SunTimes,
    moon: Option<(&MoonPosition, &Coordinates)>,
    now: DateTime<Utc>,
) -> String {
    if let Some(condition) = report.condition.filter(|c| c.significant) {
        if let Some(icon) = condition_icon(&condition) {
            return icon.to_string();
        }
    }

    let daytime = icon_daytime(sun, now);
    let mut icon = match report.sky.unwrap_or(Sky::Clear) {
        Sky::Clear if daytime => return "weather-clear".to_string(),
        Sky::Clear => "weather-clear-night".to_string(),
        Sky::Few | Sky::Scattered | Sky::Broken if daytime => {
            return "weather-few-clouds".to_string();
        }
        Sky::Few | Sky::Scattered | Sky::Broken => "weather-few-clouds-night".to_string(),
        Sky::Overcast => return "weather-overcast".to_string(),
    };

    if let Some((position, observer)) = moon {
        icon.push_str(&moon_icon_suffix(position, observer));
    }
    icon
}

/// Clear night sky icon showing the moon's current phase
pub fn moon_icon_name(position: &MoonPosition, observer: &Coordinates) -> String {
    format!("weather-clear-night{}", moon_icon_suffix(position, observer))
}

fn moon_icon_suffix(position: &MoonPosition, observer: &Coordinates) -> String {
    let step = moon_icon_step(position, observer);
    if ICON_PHASES % 2 == 0 && step != ICON_PHASES / 2 {
        format!("-{:03}", step * 360 / ICON_PHASES)
    } else {
        String::new()
    }
}

fn condition_icon(condition: &Condition) -> Option<&'static str> {
    use Phenomenon as P;

    if condition.phenomenon != P::None && condition.qualifier == Qualifier::Thunderstorm {
        return Some("weather-storm");
    }

    match condition.phenomenon {
        P::None => None,
        P::Drizzle | P::Rain | P::UnknownPrecipitation | P::Hail | P::SmallHail => {
            Some("weather-showers")
        }
        P::Snow | P::SnowGrains | P::IcePellets | P::IceCrystals => Some("weather-snow"),
        P::Tornado | P::Squall => Some("weather-storm"),
        P::Mist
        | P::Fog
        | P::Smoke
        | P::VolcanicAsh
        | P::Sand
        | P::Haze
        | P::Spray
        | P::Dust
        | P::Sandstorm
        | P::Duststorm
        | P::FunnelCloud
        | P::DustWhirls => Some("weather-fog"),
    }
}

/// Day/night for icon purposes; a day with no rise or set counts as day
///
/// Polar night is checked first so it always gets a night icon, unlike the
/// plain "no rise/set means day" rule it otherwise follows.
fn icon_daytime(sun: &SunTimes, now: DateTime<Utc>) -> bool {
    if sun.polar_night {
        return false;
    }
    if sun.midnight_sun || (sun.sunrise.is_none() && sun.sunset.is_none()) {
        return true;
    }
    sun.sunrise.is_none_or(|sunrise| now >= sunrise) && sun.sunset.is_none_or(|sunset| now < sunset)
}

/// Moon phase quantised to the icon set, mirrored south of the moon
fn moon_icon_step(position: &MoonPosition, observer: &Coordinates) -> i32 {
    let step = (position.phase * f64::from(ICON_PHASES) / 360.0 + 0.5) as i32;
    if step == ICON_PHASES {
        0
    } else if step > 0 && observer.latitude_degrees() < position.latitude {
        ICON_PHASES - step
    } else {
        step
    }
}
