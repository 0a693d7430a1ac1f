//! Data models for weather report decoding
//!
//! This module contains the decoded report record, the enumerations its
//! fields are drawn from, and the observer coordinates used by the
//! astronomical routines.

pub mod units;

use crate::constants::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use units::{DisplayUnits, DistanceUnit, PressureUnit, SpeedUnit, TempUnit};

// =============================================================================
// Report Record
// =============================================================================

/// Decoded METAR report
///
/// Every field starts as `None` ("unknown") and is filled in by the field
/// decoders as matching groups are found. Internal units are fixed:
/// Fahrenheit, knots, statute miles and inches of mercury.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Observation instant resolved from the `DDHHMMZ` group
    pub observation_time: Option<DateTime<Utc>>,

    /// Wind direction as a compass point, variable or calm
    pub wind_direction: Option<WindDirection>,

    /// Sustained wind speed in knots
    pub wind_speed_knots: Option<f64>,

    /// Gust speed in knots, when a `Gnn` suffix was reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gust_knots: Option<f64>,

    /// Prevailing (or minimum) visibility in statute miles
    pub visibility_miles: Option<f64>,

    /// Sky cover
    pub sky: Option<Sky>,

    /// Present weather condition
    pub condition: Option<Condition>,

    /// Air temperature in degrees Fahrenheit
    pub temperature_f: Option<f64>,

    /// Dew point in degrees Fahrenheit
    pub dew_point_f: Option<f64>,

    /// Altimeter setting in inches of mercury
    pub pressure_inhg: Option<f64>,
}

impl Report {
    /// Create an empty report with every field unknown
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field has been decoded
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Number of decoded fields
    pub fn field_count(&self) -> usize {
        [
            self.observation_time.is_some(),
            self.wind_direction.is_some(),
            self.wind_speed_knots.is_some(),
            self.wind_gust_knots.is_some(),
            self.visibility_miles.is_some(),
            self.sky.is_some(),
            self.condition.is_some(),
            self.temperature_f.is_some(),
            self.dew_point_f.is_some(),
            self.pressure_inhg.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// How repeated groups of the same field kind are merged into a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateFieldPolicy {
    /// Every decoded group overwrites the field; the last group in the report wins
    #[default]
    LastWins,
    /// A field is written at most once per parse; later groups are ignored
    FirstWins,
}

impl DuplicateFieldPolicy {
    /// Whether a field holding `current` may be overwritten
    pub fn allows<T>(&self, current: &Option<T>) -> bool {
        match self {
            DuplicateFieldPolicy::LastWins => true,
            DuplicateFieldPolicy::FirstWins => current.is_none(),
        }
    }
}

impl FromStr for DuplicateFieldPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_wins" | "last" => Ok(Self::LastWins),
            "first_wins" | "first" => Ok(Self::FirstWins),
            _ => Err(Error::configuration(format!(
                "Unknown duplicate field policy '{}' (expected last_wins or first_wins)",
                s
            ))),
        }
    }
}

// =============================================================================
// Wind
// =============================================================================

/// Wind direction: sixteen compass points, variable, or calm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    Variable,
    Calm,
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl WindDirection {
    /// Compass points in clockwise order starting at north
    pub const COMPASS: [WindDirection; 16] = [
        WindDirection::N,
        WindDirection::NNE,
        WindDirection::NE,
        WindDirection::ENE,
        WindDirection::E,
        WindDirection::ESE,
        WindDirection::SE,
        WindDirection::SSE,
        WindDirection::S,
        WindDirection::SSW,
        WindDirection::SW,
        WindDirection::WSW,
        WindDirection::W,
        WindDirection::WNW,
        WindDirection::NW,
        WindDirection::NNW,
    ];

    /// Map true degrees onto the nearest compass point
    ///
    /// Buckets are 22.5° wide and centred on each point, using the integer
    /// boundaries of the reporting convention (349–11 is N, 12–33 is NNE, ...).
    /// Returns `None` for bearings above 360.
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        const UPPER_BOUNDS: [u16; 16] = [
            11, 33, 56, 78, 101, 123, 146, 168, 191, 213, 236, 258, 281, 303, 326, 348,
        ];

        if degrees > 360 {
            return None;
        }
        if degrees >= 349 {
            return Some(WindDirection::N);
        }

        UPPER_BOUNDS
            .iter()
            .position(|&upper| degrees <= upper)
            .map(|index| Self::COMPASS[index])
    }

    /// Centre bearing of a compass point in degrees
    pub fn degrees(&self) -> Option<f64> {
        Self::COMPASS
            .iter()
            .position(|point| point == self)
            .map(|index| index as f64 * 22.5)
    }

    /// Human-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::Variable => "Variable",
            WindDirection::Calm => "Calm",
            WindDirection::N => "North",
            WindDirection::NNE => "North - NorthEast",
            WindDirection::NE => "Northeast",
            WindDirection::ENE => "East - NorthEast",
            WindDirection::E => "East",
            WindDirection::ESE => "East - Southeast",
            WindDirection::SE => "Southeast",
            WindDirection::SSE => "South - Southeast",
            WindDirection::S => "South",
            WindDirection::SSW => "South - Southwest",
            WindDirection::SW => "Southwest",
            WindDirection::WSW => "West - Southwest",
            WindDirection::W => "West",
            WindDirection::WNW => "West - Northwest",
            WindDirection::NW => "Northwest",
            WindDirection::NNW => "North - Northwest",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sky
// =============================================================================

/// Sky cover reported by the cloud groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sky {
    Clear,
    Few,
    Scattered,
    Broken,
    Overcast,
}

impl Sky {
    /// Decode a three-letter cover code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CLR" | "SKC" | "NSC" => Some(Sky::Clear),
            "FEW" => Some(Sky::Few),
            "SCT" => Some(Sky::Scattered),
            "BKN" => Some(Sky::Broken),
            "OVC" => Some(Sky::Overcast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sky::Clear => "Clear Sky",
            Sky::Few => "Few clouds",
            Sky::Scattered => "Scattered clouds",
            Sky::Broken => "Broken clouds",
            Sky::Overcast => "Overcast",
        }
    }
}

impl fmt::Display for Sky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Present Weather
// =============================================================================

/// Precipitation intensity prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Moderate,
    Heavy,
}

impl Intensity {
    /// Decode the optional `-`/`+` prefix; no prefix means moderate
    pub fn from_prefix(prefix: Option<char>) -> Option<Self> {
        match prefix {
            None => Some(Intensity::Moderate),
            Some('-') => Some(Intensity::Light),
            Some('+') => Some(Intensity::Heavy),
            Some(_) => None,
        }
    }
}

/// Qualifier of a present-weather group
///
/// When a group carries a descriptor (`TS`, `SH`, ...) the descriptor is the
/// qualifier; otherwise the intensity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    None,
    Vicinity,
    Light,
    Moderate,
    Heavy,
    Shallow,
    Patches,
    Partial,
    Thunderstorm,
    Blowing,
    Showers,
    Drifting,
    Freezing,
}

impl Qualifier {
    /// Decode a two-letter descriptor code
    pub fn from_descriptor(code: &str) -> Option<Self> {
        match code {
            "VC" => Some(Qualifier::Vicinity),
            "MI" => Some(Qualifier::Shallow),
            "BC" => Some(Qualifier::Patches),
            "PR" => Some(Qualifier::Partial),
            "TS" => Some(Qualifier::Thunderstorm),
            "BL" => Some(Qualifier::Blowing),
            "SH" => Some(Qualifier::Showers),
            "DR" => Some(Qualifier::Drifting),
            "FZ" => Some(Qualifier::Freezing),
            _ => None,
        }
    }
}

impl From<Intensity> for Qualifier {
    fn from(intensity: Intensity) -> Self {
        match intensity {
            Intensity::Light => Qualifier::Light,
            Intensity::Moderate => Qualifier::Moderate,
            Intensity::Heavy => Qualifier::Heavy,
        }
    }
}

/// Weather phenomenon of a present-weather group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phenomenon {
    None,
    Drizzle,
    Rain,
    Snow,
    SnowGrains,
    IceCrystals,
    IcePellets,
    Hail,
    SmallHail,
    UnknownPrecipitation,
    Mist,
    Fog,
    Smoke,
    VolcanicAsh,
    Sand,
    Haze,
    Spray,
    Dust,
    Squall,
    Sandstorm,
    Duststorm,
    FunnelCloud,
    Tornado,
    DustWhirls,
}

impl Phenomenon {
    /// Decode a two-letter phenomenon code
    ///
    /// Tornado is spelled `+FC` and handled by the condition decoder, since
    /// the `+` doubles as the heavy-intensity prefix.
    pub fn from_code(code: &str) -> Option<Self> {
        let phenomenon = match code {
            "DZ" => Phenomenon::Drizzle,
            "RA" => Phenomenon::Rain,
            "SN" => Phenomenon::Snow,
            "SG" => Phenomenon::SnowGrains,
            "IC" => Phenomenon::IceCrystals,
            "PE" | "PL" => Phenomenon::IcePellets,
            "GR" => Phenomenon::Hail,
            "GS" => Phenomenon::SmallHail,
            "UP" => Phenomenon::UnknownPrecipitation,
            "BR" => Phenomenon::Mist,
            "FG" => Phenomenon::Fog,
            "FU" => Phenomenon::Smoke,
            "VA" => Phenomenon::VolcanicAsh,
            "SA" => Phenomenon::Sand,
            "HZ" => Phenomenon::Haze,
            "PY" => Phenomenon::Spray,
            "DU" => Phenomenon::Dust,
            "SQ" => Phenomenon::Squall,
            "SS" => Phenomenon::Sandstorm,
            "DS" => Phenomenon::Duststorm,
            "PO" => Phenomenon::DustWhirls,
            "FC" => Phenomenon::FunnelCloud,
            _ => return None,
        };
        Some(phenomenon)
    }

    /// True for falling precipitation
    pub fn is_precipitation(&self) -> bool {
        matches!(
            self,
            Phenomenon::Drizzle
                | Phenomenon::Rain
                | Phenomenon::Snow
                | Phenomenon::SnowGrains
                | Phenomenon::IceCrystals
                | Phenomenon::IcePellets
                | Phenomenon::Hail
                | Phenomenon::SmallHail
                | Phenomenon::UnknownPrecipitation
        )
    }
}

/// Decoded present-weather group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Intensity prefix (moderate when absent)
    pub intensity: Intensity,
    /// Descriptor, or the intensity when no descriptor was given
    pub qualifier: Qualifier,
    pub phenomenon: Phenomenon,
    /// False when the group could not be mapped onto the known tables
    pub significant: bool,
}

impl Condition {
    /// Build a condition; significant iff qualifier or phenomenon is set
    pub fn new(intensity: Intensity, qualifier: Qualifier, phenomenon: Phenomenon) -> Self {
        let significant = qualifier != Qualifier::None || phenomenon != Phenomenon::None;
        Self {
            intensity,
            qualifier,
            phenomenon,
            significant,
        }
    }

    /// "No significant weather"
    pub fn insignificant() -> Self {
        Self {
            intensity: Intensity::Moderate,
            qualifier: Qualifier::None,
            phenomenon: Phenomenon::None,
            significant: false,
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::insignificant()
    }
}

// =============================================================================
// Observer Coordinates
// =============================================================================

/// Observer position in radians (north and east positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates from radians with range validation
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinates = Self {
            latitude,
            longitude,
        };
        coordinates.validate()?;
        Ok(coordinates)
    }

    /// Create coordinates from decimal degrees with range validation
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self> {
        Self::new(latitude * DEGREES_TO_RADIANS, longitude * DEGREES_TO_RADIANS)
    }

    /// Parse the station notation `"DD-MM[-SS]H DDD-MM[-SS]H"`
    ///
    /// ```
    /// use mateweather::Coordinates;
    ///
    /// let ord = Coordinates::parse("41-59N 087-54W").unwrap();
    /// assert!((ord.latitude_degrees() - 41.983).abs() < 1e-3);
    /// assert!(ord.longitude_degrees() < 0.0);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let pieces: Vec<&str> = input.split_whitespace().collect();
        if pieces.len() != 2 {
            return Err(Error::invalid_coordinates(
                input,
                "expected latitude and longitude separated by a space",
            ));
        }

        let latitude = dms_to_radians(pieces[0])
            .ok_or_else(|| Error::invalid_coordinates(input, "malformed latitude"))?;
        let longitude = dms_to_radians(pieces[1])
            .ok_or_else(|| Error::invalid_coordinates(input, "malformed longitude"))?;

        Self::new(latitude, longitude).map_err(|_| {
            Error::invalid_coordinates(input, "latitude or longitude out of range")
        })
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude * RADIANS_TO_DEGREES
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude * RADIANS_TO_DEGREES
    }

    /// Validate latitude and longitude ranges
    pub fn validate(&self) -> Result<()> {
        let half_pi = std::f64::consts::FRAC_PI_2;
        let pi = std::f64::consts::PI;

        if !self.latitude.is_finite() || !(-half_pi..=half_pi).contains(&self.latitude) {
            return Err(Error::invalid_coordinates(
                format!("{}", self.latitude_degrees()),
                "latitude must be between -90 and 90 degrees",
            ));
        }
        if !self.longitude.is_finite() || !(-pi..=pi).contains(&self.longitude) {
            return Err(Error::invalid_coordinates(
                format!("{}", self.longitude_degrees()),
                "longitude must be between -180 and 180 degrees",
            ));
        }
        Ok(())
    }
}

impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert one `DD-MM[-SS]H` component to radians (negative for S and W)
fn dms_to_radians(value: &str) -> Option<f64> {
    let (last_index, last) = value.char_indices().last()?;
    let hemisphere = last.to_ascii_uppercase();
    let numeric = if hemisphere.is_ascii_digit() {
        value
    } else {
        &value[..last_index]
    };

    let parts: Vec<&str> = numeric.split('-').collect();
    let (degrees, minutes, seconds) = match parts.as_slice() {
        [d, m] => (d.parse::<u32>().ok()?, m.parse::<u32>().ok()?, 0),
        [d, m, s] => (
            d.parse::<u32>().ok()?,
            m.parse::<u32>().ok()?,
            s.parse::<u32>().ok()?,
        ),
        _ => return None,
    };

    if degrees > 180 || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let arcseconds = f64::from((degrees * 60 + minutes) * 60 + seconds);
    let radians = arcseconds * std::f64::consts::PI / 648_000.0;

    match hemisphere {
        'N' | 'E' => Some(radians),
        'S' | 'W' => Some(-radians),
        '0' if radians == 0.0 => Some(0.0),
        _ => None,
    }
}
