//! Display units and conversions from the report's internal units
//!
//! Reports store Fahrenheit, knots, inches of mercury and statute miles.
//! Each unit enum converts from the matching internal unit.

use crate::constants::conversions::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Temperature display unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    Kelvin,
    Centigrade,
    #[default]
    Fahrenheit,
}

impl TempUnit {
    /// Convert from degrees Fahrenheit
    pub fn from_fahrenheit(&self, value: f64) -> f64 {
        match self {
            TempUnit::Fahrenheit => value,
            TempUnit::Centigrade => fahrenheit_to_celsius(value),
            TempUnit::Kelvin => fahrenheit_to_celsius(value) + KELVIN_OFFSET,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TempUnit::Kelvin => "K",
            TempUnit::Centigrade => "\u{00B0}C",
            TempUnit::Fahrenheit => "\u{00B0}F",
        }
    }
}

/// Speed display unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    Ms,
    Kph,
    Mph,
    #[default]
    Knots,
    Bft,
}

impl SpeedUnit {
    /// Convert from knots
    pub fn from_knots(&self, value: f64) -> f64 {
        match self {
            SpeedUnit::Knots => value,
            SpeedUnit::Mph => value * KNOTS_TO_MPH,
            SpeedUnit::Kph => value * KNOTS_TO_KPH,
            SpeedUnit::Ms => value * KNOTS_TO_MS,
            SpeedUnit::Bft => (value * KNOTS_TO_BFT_BASE).powf(BFT_EXPONENT),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SpeedUnit::Ms => "m/s",
            SpeedUnit::Kph => "km/h",
            SpeedUnit::Mph => "mph",
            SpeedUnit::Knots => "knots",
            SpeedUnit::Bft => "Beaufort force",
        }
    }
}

/// Pressure display unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    Kpa,
    Hpa,
    Mb,
    MmHg,
    #[default]
    InchHg,
    Atm,
}

impl PressureUnit {
    /// Convert from inches of mercury
    pub fn from_inches(&self, value: f64) -> f64 {
        match self {
            PressureUnit::InchHg => value,
            PressureUnit::MmHg => value * INCH_TO_MM,
            PressureUnit::Kpa => value * INCH_TO_KPA,
            PressureUnit::Hpa | PressureUnit::Mb => value * INCH_TO_HPA,
            PressureUnit::Atm => value * INCH_TO_ATM,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::Kpa => "kPa",
            PressureUnit::Hpa => "hPa",
            PressureUnit::Mb => "mb",
            PressureUnit::MmHg => "mmHg",
            PressureUnit::InchHg => "inHg",
            PressureUnit::Atm => "atm",
        }
    }

    /// Decimal places shown for this unit
    pub fn precision(&self) -> usize {
        match self {
            PressureUnit::InchHg | PressureUnit::Kpa => 2,
            PressureUnit::Hpa | PressureUnit::Mb => 2,
            PressureUnit::MmHg => 1,
            PressureUnit::Atm => 3,
        }
    }
}

/// Distance display unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Meters,
    Km,
    #[default]
    Miles,
}

impl DistanceUnit {
    /// Convert from statute miles
    pub fn from_miles(&self, value: f64) -> f64 {
        match self {
            DistanceUnit::Miles => value,
            DistanceUnit::Km => value * MILES_TO_KM,
            DistanceUnit::Meters => value * MILES_TO_M,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Km => "km",
            DistanceUnit::Miles => "miles",
        }
    }
}

/// Units used when presenting a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayUnits {
    pub temperature: TempUnit,
    pub speed: SpeedUnit,
    pub pressure: PressureUnit,
    pub distance: DistanceUnit,
}

impl DisplayUnits {
    /// Celsius, km/h, hectopascals and kilometres
    pub fn metric() -> Self {
        Self {
            temperature: TempUnit::Centigrade,
            speed: SpeedUnit::Kph,
            pressure: PressureUnit::Hpa,
            distance: DistanceUnit::Km,
        }
    }

    /// Fahrenheit, mph, inches of mercury and miles
    pub fn imperial() -> Self {
        Self {
            temperature: TempUnit::Fahrenheit,
            speed: SpeedUnit::Mph,
            pressure: PressureUnit::InchHg,
            distance: DistanceUnit::Miles,
        }
    }
}

pub fn fahrenheit_to_celsius(value: f64) -> f64 {
    (value - FREEZING_F) * F_TO_C_SCALE
}

pub fn celsius_to_fahrenheit(value: f64) -> f64 {
    value * C_TO_F_SCALE + FREEZING_F
}

// =============================================================================
// Parsing and Display
// =============================================================================

impl FromStr for TempUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "k" | "kelvin" => Ok(TempUnit::Kelvin),
            "c" | "centigrade" | "celsius" => Ok(TempUnit::Centigrade),
            "f" | "fahrenheit" => Ok(TempUnit::Fahrenheit),
            _ => Err(Error::unknown_unit("temperature", s)),
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "m/s" => Ok(SpeedUnit::Ms),
            "kph" | "km/h" => Ok(SpeedUnit::Kph),
            "mph" => Ok(SpeedUnit::Mph),
            "knots" | "kt" | "kts" => Ok(SpeedUnit::Knots),
            "bft" | "beaufort" => Ok(SpeedUnit::Bft),
            _ => Err(Error::unknown_unit("speed", s)),
        }
    }
}

impl FromStr for PressureUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kpa" => Ok(PressureUnit::Kpa),
            "hpa" => Ok(PressureUnit::Hpa),
            "mb" => Ok(PressureUnit::Mb),
            "mmhg" | "mm-hg" => Ok(PressureUnit::MmHg),
            "inchhg" | "inhg" | "inch-hg" => Ok(PressureUnit::InchHg),
            "atm" => Ok(PressureUnit::Atm),
            _ => Err(Error::unknown_unit("pressure", s)),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meters" | "metres" => Ok(DistanceUnit::Meters),
            "km" => Ok(DistanceUnit::Km),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            _ => Err(Error::unknown_unit("distance", s)),
        }
    }
}

macro_rules! display_via_symbol {
    ($($unit:ty),*) => {
        $(
            impl fmt::Display for $unit {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.symbol())
                }
            }
        )*
    };
}

display_via_symbol!(TempUnit, SpeedUnit, PressureUnit, DistanceUnit);
