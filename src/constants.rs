//! Application constants for the weather library
//!
//! This module contains the unit conversion factors, astronomical elements
//! and parsing defaults used throughout the library.

// =============================================================================
// Angle and Time Conversions
// =============================================================================

/// Multiply degrees by this to get radians
pub const DEGREES_TO_RADIANS: f64 = std::f64::consts::PI / 180.0;

/// Multiply radians by this to get degrees
pub const RADIANS_TO_DEGREES: f64 = 180.0 / std::f64::consts::PI;

/// Multiply radians by this to get hours of right ascension
pub const RADIANS_TO_HOURS: f64 = 12.0 / std::f64::consts::PI;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// J2000.0 (2000-01-01 12:00 TT) as seconds since the Unix epoch (UTC)
pub const J2000_EPOCH_SECONDS: f64 = 946_727_935.816;

// =============================================================================
// Solar Orbit Elements
// =============================================================================

/// Solar orbital elements, epoch J2000, with linear drift per Julian century
pub mod solar {
    /// Mean ecliptic longitude at epoch (degrees)
    pub const MEAN_ECLIPTIC_LONGITUDE: f64 = 280.464_571_66;
    /// Mean ecliptic longitude drift (degrees per Julian century)
    pub const MEAN_ECLIPTIC_LONGITUDE_RATE: f64 = 35_999.372_449_81;

    /// Longitude of perigee at epoch (degrees)
    pub const PERIGEE_LONGITUDE: f64 = 282.937_681_93;
    /// Longitude of perigee drift (degrees per Julian century)
    pub const PERIGEE_LONGITUDE_RATE: f64 = 0.323_273_64;

    /// Orbital eccentricity at epoch
    pub const ECCENTRICITY: f64 = 0.016_711_23;
    /// Eccentricity drift per Julian century
    pub const ECCENTRICITY_RATE: f64 = 0.000_043_92;

    /// Mean daily motion along the ecliptic (degrees per day)
    pub const PROGRESSION: f64 = 360.0 / 365.242_191;

    /// Apparent depression at rise/set: refraction, parallax and solar semi-diameter (degrees)
    pub const HORIZON_CORRECTION: f64 = 0.830_725;

    /// Kepler solver tolerance (radians)
    pub const KEPLER_TOLERANCE: f64 = 1e-12;
    /// Kepler solver iteration cap
    pub const KEPLER_MAX_ITERATIONS: u32 = 50;

    /// Obliquity of the ecliptic polynomial (arcseconds, Julian centuries since J2000)
    pub const OBLIQUITY_COEFFICIENTS: [f64; 4] = [84_381.448, -46.840_24, -59.0e-5, 1.813e-3];

    /// Sidereal/solar day ratio
    pub const SIDEREAL_RATE: f64 = 1.002_737_909;
    /// Solar/sidereal day ratio
    pub const SOLAR_RATE: f64 = 0.997_269_566_1;
}

// =============================================================================
// Lunar Orbit Elements
// =============================================================================

/// Lunar orbital elements, epoch 2000 Jan 1.5
pub mod lunar {
    use super::DEGREES_TO_RADIANS;

    /// Mean longitude at epoch (degrees)
    pub const MEAN_LONGITUDE: f64 = 218.316;
    /// Argument of perigee at epoch (degrees)
    pub const PERIGEE_MEAN_LONGITUDE: f64 = 318.15;
    /// Longitude of the ascending node at epoch (degrees)
    pub const NODE_MEAN_LONGITUDE: f64 = 125.08;
    /// Mean daily motion along the ecliptic (degrees per day)
    pub const PROGRESSION: f64 = 13.176_358;
    /// Daily motion of perigee (degrees per day)
    pub const PERIGEE_PROGRESSION: f64 = 0.111_404_1;
    /// Daily regression of the node (degrees per day)
    pub const NODE_REGRESSION: f64 = 0.052_953_9;
    /// Orbital inclination to the ecliptic (radians)
    pub const INCLINATION: f64 = 5.145_396 * DEGREES_TO_RADIANS;

    /// Phase-finder iteration cap
    pub const PHASE_MAX_ITERATIONS: u32 = 10;
    /// Phase-finder convergence window (seconds)
    pub const PHASE_TOLERANCE_SECONDS: f64 = 10.0;

    /// Number of distinct moon icons across a lunation
    pub const ICON_PHASES: i32 = 36;
}

// =============================================================================
// Unit Conversion Factors
// =============================================================================

/// Unit conversion factors; internal units are °F, knots, inHg and statute miles
pub mod conversions {
    pub const KNOTS_TO_KPH: f64 = 1.851_965;
    pub const KNOTS_TO_MPH: f64 = 1.150_779;
    pub const KNOTS_TO_MS: f64 = 0.514_444;
    /// Beaufort force ≈ (knots · 0.615363)^(2/3)
    pub const KNOTS_TO_BFT_BASE: f64 = 0.615_363;
    pub const BFT_EXPONENT: f64 = 0.666_666;

    pub const INCH_TO_KPA: f64 = 3.386;
    pub const INCH_TO_HPA: f64 = 33.86;
    pub const INCH_TO_MM: f64 = 25.400_05;
    pub const INCH_TO_ATM: f64 = 0.033_421_052;
    /// QNH hectopascals to inches of mercury
    pub const HPA_TO_INCH: f64 = 0.029_530;

    pub const MILES_TO_KM: f64 = 1.609_344;
    pub const MILES_TO_M: f64 = MILES_TO_KM * 1000.0;

    pub const F_TO_C_SCALE: f64 = 0.555_556;
    pub const C_TO_F_SCALE: f64 = 1.8;
    pub const FREEZING_F: f64 = 32.0;
    pub const KELVIN_OFFSET: f64 = 273.15;
}

// =============================================================================
// METAR Parsing Defaults
// =============================================================================

/// Marker that starts the free-text remarks section of a report
pub const REMARKS_MARKER: &str = "RMK";

/// Visibility reported by CAVOK ("ceiling and visibility OK"), in metres
pub const CAVOK_VISIBILITY_METERS: f64 = 10_000.0;

/// Visibility recorded for "less than" statute fractions such as `M1/4SM`
pub const BELOW_MINIMUM_VISIBILITY_MILES: f64 = 0.001;

/// Length of an ICAO station code
pub const STATION_CODE_LEN: usize = 4;

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Directory name under the user configuration directory
pub const CONFIG_DIR_NAME: &str = "mateweather";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "MATEWEATHER_";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in configuration
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
