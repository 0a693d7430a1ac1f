//! MATE Weather Library
//!
//! A Rust library for decoding METAR aviation weather reports and computing
//! the sun and moon data shown alongside them.
//!
//! This library provides tools for:
//! - Tokenizing raw METAR text against an ordered table of whole-word field patterns
//! - Decoding time, wind, visibility, condition, cloud, temperature and pressure groups
//! - Extracting a station's report from a NOAA station file
//! - Computing sunrise/sunset, midnight sun and polar night for a location
//! - Computing lunar phase, lunar latitude and the next new/quarter/full moons
//! - Converting and describing decoded values for display

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod astronomy;
        pub mod metar_parser;
        pub mod summary;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    Condition, Coordinates, DuplicateFieldPolicy, Intensity, Phenomenon, Qualifier, Report, Sky,
    WindDirection,
};
pub use app::services::astronomy::{MoonPhases, MoonPosition, SunTimes};
pub use app::services::metar_parser::{MetarParser, parse_report};
pub use config::WeatherConfig;

/// Result type alias for the weather library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the fallible edges of the library
///
/// Report decoding and the astronomical routines never fail; these cover
/// configuration, coordinates and the I/O done on behalf of the CLI.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("Configuration file '{file}' is invalid: {message}")]
    ConfigurationFile {
        file: String,
        message: String,
        #[source]
        source: toml::de::Error,
    },

    /// Coordinate string or value out of range
    #[error("Invalid coordinates '{input}': {reason}")]
    InvalidCoordinates { input: String, reason: String },

    /// Unknown unit name
    #[error("Unknown {kind} unit: '{name}'")]
    UnknownUnit { kind: &'static str, name: String },

    /// Station report not present in a station file
    #[error("No report for station {code} found in input")]
    StationNotFound { code: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Serialization of results failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a configuration file error
    pub fn configuration_file(
        file: impl Into<String>,
        message: impl Into<String>,
        source: toml::de::Error,
    ) -> Self {
        Self::ConfigurationFile {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid coordinates error
    pub fn invalid_coordinates(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown unit error
    pub fn unknown_unit(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownUnit {
            kind,
            name: name.into(),
        }
    }

    /// Create a station not found error
    pub fn station_not_found(code: impl Into<String>) -> Self {
        Self::StationNotFound { code: code.into() }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
