//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `MATEWEATHER_*` environment variables. Command-line overrides are
//! applied by the CLI on top of the loaded value.
//!
//! ```toml
//! [units]
//! temperature = "centigrade"
//! speed = "kph"
//! pressure = "hpa"
//! distance = "km"
//!
//! [parsing]
//! duplicate_fields = "last_wins"
//! strip_remarks = true
//!
//! [logging]
//! level = "info"
//! ```

use crate::app::models::{
    DisplayUnits, DistanceUnit, DuplicateFieldPolicy, PressureUnit, SpeedUnit, TempUnit,
};
use crate::app::services::metar_parser::MetarParser;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, ENV_PREFIX, LOG_LEVELS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Report parsing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Which occurrence wins when a field kind appears more than once
    pub duplicate_fields: DuplicateFieldPolicy,

    /// Drop the `RMK` section before tokenizing
    pub strip_remarks: bool,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            duplicate_fields: DuplicateFieldPolicy::default(),
            strip_remarks: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of error, warn, info, debug, trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Global configuration for the weather tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Units used when presenting decoded values
    pub units: DisplayUnits,

    /// Report parsing settings
    pub parsing: ParsingConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl WeatherConfig {
    /// Defaults with metric display units
    pub fn metric() -> Self {
        Self::default().with_units(DisplayUnits::metric())
    }

    /// Defaults with imperial display units
    pub fn imperial() -> Self {
        Self::default().with_units(DisplayUnits::imperial())
    }

    /// Replace all display units
    pub fn with_units(mut self, units: DisplayUnits) -> Self {
        self.units = units;
        self
    }

    pub fn with_temperature_unit(mut self, unit: TempUnit) -> Self {
        self.units.temperature = unit;
        self
    }

    pub fn with_speed_unit(mut self, unit: SpeedUnit) -> Self {
        self.units.speed = unit;
        self
    }

    pub fn with_pressure_unit(mut self, unit: PressureUnit) -> Self {
        self.units.pressure = unit;
        self
    }

    pub fn with_distance_unit(mut self, unit: DistanceUnit) -> Self {
        self.units.distance = unit;
        self
    }

    /// Set the duplicate field policy used by the parser
    pub fn with_duplicate_fields(mut self, policy: DuplicateFieldPolicy) -> Self {
        self.parsing.duplicate_fields = policy;
        self
    }

    /// Keep the remarks section when parsing
    pub fn without_remark_stripping(mut self) -> Self {
        self.parsing.strip_remarks = false;
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Build a parser from the parsing settings
    pub fn parser(&self) -> MetarParser {
        MetarParser::new()
            .with_duplicate_fields(self.parsing.duplicate_fields)
            .with_strip_remarks(self.parsing.strip_remarks)
    }

    /// Check that every setting holds a usable value
    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::configuration(format!(
                "Invalid log level '{}'. Expected one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// `<config_dir>/mateweather/config.toml`, when a config directory exists
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML document; missing sections and keys keep their defaults
    pub fn from_toml_str(content: &str, source: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration_file(source, e.message().to_string(), e))
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Defaults, then the config file, then the process environment
    ///
    /// An explicit `config_file` must exist. Without one, the default path
    /// is used only if the file is present.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path().filter(|path| path.exists()) {
                Some(path) => {
                    debug!("Using default config file: {}", path.display());
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `MATEWEATHER_*` overrides read through `lookup`
    ///
    /// Empty values are ignored. Unparseable values are rejected with the
    /// variable name in the message.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| -> Option<(String, String)> {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (key, value))
        };

        if let Some((key, value)) = read("TEMPERATURE_UNIT") {
            self.units.temperature = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = read("SPEED_UNIT") {
            self.units.speed = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = read("PRESSURE_UNIT") {
            self.units.pressure = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = read("DISTANCE_UNIT") {
            self.units.distance = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = read("DUPLICATE_FIELDS") {
            self.parsing.duplicate_fields = parse_env(&key, &value)?;
        }
        if let Some((_, value)) = read("LOG_LEVEL") {
            self.logging.level = value.to_ascii_lowercase();
        }

        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    value
        .parse()
        .map_err(|e| Error::configuration(format!("{}: {}", key, e)))
}
