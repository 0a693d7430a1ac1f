//! Command-line argument definitions for mateweather
//!
//! This module defines the CLI interface using the clap derive API. Global
//! flags (verbosity, config file, output format) are accepted before or
//! after the subcommand.

use crate::app::models::{Coordinates, DistanceUnit, PressureUnit, SpeedUnit, TempUnit};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the METAR decoder and sky calculator
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mateweather",
    version,
    about = "Decode METAR weather reports and compute sun and moon times",
    long_about = "Decodes METAR aviation weather reports into readable conditions, \
                  and computes sunrise, sunset, lunar phase and the next principal \
                  moon phases for a location."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress output except errors"
    )]
    pub quiet: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for <config dir>/mateweather/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format for results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode a METAR report
    Metar(MetarArgs),
    /// Sunrise and sunset for a location
    Sun(SunArgs),
    /// Lunar phase and the next principal phases
    Moon(MoonArgs),
}

/// Arguments for the metar command
#[derive(Debug, Clone, Parser)]
pub struct MetarArgs {
    /// Report text; words are joined with single spaces
    ///
    /// Everything after the first word is taken as report text, so `-RA`
    /// style groups need no quoting. Read from --file or standard input
    /// when omitted.
    #[arg(value_name = "REPORT", trailing_var_arg = true)]
    pub report: Vec<String>,

    /// Read the report (or station file) from a file
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        conflicts_with = "report",
        help = "Read the report from a file instead of the command line"
    )]
    pub file: Option<PathBuf>,

    /// Treat the input as a NOAA station file and extract this station's report
    #[arg(short = 's', long = "station", value_name = "CODE")]
    pub station: Option<String>,

    /// Instant used to resolve the report's day-of-month (RFC 3339)
    #[arg(long = "reference-time", value_name = "TIME")]
    pub reference_time: Option<String>,

    /// Name printed in the one-line summary
    #[arg(long = "location", value_name = "NAME")]
    pub location: Option<String>,

    #[arg(long = "temperature-unit", value_name = "UNIT", help = "k, c or f")]
    pub temperature_unit: Option<TempUnit>,

    #[arg(long = "speed-unit", value_name = "UNIT", help = "ms, kph, mph, knots or bft")]
    pub speed_unit: Option<SpeedUnit>,

    #[arg(
        long = "pressure-unit",
        value_name = "UNIT",
        help = "kpa, hpa, mb, mmhg, inhg or atm"
    )]
    pub pressure_unit: Option<PressureUnit>,

    #[arg(long = "distance-unit", value_name = "UNIT", help = "m, km or miles")]
    pub distance_unit: Option<DistanceUnit>,

    /// Use metric units before applying individual unit flags
    #[arg(long = "metric", conflicts_with = "imperial")]
    pub metric: bool,

    /// Use imperial units before applying individual unit flags
    #[arg(long = "imperial")]
    pub imperial: bool,

    /// Keep the first occurrence of a repeated field kind
    #[arg(long = "first-wins")]
    pub first_wins: bool,

    /// Scan the remarks section as well
    #[arg(long = "keep-remarks")]
    pub keep_remarks: bool,

    /// Observer location, used to pick a day or night icon
    #[command(flatten)]
    pub location_args: LocationArgs,
}

/// Arguments for the sun command
#[derive(Debug, Clone, Parser)]
pub struct SunArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Instant within the local day to compute (RFC 3339, default now)
    #[arg(long = "at", value_name = "TIME")]
    pub at: Option<String>,
}

/// Arguments for the moon command
#[derive(Debug, Clone, Parser)]
pub struct MoonArgs {
    /// Instant to compute the phase for (RFC 3339, default now)
    #[arg(long = "at", value_name = "TIME")]
    pub at: Option<String>,

    /// Observer location, used to orient the phase icon
    #[command(flatten)]
    pub location: LocationArgs,
}

/// Observer location given as decimal degrees or a DMS string
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees, north positive
    #[arg(
        long = "lat",
        value_name = "DEGREES",
        allow_negative_numbers = true,
        requires = "longitude"
    )]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees, east positive
    #[arg(
        long = "lon",
        value_name = "DEGREES",
        allow_negative_numbers = true,
        requires = "latitude"
    )]
    pub longitude: Option<f64>,

    /// Location as "DD-MM[-SS]H DDD-MM[-SS]H", e.g. "51-28N 000-00W"
    #[arg(
        long = "coords",
        value_name = "DMS",
        conflicts_with_all = ["latitude", "longitude"]
    )]
    pub coordinates: Option<String>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Log level requested on the command line, if any
    pub fn get_log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        match &self.command {
            Some(Commands::Metar(args)) => args.validate(),
            Some(Commands::Sun(args)) => {
                if args.location.is_empty() {
                    return Err(Error::configuration(
                        "The sun command needs a location: --lat/--lon or --coords",
                    ));
                }
                args.location.resolve().map(|_| ())
            }
            Some(Commands::Moon(args)) => args.location.resolve().map(|_| ()),
            None => Ok(()),
        }
    }
}

impl MetarArgs {
    /// Validate the metar command arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(file) = &self.file {
            if !file.is_file() {
                return Err(Error::configuration(format!(
                    "Report file does not exist: {}",
                    file.display()
                )));
            }
        }

        self.location_args.resolve()?;
        if let Some(at) = &self.reference_time {
            parse_instant(at)?;
        }
        Ok(())
    }

    /// Report words joined into one line, when given on the command line
    pub fn report_text(&self) -> Option<String> {
        if self.report.is_empty() {
            None
        } else {
            Some(self.report.join(" "))
        }
    }
}

impl LocationArgs {
    /// Neither decimal nor DMS coordinates were given
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none() && self.coordinates.is_none()
    }

    /// Coordinates in radians, if a location was given
    pub fn resolve(&self) -> Result<Option<Coordinates>> {
        if let Some(text) = &self.coordinates {
            return Coordinates::parse(text).map(Some);
        }
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                Coordinates::from_degrees(latitude, longitude).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// Parse an RFC 3339 instant, or return the current time when absent
pub fn resolve_instant(value: Option<&str>) -> Result<DateTime<Utc>> {
    match value {
        Some(text) => parse_instant(text),
        None => Ok(Utc::now()),
    }
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::datetime_parsing(format!("Invalid time '{}', expected RFC 3339", text), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_no_command() {
        let args = parse(&["mateweather"]);
        assert!(args.command.is_none());
        assert_eq!(args.output_format, OutputFormat::Human);
    }

    #[test]
    fn test_metar_report_words_joined() {
        let args = parse(&["mateweather", "metar", "KORD", "111251Z", "27012KT", "M09/M17"]);
        let Some(Commands::Metar(metar)) = args.command else {
            panic!("expected metar command");
        };
        assert_eq!(metar.report_text().as_deref(), Some("KORD 111251Z 27012KT M09/M17"));
    }

    #[test]
    fn test_metar_unit_flags() {
        let args = parse(&[
            "mateweather",
            "metar",
            "--speed-unit",
            "bft",
            "--temperature-unit",
            "c",
            "--first-wins",
            "--format",
            "json",
            "A2992",
        ]);
        let Some(Commands::Metar(metar)) = &args.command else {
            panic!("expected metar command");
        };
        assert_eq!(metar.speed_unit, Some(SpeedUnit::Bft));
        assert_eq!(metar.temperature_unit, Some(TempUnit::Centigrade));
        assert!(metar.first_wins);
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let result = Args::try_parse_from(["mateweather", "metar", "--speed-unit", "warp", "A2992"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sun_negative_coordinates() {
        let args = parse(&["mateweather", "sun", "--lat", "-33.9", "--lon", "151.2"]);
        let Some(Commands::Sun(sun)) = &args.command else {
            panic!("expected sun command");
        };
        let location = sun.location.resolve().unwrap().unwrap();
        assert!((location.latitude_degrees() + 33.9).abs() < 1e-9);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_sun_requires_location() {
        let args = parse(&["mateweather", "sun"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_latitude_requires_longitude() {
        assert!(Args::try_parse_from(["mateweather", "sun", "--lat", "51.5"]).is_err());
    }

    #[test]
    fn test_dms_coordinates() {
        let args = parse(&["mateweather", "moon", "--coords", "51-28N 000-00W"]);
        let Some(Commands::Moon(moon)) = &args.command else {
            panic!("expected moon command");
        };
        let location = moon.location.resolve().unwrap().unwrap();
        assert!((location.latitude_degrees() - (51.0 + 28.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_coordinates_fail_validation() {
        let args = parse(&["mateweather", "sun", "--lat", "95", "--lon", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&["mateweather"]).get_log_level(), None);
        assert_eq!(parse(&["mateweather", "-v"]).get_log_level(), Some("info"));
        assert_eq!(parse(&["mateweather", "-vv"]).get_log_level(), Some("debug"));
        assert_eq!(parse(&["mateweather", "-vvvv"]).get_log_level(), Some("trace"));
        assert_eq!(parse(&["mateweather", "-q"]).get_log_level(), Some("error"));
    }

    #[test]
    fn test_report_file_validation() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "KORD 111251Z 27012KT").unwrap();
        let path = file.path().to_str().unwrap();

        let args = parse(&["mateweather", "metar", "-f", path]);
        assert!(args.validate().is_ok());

        let args = parse(&["mateweather", "metar", "-f", "/nonexistent/report.txt"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_resolve_instant() {
        let at = resolve_instant(Some("2024-03-20T12:00:00+02:00")).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap());
        assert!(resolve_instant(Some("yesterday")).is_err());
    }
}
