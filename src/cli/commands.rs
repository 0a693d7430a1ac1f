//! Command implementations for the mateweather CLI
//!
//! This module contains the command execution logic: logging and
//! configuration setup, reading report input, and rendering results as
//! human-readable text or JSON.

use crate::app::models::{Coordinates, DisplayUnits, DuplicateFieldPolicy, Report};
use crate::app::services::astronomy::{
    MoonPhases, MoonPosition, SunTimes, is_daytime, moon_position, next_sun_event, sun_times,
    upcoming_moon_phases,
};
use crate::app::services::metar_parser::extract_station_report;
use crate::app::services::summary::{WeatherSummary, icon_name, moon_icon_name, weather_summary};
use crate::cli::args::{Args, Commands, MetarArgs, MoonArgs, OutputFormat, SunArgs, resolve_instant};
use crate::config::WeatherConfig;
use anyhow::{Context, bail};
use chrono::{DateTime, Duration, Utc};
use colored::*;
use serde::Serialize;
use std::io::{IsTerminal, Read};
use tracing::{debug, info};

/// Main command runner
///
/// 1. Validate arguments and load layered configuration
/// 2. Set up logging at the resolved level
/// 3. Dispatch to the subcommand
pub fn run(args: Args) -> anyhow::Result<()> {
    args.validate()?;

    let config = load_configuration(&args)?;
    setup_logging(&args, &config.logging.level);

    info!("Starting mateweather");
    debug!("Command line arguments: {:?}", args);
    debug!("Loaded configuration: {:?}", config);

    match &args.command {
        Some(Commands::Metar(metar)) => run_metar(metar, &config, args.output_format),
        Some(Commands::Sun(sun)) => run_sun(sun, args.output_format),
        Some(Commands::Moon(moon)) => run_moon(moon, args.output_format),
        None => Ok(()),
    }
}

/// Set up structured logging; `RUST_LOG` takes precedence over `level`
fn setup_logging(args: &Args, level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mateweather={}", level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", level);
}

/// Load configuration using layered approach (file -> env -> args)
fn load_configuration(args: &Args) -> crate::Result<WeatherConfig> {
    let mut config = WeatherConfig::load_layered(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut WeatherConfig, args: &Args) {
    if let Some(level) = args.get_log_level() {
        config.logging.level = level.to_string();
    }

    let Some(Commands::Metar(metar)) = &args.command else {
        return;
    };

    if metar.metric {
        config.units = DisplayUnits::metric();
    } else if metar.imperial {
        config.units = DisplayUnits::imperial();
    }
    if let Some(unit) = metar.temperature_unit {
        config.units.temperature = unit;
    }
    if let Some(unit) = metar.speed_unit {
        config.units.speed = unit;
    }
    if let Some(unit) = metar.pressure_unit {
        config.units.pressure = unit;
    }
    if let Some(unit) = metar.distance_unit {
        config.units.distance = unit;
    }
    if metar.first_wins {
        config.parsing.duplicate_fields = DuplicateFieldPolicy::FirstWins;
    }
    if metar.keep_remarks {
        config.parsing.strip_remarks = false;
    }
}

// =============================================================================
// metar
// =============================================================================

/// Decoded report with its presentation
#[derive(Debug, Serialize)]
pub struct MetarOutput {
    pub station: Option<String>,
    pub headline: String,
    pub icon: String,
    pub report: Report,
    pub display: WeatherSummary,
}

fn run_metar(args: &MetarArgs, config: &WeatherConfig, format: OutputFormat) -> anyhow::Result<()> {
    let input = read_report_input(args)?;
    let output = decode_metar(&input, args, config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Human => print_metar(&output),
    }
    Ok(())
}

/// Report text from the command line, `--file`, or standard input
fn read_report_input(args: &MetarArgs) -> anyhow::Result<String> {
    if let Some(text) = args.report_text() {
        return Ok(text);
    }

    if let Some(path) = &args.file {
        info!("Reading report from {}", path.display());
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report file '{}'", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No report given: pass it as arguments, with --file, or on standard input");
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("Failed to read report from standard input")?;
    Ok(text)
}

/// Decode `input` (a bare report or a station file) for display
fn decode_metar(input: &str, args: &MetarArgs, config: &WeatherConfig) -> crate::Result<MetarOutput> {
    let (station, text, issued) = match &args.station {
        Some(code) => {
            let extracted = extract_station_report(input, code)?;
            (Some(extracted.station), extracted.report, extracted.issued)
        }
        None => (None, input.trim().to_string(), None),
    };

    let reference = match &args.reference_time {
        Some(at) => Some(resolve_instant(Some(at))?),
        None => issued,
    };
    let mut parser = config.parser();
    if let Some(reference) = reference {
        parser = parser.with_reference_time(reference);
    }

    let report = parser.parse(&text);

    let observer = args.location_args.resolve()?;
    let at = report.observation_time.unwrap_or_else(Utc::now);
    let sun = sun_times(observer.as_ref(), at);
    let moon = moon_position(at);
    let icon = icon_name(&report, &sun, observer.as_ref().map(|o| (&moon, o)), at);

    let location = args
        .location
        .clone()
        .or_else(|| station.clone())
        .unwrap_or_else(|| "Report".to_string());

    Ok(MetarOutput {
        headline: weather_summary(&location, &report),
        display: WeatherSummary::new(&report, &config.units),
        station,
        icon,
        report,
    })
}

fn print_metar(output: &MetarOutput) {
    let display = &output.display;

    println!("{}", output.headline.bold());
    println!("{}", "━".repeat(40).dimmed());
    print_field("Observed", &display.observed);
    print_field("Conditions", &display.conditions);
    print_field("Sky", &display.sky);
    print_field("Temperature", &display.temperature);
    print_field("Dew point", &display.dew_point);
    print_field("Humidity", &display.humidity);
    print_field("Feels like", &display.apparent_temperature);
    print_field("Wind", &display.wind);
    print_field("Pressure", &display.pressure);
    print_field("Visibility", &display.visibility);
    print_field("Icon", &output.icon);
}

fn print_field(label: &str, value: &str) {
    println!("   {:<14} {}", format!("{}:", label).cyan(), value);
}

// =============================================================================
// sun
// =============================================================================

#[derive(Debug, Serialize)]
struct SunOutput {
    latitude: f64,
    longitude: f64,
    at: DateTime<Utc>,
    #[serde(flatten)]
    times: SunTimes,
    day_length_minutes: Option<i64>,
    next_event_minutes: Option<i64>,
    daytime: bool,
}

fn run_sun(args: &SunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let Some(observer) = args.location.resolve()? else {
        bail!("The sun command needs a location: --lat/--lon or --coords");
    };
    let at = resolve_instant(args.at.as_deref())?;
    let output = compute_sun(&observer, at);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Human => print_sun(&output),
    }
    Ok(())
}

fn compute_sun(observer: &Coordinates, at: DateTime<Utc>) -> SunOutput {
    let times = sun_times(Some(observer), at);
    if !times.is_valid() {
        info!(
            "No sunrise/sunset at {:.2},{:.2} (midnight sun: {}, polar night: {})",
            observer.latitude_degrees(),
            observer.longitude_degrees(),
            times.midnight_sun,
            times.polar_night
        );
    }

    SunOutput {
        latitude: observer.latitude_degrees(),
        longitude: observer.longitude_degrees(),
        at,
        times,
        day_length_minutes: times.day_length().map(|d| d.num_minutes()),
        next_event_minutes: next_sun_event(Some(observer), at).map(|d| d.num_minutes()),
        daytime: is_daytime(&times, at),
    }
}

fn print_sun(output: &SunOutput) {
    println!(
        "{}",
        format!("Sun at {:.4}, {:.4}", output.latitude, output.longitude).bold()
    );
    println!("{}", "━".repeat(40).dimmed());

    if output.times.midnight_sun {
        print_field("Sun", "Above the horizon all day");
    } else if output.times.polar_night {
        print_field("Sun", "Below the horizon all day");
    }
    print_field("Sunrise", &format_instant(output.times.sunrise));
    print_field("Sunset", &format_instant(output.times.sunset));
    print_field(
        "Day length",
        &output
            .day_length_minutes
            .map(|m| format_minutes(Duration::minutes(m)))
            .unwrap_or_else(|| "-".to_string()),
    );
    print_field(
        "Next event",
        &output
            .next_event_minutes
            .map(|m| format!("in {}", format_minutes(Duration::minutes(m))))
            .unwrap_or_else(|| "-".to_string()),
    );
    print_field("Daytime", if output.daytime { "yes" } else { "no" });
}

// =============================================================================
// moon
// =============================================================================

#[derive(Debug, Serialize)]
struct MoonOutput {
    at: DateTime<Utc>,
    position: MoonPosition,
    illumination: f64,
    phases: MoonPhases,
    icon: Option<String>,
}

fn run_moon(args: &MoonArgs, format: OutputFormat) -> anyhow::Result<()> {
    let at = resolve_instant(args.at.as_deref())?;
    let observer = args.location.resolve()?;
    let output = compute_moon(observer.as_ref(), at);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Human => print_moon(&output),
    }
    Ok(())
}

fn compute_moon(observer: Option<&Coordinates>, at: DateTime<Utc>) -> MoonOutput {
    let position = moon_position(at);
    MoonOutput {
        at,
        illumination: position.illumination(),
        phases: upcoming_moon_phases(at),
        icon: observer.map(|o| moon_icon_name(&position, o)),
        position,
    }
}

fn print_moon(output: &MoonOutput) {
    println!("{}", format!("Moon at {}", output.at.format("%Y-%m-%d %H:%M UTC")).bold());
    println!("{}", "━".repeat(40).dimmed());
    print_field("Phase", &format!("{:.1}\u{00B0}", output.position.phase));
    print_field(
        "Illuminated",
        &format!("{:.0}%", output.illumination * 100.0),
    );
    print_field("Declination", &format!("{:.2}\u{00B0}", output.position.latitude));
    if let Some(icon) = &output.icon {
        print_field("Icon", icon);
    }

    println!();
    println!("{}", "Upcoming phases".bold());
    for (name, at) in output.phases.chronological() {
        print_field(name, &at.format("%Y-%m-%d %H:%M UTC").to_string());
    }
}

// =============================================================================
// Formatting Helpers
// =============================================================================

fn format_instant(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_minutes(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}
