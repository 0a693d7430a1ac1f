use clap::Parser;
use mateweather::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = commands::run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("MATE Weather - METAR decoder with sun and moon times");
    println!("====================================================");
    println!();
    println!("Decode METAR aviation weather reports into readable conditions,");
    println!("and compute sunrise, sunset and lunar phases for a location.");
    println!();
    println!("USAGE:");
    println!("    mateweather <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    metar       Decode a METAR report");
    println!("    sun         Sunrise and sunset for a location");
    println!("    moon        Lunar phase and the next principal phases");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Increase logging verbosity");
    println!("    -q, --quiet      Only show errors");
    println!("    -c, --config     Path to configuration file (TOML)");
    println!("        --format     Output format: human or json");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Decode a report given on the command line:");
    println!("    mateweather metar KORD 111251Z 27012KT 10SM FEW250 M09/M17 A3036");
    println!();
    println!("    # Extract a station's report from a NOAA station file, in metric units:");
    println!("    curl -s https://tgftp.nws.noaa.gov/data/observations/metar/stations/KORD.TXT \\");
    println!("        | mateweather metar --station KORD --metric");
    println!();
    println!("    # Sunrise and sunset for Greenwich as JSON:");
    println!("    mateweather sun --coords \"51-28N 000-00W\" --format json");
    println!();
    println!("    # Moon phase and upcoming phases:");
    println!("    mateweather moon --lat 51.48 --lon 0.0");
    println!();
    println!("For detailed help on any command, use:");
    println!("    mateweather <COMMAND> --help");
}
