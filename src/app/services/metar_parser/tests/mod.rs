//! Test utilities for METAR parser testing
//!
//! Shared fixtures and helpers used across the parser test modules.

use chrono::{DateTime, TimeZone, Utc};

use crate::app::models::{DuplicateFieldPolicy, Report};
use crate::app::services::metar_parser::MetarParser;

mod parser_tests;

/// Report used across the end-to-end tests
pub const THUNDERSTORM_REPORT: &str = "221751Z 18015G25KT 1/4SM +TSRA BKN008 OVC015 18/17 A2992";

/// Station file in the NOAA publication format
pub const STATION_FILE: &str = "2024/01/11 12:51\nKORD 111251Z 27012KT 10SM FEW250 M09/M17 A3036 RMK AO2 SLP285 T10891172\n";

/// Fixed reference instant for time resolution
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap()
}

/// Parser with a fixed reference time and the given duplicate policy
pub fn create_test_parser(policy: DuplicateFieldPolicy) -> MetarParser {
    MetarParser::new()
        .with_reference_time(reference_time())
        .with_duplicate_fields(policy)
}

/// Parse with the default policy against the fixed reference time
pub fn parse(text: &str) -> Report {
    create_test_parser(DuplicateFieldPolicy::LastWins).parse(text)
}

/// Assert two floats agree within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}
