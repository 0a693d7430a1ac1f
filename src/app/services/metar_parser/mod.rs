//! METAR report parser
//!
//! Decodes the body of a METAR aviation weather report into a [`Report`].
//!
//! ## Architecture
//!
//! - [`tokenizer`] - Ordered whole-word pattern table and the field scanner
//! - [`decoders`] - One decoder per field kind, producing typed values
//! - [`station_file`] - Station file extraction and remarks stripping
//!
//! ## Usage
//!
//! ```rust
//! use mateweather::{Sky, WindDirection, parse_report};
//!
//! let report = parse_report("221751Z 18015G25KT 1/4SM +TSRA BKN008 OVC015 18/17 A2992");
//!
//! assert_eq!(report.wind_direction, Some(WindDirection::S));
//! assert_eq!(report.sky, Some(Sky::Overcast));
//! assert_eq!(report.pressure_inhg, Some(29.92));
//! ```

pub mod decoders;
pub mod station_file;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

pub use decoders::Decoded;
pub use station_file::{StationReport, extract_station_report, strip_remarks};
pub use tokenizer::{FieldKind, Token, next_token, tokenize};

use crate::app::models::{DuplicateFieldPolicy, Report};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Configurable METAR parser
#[derive(Debug, Clone)]
pub struct MetarParser {
    /// Instant used to resolve the month of the `DDHHMMZ` group
    reference_time: Option<DateTime<Utc>>,
    duplicate_fields: DuplicateFieldPolicy,
    strip_remarks: bool,
}

impl Default for MetarParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetarParser {
    /// Parser resolving times against the current clock
    pub fn new() -> Self {
        Self {
            reference_time: None,
            duplicate_fields: DuplicateFieldPolicy::default(),
            strip_remarks: true,
        }
    }

    /// Resolve observation times against a fixed instant
    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference);
        self
    }

    pub fn with_duplicate_fields(mut self, policy: DuplicateFieldPolicy) -> Self {
        self.duplicate_fields = policy;
        self
    }

    /// Whether the `RMK` section is removed before scanning
    pub fn with_strip_remarks(mut self, strip: bool) -> Self {
        self.strip_remarks = strip;
        self
    }

    pub fn duplicate_fields(&self) -> DuplicateFieldPolicy {
        self.duplicate_fields
    }

    /// Decode a report into a fresh record
    pub fn parse(&self, text: &str) -> Report {
        let mut report = Report::new();
        self.parse_into(text, &mut report);
        report
    }

    /// Decode a report into an existing record
    pub fn parse_into(&self, text: &str, report: &mut Report) {
        let reference = self.reference_time.unwrap_or_else(Utc::now);
        let body = if self.strip_remarks {
            strip_remarks(text)
        } else {
            text.trim()
        };

        let mut matched = 0usize;
        for token in tokenize(body) {
            matched += 1;
            match decoders::decode(token.kind, token.text, reference) {
                Some(decoded) => {
                    debug!("Decoded {} token '{}': {:?}", token.kind, token.text, decoded);
                    decoded.apply(report, self.duplicate_fields);
                }
                None => debug!("Ignoring malformed {} token '{}'", token.kind, token.text),
            }
        }

        if matched == 0 {
            warn!("No recognisable groups in report '{}'", body);
            return;
        }
        debug!(
            "Parsed {} tokens into {} fields from '{}'",
            matched,
            report.field_count(),
            body
        );
    }
}

/// Decode a report with the default parser settings
pub fn parse_report(text: &str) -> Report {
    MetarParser::new().parse(text)
}
