//! NOAA station file handling
//!
//! Station files published by the NWS look like:
//!
//! ```text
//! 2024/01/11 12:51
//! KORD 111251Z 27012KT 10SM FEW250 M09/M17 A3036 RMK AO2 SLP285
//! ```
//!
//! The first line is the issue time, the second the station code followed
//! by the report body.

use crate::constants::{REMARKS_MARKER, STATION_CODE_LEN};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

const ISSUE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Report line extracted from a station file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationReport {
    pub station: String,
    /// Issue time from the header line, when present and readable
    pub issued: Option<DateTime<Utc>>,
    /// Report text following the station code
    pub report: String,
}

/// Find the report for `code` in a station file body
pub fn extract_station_report(body: &str, code: &str) -> Result<StationReport> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != STATION_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::configuration(format!(
            "Invalid station code '{}': expected {} letters or digits",
            code, STATION_CODE_LEN
        )));
    }

    let issued = body.lines().next().and_then(parse_issue_time);

    let report = body
        .lines()
        .map(str::trim)
        .find_map(|line| {
            let (first, rest) = line.split_once(' ').unwrap_or((line, ""));
            (first.eq_ignore_ascii_case(&code)).then(|| rest.trim().to_string())
        })
        .ok_or_else(|| Error::station_not_found(&code))?;

    debug!("Extracted report for {}: '{}'", code, report);

    Ok(StationReport {
        station: code,
        issued,
        report,
    })
}

fn parse_issue_time(line: &str) -> Option<DateTime<Utc>> {
    match NaiveDateTime::parse_from_str(line.trim(), ISSUE_TIME_FORMAT) {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            debug!("Station file header '{}' is not an issue time: {}", line, e);
            None
        }
    }
}

/// Drop the remarks section and any end-of-report `=`
///
/// Remarks start at `" RMK "` anywhere in the text, or at a leading `"RMK "`.
pub fn strip_remarks(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_suffix('=').unwrap_or(text).trim_end();

    let leading = format!("{} ", REMARKS_MARKER);
    if text.starts_with(&leading) || text == REMARKS_MARKER {
        return "";
    }

    let inner = format!(" {} ", REMARKS_MARKER);
    if let Some(index) = text.find(&inner) {
        return text[..index].trim_end();
    }

    let trailing = format!(" {}", REMARKS_MARKER);
    text.strip_suffix(trailing.as_str()).unwrap_or(text)
}
