//! Whole-word field matcher for METAR report text
//!
//! The report is scanned left to right. At each step every field pattern is
//! searched in the unread remainder and the match that starts earliest wins;
//! when two patterns start at the same offset the one declared first in
//! [`FieldKind::ALL`] wins. Patterns only match whole words, i.e. text
//! bounded by the start or end of the string or a single space.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;
use tracing::trace;

/// Report field recognised by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Time,
    Wind,
    Visibility,
    Condition,
    Cloud,
    Temperature,
    Pressure,
}

const COMPASS_SUFFIX: &str = "NE|NW|N|SE|SW|S|E|W";

impl FieldKind {
    /// Field kinds in tie-break order
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Time,
        FieldKind::Wind,
        FieldKind::Visibility,
        FieldKind::Condition,
        FieldKind::Cloud,
        FieldKind::Temperature,
        FieldKind::Pressure,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Time => "time",
            FieldKind::Wind => "wind",
            FieldKind::Visibility => "visibility",
            FieldKind::Condition => "condition",
            FieldKind::Cloud => "cloud",
            FieldKind::Temperature => "temperature",
            FieldKind::Pressure => "pressure",
        }
    }

    /// Token body without the whole-word boundaries
    fn body(&self) -> String {
        match self {
            FieldKind::Time => r"(?P<day>[0-9]{2})(?P<hour>[0-9]{2})(?P<minute>[0-9]{2})Z".to_string(),
            FieldKind::Wind => concat!(
                r"(?P<direction>[0-9]{3}|VRB)(?P<speed>[0-9]?[0-9]{2})",
                r"(?:G(?P<gust>[0-9]?[0-9]{2}))?(?P<unit>KT|MPS)?"
            )
            .to_string(),
            FieldKind::Visibility => format!(
                concat!(
                    r"(?P<less>M)?(?:(?P<whole>[12]) )?(?P<num>[1357])/(?P<den>1?[0-9])SM",
                    r"|(?P<miles>[0-9]?[0-9])SM",
                    r"|(?P<meters>[0-9]{{4}})(?:{dir})?(?: (?P<minimum>[0-9]{{4}})(?:{dir}))?",
                    r"|(?P<cavok>CAVOK)"
                ),
                dir = COMPASS_SUFFIX
            ),
            FieldKind::Condition => concat!(
                r"(?P<intensity>[-+])?(?P<descriptor>VC|MI|BC|PR|TS|BL|SH|DR|FZ)?",
                r"(?P<phenomenon>DZ|RA|SN|SG|IC|PE|PL|GR|GS|UP|BR|FG|FU|VA|SA|HZ|PY|DU|SQ|SS|DS|PO|FC)"
            )
            .to_string(),
            FieldKind::Cloud => concat!(
                r"(?P<cover>CLR|BKN|SCT|FEW|OVC|SKC|NSC)",
                r"(?P<height>[0-9]{3}|///)?(?P<kind>CB|TCU|///)?"
            )
            .to_string(),
            FieldKind::Temperature => {
                r"(?P<temperature>M?[0-9]{2})/(?P<dew_point>M?[0-9]{2}|//)?".to_string()
            }
            FieldKind::Pressure => r"(?P<unit>[AQ])(?P<value>[0-9]{4})".to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiled whole-word pattern for one field kind
#[derive(Debug)]
pub struct FieldPattern {
    kind: FieldKind,
    regex: Regex,
}

impl FieldPattern {
    fn new(kind: FieldKind) -> Self {
        let source = format!("(?:^| )({})(?: |$)", kind.body());
        let regex = Regex::new(&source)
            .unwrap_or_else(|e| panic!("built-in {} pattern is invalid: {}", kind, e));
        Self { kind, regex }
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Byte range of the earliest whole-word token in `text`
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|token| (token.start(), token.end()))
    }

    /// Captures for `token` if it is exactly one token of this kind
    pub fn captures<'t>(&self, token: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(token).filter(|caps| {
            caps.get(1)
                .is_some_and(|whole| whole.start() == 0 && whole.end() == token.len())
        })
    }
}

static PATTERNS: LazyLock<Vec<FieldPattern>> =
    LazyLock::new(|| FieldKind::ALL.iter().map(|&kind| FieldPattern::new(kind)).collect());

/// The ordered pattern table
pub fn patterns() -> &'static [FieldPattern] {
    &PATTERNS
}

/// Pattern for a single field kind
pub fn pattern(kind: FieldKind) -> &'static FieldPattern {
    &PATTERNS[kind as usize]
}

/// A matched field token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: FieldKind,
    pub text: &'a str,
    /// Byte offset of the token in the scanned text
    pub start: usize,
    /// Byte offset just past the token
    pub end: usize,
}

/// Find the next token at or after `cursor`
pub fn next_token(text: &str, cursor: usize) -> Option<Token<'_>> {
    let rest = text.get(cursor..)?;
    let mut best: Option<(FieldKind, usize, usize)> = None;

    for pattern in patterns() {
        if let Some((start, end)) = pattern.find(rest) {
            // Strict comparison keeps the earlier pattern on ties
            if best.is_none_or(|(_, best_start, _)| start < best_start) {
                best = Some((pattern.kind(), start, end));
            }
        }
    }

    let (kind, start, end) = best?;
    let token = Token {
        kind,
        text: &rest[start..end],
        start: cursor + start,
        end: cursor + end,
    };
    trace!("Matched {} token '{}' at {}", token.kind, token.text, token.start);
    Some(token)
}

/// Iterate over every field token in `text`
pub fn tokenize(text: &str) -> impl Iterator<Item = Token<'_>> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let token = next_token(text, cursor)?;
        cursor = skip_spaces(text, token.end);
        Some(token)
    })
}

fn skip_spaces(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start_matches(' ').len())
}
