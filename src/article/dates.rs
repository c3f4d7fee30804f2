//! `Date` header parsing.
//!
//! Usenet dates come in a small zoo of shapes: the RFC 5322 form with a
//! numeric offset, variants with an obsolete named zone, a trailing
//! `(MST)` style comment, a missing weekday, or missing seconds. The
//! parser normalises the zone, then tries a deliberately enumerable set
//! of layouts in order.

use chrono::{DateTime, Utc};

use crate::{ParseError, Result};

/// Layouts tried in order once the zone is numeric. Together with the
/// comment and zone-name rewrites these cover the seven shapes observed
/// in practice.
const LAYOUTS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
];

/// Obsolete named zones (RFC 5322 §4.3) and their offsets. Any other
/// alphabetic zone token reads as +0000, which is how the wider news
/// ecosystem treats unknown zone names.
const NAMED_ZONES: &[(&str, &str)] = &[
    ("UT", "+0000"),
    ("GMT", "+0000"),
    ("EST", "-0500"),
    ("EDT", "-0400"),
    ("CST", "-0600"),
    ("CDT", "-0500"),
    ("MST", "-0700"),
    ("MDT", "-0600"),
    ("PST", "-0800"),
    ("PDT", "-0700"),
];

/// Parse a `Date` header value into a UTC timestamp.
///
/// # Examples
///
/// ```
/// use loread::article::parse_date;
///
/// parse_date("Mon, 2 Jan 2006 15:04:05 -0700").unwrap();
/// parse_date("Mon, 2 Jan 2006 15:04:05 -0700 (MST)").unwrap();
/// parse_date("2 Jan 2006 15:04:05 GMT").unwrap();
/// assert!(parse_date("not a date").is_err());
/// ```
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let mut value = raw.trim().to_string();

    // drop a trailing "(MST)" or "(MST-07:00)" comment
    if value.ends_with(')') {
        if let Some(open) = value.rfind('(') {
            value.truncate(open);
            value.truncate(value.trim_end().len());
        }
    }

    let value = normalise_zone(&value);

    for layout in LAYOUTS {
        if let Ok(parsed) = DateTime::parse_from_str(&value, layout) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }

    Err(ParseError::UnparseableDate(raw.to_string()))
}

/// Rewrite a trailing alphabetic zone name into a numeric offset.
fn normalise_zone(value: &str) -> String {
    let Some((rest, zone)) = value.rsplit_once(' ') else {
        return value.to_string();
    };
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return value.to_string();
    }

    let offset = NAMED_ZONES
        .iter()
        .find(|(name, _)| zone.eq_ignore_ascii_case(name))
        .map(|(_, offset)| *offset)
        .unwrap_or("+0000");

    format!("{rest} {offset}")
}
