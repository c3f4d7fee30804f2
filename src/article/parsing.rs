//! Article parsing functions
//!
//! Raw articles arrive as byte buffers with LF line endings (the
//! fetcher canonicalises CRLF). Parsing splits headers from body,
//! unfolds and canonicalises the headers, merges the reference chain,
//! and decodes the body through the transfer-encoding and charset
//! pipeline.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::DateTime;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::article::dates;
use crate::article::types::{MessageId, ParsedArticle};
use crate::{charset, encoded_words, quoted_printable, ParseError, Result};

/// Controls header-parsing strictness.
///
/// The default is lenient: Usenet data is historically messy, so a
/// header line without a `": "` separator is skipped with a warning.
/// Strict mode turns it into [`ParseError::MalformedHeader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Error on malformed header lines instead of skipping them
    pub strict_headers: bool,
}

impl ParseOptions {
    /// Malformed header lines are errors.
    pub fn strict() -> Self {
        Self {
            strict_headers: true,
        }
    }

    /// Malformed header lines are skipped with a warning.
    pub fn lenient() -> Self {
        Self {
            strict_headers: false,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::lenient()
    }
}

/// Parse one raw article into a [`ParsedArticle`] with default options.
///
/// # Examples
///
/// ```
/// use loread::parse_article;
///
/// let raw = b"Message-Id: <1@example.com>\n\
///             Subject: Hello\n\
///             Date: Mon, 2 Jan 2006 15:04:05 -0700\n\
///             \n\
///             Hi there!";
/// let article = parse_article(raw).unwrap();
/// assert_eq!(article.id.as_str(), "<1@example.com>");
/// assert_eq!(article.subject, "Hello");
/// assert_eq!(article.body, "Hi there!");
/// ```
pub fn parse_article(raw: &[u8]) -> Result<ParsedArticle> {
    parse_article_with(raw, ParseOptions::default())
}

/// Parse one raw article with explicit options.
pub fn parse_article_with(raw: &[u8], options: ParseOptions) -> Result<ParsedArticle> {
    let (header_block, body_block) = split_article(raw);
    let header_text = String::from_utf8_lossy(header_block);
    let mut headers = parse_headers(&header_text, options)?;

    let references = take_references(&mut headers);

    let mut subject = headers.remove("Subject").unwrap_or_default();
    if subject.starts_with("=?") {
        subject = encoded_words::decode_header_value(&subject);
    }

    let id = MessageId::new(headers.remove("Message-Id").unwrap_or_default());
    if id.is_empty() {
        debug!("article without Message-Id; it will join no thread");
    }

    let body = decode_body(body_block, &headers, &id)?;

    let date = match headers.get("Date") {
        Some(value) => dates::parse_date(value).unwrap_or_else(|err| {
            debug!("{err}; using the epoch");
            DateTime::UNIX_EPOCH
        }),
        None => DateTime::UNIX_EPOCH,
    };

    Ok(ParsedArticle {
        id,
        subject,
        references,
        other_headers: headers,
        body,
        date,
    })
}

/// Parse a whole group's raw articles in parallel.
///
/// Parsing is a pure function, so articles decode independently. Hard
/// body-decode failures are logged and the offending article skipped;
/// everything else degrades in place. Output order follows input order.
pub fn parse_batch(raws: &[Vec<u8>]) -> Vec<ParsedArticle> {
    raws.par_iter()
        .filter_map(|raw| match parse_article(raw) {
            Ok(article) => Some(article),
            Err(err) => {
                warn!("skipping undecodable article: {err}");
                None
            }
        })
        .collect()
}

/// Split a raw article at the first blank line. Without one, the whole
/// buffer counts as headers.
fn split_article(raw: &[u8]) -> (&[u8], &[u8]) {
    match raw.windows(2).position(|pair| pair == b"\n\n") {
        Some(pos) => (&raw[..pos], &raw[pos + 2..]),
        None => (raw, &[][..]),
    }
}

/// Canonicalise a header key to `Header-Case`: the first letter and
/// every letter after a `-` uppercased, the rest lowercased.
pub fn canonical_header_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = true;

    for c in key.chars() {
        if c == '-' {
            out.push(c);
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Unfold the header block and split it into canonical key/value
/// pairs. Duplicate keys resolve last-writer-wins.
pub fn parse_headers(raw: &str, options: ParseOptions) -> Result<HashMap<String, String>> {
    let mut headers = HashMap::new();

    for line in unfold_lines(raw) {
        match line.split_once(": ") {
            Some((key, value)) => {
                headers.insert(canonical_header_key(key.trim()), value.trim().to_string());
            }
            None if options.strict_headers => {
                return Err(ParseError::MalformedHeader(line));
            }
            None => warn!("skipping malformed header line: {line:?}"),
        }
    }

    Ok(headers)
}

/// Rejoin folded header lines (RFC 3977 §3.6): a line starting with
/// space or tab continues the previous header. Each logical header is
/// whitespace-trimmed as a whole; blank lines disappear.
fn unfold_lines(raw: &str) -> Vec<String> {
    let mut logical: Vec<String> = Vec::new();

    for line in raw.split('\n') {
        let continuation = line.starts_with(' ') || line.starts_with('\t');
        match logical.last_mut() {
            Some(last) if continuation => {
                last.push(' ');
                last.push_str(line.trim());
            }
            _ => logical.push(line.trim().to_string()),
        }
    }

    logical.retain(|line| !line.is_empty());
    logical
}

/// Merge `References` and `In-Reply-To` into one ordered ancestor
/// list, oldest first, immediate parent last. When both headers are
/// present the list is the `References` chain plus the first
/// `In-Reply-To` token that looks like a message-id. Both headers are
/// consumed from the map.
fn take_references(headers: &mut HashMap<String, String>) -> Vec<MessageId> {
    let references = headers.remove("References").unwrap_or_default();
    let in_reply_to = headers.remove("In-Reply-To").unwrap_or_default();

    let merged = if !references.is_empty() && !in_reply_to.is_empty() {
        let first = in_reply_to
            .split_whitespace()
            .find(|token| MessageId::looks_like(token))
            .unwrap_or("");
        format!("{references} {first}")
    } else {
        format!("{references} {in_reply_to}")
    };

    merged.split_whitespace().map(MessageId::new).collect()
}

/// Apply the transfer encoding and charset to the raw body bytes.
fn decode_body(raw: &[u8], headers: &HashMap<String, String>, id: &MessageId) -> Result<String> {
    let trimmed = trim_bytes(raw);

    let encoding = headers
        .get("Content-Transfer-Encoding")
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let decoded = match encoding.as_str() {
        "base64" => {
            // line wrapping is not part of the base64 payload
            let compact: Vec<u8> = trimmed
                .iter()
                .copied()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            BASE64.decode(compact)?
        }
        "quoted-printable" => quoted_printable::decode(trimmed)?,
        // 7bit, 8bit, absent and anything unknown pass through
        _ => trimmed.to_vec(),
    };

    let content_type = headers
        .get("Content-Type")
        .map(String::as_str)
        .unwrap_or("");
    let label = content_charset(content_type);

    match charset::decode(&decoded, &label) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!("{err} in article {id}; keeping raw bytes");
            Ok(String::from_utf8_lossy(&decoded).into_owned())
        }
    }
}

/// Extract the `charset=` parameter from a `Content-Type` value.
/// Parameters are semicolon-separated; the value may be double-quoted.
/// UTF-8 is the default.
fn content_charset(content_type: &str) -> String {
    for parameter in content_type.split(';') {
        let parameter = parameter.trim();
        if !parameter.to_ascii_lowercase().contains("charset") {
            continue;
        }
        if let Some((_, value)) = parameter.split_once('=') {
            return value.trim().trim_matches('"').to_string();
        }
    }

    "UTF-8".to_string()
}

fn trim_bytes(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |pos| pos + 1);
    &bytes[start..end]
}
