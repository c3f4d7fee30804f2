//! Charset label normalisation and bytes-to-UTF-8 decoding.
//!
//! Usenet articles label their charsets loosely: `UTF-8`, `utf_8` and
//! `utf 8` all mean the same thing. Labels are canonicalised before
//! lookup; anything that is not UTF-8 is decoded through the
//! `encoding_rs` table (ISO-8859-*, KOI8-R, the Windows-125x family,
//! and the rest of the WHATWG label registry).

use encoding_rs::Encoding;

use crate::{ParseError, Result};

/// Canonicalise a charset label: lowercase with `-`, `_` and spaces
/// removed, so `"UTF-8"`, `"utf_8"` and `"utf 8"` all become `"utf8"`.
pub fn normalise_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(*c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Decode `bytes` under the given charset label.
///
/// A label that normalises to `utf8` takes the bytes as they are
/// (invalid sequences become replacement characters). Every other
/// label is resolved through the `encoding_rs` label table; a label
/// the table does not know is [`ParseError::UnknownCharset`].
pub fn decode(bytes: &[u8], label: &str) -> Result<String> {
    if normalise_label(label) == "utf8" {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }

    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ParseError::UnknownCharset(label.to_string()))?;
    let (decoded, _, _) = encoding.decode(bytes);
    Ok(decoded.into_owned())
}
