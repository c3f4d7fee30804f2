//! RFC 2047 encoded-word decoding for article headers.
//!
//! Headers may carry non-ASCII text as `=?charset?encoding?text?=`
//! words, where the encoding is `B` (base64) or `Q` (a quoted-printable
//! variant). Decoded bytes go through the same charset table as article
//! bodies, so header and body decoding share one pipeline.
//!
//! Decoding never fails: a word that cannot be decoded is replaced by a
//! `<<Couldn't decode '…'>>` placeholder and the surrounding header
//! text is preserved.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::warn;

use crate::{charset, quoted_printable, ParseError, Result};

/// Decode a header value that may contain encoded words.
///
/// Whitespace between two adjacent encoded words is elided (RFC 2047
/// §6.2); whitespace next to plain text is preserved.
///
/// # Examples
///
/// ```
/// use loread::encoded_words::decode_header_value;
///
/// assert_eq!(decode_header_value("=?ISO-8859-1?Q?Gr=FC=DFe?="), "Grüße");
/// assert_eq!(
///     decode_header_value("Re: =?UTF-8?B?SGVsbG8=?= World"),
///     "Re: Hello World",
/// );
/// ```
pub fn decode_header_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    let mut last_was_encoded = false;

    while let Some(start) = rest.find("=?") {
        let (plain, tail) = rest.split_at(start);
        out.push_str(plain);
        if plain.bytes().any(|b| b != b' ' && b != b'\t') {
            last_was_encoded = false;
        }

        match encoded_word_end(tail) {
            Some(end) => {
                let word = &tail[..end];
                // adjacent encoded words: drop the whitespace between them
                if last_was_encoded {
                    while out.ends_with(' ') || out.ends_with('\t') {
                        out.pop();
                    }
                }
                match decode_word(word) {
                    Ok(decoded) => out.push_str(&decoded),
                    Err(err) => {
                        warn!("undecodable encoded word: {err}");
                        out.push_str(&format!("<<Couldn't decode '{word}'>>"));
                    }
                }
                last_was_encoded = true;
                rest = &tail[end..];
            }
            None => {
                // a lone "=?" is plain text; keep scanning after it
                out.push_str("=?");
                last_was_encoded = false;
                rest = &tail[2..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode a single `=?charset?encoding?text?=` word.
fn decode_word(word: &str) -> Result<String> {
    let inner = word
        .strip_prefix("=?")
        .and_then(|w| w.strip_suffix("?="))
        .ok_or_else(|| ParseError::MalformedEncodedWord(word.to_string()))?;

    let mut parts = inner.splitn(3, '?');
    let (label, encoding, text) = match (parts.next(), parts.next(), parts.next()) {
        (Some(label), Some(encoding), Some(text)) => (label, encoding, text),
        _ => return Err(ParseError::MalformedEncodedWord(word.to_string())),
    };

    let bytes = match encoding {
        "B" | "b" => BASE64.decode(text)?,
        "Q" | "q" => quoted_printable::decode_q(text.as_bytes())?,
        _ => return Err(ParseError::MalformedEncodedWord(word.to_string())),
    };

    charset::decode(&bytes, label)
}

/// Find the end of an encoded word at the start of `input`: the byte
/// index just past the closing `?=`, after at least three `?`. Returns
/// None for words with embedded whitespace or no terminator.
fn encoded_word_end(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut question_count = 0;

    for i in 2..bytes.len() {
        match bytes[i] {
            b'?' => {
                question_count += 1;
                if question_count >= 3 && bytes.get(i + 1) == Some(&b'=') {
                    return Some(i + 2);
                }
            }
            b' ' | b'\t' => return None,
            _ => {}
        }
    }

    None
}
