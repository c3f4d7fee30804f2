//! RFC 2045 quoted-printable decoding.
//!
//! The fetcher hands us articles with CRLF already canonicalised to a
//! single LF, so a soft line break is `=` directly followed by `\n`
//! (or `\t` for the tab-stuffed variant seen in old posts).

use crate::{ParseError, Result};

/// Decode a quoted-printable body.
///
/// - `=` followed by tab or newline is a soft line break and is deleted;
/// - `=HH` with two hex digits decodes to one byte;
/// - every other byte passes through literally.
///
/// Inputs containing no `=` decode to themselves. Returns
/// [`ParseError::BadHexEscape`] when `=` is followed by fewer than two
/// valid hex digits.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'=' {
            out.push(byte);
            i += 1;
            continue;
        }

        match input.get(i + 1) {
            // soft break consumes exactly one byte: CRLF pairs were
            // already folded to '\n' upstream
            Some(b'\t') | Some(b'\n') => i += 2,
            _ => {
                let escaped = input.get(i + 1..i + 3).and_then(hex_pair);
                match escaped {
                    Some(value) => {
                        out.push(value);
                        i += 3;
                    }
                    None => return Err(bad_escape(&input[i + 1..])),
                }
            }
        }
    }

    Ok(out)
}

/// Decode the RFC 2047 "Q" variant used inside encoded words:
/// underscores stand for spaces, the rest is quoted-printable.
pub fn decode_q(input: &[u8]) -> Result<Vec<u8>> {
    let unescaped: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'_' { b' ' } else { b })
        .collect();
    decode(&unescaped)
}

fn hex_pair(hex: &[u8]) -> Option<u8> {
    if hex.len() != 2 || !hex.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let hex = std::str::from_utf8(hex).ok()?;
    u8::from_str_radix(hex, 16).ok()
}

fn bad_escape(rest: &[u8]) -> ParseError {
    let shown: String = rest.iter().take(2).map(|&b| b as char).collect();
    ParseError::BadHexEscape(shown)
}
