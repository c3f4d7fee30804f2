//! Parser error types

use thiserror::Error;

/// Errors produced while decoding raw articles.
///
/// The parser is deliberately forgiving — most malformed input degrades
/// in place with a logged warning. Only hard decode failures of an
/// article body surface to the caller.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Base64 content (body or encoded word) that fails to decode
    #[error("base64 decode error: {0}")]
    BadBase64(#[from] base64::DecodeError),

    /// Quoted-printable `=` escape with fewer than two hex digits
    #[error("quoted-printable escape '={0}' is not two hex digits")]
    BadHexEscape(String),

    /// Charset label missing from the charset table
    #[error("unknown charset: {0}")]
    UnknownCharset(String),

    /// RFC 2047 encoded word that cannot be decoded
    #[error("malformed encoded word: {0}")]
    MalformedEncodedWord(String),

    /// Header line without a `": "` separator (strict mode only)
    #[error("malformed header line: {0}")]
    MalformedHeader(String),

    /// Date header matching none of the known layouts
    #[error("unrecognised date format: {0}")]
    UnparseableDate(String),
}

/// Result type alias using ParseError
pub type Result<T> = std::result::Result<T, ParseError>;
