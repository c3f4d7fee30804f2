//! Article parsing.
//!
//! Turns one raw article (headers, blank line, body; LF line endings)
//! into a normalised [`ParsedArticle`]: unfolded `Header-Case` headers,
//! a merged reference chain, an RFC 2047 decoded subject, a body run
//! through the transfer-encoding and charset pipeline, and a parsed
//! date.
//!
//! This module is organized into:
//! - `types`: core data structures (`MessageId`, `ParsedArticle`)
//! - `parsing`: article and header parsing functions
//! - `dates`: the `Date` header layout table

mod dates;
mod parsing;
mod types;

// Re-export public API
pub use self::dates::parse_date;
pub use self::parsing::{
    canonical_header_key, parse_article, parse_article_with, parse_batch, parse_headers,
    ParseOptions,
};
pub use self::types::{MessageId, ParsedArticle};
