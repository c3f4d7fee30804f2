#![doc = include_str!("../README.md")]

/// Raw article parsing into normalised articles
pub mod article;
/// Charset label normalisation and decoding
pub mod charset;
/// RFC 2047 encoded-word decoding for headers
pub mod encoded_words;
mod error;
/// RFC 2045 quoted-printable decoding
pub mod quoted_printable;
/// Follow-up subject prefix handling
pub mod subject;
/// JWZ conversation threading
pub mod threading;

pub use article::{
    parse_article, parse_article_with, parse_batch, MessageId, ParseOptions, ParsedArticle,
};
pub use error::{ParseError, Result};
pub use threading::{thread, Container, ContainerId, Forest};
