//! Article type definitions
//!
//! This module contains the core data structures for parsed articles:
//! [`MessageId`] and [`ParsedArticle`].

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::article::parsing::canonical_header_key;

/// Identifier taken from an article's `Message-Id` header.
///
/// Opaque and compared by byte equality, never validated: a malformed
/// id still identifies its article within one run, but only ids of the
/// canonical `<local@host>` shape are ever matched as references (see
/// [`MessageId::looks_like_message_id`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a raw header token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw id text, angle brackets included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An absent `Message-Id` header yields an empty id.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// RFC 3977 §3.6 shape check on a raw token: non-empty, starting
    /// with `<` and ending with `>`.
    pub fn looks_like(token: &str) -> bool {
        !token.is_empty() && token.starts_with('<') && token.ends_with('>')
    }

    /// Shape check on this id; see [`MessageId::looks_like`].
    pub fn looks_like_message_id(&self) -> bool {
        Self::looks_like(&self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for MessageId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A fully decoded article, immutable after parsing.
///
/// The body is plain UTF-8 text with transfer encoding and charset
/// already applied; it still needs presentation work (line breaking,
/// quotation recognition) which is the renderer's concern. The subject
/// keeps its `Re: ` prefixes — consumers strip them where needed.
#[derive(Debug, Clone)]
pub struct ParsedArticle {
    /// Message id, empty if the header was absent
    pub id: MessageId,

    /// Decoded subject line, follow-up prefixes included
    pub subject: String,

    /// Ancestor chain merged from `References` and `In-Reply-To`,
    /// oldest ancestor first, immediate parent last
    pub references: Vec<MessageId>,

    /// Remaining headers in canonical `Header-Case`, minus
    /// `References`, `In-Reply-To`, `Subject` and `Message-Id`
    pub other_headers: HashMap<String, String>,

    /// Decoded body text
    pub body: String,

    /// Parsed `Date` header; the Unix epoch when no layout matched
    pub date: DateTime<Utc>,
}

impl ParsedArticle {
    /// Look up a passthrough header by name, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use loread::parse_article;
    ///
    /// let article = parse_article(b"From: a@example.com\nSubject: hi\n\nbody").unwrap();
    /// assert_eq!(article.header("from"), Some("a@example.com"));
    /// assert_eq!(article.header("Organization"), None);
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.other_headers
            .get(&canonical_header_key(name))
            .map(String::as_str)
    }
}
