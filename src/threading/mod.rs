//! Conversation threading.
//!
//! Reference: <http://www.jwz.org/doc/threading.html>
//!
//! Reconstructs the discussion forest of a newsgroup from the parsed
//! articles' reference chains, with phantom containers standing in for
//! referenced-but-missing ancestors.
//!
//! This module is organized into:
//! - `forest`: the container arena, traversal and the secondary chain
//! - `algorithm`: the threading passes themselves

mod algorithm;
mod forest;

// Re-export public API
pub use self::algorithm::thread;
pub use self::forest::{Articles, Container, ContainerId, Forest, Walk};
