//! # Boards
//!
//! The board is the entire data model of Spring '83: one blob of HTML-ish
//! content per key, at most 2217 bytes, carrying its own publication time in
//! a `<time>` tag. This module holds the value type plus the content rules
//! that don't depend on any store or transport: timestamp extraction and the
//! "timestamp-only means deleted" convention.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use thiserror::Error;

use crate::config;

/// From the protocol: `<time datetime="YYYY-MM-DDTHH:MM:SSZ">`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The specification explicitly permits strict parsing, so we don't bother
/// with the generous allowances normally extended to HTML.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<time datetime="([1-9]\d{3}-(0[1-9]|1[0-2])-\d\dT\d\d:\d\d:\d\dZ)">"#)
        .expect("timestamp regex is valid")
});

/// Failures extracting the timestamp from board content.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// No `<time datetime="...">` tag anywhere in the content.
    #[error("content contains no timestamp tag")]
    Missing,

    /// A tag matched the pattern but did not parse as a real UTC instant
    /// (think February 31st).
    #[error("timestamp tag could not be parsed")]
    Unparseable,
}

/// A single key's published board.
///
/// Boards are immutable once stored; an update replaces the whole value.
/// The signature is kept in its wire form (128 hex characters) because that
/// is the only form it's ever served back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// The raw published content, at most 2217 bytes.
    pub content: Vec<u8>,
    /// Hex-encoded Ed25519 signature of `content` under the owning key.
    pub signature: String,
    /// Publication time parsed out of the content's `<time>` tag.
    pub timestamp: DateTime<Utc>,
}

impl Board {
    /// Whether this board has outlived the 22-day content age bound at the
    /// given instant. Stores enforce this at read time; the reaper merely
    /// reclaims the memory.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.timestamp + config::max_content_age()
    }
}

/// Finds the first timestamp tag in `content` and parses it as a UTC second.
pub fn parse_content_timestamp(content: &[u8]) -> Result<DateTime<Utc>, TimestampError> {
    let text = String::from_utf8_lossy(content);
    let caps = TIMESTAMP_RE.captures(&text).ok_or(TimestampError::Missing)?;

    NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError::Unparseable)
}

/// Checks whether content is only a timestamp tag, which is akin to a
/// deleted board: the protocol says boards are never removed, but a final
/// update carrying nothing but a `<time>` tag makes the server respond as
/// if the board doesn't exist.
pub fn is_timestamp_only(content: &[u8]) -> bool {
    let text = String::from_utf8_lossy(content);
    let text: &str = text.as_ref();
    let Some(m) = TIMESTAMP_RE.find(text) else {
        return false;
    };

    let mut remainder = String::with_capacity(text.len() - m.len());
    remainder.push_str(&text[..m.start()]);
    remainder.push_str(&text[m.end()..]);
    remainder.trim().is_empty()
}
