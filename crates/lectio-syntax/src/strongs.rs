//! Strong's concordance numbers (`G26`, `H430`) in free text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static STRONGS_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[GHgh][0-9]+").expect("Invalid Strong's number regex"));

/// A span of text that is either literal or a Strong's number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrongsSegment<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
    /// Upper-cased number (`"G26"`) when this span is one.
    pub number: Option<String>,
}

impl<'a> StrongsSegment<'a> {
    fn literal(text: &'a str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: &text[start..end],
            number: None,
        }
    }
}

/// Split `text` into literal runs and Strong's numbers.
///
/// Matches anywhere, including inside words. Same guarantees as
/// [`locate_references`](crate::reference::locate_references): segments
/// concatenate back to `text`, no two literal segments are adjacent, and
/// empty input gives a single empty literal.
pub fn locate_strongs(text: &str) -> Vec<StrongsSegment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;

    for m in STRONGS_NUMBER.find_iter(text) {
        if literal_start < m.start() {
            segments.push(StrongsSegment::literal(text, literal_start, m.start()));
        }
        segments.push(StrongsSegment {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
            number: Some(m.as_str().to_ascii_uppercase()),
        });
        literal_start = m.end();
    }

    if literal_start < text.len() || segments.is_empty() {
        segments.push(StrongsSegment::literal(text, literal_start, text.len()));
    }

    segments
}
