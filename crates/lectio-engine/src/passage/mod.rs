//! # Passage Model
//!
//! A chapter as the renderer sees it: a flat, ordered list of [`Token`]s
//! (verse labels, headers and verse subsections), plus the
//! [`AnnotationBinding`]s that attach notes to tokens by id.
//!
//! ```text
//! chapter JSON ─ flatten_chapter ─▶ [Token] ─┐
//!                                            ├─ segment ─▶ [Chunk, Marker, Chunk, …]
//! note files ─────────────────▶ [Binding] ───┘
//! ```
//!
//! Tokens are rebuilt from chapter content on every load and never mutated;
//! segmentation borrows from both inputs and allocates only the item list.

mod anchors;
mod chapter;
mod segment;

pub use anchors::AnchorIndex;
pub use chapter::{Chapter, Subsection, VerseEntry, flatten_chapter, header_type, paragraph_type};
pub use segment::{SegmentError, SegmentItem, segment, segment_for_mode};

use std::fmt;
use std::str::FromStr;

use lectio_syntax::BookCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Address of a verse-level token: `BOOK.CHAPTER.VERSE`.
///
/// Every subsection of one verse shares the same id, so a binding to a
/// verse covers all of its subsections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(book: BookCode, chapter: u32, verse: &str) -> Self {
        Self(format!("{book}.{chapter}.{verse}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Smallest addressable unit of a rendered chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Absent for labels and headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TokenId>,
    /// Space-separated style classes, e.g. `"label p"` or `"wj"`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Token>>,
    /// Fields carried through from chapter content untouched (`strongs`,
    /// `punct`, `verse`, …).
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Token {
    /// An id-less token of the given type.
    pub fn new(kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            content: content.into(),
            children: None,
            attributes: serde_json::Map::new(),
        }
    }

    pub fn with_id(self, id: TokenId) -> Self {
        Self { id: Some(id), ..self }
    }

    /// Whether `kind` includes the given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.kind.split_whitespace().any(|c| c == class)
    }

    /// Verse and chapter labels.
    pub fn is_label(&self) -> bool {
        self.has_class("label")
    }
}

/// A note attached to one or more tokens.
///
/// Read from note files (`{ "tokens": [...], "contents": ... }`) where the
/// file name supplies the id. `contents` is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationBinding {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tokens: Vec<TokenId>,
    #[serde(default)]
    pub contents: serde_json::Value,
}

impl AnnotationBinding {
    /// A binding with a freshly generated id and no contents.
    pub fn new(tokens: Vec<TokenId>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tokens,
            contents: serde_json::Value::Null,
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self { id: id.into(), ..self }
    }
}

/// How annotations are presented alongside the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Notes are spliced into the text after the tokens they annotate.
    #[default]
    Interlinear,
    /// Text is unsplit; notes sit in the margin next to their anchors.
    Sidenotes,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderMode::Interlinear => "interlinear",
            RenderMode::Sidenotes => "sidenotes",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown render mode: {0} (expected interlinear or sidenotes)")]
pub struct UnknownRenderMode(String);

impl FromStr for RenderMode {
    type Err = UnknownRenderMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interlinear" => Ok(RenderMode::Interlinear),
            "sidenotes" => Ok(RenderMode::Sidenotes),
            _ => Err(UnknownRenderMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_syntax::BookTable;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn token_id_format() {
        let jhn = BookTable::standard().code("JHN").unwrap();
        assert_eq!(TokenId::new(jhn, 3, "16").as_str(), "JHN.3.16");
    }

    #[test]
    fn label_detection_uses_classes() {
        assert!(Token::new("label", "1").is_label());
        assert!(Token::new("label chapter p", "3").is_label());
        assert!(!Token::new("labels", "x").is_label());
        assert!(!Token::new("wj", "x").is_label());
    }

    #[test]
    fn new_binding_gets_unique_uuid() {
        let a = AnnotationBinding::new(vec![TokenId::from("GEN.1.1")]);
        let b = AnnotationBinding::new(vec![TokenId::from("GEN.1.1")]);
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn binding_deserializes_without_id() {
        let binding: AnnotationBinding =
            serde_json::from_str(r#"{"tokens": ["JHN.3.16"], "contents": {"text": "hi"}}"#).unwrap();
        assert_eq!(binding.id, "");
        assert_eq!(binding.tokens, vec![TokenId::from("JHN.3.16")]);
        assert_eq!(binding.contents["text"], "hi");
    }

    #[test]
    fn token_round_trips_extra_attributes() {
        let json = r#"{"id":"JHN.3.16","type":"wj","content":"For God","strongs":"G2316"}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.attributes["strongs"], "G2316");
        assert_eq!(serde_json::to_string(&token).unwrap(), json);
    }

    #[rstest]
    #[case("interlinear", RenderMode::Interlinear)]
    #[case("Sidenotes", RenderMode::Sidenotes)]
    fn render_mode_parses(#[case] input: &str, #[case] expected: RenderMode) {
        assert_eq!(input.parse::<RenderMode>(), Ok(expected));
    }

    #[test]
    fn unknown_render_mode_is_rejected() {
        assert!("columns".parse::<RenderMode>().is_err());
    }
}
