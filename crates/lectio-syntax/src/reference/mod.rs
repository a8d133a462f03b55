//! # Reference Resolution
//!
//! Turning human-written scripture references into canonical
//! book/chapter/verse specs, and back again.
//!
//! ```text
//! "See Gen 1; 2:3" ─ locate ─▶ ["See ", Gen 1, "; ", 2:3]
//!                                        │          │
//!                                   parse (running context)
//!                                        ▼          ▼
//!                                    GEN 1      GEN 2:3 ─ format ─▶ "Genesis 1; 2:3"
//! ```
//!
//! ## Accepted Forms
//!
//! | Form | Example | Needs context |
//! |------|---------|---------------|
//! | Full | `John 3:16-17`, `II Cor. 12`, `Gen 1-2` | - |
//! | Chapter keyword | `Chapter 3`, `Ch. 3:4` | book |
//! | Verse keyword | `v. 15`, `Verses 3-5` | book and chapter |
//! | Shorthand | `3:16`, `16-18` | book |
//!
//! Any form may be followed by a `,`/`;` continuation, which is resolved
//! against the book and chapter of the reference before it.
//!
//! ## Failure Policy
//!
//! Nothing here returns an error. Text that doesn't resolve (unknown book,
//! missing context) produces an empty list from [`parse_reference`] and a
//! literal segment from [`locate_references`].
//!
//! ## Module Structure
//!
//! - `parser` - token cursor used by the grammar rules
//! - `grammar` - acceptance grammar and resolution ([`parse_reference`])
//! - `locate` - lossless segmentation of free text ([`locate_references`])
//! - `format` - canonical display text ([`format_references`])

mod format;
mod grammar;
mod locate;
mod parser;

pub use format::format_references;
pub use grammar::{book_reference, parse_reference};
pub use locate::{LocatedSegment, locate_references};

use std::fmt;

use serde::Serialize;

use crate::books::{BookCode, BookTable};

/// A resolved reference.
///
/// `book` is always canonical. Absent numeric fields are `None`, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSpec {
    pub book: BookCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_chapter: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_verse: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_verse: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_chapter: Option<u32>,
}

impl ReferenceSpec {
    /// A whole-book reference with no chapter.
    pub fn book(book: BookCode) -> Self {
        Self {
            book,
            initial_chapter: None,
            initial_verse: None,
            final_verse: None,
            final_chapter: None,
        }
    }

    pub fn chapter(book: BookCode, chapter: u32) -> Self {
        Self {
            initial_chapter: Some(chapter),
            ..Self::book(book)
        }
    }

    pub fn verse(book: BookCode, chapter: u32, verse: u32) -> Self {
        Self {
            initial_verse: Some(verse),
            ..Self::chapter(book, chapter)
        }
    }

    pub fn with_final_verse(self, final_verse: u32) -> Self {
        Self {
            final_verse: Some(final_verse),
            ..self
        }
    }

    pub fn with_final_chapter(self, final_chapter: u32) -> Self {
        Self {
            final_chapter: Some(final_chapter),
            ..self
        }
    }

    /// Last verse covered, falling back to the initial verse.
    pub fn last_verse(&self) -> Option<u32> {
        self.final_verse.or(self.initial_verse)
    }

    /// Last chapter covered, falling back to the initial chapter.
    pub fn last_chapter(&self) -> Option<u32> {
        self.final_chapter.or(self.initial_chapter)
    }
}

impl fmt::Display for ReferenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_references(std::slice::from_ref(self)))
    }
}

/// Book/chapter context that shorthand and keyword forms resolve against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    pub book: Option<BookCode>,
    pub chapter: Option<u32>,
    /// Search the apocrypha when the canon has no match.
    pub include_apocrypha: bool,
}

impl Context {
    /// Context positioned at a book (and optionally a chapter) given by its
    /// canonical code. An unknown code leaves the book unset.
    pub fn at(book_code: &str, chapter: Option<u32>) -> Self {
        Self {
            book: BookTable::standard().code(book_code),
            chapter,
            include_apocrypha: false,
        }
    }

    pub fn with_apocrypha(self, include_apocrypha: bool) -> Self {
        Self {
            include_apocrypha,
            ..self
        }
    }

    /// Context carried forward after resolving `spec`.
    pub(crate) fn after(self, spec: &ReferenceSpec) -> Self {
        Self {
            book: Some(spec.book),
            chapter: spec.initial_chapter.or(self.chapter),
            include_apocrypha: self.include_apocrypha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn book(code: &str) -> BookCode {
        BookTable::standard().code(code).unwrap()
    }

    #[test]
    fn serializes_present_fields_in_camel_case() {
        let spec = ReferenceSpec::verse(book("JHN"), 3, 16).with_final_verse(17);
        let json = serde_json::to_value(spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "book": "JHN",
                "initialChapter": 3,
                "initialVerse": 16,
                "finalVerse": 17,
            })
        );
    }

    #[test]
    fn display_uses_formatter() {
        let spec = ReferenceSpec::chapter(book("GEN"), 1).with_final_chapter(2);
        assert_eq!(spec.to_string(), "Genesis 1-2");
    }

    #[test]
    fn range_fallbacks() {
        let spec = ReferenceSpec::verse(book("ROM"), 8, 28);
        assert_eq!(spec.last_verse(), Some(28));
        assert_eq!(spec.last_chapter(), Some(8));
        assert_eq!(spec.with_final_verse(29).last_verse(), Some(29));
    }

    #[test]
    fn context_after_keeps_chapter_when_spec_has_none() {
        let ctx = Context::at("GEN", Some(3));
        let next = ctx.after(&ReferenceSpec::book(book("EXO")));
        assert_eq!(next.book, Some(book("EXO")));
        assert_eq!(next.chapter, Some(3));
    }

    #[test]
    fn unknown_context_code_leaves_book_unset() {
        assert_eq!(Context::at("XYZ", Some(1)).book, None);
    }
}
