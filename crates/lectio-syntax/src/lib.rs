//! # lectio-syntax
//!
//! Scripture reference resolution: turning "John 3:16-17", "Gen. 1" or
//! "v. 15" into canonical book/chapter/verse specs, finding such references
//! in running text, and rendering specs back into display text.
//!
//! ## Architecture Overview
//!
//! ```text
//! Text → Lexer → Tokens → Grammar → Matches → BookTable → ReferenceSpec
//!        (Logos)          (recursive descent)  (aliases)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Splits input into words, numbers, punctuation and whitespace. Lossless:
//! every byte lands in exactly one token with its offset.
//!
//! ### 2. Grammar ([`reference`] module)
//!
//! Recognises full references, chapter/verse keyword forms and shorthand,
//! with `,`/`;` continuations resolved against the preceding reference.
//! Unresolvable input is never an error; it is just "not a reference".
//!
//! ### 3. Books ([`books`] module)
//!
//! The static alias table: 66 canon books plus an opt-in apocrypha
//! partition, keyed by USFM code.
//!
//! ## Module Structure
//!
//! ```text
//! lectio-syntax/
//! ├── lib.rs           # This file - public API and snapshot tests
//! ├── books.rs         # BookTable, BookCode, alias data
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── strongs.rs       # Strong's number locator
//! └── reference/
//!     ├── mod.rs       # ReferenceSpec, Context
//!     ├── parser.rs    # Token cursor
//!     ├── grammar.rs   # parse_reference, book_reference
//!     ├── locate.rs    # locate_references
//!     └── format.rs    # format_references
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use lectio_syntax::{Context, format_references, parse_reference};
//!
//! let specs = parse_reference("Gen 1:2; 2:1-3", &Context::default());
//! assert_eq!(specs.len(), 2);
//! assert_eq!(specs[1].book.as_str(), "GEN");
//! assert_eq!(format_references(&specs), "Genesis 1:2; 2:1-3");
//! ```

pub mod books;
pub mod lexer;
pub mod reference;
pub mod strongs;

pub use books::{BookCode, BookInfo, BookTable, Partition};
pub use reference::{
    Context, LocatedSegment, ReferenceSpec, book_reference, format_references, locate_references,
    parse_reference,
};
pub use strongs::{StrongsSegment, locate_strongs};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    /// Helper to format located segments for snapshot testing.
    fn format_segments(segments: &[LocatedSegment<'_>]) -> String {
        let mut result = String::new();
        for s in segments {
            let reference = match &s.reference {
                Some(spec) => serde_json::to_string(spec).unwrap(),
                None => "-".to_string(),
            };
            result.push_str(&format!("{}..{} {:?} {}\n", s.start, s.end, s.text, reference));
        }
        result
    }

    #[test]
    fn snapshot_mixed_references() {
        let segments = locate_references(
            "Read II Cor. 12:9-10, then Rom 8; 5:1 and v. 3.",
            &Context::default(),
        );
        assert_snapshot!(format_segments(&segments), @r#"
        0..5 "Read " -
        5..20 "II Cor. 12:9-10" {"book":"2CO","initialChapter":12,"initialVerse":9,"finalVerse":10}
        20..27 ", then " -
        27..32 "Rom 8" {"book":"ROM","initialChapter":8}
        32..34 "; " -
        34..37 "5:1" {"book":"ROM","initialChapter":5,"initialVerse":1}
        37..42 " and " -
        42..46 "v. 3" {"book":"ROM","initialChapter":5,"initialVerse":3}
        46..47 "." -
        "#);
    }

    #[test]
    fn snapshot_apocrypha_context() {
        let segments = locate_references(
            "Tobit 3 vs Sirach 2",
            &Context::default().with_apocrypha(true),
        );
        assert_snapshot!(format_segments(&segments), @r#"
        0..7 "Tobit 3" {"book":"TOB","initialChapter":3}
        7..11 " vs " -
        11..19 "Sirach 2" {"book":"SIR","initialChapter":2}
        "#);
    }
}
