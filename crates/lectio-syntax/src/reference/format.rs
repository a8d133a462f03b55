use std::fmt::Write;

use super::ReferenceSpec;
use crate::books::BookCode;

/// Render specs as display text, omitting the book and chapter wherever they
/// repeat the previous spec's.
///
/// Consecutive specs are joined with `", "` when both book and chapter
/// change and with `"; "` otherwise, so `[GEN 3:15, GEN 3:16-18]` renders as
/// `"Genesis 3:15; :16-18"`.
pub fn format_references(specs: &[ReferenceSpec]) -> String {
    let mut out = String::new();
    let mut current_book: Option<BookCode> = None;
    let mut current_chapter: Option<u32> = None;

    for (i, spec) in specs.iter().enumerate() {
        let book_changes = current_book != Some(spec.book);
        let chapter_changes = current_chapter != spec.initial_chapter;

        if i > 0 {
            out.push_str(if book_changes && chapter_changes { ", " } else { "; " });
        }

        if book_changes {
            out.push_str(spec.book.info().display_title());
            out.push(' ');
            current_book = Some(spec.book);
        }

        if chapter_changes {
            if let Some(chapter) = spec.initial_chapter {
                let _ = write!(out, "{chapter}");
            }
            current_chapter = spec.initial_chapter;
        }

        if let Some(verse) = spec.initial_verse {
            let _ = write!(out, ":{verse}");
        }
        if let Some(final_verse) = spec.final_verse {
            let _ = write!(out, "-{final_verse}");
        }
        if let Some(final_chapter) = spec.final_chapter {
            let _ = write!(out, "-{final_chapter}");
        }
    }

    out
}
