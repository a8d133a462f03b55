use log::trace;
use serde::Serialize;

use super::grammar::{candidate_end, parse_tokens};
use super::{Context, ReferenceSpec};
use crate::lexer::lex;

/// A contiguous span of located text.
///
/// `start`/`end` are byte offsets into the input and `text` is the borrowed
/// slice between them. `reference` is `None` for literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedSegment<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
    pub reference: Option<ReferenceSpec>,
}

impl<'a> LocatedSegment<'a> {
    fn literal(text: &'a str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            text: &text[start..end],
            reference: None,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// Split `text` into literal runs and resolved references.
///
/// Candidates are resolved against a running context: each resolved
/// reference becomes the book/chapter context for the next candidate, so
/// `"Gen 1; 2:3"` locates two Genesis references without any initial
/// context. Concatenating the segments' text always reproduces `text`, and
/// literal runs are never split.
pub fn locate_references<'a>(text: &'a str, context: &Context) -> Vec<LocatedSegment<'a>> {
    let tokens = lex(text);
    let mut context = *context;
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < tokens.len() {
        let Some(end) = candidate_end(&tokens, i, context.include_apocrypha) else {
            i += 1;
            continue;
        };

        let start_offset = tokens[i].offset;
        let end_offset = tokens[end - 1].end();

        let Some(&spec) = parse_tokens(&tokens[i..end], &context).first() else {
            trace!("Unresolved reference candidate {:?}", &text[start_offset..end_offset]);
            i += 1;
            continue;
        };

        if literal_start < start_offset {
            segments.push(LocatedSegment::literal(text, literal_start, start_offset));
        }
        segments.push(LocatedSegment {
            start: start_offset,
            end: end_offset,
            text: &text[start_offset..end_offset],
            reference: Some(spec),
        });

        context = context.after(&spec);
        literal_start = end_offset;
        i = end;
    }

    if literal_start < text.len() || segments.is_empty() {
        segments.push(LocatedSegment::literal(text, literal_start, text.len()));
    }

    segments
}
