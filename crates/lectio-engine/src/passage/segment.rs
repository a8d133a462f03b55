//! Annotation-aware chunking for interlinear rendering.
//!
//! Each binding covers the span from its first matching token (pulled back
//! onto a verse label directly before it) to its last. The token list is
//! cut just after every span end, and the bindings ending there are emitted
//! as markers in binding order:
//!
//! ```text
//! tokens   [A  B  C  D  E]      binding N1 → C
//! items    Chunk[A B C]  Marker(N1)  Chunk[D E]
//! ```
//!
//! Spans may share an end (their markers are consecutive) but must not
//! otherwise overlap.

use std::collections::BTreeMap;

use log::debug;

use super::{AnchorIndex, AnnotationBinding, RenderMode, Token};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentItem<'a> {
    Chunk(&'a [Token]),
    Marker(&'a AnnotationBinding),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("Annotations {first} and {second} overlap without sharing an end")]
    OverlappingAnnotations { first: String, second: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    start: usize,
    end: usize,
}

/// Split `tokens` into content chunks with annotation markers between them.
///
/// Always ends with a (possibly empty) trailing chunk; with no bindings the
/// result is a single chunk holding every token. Bindings that match no
/// token are skipped.
pub fn segment<'a>(
    tokens: &'a [Token],
    bindings: &'a [AnnotationBinding],
) -> Result<Vec<SegmentItem<'a>>, SegmentError> {
    let bounds = compute_bounds(tokens, bindings);
    check_overlap(&bounds, bindings)?;

    let mut ends: BTreeMap<usize, Vec<&'a AnnotationBinding>> = BTreeMap::new();
    for (b, bound) in &bounds {
        ends.entry(bound.end).or_default().push(&bindings[*b]);
    }

    let mut items = Vec::with_capacity(ends.len() * 2 + 1);
    let mut chunk_start = 0;
    for (end, markers) in ends {
        items.push(SegmentItem::Chunk(&tokens[chunk_start..=end]));
        items.extend(markers.into_iter().map(SegmentItem::Marker));
        chunk_start = end + 1;
    }
    items.push(SegmentItem::Chunk(&tokens[chunk_start..]));

    Ok(items)
}

/// [`segment`] in interlinear mode; one unsplit chunk for sidenotes, where
/// notes are positioned against the [`AnchorIndex`] instead.
pub fn segment_for_mode<'a>(
    mode: RenderMode,
    tokens: &'a [Token],
    bindings: &'a [AnnotationBinding],
) -> Result<Vec<SegmentItem<'a>>, SegmentError> {
    match mode {
        RenderMode::Interlinear => segment(tokens, bindings),
        RenderMode::Sidenotes => Ok(vec![SegmentItem::Chunk(tokens)]),
    }
}

/// Bounds per binding index, in binding order, for bindings that matched.
fn compute_bounds(tokens: &[Token], bindings: &[AnnotationBinding]) -> Vec<(usize, Bounds)> {
    let index = AnchorIndex::build(bindings);
    let mut bounds: Vec<Option<Bounds>> = vec![None; bindings.len()];

    for (i, token) in tokens.iter().enumerate() {
        let Some(id) = &token.id else { continue };
        for &b in index.binding_indices(id) {
            if let Some(bound) = &mut bounds[b] {
                bound.end = i;
            } else {
                let start = if i > 0 && tokens[i - 1].is_label() { i - 1 } else { i };
                bounds[b] = Some(Bounds { start, end: i });
            }
        }
    }

    bounds
        .into_iter()
        .enumerate()
        .filter_map(|(b, bound)| {
            if bound.is_none() {
                debug!("Annotation {} matches no token in passage", bindings[b].id);
            }
            bound.map(|bound| (b, bound))
        })
        .collect()
}

fn check_overlap(
    bounds: &[(usize, Bounds)],
    bindings: &[AnnotationBinding],
) -> Result<(), SegmentError> {
    let mut by_start: Vec<&(usize, Bounds)> = bounds.iter().collect();
    by_start.sort_by_key(|(_, bound)| bound.start);

    // widest span seen so far; anything starting inside it must end with it
    let mut open: Option<&(usize, Bounds)> = None;
    for current in by_start {
        if let Some(&(o, outer)) = open
            && current.1.start <= outer.end
        {
            if current.1.end != outer.end {
                return Err(SegmentError::OverlappingAnnotations {
                    first: bindings[o].id.clone(),
                    second: bindings[current.0].id.clone(),
                });
            }
            continue;
        }
        open = Some(current);
    }

    Ok(())
}
