use std::collections::HashMap;

use super::{AnnotationBinding, TokenId};

/// Token id → bindings that reference it, in binding order.
///
/// Sidenote layouts use this to position each note beside the first token it
/// annotates; the segmenter uses it to find binding bounds in one pass.
#[derive(Debug, Clone)]
pub struct AnchorIndex<'a> {
    bindings: &'a [AnnotationBinding],
    by_token: HashMap<&'a TokenId, Vec<usize>>,
}

impl<'a> AnchorIndex<'a> {
    pub fn build(bindings: &'a [AnnotationBinding]) -> Self {
        let mut by_token: HashMap<&'a TokenId, Vec<usize>> = HashMap::new();
        for (b, binding) in bindings.iter().enumerate() {
            for id in &binding.tokens {
                let entry = by_token.entry(id).or_default();
                if entry.last() != Some(&b) {
                    entry.push(b);
                }
            }
        }
        Self { bindings, by_token }
    }

    /// Bindings referencing `id`, in binding order.
    pub fn notes_for(&self, id: &TokenId) -> impl Iterator<Item = &'a AnnotationBinding> + '_ {
        self.binding_indices(id).iter().map(|&b| &self.bindings[b])
    }

    /// The note shown at `id`: the first binding that references it.
    pub fn top_note(&self, id: &TokenId) -> Option<&'a AnnotationBinding> {
        self.notes_for(id).next()
    }

    pub fn is_anchored(&self, id: &TokenId) -> bool {
        self.by_token.contains_key(id)
    }

    pub(crate) fn binding_indices(&self, id: &TokenId) -> &[usize] {
        self.by_token.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}
