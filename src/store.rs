//! The stream store: an append-only, in-order record of every
//! [`StreamElement`] produced so far (`spec.md` §4.3).
//!
//! Grounded on `frankenterm-core/src/scrollback.rs`'s `Scrollback`: a
//! push-only buffer with `len`/`is_empty` accessors. Simplified to an
//! unbounded `Vec` rather than `Scrollback`'s `VecDeque` ring buffer, since
//! `spec.md` §3 specifies no eviction/capacity policy for the element
//! stream — unlike scrollback lines, elements are never discarded.

use crate::element::StreamElement;

/// Append-only record of [`StreamElement`]s, in the order they were
/// produced. Never removes or reorders an entry once appended (`spec.md`
/// §4.3, property P1/P2).
#[derive(Debug, Default, Clone)]
pub struct StreamStore {
    elements: Vec<StreamElement>,
}

impl StreamStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Append one element. Only [`crate::parser::Parser`] calls this.
    pub(crate) fn append(&mut self, element: StreamElement) {
        self.elements.push(element);
    }

    /// Number of elements recorded.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no elements have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&StreamElement> {
        self.elements.get(index)
    }

    /// Iterate over every recorded element, in append order.
    pub fn iter(&self) -> impl Iterator<Item = &StreamElement> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a StreamStore {
    type Item = &'a StreamElement;
    type IntoIter = std::slice::Iter<'a, StreamElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
