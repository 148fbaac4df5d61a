//! The public entry point: [`Parser`] wires [`crate::splitter::Splitter`],
//! [`crate::classifier::Classifier`], and [`crate::store::StreamStore`]
//! together and dispatches synchronous subscriber callbacks.
//!
//! Grounded on `frankenterm-core/src/parser.rs`'s `Parser` struct shape
//! (owns all state, exposes `new`/`feed`), with the notification surface
//! adapted from `ftui-core/src/animation/callbacks.rs`'s `Callbacks` —
//! there, events are queued for the caller to drain later; here, `spec.md`
//! §5 requires synchronous, in-order delivery from within `feed` itself, so
//! callbacks fire directly rather than being queued.

use crate::classifier::Classifier;
use crate::element::StreamElement;
use crate::splitter::{Splitter, SplitterEvent};
use crate::store::StreamStore;

/// Converts a decoded character stream into a classified, append-only
/// [`StreamStore`], notifying subscribers synchronously as elements are
/// produced.
///
/// `Parser` never fails: every character advances it by exactly one step,
/// and every closed sequence classifies to something (`Unknown` in the
/// worst case). There is nothing to recover from except an unterminated
/// sequence at end of input, which [`Parser::reset`] clears.
pub struct Parser {
    splitter: Splitter,
    classifier: Classifier,
    store: StreamStore,
    on_element: Option<Box<dyn FnMut(&StreamElement)>>,
    on_transient_text: Option<Box<dyn FnMut(&str)>>,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("splitter", &self.splitter)
            .field("store_len", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A new parser with an empty store and no subscribers.
    pub fn new() -> Self {
        Self {
            splitter: Splitter::new(),
            classifier: Classifier::new(),
            store: StreamStore::new(),
            on_element: None,
            on_transient_text: None,
        }
    }

    /// Register a callback invoked synchronously, in order, each time a
    /// [`StreamElement`] is appended to the store. Replaces any previously
    /// registered callback.
    pub fn on_element_added(&mut self, callback: impl FnMut(&StreamElement) + 'static) {
        self.on_element = Some(Box::new(callback));
    }

    /// Register a callback invoked synchronously each time the in-progress
    /// text run grows without yet closing (`spec.md` §4.1's `TRANSIENT_TEXT`
    /// notification, for callers that want low-latency partial-line echo).
    pub fn on_transient_text(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_transient_text = Some(Box::new(callback));
    }

    /// Feed one character through the splitter, classify any completed
    /// sequence, append the resulting element, and notify subscribers.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub fn feed(&mut self, c: char) {
        let mut events = Vec::new();
        self.splitter.feed(c, &mut |event| events.push(event));
        for event in events {
            self.handle_event(event);
        }
    }

    /// Feed a whole string, one character at a time, in order.
    pub fn feed_str(&mut self, s: &str) {
        for c in s.chars() {
            self.feed(c);
        }
    }

    fn handle_event(&mut self, event: SplitterEvent) {
        match event {
            SplitterEvent::TransientText(text) => {
                if let Some(callback) = self.on_transient_text.as_mut() {
                    callback(&text);
                }
            }
            SplitterEvent::Text(text) => {
                self.append(StreamElement::text(text));
            }
            SplitterEvent::RawControlSequence(raw) => {
                let (kind, parameters) = self.classifier.classify(&raw);
                self.append(StreamElement::control_sequence(raw, kind, parameters));
            }
        }
    }

    fn append(&mut self, element: StreamElement) {
        self.store.append(element.clone());
        if let Some(callback) = self.on_element.as_mut() {
            callback(&element);
        }
    }

    /// The append-only store of every element produced so far.
    pub fn store(&self) -> &StreamStore {
        &self.store
    }

    /// Reset the splitter to its initial `Text` state, discarding any
    /// partially-accumulated, unterminated sequence. The store and its
    /// history are untouched.
    pub fn reset(&mut self) {
        self.splitter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ControlSequenceType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn plain_text_and_control_sequence_both_land_in_the_store() {
        let mut parser = Parser::new();
        parser.feed_str("hi\x1b[31mred");

        let elements: Vec<_> = parser.store().iter().collect();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].raw_text(), "hi");
        assert_eq!(elements[1].kind(), Some(ControlSequenceType::CharacterAttributes));
        assert_eq!(elements[2].raw_text(), "red");
    }

    #[test]
    fn on_element_added_fires_synchronously_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut parser = Parser::new();
        let seen_in_cb = Rc::clone(&seen);
        parser.on_element_added(move |el| seen_in_cb.borrow_mut().push(el.raw_text().to_string()));

        parser.feed_str("a\x07b");

        assert_eq!(*seen.borrow(), vec!["a".to_string(), "\u{07}".to_string(), "b".to_string()]);
    }

    #[test]
    fn on_transient_text_fires_before_the_run_closes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut parser = Parser::new();
        let seen_in_cb = Rc::clone(&seen);
        parser.on_transient_text(move |s| seen_in_cb.borrow_mut().push(s.to_string()));

        parser.feed_str("ab");

        assert_eq!(*seen.borrow(), vec!["a".to_string(), "ab".to_string()]);
        assert!(parser.store().is_empty());
    }

    #[test]
    fn reset_discards_unterminated_sequence_but_keeps_the_store() {
        let mut parser = Parser::new();
        parser.feed_str("hello\x1b[31");
        assert_eq!(parser.store().len(), 1);

        parser.reset();
        parser.feed_str("m");
        // The abandoned "\x1b[31" never classified; "m" after reset is a
        // plain text byte now, since reset returns to the Text state.
        assert_eq!(parser.store().len(), 1);
    }

    #[test]
    fn unknown_sequence_still_appends_with_unknown_kind() {
        let mut parser = Parser::new();
        parser.feed_str("\x1bQ");
        let elements: Vec<_> = parser.store().iter().collect();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), Some(ControlSequenceType::Unknown));
    }
}
