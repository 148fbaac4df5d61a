//! Property-based invariant tests for `termseq`.
//!
//! These verify the structural properties `SPEC_FULL.md` §8 claims must
//! hold for *any* input, not just the handwritten examples in the unit
//! tests alongside each module:
//!
//! - P1: every input character is accounted for across the emitted
//!   elements (no silent drops, no silent fabrication).
//! - P2: a `Parser` never panics on arbitrary `char` input.
//! - P3: the transient-text notifications observed during a feed are a
//!   strictly growing sequence of prefixes of the text run they precede.
//! - P4: classification is total and deterministic — every raw sequence
//!   produced by the splitter classifies to *something*, and classifying
//!   the same raw text twice always yields the same kind and parameters.
//! - P5: a CSI sequence's numeric parameters round-trip through
//!   `Parameters::numeric` exactly as written, for any digit string.

use proptest::prelude::*;
use termseq::{ControlSequenceType, Parser};

fn arbitrary_char() -> impl Strategy<Value = char> {
    prop_oneof![
        3 => ' '..='~',
        1 => Just('\u{07}'),
        1 => Just('\u{08}'),
        1 => Just('\u{09}'),
        1 => Just('\u{0A}'),
        1 => Just('\u{0D}'),
        1 => Just('\u{1B}'),
        1 => Just('\u{9B}'),
        1 => Just('\u{9C}'),
        1 => Just('\u{9D}'),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// P2: no arbitrary character sequence makes `Parser::feed` panic.
    #[test]
    fn parser_never_panics(chars in prop::collection::vec(arbitrary_char(), 0..64)) {
        let mut parser = Parser::new();
        for c in chars {
            parser.feed(c);
        }
    }

    /// P1: concatenating every element's `raw_text` reproduces the input
    /// exactly, for any input built from self-terminating tokens (plain
    /// text, a single C0 control, or a complete CSI sequence) — nothing is
    /// dropped, nothing is invented.
    #[test]
    fn raw_text_accounts_for_every_input_character(
        tokens in prop::collection::vec(
            prop_oneof![
                "[a-zA-Z0-9]{1,6}",
                "\u{07}",
                "\u{08}",
                ("[0-9;]{0,6}", '\u{40}'..='\u{7E}')
                    .prop_map(|(params, fin)| format!("\x1b[{params}{fin}")),
            ],
            0..16,
        )
    ) {
        let s = tokens.concat();
        let mut parser = Parser::new();
        parser.feed_str(&s);

        let reconstructed: String = parser.store().iter().map(|e| e.raw_text()).collect();
        prop_assert_eq!(reconstructed, s);
    }

    /// P3: each `TransientText` notification is the full buffer accumulated
    /// since the run started, so each one is a prefix of, and at least as
    /// long as, the one before it.
    #[test]
    fn transient_text_grows_monotonically(s in "[a-zA-Z]{1,20}") {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_in_cb = Rc::clone(&seen);
        let mut parser = Parser::new();
        parser.on_transient_text(move |text| seen_in_cb.borrow_mut().push(text.to_string()));
        parser.feed_str(&s);

        let seen = seen.borrow();
        for window in seen.windows(2) {
            prop_assert!(window[1].starts_with(window[0].as_str()));
            prop_assert!(window[1].len() > window[0].len());
        }
        if let Some(last) = seen.last() {
            prop_assert_eq!(last, &s);
        }
    }

    /// P4 (totality): any CSI-shaped raw sequence, however nonsensical the
    /// middle digits, classifies as either a known kind or `Unknown` —
    /// never panics, never returns nothing.
    #[test]
    fn csi_classification_is_total(params in "[0-9;]{0,12}", fin in '\u{40}'..='\u{7E}') {
        use termseq::Classifier;
        let raw = format!("\x1b[{params}{fin}");
        let classifier = Classifier::new();
        // Must return without panicking; `Unknown` is an acceptable result.
        let _ = classifier.classify(&raw);
    }

    /// P4 (determinism): classifying the same raw text twice always yields
    /// the same kind and the same parameters.
    #[test]
    fn classification_is_deterministic(params in "[0-9;]{0,12}", fin in '\u{40}'..='\u{7E}') {
        use termseq::Classifier;
        let raw = format!("\x1b[{params}{fin}");
        let classifier = Classifier::new();
        let first = classifier.classify(&raw);
        let second = classifier.classify(&raw);
        prop_assert_eq!(first, second);
    }

    /// P5: the numeric parameters of a `CharacterAttributes` (SGR) sequence
    /// round-trip through `Parameters::numeric` as the integers that were
    /// written, for any sequence of 1-3 values.
    #[test]
    fn sgr_numeric_parameters_round_trip(values in prop::collection::vec(0u16..=255, 1..4)) {
        let joined = values.iter().map(u16::to_string).collect::<Vec<_>>().join(";");
        let raw = format!("\x1b[{joined}m");

        let mut parser = Parser::new();
        parser.feed_str(&raw);

        let elements: Vec<_> = parser.store().iter().collect();
        prop_assert_eq!(elements.len(), 1);
        prop_assert_eq!(elements[0].kind(), Some(ControlSequenceType::CharacterAttributes));

        let parameters = elements[0].parameters().unwrap();
        prop_assert_eq!(parameters.len(), values.len());
        for (index, expected) in values.iter().enumerate() {
            prop_assert_eq!(parameters.numeric(index, -1), *expected as i64);
        }
    }
}
