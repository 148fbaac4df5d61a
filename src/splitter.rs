//! The sequence splitter: a character-fed state machine that partitions an
//! input stream into maximal, non-overlapping raw sequences.
//!
//! This is a direct generalization of the teacher crate's toy `Parser` (which
//! only captured escape sequences verbatim as opaque bytes): the same
//! `advance_*` shape, widened from 5 states to the 7 `spec.md` requires, and
//! switched from `u8` to `char` since this crate consumes an already-decoded
//! code point stream (`spec.md` Non-goals: no UTF-8 decoding here).

/// Parser state, per `spec.md` §3. `ControlCharacter` is transient: it is
/// entered and left within a single [`Splitter::feed`] call and is never
/// observed between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Text,
    ControlCharacter,
    EscapeSequence,
    DcsSequence,
    CsiSequence,
    OscSequence,
    /// Saw `ESC` while inside an OSC sequence: might be the two-byte `ESC \`
    /// terminator, or a false alarm. Additional state needed to recognize
    /// `ESC \` as an OSC terminator (`spec.md` §9, third open question).
    OscEscape,
}

/// What the splitter produced for one [`Splitter::feed`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitterEvent {
    /// A maximal text run, closed by a control inducer or explicit flush.
    Text(String),
    /// A raw C0/ESC/CSI/DCS/OSC envelope, verbatim, ready for classification.
    RawControlSequence(String),
    /// The text buffer grew (but was not yet closed). Payload is the full
    /// buffer accumulated since the last `Text` event.
    TransientText(String),
}

const C0_SET: [char; 10] = [
    '\u{07}', '\u{08}', '\u{0D}', '\u{05}', '\u{0C}', '\u{0A}', '\u{0F}', '\u{0E}', '\u{09}',
    '\u{0B}',
];

const ESC: char = '\u{1B}';
const DCS: char = '\u{90}';
const CSI: char = '\u{9B}';
const OSC: char = '\u{9D}';
const ST: char = '\u{9C}';
const BEL: char = '\u{07}';

/// 7-bit ESC terminal characters, minus `P`, `[`, `]` (which instead route
/// into `DcsSequence`/`CsiSequence`/`OscSequence`). Deduplicated from
/// `spec.md` §6's `ESC_END_SET` listing.
const ESC_END_SET: &[char] = &[
    'D', 'E', 'H', 'M', 'N', 'O', 'V', 'W', 'X', 'Z', '\\', '^', '_', 'F', 'G', 'L', '3', '4',
    '5', '6', '8', '@', '0', 'A', 'B', 'C', 'R', 'Q', 'K', 'Y', '7', '=', '9', '>', 'c', 'l', 'm',
    'n', 'o', '|', '}', '~',
];

fn is_c0(c: char) -> bool {
    C0_SET.contains(&c)
}

fn is_esc_end(c: char) -> bool {
    ESC_END_SET.contains(&c)
}

fn is_csi_final(c: char) -> bool {
    ('\u{40}'..='\u{7E}').contains(&c)
}

/// The character-driven state machine from `spec.md` §4.1.
///
/// `Splitter` never fails: every `char` advances the machine by exactly one
/// step and produces zero or more [`SplitterEvent`]s via the supplied sink.
#[derive(Debug, Clone)]
pub struct Splitter {
    state: ParseState,
    builder: String,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Splitter {
    /// A new splitter in the initial `Text` state with an empty builder.
    pub fn new() -> Self {
        Self {
            state: ParseState::Text,
            builder: String::new(),
        }
    }

    /// The current parse state (exposed for diagnostics/tests, not part of
    /// the classified output).
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Clear state and buffer, returning to `Text`. An unterminated escape
    /// sequence never completes on its own (`spec.md` §4.1 "Failure
    /// semantics") — this is how a host recovers from one.
    pub fn reset(&mut self) {
        self.state = ParseState::Text;
        self.builder.clear();
    }

    /// Advance the machine by one character, reporting zero or more events
    /// through `sink`. `sink` is called at most twice (a closed text run
    /// immediately followed by the control character/sequence that closed
    /// it) and never blocks.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self, sink)))]
    pub fn feed(&mut self, c: char, sink: &mut dyn FnMut(SplitterEvent)) {
        match self.state {
            ParseState::Text => self.advance_text(c, sink),
            ParseState::EscapeSequence => self.advance_escape(c, sink),
            ParseState::DcsSequence => self.advance_dcs(c, sink),
            ParseState::CsiSequence => self.advance_csi(c, sink),
            ParseState::OscSequence => self.advance_osc(c, sink),
            ParseState::OscEscape => self.advance_osc_escape(c, sink),
            // Transient; Text handling always leaves this state before
            // `feed` returns, so it is never the entry state here.
            ParseState::ControlCharacter => unreachable!("ControlCharacter is not a resting state"),
        }
    }

    fn advance_text(&mut self, c: char, sink: &mut dyn FnMut(SplitterEvent)) {
        if is_c0(c) {
            self.flush_text(sink);
            self.state = ParseState::ControlCharacter;
            self.builder.push(c);
            self.flush_control(sink);
            self.state = ParseState::Text;
            return;
        }
        match c {
            ESC => {
                self.flush_text(sink);
                self.builder.push(c);
                self.state = ParseState::EscapeSequence;
            }
            DCS => {
                self.flush_text(sink);
                self.builder.push(c);
                self.state = ParseState::DcsSequence;
            }
            CSI => {
                self.flush_text(sink);
                self.builder.push(c);
                self.state = ParseState::CsiSequence;
            }
            OSC => {
                self.flush_text(sink);
                self.builder.push(c);
                self.state = ParseState::OscSequence;
            }
            _ => {
                self.builder.push(c);
                sink(SplitterEvent::TransientText(self.builder.clone()));
            }
        }
    }

    fn advance_escape(&mut self, c: char, sink: &mut dyn FnMut(SplitterEvent)) {
        // `builder` holds just `ESC` the instant we enter this state, so a
        // length of 1 means `c` is the second character of the sequence.
        if self.builder.chars().count() == 1 {
            match c {
                'P' => {
                    self.builder.push(c);
                    self.state = ParseState::DcsSequence;
                    return;
                }
                '[' => {
                    self.builder.push(c);
                    self.state = ParseState::CsiSequence;
                    return;
                }
                ']' => {
                    self.builder.push(c);
                    self.state = ParseState::OscSequence;
                    return;
                }
                _ => {}
            }
        }
        self.builder.push(c);
        if is_esc_end(c) {
            self.flush_control(sink);
            self.state = ParseState::Text;
        }
    }

    fn advance_dcs(&mut self, c: char, sink: &mut dyn FnMut(SplitterEvent)) {
        self.builder.push(c);
        if c == ST {
            self.flush_control(sink);
            self.state = ParseState::Text;
        }
    }

    fn advance_csi(&mut self, c: char, sink: &mut dyn FnMut(SplitterEvent)) {
        self.builder.push(c);
        if is_csi_final(c) {
            self.flush_control(sink);
            self.state = ParseState::Text;
        }
    }

    fn advance_osc(&mut self, c: char, sink: &mut dyn FnMut(SplitterEvent)) {
        self.builder.push(c);
        match c {
            BEL | ST => {
                self.flush_control(sink);
                self.state = ParseState::Text;
            }
            ESC => {
                self.state = ParseState::OscEscape;
            }
            _ => {}
        }
    }

    fn advance_osc_escape(&mut self, c: char, sink: &mut dyn FnMut(SplitterEvent)) {
        self.builder.push(c);
        if c == '\\' {
            self.flush_control(sink);
            self.state = ParseState::Text;
        } else {
            // False alarm: the ESC we saw was not the start of `ESC \`.
            self.state = ParseState::OscSequence;
        }
    }

    /// `emit()` from `spec.md` §4.1: no-op on an empty buffer, otherwise
    /// drain the buffer as a `Text` event. Does not touch `self.state`.
    fn flush_text(&mut self, sink: &mut dyn FnMut(SplitterEvent)) {
        if self.builder.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.builder);
        sink(SplitterEvent::Text(text));
    }

    /// `emit()` for the non-`Text` states: drain the buffer as a raw control
    /// sequence event for the classifier. Does not touch `self.state`.
    fn flush_control(&mut self, sink: &mut dyn FnMut(SplitterEvent)) {
        if self.builder.is_empty() {
            return;
        }
        let raw = std::mem::take(&mut self.builder);
        sink(SplitterEvent::RawControlSequence(raw));
    }
}
