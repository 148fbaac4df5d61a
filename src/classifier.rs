//! The sequence classifier: a table-driven recognizer that maps a raw
//! sequence to a [`ControlSequenceType`] plus an ordered parameter list.
//!
//! There is no teacher analog for this module — `frankenterm-core`'s
//! `Action::Escape` never decodes its payload. The catalog below is built
//! once, behind a [`std::sync::LazyLock`], and never mutates afterward
//! (`spec.md` §5: "safe for concurrent read from multiple parsers").
//!
//! Matching is hand-rolled literal/char-class anchoring rather than a
//! `regex` dependency, per `spec.md` §9's explicit note that "any
//! deterministic regex engine suffices... consider a hand-rolled matcher for
//! hot paths since rules are small and fixed" — the teacher crate itself
//! never reaches for `regex` in its own parsing code.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::element::{ControlSequenceType, Parameters};
use crate::error::CatalogError;

const ESC: char = '\u{1B}';
const DCS_C1: char = '\u{90}';
const CSI_C1: char = '\u{9B}';
const OSC_C1: char = '\u{9D}';
const ST: char = '\u{9C}';

#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Exact literal raw-text equality; always zero parameters.
    Literal(&'static str),
    /// `(ESC [ | 0x9B) <private_mode> (params) <final_chars>`, params
    /// restricted to digits and `;` (this is what disambiguates e.g. a bare
    /// `CSI Ps h` from `CSI ? Ps h` instead of both matching a bare `(.*)`).
    Csi {
        private_mode: &'static str,
        final_chars: &'static str,
    },
    /// `(ESC P | 0x90) <intermediate> (payload) ST`.
    Dcs { intermediate: &'static str },
    /// `(ESC ] | 0x9D) (payload) <terminator>`, where the terminator is
    /// either a single byte or the two-byte `ESC \` form (`spec.md` §9's
    /// third open question).
    Osc { terminator: OscTerminator },
    /// `ESC <intermediate> <final>` where intermediate selects G0-G3 and
    /// final selects the VT100/VT220 charset level (`spec.md` §4.2
    /// "Designate character set"). The produced kind is computed from the
    /// matched characters rather than fixed ahead of time, so this variant
    /// ignores its owning [`Rule`]'s `kind` field entirely.
    Designate,
}

#[derive(Debug, Clone, Copy)]
enum OscTerminator {
    Byte(char),
    EscBackslash,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    kind: ControlSequenceType,
    matcher: Matcher,
}

impl Rule {
    fn try_match<'a>(&self, raw: &'a str) -> Option<(ControlSequenceType, &'a str)> {
        match self.matcher {
            Matcher::Literal(lit) => (raw == lit).then_some((self.kind, "")),
            Matcher::Csi {
                private_mode,
                final_chars,
            } => {
                let body = strip_csi_intro(raw)?;
                let body = body.strip_prefix(private_mode)?;
                let payload = body.strip_suffix(final_chars)?;
                is_params_payload(payload).then_some((self.kind, payload))
            }
            Matcher::Dcs { intermediate } => {
                let body = strip_dcs_intro(raw)?;
                let body = body.strip_suffix(ST)?;
                let payload = body.strip_prefix(intermediate)?;
                Some((self.kind, payload))
            }
            Matcher::Osc { terminator } => {
                let body = strip_osc_intro(raw)?;
                let payload = match terminator {
                    OscTerminator::Byte(c) => body.strip_suffix(c)?,
                    OscTerminator::EscBackslash => body.strip_suffix("\x1b\\")?,
                };
                Some((self.kind, payload))
            }
            Matcher::Designate => {
                let mut chars = raw.chars();
                if chars.next()? != ESC {
                    return None;
                }
                let intermediate = chars.next()?;
                // `fin` is not consulted for the level: the final character
                // only selects the catalog bucket (`classify_raw` already
                // guarantees it is one of `VT100_FINALS`/`VT220_FINALS`
                // below), it does not carry charset-level information.
                let _fin = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                let (register, level) = designate_register_and_level(intermediate)?;
                Some((designate_kind(register, level), ""))
            }
        }
    }
}

fn is_params_payload(payload: &str) -> bool {
    payload.chars().all(|c| c.is_ascii_digit() || c == ';')
}

fn strip_csi_intro(raw: &str) -> Option<&str> {
    raw.strip_prefix("\x1b[").or_else(|| raw.strip_prefix(CSI_C1))
}

fn strip_dcs_intro(raw: &str) -> Option<&str> {
    raw.strip_prefix("\x1bP").or_else(|| raw.strip_prefix(DCS_C1))
}

fn strip_osc_intro(raw: &str) -> Option<&str> {
    raw.strip_prefix("\x1b]").or_else(|| raw.strip_prefix(OSC_C1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharsetLevel {
    Vt100,
    Vt220,
    Vt300,
}

/// The charset level is a property of the *intermediate* byte, not the
/// final byte (standard xterm designate-character-set semantics): `(`/`)`
/// always select the VT100 (94-charset) level, `*`/`+` always select
/// VT220, and `-`/`.`/`/` always select VT300, regardless of which valid
/// final character follows.
fn designate_register_and_level(c: char) -> Option<(u8, CharsetLevel)> {
    match c {
        '(' => Some((0, CharsetLevel::Vt100)),
        ')' => Some((1, CharsetLevel::Vt100)),
        '*' => Some((2, CharsetLevel::Vt220)),
        '+' => Some((3, CharsetLevel::Vt220)),
        '-' => Some((1, CharsetLevel::Vt300)),
        '.' => Some((2, CharsetLevel::Vt300)),
        '/' => Some((3, CharsetLevel::Vt300)),
        _ => None,
    }
}

fn designate_kind(register: u8, level: CharsetLevel) -> ControlSequenceType {
    use ControlSequenceType::*;
    match (register, level) {
        (0, CharsetLevel::Vt100) => DesignateG0CharacterSetVt100,
        (0, CharsetLevel::Vt220) => DesignateG0CharacterSetVt220,
        (0, CharsetLevel::Vt300) => DesignateG0CharacterSetVt300,
        (1, CharsetLevel::Vt100) => DesignateG1CharacterSetVt100,
        (1, CharsetLevel::Vt220) => DesignateG1CharacterSetVt220,
        (1, CharsetLevel::Vt300) => DesignateG1CharacterSetVt300,
        (2, CharsetLevel::Vt100) => DesignateG2CharacterSetVt100,
        (2, CharsetLevel::Vt220) => DesignateG2CharacterSetVt220,
        (2, CharsetLevel::Vt300) => DesignateG2CharacterSetVt300,
        (3, CharsetLevel::Vt100) => DesignateG3CharacterSetVt100,
        (3, CharsetLevel::Vt220) => DesignateG3CharacterSetVt220,
        (3, CharsetLevel::Vt300) => DesignateG3CharacterSetVt300,
        _ => unreachable!("designate_register_and_level only yields register 0..=3"),
    }
}

fn push(map: &mut HashMap<char, Vec<Rule>>, bucket: char, kind: ControlSequenceType, matcher: Matcher) {
    map.entry(bucket).or_default().push(Rule { kind, matcher });
}

fn build_catalog() -> HashMap<char, Vec<Rule>> {
    use ControlSequenceType::*;
    let mut map: HashMap<char, Vec<Rule>> = HashMap::new();

    // -- Single-character functions --
    let scf: &[(char, ControlSequenceType)] = &[
        ('\u{07}', Bell),
        ('\u{08}', Backspace),
        ('\u{0D}', CarriageReturn),
        ('\u{05}', ReturnTerminalStatus),
        ('\u{0C}', FormFeed),
        ('\u{0A}', LineFeed),
        ('\u{0F}', ShiftIn),
        ('\u{0E}', ShiftOut),
        ('\u{09}', HorizontalTab),
        ('\u{0B}', VerticalTab),
    ];
    for &(c, kind) in scf {
        let lit: &'static str = Box::leak(c.to_string().into_boxed_str());
        push(&mut map, c, kind, Matcher::Literal(lit));
    }

    // -- ESC sequences (literal, no parameters) --
    let esc: &[(&str, ControlSequenceType)] = &[
        ("\x1b F", SevenBitControls),
        ("\x1b G", EightBitControls),
        ("\x1b L", SetAnsiConformanceLevel1),
        ("\x1b M", SetAnsiConformanceLevel2),
        ("\x1b N", SetAnsiConformanceLevel3),
        ("\x1b#3", DecDoubleHeightLineTopHalf),
        ("\x1b#4", DecDoubleHeightLineBottomHalf),
        ("\x1b#5", DecSingleWidthLine),
        ("\x1b#6", DecDoubleWidthLine),
        ("\x1b#8", DecScreenAlignmentTest),
        ("\x1b%@", SelectDefaultCharacterSet),
        ("\x1b%G", SelectUtf8CharacterSet),
        ("\x1b6", BackIndex),
        ("\x1b7", SaveCursor),
        ("\x1b8", RestoreCursor),
        ("\x1b9", ForwardIndex),
        ("\x1b=", ApplicationKeypad),
        ("\x1b>", NormalKeypad),
        ("\x1bF", CursorToLowerLeftCornerOfScreen),
        ("\x1bc", FullReset),
        ("\x1bl", MemoryLock),
        ("\x1bm", MemoryUnlock),
        ("\x1bn", InvokeG2CharacterSetAsGl),
        ("\x1bo", InvokeG3CharacterSetAsGl),
        ("\x1b~", InvokeG1CharacterSetAsGr),
        ("\x1b}", InvokeG2CharacterSetAsGr),
        ("\x1b|", InvokeG3CharacterSetAsGr),
    ];
    for &(lit, kind) in esc {
        let bucket = lit.chars().last().expect("non-empty literal");
        push(&mut map, bucket, kind, Matcher::Literal(lit));
    }
    // InvokeG1CharacterSetAsGl has no distinct ESC form in ECMA-48 (SI/Shift
    // In already invokes G1 as GL at the C0 level); the kind exists in the
    // closed enum for completeness but is unreachable from this catalog.

    // -- Designate character set: one rule per final, covering all 7
    // intermediates and all three charset levels generically via
    // `Matcher::Designate`.
    const VT100_FINALS: &[char] = &['0', 'A', 'B'];
    const VT220_FINALS: &[char] = &['4', 'C', '5', 'R', 'Q', 'K', 'Y', 'E', '6', 'Z', 'H', '7', '='];
    for &fin in VT100_FINALS.iter().chain(VT220_FINALS.iter()) {
        // `kind` is a placeholder: `Matcher::Designate` computes the real
        // kind from the matched intermediate/final at classify time.
        push(&mut map, fin, Unknown, Matcher::Designate);
    }

    // -- DCS sequences (bucket on ST) --
    // The three intermediate-bearing rules must be tried before the bare
    // `""` catch-all: `str::strip_prefix("")` always succeeds, so if
    // `UserDefinedKeys` were listed first it would shadow every other DCS
    // kind (first match wins within a bucket).
    let dcs: &[(&str, ControlSequenceType)] = &[
        ("$q", RequestStatusString),
        ("+p", SetTermcapData),
        ("+q", RequestTermcapString),
        ("", UserDefinedKeys),
    ];
    for &(intermediate, kind) in dcs {
        push(&mut map, ST, kind, Matcher::Dcs { intermediate });
    }

    // -- OSC (bucket on each terminator) --
    push(
        &mut map,
        '\u{07}',
        SetTextParameters,
        Matcher::Osc {
            terminator: OscTerminator::Byte('\u{07}'),
        },
    );
    push(
        &mut map,
        ST,
        SetTextParameters,
        Matcher::Osc {
            terminator: OscTerminator::Byte(ST),
        },
    );
    push(
        &mut map,
        '\\',
        SetTextParameters,
        Matcher::Osc {
            terminator: OscTerminator::EscBackslash,
        },
    );

    // -- CSI sequences --
    let csi: &[(&str, &str, ControlSequenceType)] = &[
        ("", "@", InsertCharacters),
        ("", "A", CursorUp),
        ("", "B", CursorDown),
        ("", "C", CursorForward),
        ("", "D", CursorBackward),
        ("", "E", CursorNextLine),
        ("", "F", CursorPrecedingLine),
        ("", "G", CursorCharacterAbsolute),
        ("", "H", CursorPosition),
        ("", "I", CursorForwardTabulation),
        ("", "J", EraseInDisplayEd),
        ("?", "J", EraseInDisplayDecsed),
        ("", "K", EraseInLineEl),
        ("?", "K", EraseInLineDecsel),
        ("", "L", InsertLines),
        ("", "M", DeleteLines),
        ("", "P", DeleteCharacters),
        ("", "S", ScrollUpLines),
        ("?", "S", XtermGraphicsAttributes),
        // Both rules below share private_mode="" and final="T": first-match
        // wins, so a bare `CSI Ps T` always classifies as ScrollDownLines.
        // Preserved deliberately; see `spec.md` §9 / DESIGN.md.
        ("", "T", ScrollDownLines),
        ("", "T", InitiateHighlightMouseTracking),
        (">", "T", ResetTitleModeFeatures),
        ("", "X", EraseCharacters),
        ("?", "Y", FinalTerm),
        ("", "Z", CursorBackwardTabulation),
        ("", "`", CharacterPositionAbsolute),
        ("", "a", CharacterPositionRelative),
        ("", "b", RepeatPrecedingCharacter),
        ("", "c", SendDeviceAttributesPrimary),
        (">", "c", SendDeviceAttributesSecondary),
        ("=", "c", SendDeviceAttributesTertiary),
        ("", "d", LinePositionAbsolute),
        ("", "e", LinePositionRelative),
        ("", "f", HorizontalAndVerticalPosition),
        ("", "g", TabClear),
        ("", "h", SetMode),
        ("?", "h", DecPrivateModeSet),
        ("", "i", MediaCopy),
        ("?", "i", MediaCopyDec),
        ("", "l", ResetMode),
        ("?", "l", DecPrivateModeReset),
        ("", "m", CharacterAttributes),
        (">", "m", SetKeyModifierOptions),
        ("", "n", DeviceStatusReport),
        ("?", "n", DeviceStatusReportDec),
        (">", "n", DisableKeyModifierOptions),
        ("!", "p", SoftTerminalReset),
        ("", "\"p", SetConformanceLevel),
        ("", "$p", RequestAnsiMode),
        ("?", "$p", RequestDecPrivateMode),
        ("", "q", LoadLeds),
        ("", " q", SetCursorStyle),
        ("", "\"q", SelectCharacterProtectionAttribute),
        ("", "r", SetScrollingRegion),
        ("?", "r", RestoreDecPrivateModeValues),
        ("", "$r", ChangeAttributesInRectangularArea),
        ("", "s", SaveCursorAnsi),
        ("?", "s", SaveDecPrivateModeValues),
        ("", "t", WindowManipulation),
        (">", "t", SetTitleModeFeatures),
        ("", " t", SetWarningBellVolume),
        ("", "$t", ReverseAttributesInRectangularArea),
        ("", "u", RestoreCursorAnsi),
        ("", " u", SetMarginBellVolume),
        ("", "$v", CopyRectangularArea),
        ("", "'w", EnableFilterRectangle),
        ("", "x", RequestTerminalParameters),
        ("", "*x", SelectAttributeChangeExtent),
        ("", "$x", FillRectangularArea),
        ("", "*y", RequestChecksumOfRectangularArea),
        ("", "$z", EraseRectangularArea),
        ("", "${", SelectiveEraseRectangularArea),
        ("", "#{", PushSgrAttributes),
        ("", "#}", PopSgrAttributes),
        ("", "'}", InsertColumns),
        ("", "'~", DeleteColumns),
    ];
    for &(private_mode, final_chars, kind) in csi {
        let bucket = final_chars.chars().last().expect("non-empty final_chars");
        push(
            &mut map,
            bucket,
            kind,
            Matcher::Csi {
                private_mode,
                final_chars,
            },
        );
    }

    map
}

static CATALOG: LazyLock<HashMap<char, Vec<Rule>>> = LazyLock::new(build_catalog);

/// Pure classification over the static pattern catalog (`spec.md` §4.2).
fn classify_raw(raw: &str) -> (ControlSequenceType, Parameters) {
    let Some(fc) = raw.chars().next_back() else {
        return (ControlSequenceType::Unknown, Parameters::empty());
    };
    let Some(bucket) = CATALOG.get(&fc) else {
        return (ControlSequenceType::Unknown, Parameters::empty());
    };
    for rule in bucket {
        if let Some((kind, payload)) = rule.try_match(raw) {
            if payload.is_empty() {
                return (kind, Parameters::empty());
            }
            let parts = payload.split(';').map(str::to_string).collect();
            return (kind, Parameters::new(parts));
        }
    }
    (ControlSequenceType::Unknown, Parameters::empty())
}

/// The sequence classifier. Stateless: the catalog it reads is a
/// process-wide singleton built once on first use and shared read-only
/// across every `Classifier`/`Parser` (`spec.md` §5).
#[derive(Debug, Default, Clone, Copy)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify one completed raw sequence.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace"))]
    pub fn classify(&self, raw: &str) -> (ControlSequenceType, Parameters) {
        classify_raw(raw)
    }

    /// Sanity-check the built-in catalog. This exists for the "pattern
    /// compilation errors are programmer errors, fatal at startup" guidance
    /// in `spec.md` §7 — `Classifier::new()` never fails because the
    /// built-in table is a compile-time constant, but this entry point lets
    /// tests assert the table stays internally consistent as it grows.
    pub fn validate_rule_table() -> Result<(), CatalogError> {
        if CATALOG.is_empty() {
            return Err(CatalogError::empty_catalog());
        }
        for (&bucket, rules) in CATALOG.iter() {
            if rules.is_empty() {
                return Err(CatalogError::empty_bucket(bucket));
            }
        }
        // Every SCF control byte must resolve to its own dedicated kind.
        for &(c, kind) in &[
            ('\u{07}', ControlSequenceType::Bell),
            ('\u{08}', ControlSequenceType::Backspace),
            ('\u{0D}', ControlSequenceType::CarriageReturn),
        ] {
            let (got, _) = classify_raw(&c.to_string());
            if got != kind {
                return Err(CatalogError::unexpected_kind(c, kind, got));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(raw: &str) -> (ControlSequenceType, Parameters) {
        Classifier::new().classify(raw)
    }

    #[test]
    fn scf_bell() {
        assert_eq!(
            classify("\u{07}"),
            (ControlSequenceType::Bell, Parameters::empty())
        );
    }

    #[test]
    fn esc_save_cursor() {
        assert_eq!(
            classify("\x1b7"),
            (ControlSequenceType::SaveCursor, Parameters::empty())
        );
    }

    #[test]
    fn esc_screen_alignment_test() {
        assert_eq!(
            classify("\x1b#8"),
            (
                ControlSequenceType::DecScreenAlignmentTest,
                Parameters::empty()
            )
        );
    }

    #[test]
    fn esc_select_utf8_charset() {
        assert_eq!(
            classify("\x1b%G"),
            (
                ControlSequenceType::SelectUtf8CharacterSet,
                Parameters::empty()
            )
        );
    }

    #[test]
    fn designate_g0_vt100() {
        assert_eq!(
            classify("\x1b(B"),
            (
                ControlSequenceType::DesignateG0CharacterSetVt100,
                Parameters::empty()
            )
        );
    }

    #[test]
    fn designate_g1_vt100_regardless_of_final() {
        // The charset level comes from the intermediate `)`, which is
        // always VT100, even though `K` is also a valid VT220-family final
        // for other intermediates.
        assert_eq!(
            classify("\x1b)K"),
            (
                ControlSequenceType::DesignateG1CharacterSetVt100,
                Parameters::empty()
            )
        );
    }

    #[test]
    fn designate_g2_vt220() {
        assert_eq!(
            classify("\x1b*0"),
            (
                ControlSequenceType::DesignateG2CharacterSetVt220,
                Parameters::empty()
            )
        );
    }

    #[test]
    fn designate_g1_vt300() {
        assert_eq!(
            classify("\x1b-0"),
            (
                ControlSequenceType::DesignateG1CharacterSetVt300,
                Parameters::empty()
            )
        );
    }

    #[test]
    fn csi_character_attributes_params() {
        let (kind, params) = classify("\x1b[38;5;196m");
        assert_eq!(kind, ControlSequenceType::CharacterAttributes);
        assert_eq!(params.get(0), Some("38"));
        assert_eq!(params.get(1), Some("5"));
        assert_eq!(params.get(2), Some("196"));
    }

    #[test]
    fn csi_eight_bit_introducer() {
        let (kind, params) = classify("\u{9B}38;5;196m");
        assert_eq!(kind, ControlSequenceType::CharacterAttributes);
        assert_eq!(params.get(0), Some("38"));
    }

    #[test]
    fn csi_erase_in_display_ambiguous_final() {
        assert_eq!(
            classify("\x1b[J").0,
            ControlSequenceType::EraseInDisplayEd
        );
        assert_eq!(
            classify("\x1b[?J").0,
            ControlSequenceType::EraseInDisplayDecsed
        );
    }

    #[test]
    fn csi_dec_private_mode() {
        let (kind, params) = classify("\x1b[?25h");
        assert_eq!(kind, ControlSequenceType::DecPrivateModeSet);
        assert_eq!(params.get(0), Some("25"));
    }

    #[test]
    fn csi_final_term_vendor_extension() {
        let (kind, params) = classify("\x1b[?1Y");
        assert_eq!(kind, ControlSequenceType::FinalTerm);
        assert_eq!(params.get(0), Some("1"));
    }

    #[test]
    fn csi_ambiguous_t_prefers_first_match() {
        // Open question from spec.md §9: both rules share private_mode=""
        // and final="T"; first-match wins.
        assert_eq!(
            classify("\x1b[5T").0,
            ControlSequenceType::ScrollDownLines
        );
    }

    #[test]
    fn dcs_request_status_string() {
        let (kind, params) = classify("\x1bP$q\"p\u{9C}");
        assert_eq!(kind, ControlSequenceType::RequestStatusString);
        assert_eq!(params.get(0), Some("\"p"));
    }

    #[test]
    fn dcs_eight_bit_introducer_user_defined_keys() {
        let (kind, _) = classify("\u{90}1;1;8/61\u{9C}");
        assert_eq!(kind, ControlSequenceType::UserDefinedKeys);
    }

    #[test]
    fn dcs_set_and_request_termcap_data_are_reachable() {
        // Regression: these two used to be permanently shadowed by the
        // bare `UserDefinedKeys` catch-all, which matches any payload.
        let (kind, params) = classify("\x1bP+p6b6f;3a32463846\u{9C}");
        assert_eq!(kind, ControlSequenceType::SetTermcapData);
        assert_eq!(params.get(0), Some("6b6f"));

        let (kind, params) = classify("\x1bP+q6b6f\u{9C}");
        assert_eq!(kind, ControlSequenceType::RequestTermcapString);
        assert_eq!(params.get(0), Some("6b6f"));
    }

    #[test]
    fn osc_bel_terminated_set_text_parameters() {
        let (kind, params) = classify("\x1b]0;title\u{07}");
        assert_eq!(kind, ControlSequenceType::SetTextParameters);
        assert_eq!(params.get(0), Some("0"));
        assert_eq!(params.get(1), Some("title"));
    }

    #[test]
    fn osc_esc_backslash_terminated() {
        let (kind, params) = classify("\x1b]0;title\x1b\\");
        assert_eq!(kind, ControlSequenceType::SetTextParameters);
        assert_eq!(params.get(0), Some("0"));
    }

    #[test]
    fn unknown_final_character() {
        assert_eq!(classify("\x1bQ").0, ControlSequenceType::Unknown);
    }

    #[test]
    fn unknown_when_bucket_pattern_does_not_match() {
        // 'h' bucket exists, but neither rule accepts a non-digit payload.
        assert_eq!(classify("\x1b[abch").0, ControlSequenceType::Unknown);
    }

    #[test]
    fn validate_rule_table_passes_for_built_in_catalog() {
        assert!(Classifier::validate_rule_table().is_ok());
    }
}
