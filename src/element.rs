//! The data model: [`StreamElement`], [`ControlSequenceType`], and parameter
//! accessors.
//!
//! Nothing in this module can construct an invalid element: both variants of
//! [`StreamElement`] are built exclusively by [`crate::parser::Parser`], and
//! `raw_text` is guaranteed non-empty by construction.

use std::fmt;

/// One classified function recognized by the [`crate::classifier::Classifier`].
///
/// This is a closed enum: every catalog rule produces exactly one of these
/// variants, and [`ControlSequenceType::Unknown`] is reserved for sequences
/// whose final character has no bucket, or whose bucket yields no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ControlSequenceType {
    // -- Single-character functions (SCF) --
    Bell,
    Backspace,
    CarriageReturn,
    ReturnTerminalStatus,
    FormFeed,
    LineFeed,
    ShiftIn,
    ShiftOut,
    HorizontalTab,
    VerticalTab,

    // -- ESC sequences --
    SevenBitControls,
    EightBitControls,
    SetAnsiConformanceLevel1,
    SetAnsiConformanceLevel2,
    SetAnsiConformanceLevel3,
    DecDoubleHeightLineTopHalf,
    DecDoubleHeightLineBottomHalf,
    DecSingleWidthLine,
    DecDoubleWidthLine,
    DecScreenAlignmentTest,
    SelectDefaultCharacterSet,
    SelectUtf8CharacterSet,
    DesignateG0CharacterSetVt100,
    DesignateG0CharacterSetVt220,
    DesignateG0CharacterSetVt300,
    DesignateG1CharacterSetVt100,
    DesignateG1CharacterSetVt220,
    DesignateG1CharacterSetVt300,
    DesignateG2CharacterSetVt100,
    DesignateG2CharacterSetVt220,
    DesignateG2CharacterSetVt300,
    DesignateG3CharacterSetVt100,
    DesignateG3CharacterSetVt220,
    DesignateG3CharacterSetVt300,
    BackIndex,
    SaveCursor,
    RestoreCursor,
    ForwardIndex,
    ApplicationKeypad,
    NormalKeypad,
    CursorToLowerLeftCornerOfScreen,
    FullReset,
    MemoryLock,
    MemoryUnlock,
    InvokeG1CharacterSetAsGl,
    InvokeG1CharacterSetAsGr,
    InvokeG2CharacterSetAsGl,
    InvokeG2CharacterSetAsGr,
    InvokeG3CharacterSetAsGl,
    InvokeG3CharacterSetAsGr,

    // -- DCS sequences --
    UserDefinedKeys,
    RequestStatusString,
    SetTermcapData,
    RequestTermcapString,

    // -- OSC --
    SetTextParameters,

    // -- CSI sequences --
    InsertCharacters,
    CursorUp,
    CursorDown,
    CursorForward,
    CursorBackward,
    CursorNextLine,
    CursorPrecedingLine,
    CursorCharacterAbsolute,
    CursorPosition,
    CursorForwardTabulation,
    EraseInDisplayEd,
    EraseInDisplayDecsed,
    EraseInLineEl,
    EraseInLineDecsel,
    InsertLines,
    DeleteLines,
    DeleteCharacters,
    ScrollUpLines,
    XtermGraphicsAttributes,
    ScrollDownLines,
    InitiateHighlightMouseTracking,
    ResetTitleModeFeatures,
    EraseCharacters,
    CursorBackwardTabulation,
    CharacterPositionAbsolute,
    CharacterPositionRelative,
    RepeatPrecedingCharacter,
    SendDeviceAttributesPrimary,
    SendDeviceAttributesSecondary,
    SendDeviceAttributesTertiary,
    LinePositionAbsolute,
    LinePositionRelative,
    HorizontalAndVerticalPosition,
    TabClear,
    SetMode,
    DecPrivateModeSet,
    MediaCopy,
    MediaCopyDec,
    ResetMode,
    DecPrivateModeReset,
    CharacterAttributes,
    SetKeyModifierOptions,
    DeviceStatusReport,
    DeviceStatusReportDec,
    DisableKeyModifierOptions,
    SoftTerminalReset,
    SetConformanceLevel,
    RequestAnsiMode,
    RequestDecPrivateMode,
    LoadLeds,
    SetCursorStyle,
    SelectCharacterProtectionAttribute,
    SetScrollingRegion,
    RestoreDecPrivateModeValues,
    ChangeAttributesInRectangularArea,
    SaveCursorAnsi,
    SaveDecPrivateModeValues,
    WindowManipulation,
    SetTitleModeFeatures,
    SetWarningBellVolume,
    ReverseAttributesInRectangularArea,
    RestoreCursorAnsi,
    SetMarginBellVolume,
    CopyRectangularArea,
    EnableFilterRectangle,
    RequestTerminalParameters,
    SelectAttributeChangeExtent,
    FillRectangularArea,
    RequestChecksumOfRectangularArea,
    EraseRectangularArea,
    SelectiveEraseRectangularArea,
    PushSgrAttributes,
    PopSgrAttributes,
    InsertColumns,
    DeleteColumns,

    // -- Vendor extension --
    FinalTerm,

    /// The final character had no catalog bucket, or no bucket pattern
    /// matched. `raw_text` is preserved verbatim on the owning element.
    Unknown,
}

/// Ordered, possibly-empty parameter list for a [`StreamElement::ControlSequence`].
///
/// A thin wrapper rather than a bare `Vec<String>` so the lenient accessor
/// semantics from `spec.md` §4.2 (`numeric_parameter`, `text_parameter`) live
/// next to the data they read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<String>);

impl Parameters {
    /// Build a parameter list from already-split parts.
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// The empty parameter list (used for SCF and bare-ESC kinds).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw string at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// `parameters[index]` parsed as a decimal integer, or `default` if the
    /// index is out of range. A present-but-unparseable value returns `0`,
    /// matching the underlying parse-int contract from `spec.md` §4.2.
    pub fn numeric(&self, index: usize, default: i64) -> i64 {
        match self.get(index) {
            None => default,
            Some(raw) => raw.parse::<i64>().unwrap_or(0),
        }
    }

    /// `parameters[index]` as a string, or `default` if the index is out of
    /// range.
    pub fn text<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.get(index).unwrap_or(default)
    }

    /// Iterate over the parameter strings in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(";"))
    }
}

impl From<Vec<String>> for Parameters {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

/// One immutable entry in the [`crate::store::StreamStore`].
///
/// Constructed only by [`crate::parser::Parser`]; once appended to the
/// store, no field of either variant mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamElement {
    /// A maximal run of non-control text. Never contains a C0 control
    /// character or a sequence inducer.
    Text { text: String },
    /// A classified escape/CSI/DCS/OSC envelope.
    ControlSequence {
        /// Verbatim bytes of the sequence, including inducer and terminator.
        raw_text: String,
        kind: ControlSequenceType,
        parameters: Parameters,
    },
}

impl StreamElement {
    /// Build a `Text` element. Panics if `text` is empty — `spec.md` §3
    /// requires `raw_text`/text content to be non-empty; an empty text run
    /// is never emitted by the splitter.
    pub(crate) fn text(text: String) -> Self {
        debug_assert!(!text.is_empty(), "Text element must be non-empty");
        Self::Text { text }
    }

    /// Build a `ControlSequence` element. Panics if `raw_text` is empty.
    pub(crate) fn control_sequence(
        raw_text: String,
        kind: ControlSequenceType,
        parameters: Parameters,
    ) -> Self {
        debug_assert!(!raw_text.is_empty(), "raw_text must be non-empty");
        Self::ControlSequence {
            raw_text,
            kind,
            parameters,
        }
    }

    /// The verbatim source text of this element (the text run, or the raw
    /// sequence including inducer and terminator).
    pub fn raw_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::ControlSequence { raw_text, .. } => raw_text,
        }
    }

    /// The classified kind, or `None` for `Text` elements.
    pub fn kind(&self) -> Option<ControlSequenceType> {
        match self {
            Self::Text { .. } => None,
            Self::ControlSequence { kind, .. } => Some(*kind),
        }
    }

    /// The parameter list, or `None` for `Text` elements.
    pub fn parameters(&self) -> Option<&Parameters> {
        match self {
            Self::Text { .. } => None,
            Self::ControlSequence { parameters, .. } => Some(parameters),
        }
    }
}
