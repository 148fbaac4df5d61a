#![forbid(unsafe_code)]

//! A streaming recognizer for VT/ANSI terminal escape sequences.
//!
//! `termseq` turns a decoded `char` stream into a typed, append-only
//! sequence of text runs and classified control functions. It does not
//! interpret those functions against a screen model, does not decode UTF-8
//! itself, and does not perform host I/O — it only recognizes and
//! classifies, leaving interpretation to whatever owns the terminal state
//! (a screen/grid model, a logger, a recorder).
//!
//! # Pipeline
//!
//! ```text
//! char stream -> Splitter -> raw sequence -> Classifier -> StreamElement -> StreamStore
//! ```
//!
//! - [`splitter`]: the character-driven state machine that partitions input
//!   into maximal text runs and raw C0/ESC/CSI/DCS/OSC envelopes.
//! - [`classifier`]: the table-driven recognizer that turns a raw envelope
//!   into a [`element::ControlSequenceType`] plus an ordered parameter list.
//! - [`store`]: the append-only, in-order record of every produced element.
//! - [`parser`]: the [`parser::Parser`] facade wiring the three together
//!   with synchronous subscriber callbacks.
//!
//! # Example
//!
//! ```
//! use termseq::Parser;
//!
//! let mut parser = Parser::new();
//! parser.feed_str("hello \x1b[31mworld\x1b[0m");
//!
//! let elements: Vec<_> = parser.store().iter().collect();
//! assert_eq!(elements.len(), 4);
//! assert_eq!(elements[0].raw_text(), "hello ");
//! ```
//!
//! # Design principles
//!
//! - **No I/O**: every type here is pure data and logic; the host supplies
//!   characters.
//! - **Total**: no input can cause the splitter or classifier to fail;
//!   unrecognized sequences classify as [`element::ControlSequenceType::Unknown`]
//!   rather than erroring.
//! - **Deterministic**: identical character sequences always produce
//!   identical elements, independent of call boundaries across `feed`.
//! - **`#![forbid(unsafe_code)]`**: safety enforced at compile time.

pub mod classifier;
pub mod element;
pub mod error;
pub mod parser;
pub mod splitter;
pub mod store;

pub use classifier::Classifier;
pub use element::{ControlSequenceType, Parameters, StreamElement};
pub use error::CatalogError;
pub use parser::Parser;
pub use splitter::{ParseState, Splitter, SplitterEvent};
pub use store::StreamStore;
