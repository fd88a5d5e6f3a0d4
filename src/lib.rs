//! Structural validation of regular-expression sources.
//!
//! A single pass walks the source, expands shorthand (`\d`, `+`, ...) into
//! bracket form, checks that every `(`, `[` and `{` is closed in order, and
//! records the groups, character sets and quantifiers it meets as a
//! [`Circuit`]. Matching text against a pattern is not provided.

pub mod circuit;
pub mod config;
pub mod error;
pub mod validator;

pub use circuit::{
    CaptureGroup, CharacterSet, Circuit, Node, Quantifier, RepeatRange, Span, Tokenizer,
};
pub use config::Config;
pub use error::{BoundsProblem, ErrorKind, ParseError, Result};
pub use validator::Validator;
