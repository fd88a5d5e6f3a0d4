use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Why a quantifier's bounds were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsProblem {
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("`{0}` is negative")]
    Negative(String),
    #[error("`{0}` is too large")]
    TooLarge(String),
    #[error("lower bound {min} is greater than upper bound {max}")]
    Reversed { min: u32, max: u32 },
}

/// A source that is not a well-formed skeleton. Offsets index the expanded
/// source, the same text [`Circuit::source`](crate::Circuit::source) returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("char #{offset}: `{found}` closes nothing")]
    UnmatchedCloser { offset: usize, found: char },

    #[error("char #{offset}: one token was not closed: `{expected}` expected, got `{found}`")]
    MismatchedNesting {
        offset: usize,
        expected: char,
        found: char,
    },

    #[error("one or more tokens were not closed: `{}`", join_closers(.missing))]
    UnclosedConstruct { offset: usize, missing: Vec<char> },

    #[error("char #{offset}: cannot generate a range from `{from}` to `{to}`, incompatible types")]
    IncompatibleRangeTypes { offset: usize, from: char, to: char },

    #[error("char #{offset}: invalid quantifier `{text}`: {problem}")]
    InvalidQuantifierBounds {
        offset: usize,
        text: String,
        problem: BoundsProblem,
    },

    #[error("char #{offset}: quantifier `{text}` repeats an empty {target}")]
    EmptyQuantifiedNode {
        offset: usize,
        text: String,
        target: &'static str,
    },

    #[error("char #{offset}: quantifier `{text}` has nothing to repeat")]
    NothingToRepeat { offset: usize, text: String },

    #[error("char #{offset}: trailing `\\` escapes nothing")]
    DanglingEscape { offset: usize },

    #[error("char #{offset}: `{token}` cannot be used inside a character set")]
    NegatedClassInSet { offset: usize, token: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnmatchedCloser,
    MismatchedNesting,
    UnclosedConstruct,
    IncompatibleRangeTypes,
    InvalidQuantifierBounds,
    EmptyQuantifiedNode,
    NothingToRepeat,
    DanglingEscape,
    NegatedClassInSet,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnmatchedCloser { .. } => ErrorKind::UnmatchedCloser,
            ParseError::MismatchedNesting { .. } => ErrorKind::MismatchedNesting,
            ParseError::UnclosedConstruct { .. } => ErrorKind::UnclosedConstruct,
            ParseError::IncompatibleRangeTypes { .. } => ErrorKind::IncompatibleRangeTypes,
            ParseError::InvalidQuantifierBounds { .. } => ErrorKind::InvalidQuantifierBounds,
            ParseError::EmptyQuantifiedNode { .. } => ErrorKind::EmptyQuantifiedNode,
            ParseError::NothingToRepeat { .. } => ErrorKind::NothingToRepeat,
            ParseError::DanglingEscape { .. } => ErrorKind::DanglingEscape,
            ParseError::NegatedClassInSet { .. } => ErrorKind::NegatedClassInSet,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnmatchedCloser { offset, .. }
            | ParseError::MismatchedNesting { offset, .. }
            | ParseError::UnclosedConstruct { offset, .. }
            | ParseError::IncompatibleRangeTypes { offset, .. }
            | ParseError::InvalidQuantifierBounds { offset, .. }
            | ParseError::EmptyQuantifiedNode { offset, .. }
            | ParseError::NothingToRepeat { offset, .. }
            | ParseError::DanglingEscape { offset }
            | ParseError::NegatedClassInSet { offset, .. } => *offset,
        }
    }
}

fn join_closers(missing: &[char]) -> String {
    missing
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
