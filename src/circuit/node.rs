/// Inclusive offsets into the expanded source of a [`Circuit`](super::Circuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatRange {
    pub min: u32,
    pub max: Option<u32>, // None for {m,}
}

impl RepeatRange {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        RepeatRange { min, max }
    }

    pub fn exactly(n: u32) -> Self {
        RepeatRange::new(n, Some(n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureGroup {
    pub span: Span,
    pub text: String,
    pub should_capture: bool,
    pub repeat: Option<RepeatRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSet {
    pub span: Span,
    pub raw: String, // interior, without the brackets
    pub members: Vec<char>,
    pub negated: bool,
    pub synthesized: bool, // built for a bare quantified literal
    pub repeat: Option<RepeatRange>,
}

impl CharacterSet {
    pub fn contains(&self, c: char) -> bool {
        self.members.contains(&c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantifier {
    pub span: Span,
    pub text: String,
    pub range: RepeatRange,
    pub target: usize, // index of the quantified node
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    CaptureGroup(CaptureGroup), // (...)
    CharacterSet(CharacterSet), // [...]
    Quantifier(Quantifier),     // {m}, {m,}, {m,n}
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::CaptureGroup(group) => group.span,
            Node::CharacterSet(set) => set.span,
            Node::Quantifier(quantifier) => quantifier.span,
        }
    }

    pub fn repeat(&self) -> Option<RepeatRange> {
        match self {
            Node::CaptureGroup(group) => group.repeat,
            Node::CharacterSet(set) => set.repeat,
            Node::Quantifier(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&CaptureGroup> {
        match self {
            Node::CaptureGroup(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&CharacterSet> {
        match self {
            Node::CharacterSet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_quantifier(&self) -> Option<&Quantifier> {
        match self {
            Node::Quantifier(quantifier) => Some(quantifier),
            _ => None,
        }
    }
}
