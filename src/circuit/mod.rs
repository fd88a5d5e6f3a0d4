pub mod charset;
pub mod node;
pub mod quantifier;
pub mod token;
pub mod tokenizer;

use std::fmt;

pub use node::{CaptureGroup, CharacterSet, Node, Quantifier, RepeatRange, Span};
pub use token::{Bracket, Shorthand, Token};
pub use tokenizer::Tokenizer;

/// The result of one parse: the nodes of a source in the order they were
/// opened, plus the source as it reads after shorthand expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    source: String,
    nodes: Vec<Node>,
}

impl Circuit {
    pub(crate) fn new(source: String, nodes: Vec<Node>) -> Self {
        Circuit { source, nodes }
    }

    /// The expanded source every span indexes into (by `char`).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn groups(&self) -> impl Iterator<Item = &CaptureGroup> {
        self.nodes.iter().filter_map(Node::as_group)
    }

    pub fn sets(&self) -> impl Iterator<Item = &CharacterSet> {
        self.nodes.iter().filter_map(Node::as_set)
    }

    pub fn quantifiers(&self) -> impl Iterator<Item = &Quantifier> {
        self.nodes.iter().filter_map(Node::as_quantifier)
    }

    /// The node a quantifier repeats.
    pub fn target_of(&self, quantifier: &Quantifier) -> Option<&Node> {
        self.nodes.get(quantifier.target)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
