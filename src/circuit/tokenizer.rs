use log::{debug, trace};

use crate::circuit::Circuit;
use crate::circuit::charset;
use crate::circuit::node::{CaptureGroup, CharacterSet, Node, Quantifier, Span};
use crate::circuit::quantifier::parse_bounds;
use crate::circuit::token::{Bracket, Shorthand, Token, read_token};
use crate::config::Config;
use crate::error::{ParseError, Result};

// The whole source is parsed as the interior of an implicit non-capturing group.
const WRAP_OPEN: &str = "(?:";
const WRAP_CLOSE: char = ')';
const WRAP_LEN: usize = 3;

/// Splits a source into tokens and records its groups, sets and quantifiers
/// as a [`Circuit`]. Holds configuration only; every call to
/// [`parse`](Tokenizer::parse) works on its own state.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: Config,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer::default()
    }

    pub fn with_config(config: Config) -> Self {
        Tokenizer { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn parse(&self, source: &str) -> Result<Circuit> {
        debug!("parsing `{source}`");
        let circuit = Pass::new(source, &self.config).run()?;
        debug!("parsed `{}` into {} node(s)", circuit.source(), circuit.len());
        Ok(circuit)
    }
}

/// What a quantifier closing right now would repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Previous {
    Nothing,               // start, `(`, `?:`, `|`, `^`, `$`
    Literal { at: usize }, // a plain or escaped character
    Opaque { at: usize },  // a shorthand kept unexpanded
    Group(usize),          // node index
    Set(usize),            // node index
    Quantifier,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    bracket: Bracket,
    at: usize,
    before: Previous,
}

struct Pass<'c> {
    config: &'c Config,
    buf: Vec<char>,
    cursor: usize,
    stack: Vec<Pending>,
    nodes: Vec<Node>,
    open_groups: Vec<usize>,
    open_sets: Vec<usize>,
    previous: Previous,
    last: Option<Token>,
}

impl<'c> Pass<'c> {
    fn new(source: &str, config: &'c Config) -> Self {
        let mut buf: Vec<char> = WRAP_OPEN.chars().collect();
        buf.extend(source.chars());
        buf.push(WRAP_CLOSE);

        Pass {
            config,
            buf,
            cursor: WRAP_LEN,
            stack: vec![Pending {
                bracket: Bracket::Group,
                at: 0,
                before: Previous::Nothing,
            }],
            nodes: Vec::new(),
            open_groups: Vec::new(),
            open_sets: Vec::new(),
            previous: Previous::Nothing,
            last: None,
        }
    }

    // End of the caller's source; the implicit closer sits right after it.
    fn limit(&self) -> usize {
        self.buf.len() - 1
    }

    fn rel(&self, at: usize) -> usize {
        at - WRAP_LEN
    }

    fn innermost(&self) -> Option<Bracket> {
        self.stack.last().map(|p| p.bracket)
    }

    fn text(&self, from: usize, to_inclusive: usize) -> String {
        self.buf[from..=to_inclusive].iter().collect()
    }

    fn run(mut self) -> Result<Circuit> {
        loop {
            let after_group_open = self.last == Some(Token::Open(Bracket::Group));
            let Some(token) = read_token(&self.buf, self.cursor, self.limit(), after_group_open)
                .map_err(|err| self.rebase(err))?
            else {
                break;
            };
            let at = self.cursor;
            self.cursor += token.width();

            if self.config.trace {
                trace!(
                    "cursor: {} token: {:?} stack: {:?}",
                    self.rel(at),
                    token,
                    self.stack.iter().map(|p| p.bracket.close()).collect::<String>()
                );
            }

            match token {
                Token::Shorthand(shorthand) if self.config.expand_shorthand => {
                    if self.substitute(at, shorthand)? {
                        continue;
                    }
                    self.previous = Previous::Literal { at };
                }
                Token::Shorthand(_) => {
                    self.previous = Previous::Opaque { at };
                }
                Token::Escaped(_) => {
                    self.previous = Previous::Literal { at };
                }
                Token::Literal(c) => {
                    self.previous = match c {
                        '|' | '^' | '$' => Previous::Nothing,
                        _ => Previous::Literal { at },
                    };
                }
                Token::Open(bracket) => self.open(bracket, at),
                Token::NonCapturing => {
                    if let Some(&index) = self.open_groups.last() {
                        if let Node::CaptureGroup(group) = &mut self.nodes[index] {
                            group.should_capture = false;
                        }
                    }
                    self.previous = Previous::Nothing;
                }
                Token::Close(bracket) => self.close(bracket, at)?,
            }
            self.last = Some(token);
        }

        self.finish()
    }

    /// Rewrites a shorthand in place and rewinds onto its expansion. Returns
    /// false when the shorthand stays a literal (quantifier symbols inside a set).
    fn substitute(&mut self, at: usize, shorthand: Shorthand) -> Result<bool> {
        let expansion = if self.innermost() == Some(Bracket::Set) {
            if shorthand.is_quantifier() {
                return Ok(false);
            }
            shorthand
                .set_members()
                .ok_or_else(|| ParseError::NegatedClassInSet {
                    offset: self.rel(at),
                    token: format!("\\{}", shorthand.symbol()),
                })?
        } else {
            shorthand.expansion()
        };

        let width = Token::Shorthand(shorthand).width();
        self.buf.splice(at..at + width, expansion.chars());
        self.cursor = at;
        Ok(true)
    }

    fn open(&mut self, bracket: Bracket, at: usize) {
        self.stack.push(Pending {
            bracket,
            at,
            before: self.previous,
        });

        let span = Span::new(self.rel(at), self.rel(at));
        match bracket {
            Bracket::Group => {
                self.open_groups.push(self.nodes.len());
                self.nodes.push(Node::CaptureGroup(CaptureGroup {
                    span,
                    text: String::new(),
                    should_capture: true,
                    repeat: None,
                }));
            }
            Bracket::Set => {
                self.open_sets.push(self.nodes.len());
                self.nodes.push(Node::CharacterSet(CharacterSet {
                    span,
                    raw: String::new(),
                    members: Vec::new(),
                    negated: false,
                    synthesized: false,
                    repeat: None,
                }));
            }
            // Nothing can open inside valid bounds, so the node is recorded
            // once its bounds are known.
            Bracket::Quantifier => {}
        }
        self.previous = Previous::Nothing;
    }

    fn close(&mut self, bracket: Bracket, at: usize) -> Result<()> {
        let unmatched = ParseError::UnmatchedCloser {
            offset: self.rel(at),
            found: bracket.close(),
        };
        // The bottom entry belongs to the implicit group.
        let pending = match self.stack.pop() {
            Some(pending) if !self.stack.is_empty() => pending,
            _ => return Err(unmatched),
        };
        if pending.bracket != bracket {
            return Err(ParseError::MismatchedNesting {
                offset: self.rel(at),
                expected: pending.bracket.close(),
                found: bracket.close(),
            });
        }

        match bracket {
            Bracket::Group => {
                let index = self.open_groups.pop().ok_or(unmatched)?;
                self.close_group(index, at);
            }
            Bracket::Set => {
                let index = self.open_sets.pop().ok_or(unmatched)?;
                self.close_set(index, at)?;
            }
            // Braces inside a set are members of it.
            Bracket::Quantifier if self.innermost() == Some(Bracket::Set) => {
                self.previous = Previous::Literal { at };
            }
            Bracket::Quantifier => self.close_quantifier(pending, at)?,
        }
        Ok(())
    }

    fn close_group(&mut self, index: usize, at: usize) {
        let end = self.rel(at);
        let text = self.text(self.nodes[index].span().start + WRAP_LEN, at);
        if let Node::CaptureGroup(group) = &mut self.nodes[index] {
            group.span.end = end;
            group.text = text;
        }
        self.previous = Previous::Group(index);
    }

    fn close_set(&mut self, index: usize, at: usize) -> Result<()> {
        let start = self.nodes[index].span().start;
        let interior = &self.buf[start + WRAP_LEN + 1..at];
        let expansion = charset::expand(interior, start + 1)?;
        let raw: String = interior.iter().collect();
        let end = self.rel(at);

        if let Node::CharacterSet(set) = &mut self.nodes[index] {
            set.span.end = end;
            set.raw = raw;
            set.members = expansion.members;
            set.negated = expansion.negated;
        }
        self.previous = Previous::Set(index);
        Ok(())
    }

    fn close_quantifier(&mut self, pending: Pending, at: usize) -> Result<()> {
        let offset = self.rel(pending.at);
        let text = self.text(pending.at, at);
        let interior: String = self.buf[pending.at + 1..at].iter().collect();
        let range = parse_bounds(&interior).map_err(|problem| {
            ParseError::InvalidQuantifierBounds {
                offset,
                text: text.clone(),
                problem,
            }
        })?;
        let empty = |target: &'static str| ParseError::EmptyQuantifiedNode {
            offset,
            text: text.clone(),
            target,
        };

        let target = match pending.before {
            Previous::Group(index) => {
                let Node::CaptureGroup(group) = &mut self.nodes[index] else {
                    return Err(empty("group"));
                };
                let marker = if group.should_capture { 0 } else { 2 };
                if group.text.chars().count() <= 2 + marker {
                    return Err(empty("group"));
                }
                group.repeat = Some(range);
                index
            }
            Previous::Set(index) => {
                let Node::CharacterSet(set) = &mut self.nodes[index] else {
                    return Err(empty("character set"));
                };
                if set.members.is_empty() && !set.negated {
                    return Err(empty("character set"));
                }
                set.repeat = Some(range);
                index
            }
            Previous::Literal { at: literal_at } | Previous::Opaque { at: literal_at } => {
                let raw: String = self.buf[literal_at..pending.at].iter().collect();
                let start = self.rel(literal_at);
                // Escaped literals decode the same way set members do; an
                // unexpanded shorthand has no known members.
                let members = match pending.before {
                    Previous::Opaque { .. } => Vec::new(),
                    _ => {
                        let chars: Vec<char> = raw.chars().collect();
                        charset::expand(&chars, start)?.members
                    }
                };
                self.nodes.push(Node::CharacterSet(CharacterSet {
                    span: Span::new(start, offset - 1),
                    raw,
                    members,
                    negated: false,
                    synthesized: true,
                    repeat: Some(range),
                }));
                self.nodes.len() - 1
            }
            Previous::Nothing | Previous::Quantifier => {
                return Err(ParseError::NothingToRepeat { offset, text });
            }
        };

        self.nodes.push(Node::Quantifier(Quantifier {
            span: Span::new(offset, self.rel(at)),
            text,
            range,
            target,
        }));
        self.previous = Previous::Quantifier;
        Ok(())
    }

    fn finish(self) -> Result<Circuit> {
        if self.stack.len() > 1 {
            return Err(ParseError::UnclosedConstruct {
                offset: self.rel(self.limit()),
                missing: self.stack[1..]
                    .iter()
                    .rev()
                    .map(|p| p.bracket.close())
                    .collect(),
            });
        }

        let source: String = self.buf[WRAP_LEN..self.limit()].iter().collect();
        Ok(Circuit::new(source, self.nodes))
    }

    // Reader errors carry buffer offsets.
    fn rebase(&self, err: ParseError) -> ParseError {
        match err {
            ParseError::DanglingEscape { offset } => ParseError::DanglingEscape {
                offset: self.rel(offset),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::node::RepeatRange;
    use crate::error::{BoundsProblem, ErrorKind};
    use rstest::rstest;

    fn parse(source: &str) -> Result<Circuit> {
        Tokenizer::new().parse(source)
    }

    fn kind(source: &str) -> ErrorKind {
        parse(source).unwrap_err().kind()
    }

    #[test]
    fn plain_literals_produce_no_nodes() {
        let circuit = parse("^ab.c|d$").unwrap();
        assert!(circuit.is_empty());
        assert_eq!(circuit.source(), "^ab.c|d$");
    }

    #[test]
    fn empty_source_is_valid() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn group_records_its_text_and_offsets() {
        let circuit = parse("x(ab)y").unwrap();
        let group = circuit.nodes()[0].as_group().unwrap();
        assert_eq!(group.span, Span::new(1, 4));
        assert_eq!(group.text, "(ab)");
        assert!(group.should_capture);
    }

    #[test]
    fn non_capturing_marker_clears_capture() {
        let circuit = parse("(?:abc)").unwrap();
        assert_eq!(circuit.len(), 1);
        let group = circuit.nodes()[0].as_group().unwrap();
        assert!(!group.should_capture);
        assert_eq!(group.text, "(?:abc)");
    }

    #[test]
    fn marker_only_applies_to_the_innermost_group() {
        let circuit = parse("(a(?:b))").unwrap();
        let groups: Vec<_> = circuit.groups().collect();
        assert!(groups[0].should_capture);
        assert!(!groups[1].should_capture);
        assert_eq!(groups[0].text, "(a(?:b))");
    }

    #[test]
    fn nodes_follow_opening_order() {
        let circuit = parse("((a)[b])").unwrap();
        let starts: Vec<usize> = circuit.iter().map(|n| n.span().start).collect();
        assert_eq!(starts, vec![0, 1, 4]);
        assert_eq!(circuit.nodes()[0].span().end, 7);
    }

    #[test]
    fn digit_shorthand_matches_explicit_set() {
        let shorthand = parse("\\d").unwrap();
        let explicit = parse("[0-9]").unwrap();
        assert_eq!(shorthand.source(), "[0-9]");
        assert_eq!(shorthand.nodes(), explicit.nodes());
    }

    #[test]
    fn space_shorthand_decodes_escapes() {
        let circuit = parse("\\s").unwrap();
        let set = circuit.nodes()[0].as_set().unwrap();
        assert_eq!(set.members, vec![' ', '\t', '\n', '\r', '\x0B', '\x0C']);
    }

    #[test]
    fn negated_shorthand_builds_negated_set() {
        let circuit = parse("\\W").unwrap();
        let set = circuit.nodes()[0].as_set().unwrap();
        assert!(set.negated);
        assert_eq!(set.raw, "^A-Za-z0-9_");
        assert_eq!(set.members.len(), 63);
    }

    #[test]
    fn class_inside_set_expands_without_brackets() {
        let circuit = parse("[\\da-b]").unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.source(), "[0-9a-b]");
        let set = circuit.nodes()[0].as_set().unwrap();
        assert_eq!(set.members.len(), 12);
    }

    #[test]
    fn negated_class_inside_set_is_rejected() {
        assert_eq!(
            parse("a[\\D]"),
            Err(ParseError::NegatedClassInSet {
                offset: 2,
                token: "\\D".to_string()
            })
        );
    }

    #[test]
    fn quantifier_symbols_inside_set_are_members() {
        let circuit = parse("[+*?]").unwrap();
        assert_eq!(circuit.len(), 1);
        let set = circuit.nodes()[0].as_set().unwrap();
        assert_eq!(set.members, vec!['+', '*', '?']);
        assert!(set.contains('*'));
        assert!(!set.contains('a'));
    }

    #[test]
    fn quantifier_on_literal_synthesizes_a_set() {
        let circuit = parse("a{2,4}").unwrap();
        assert_eq!(circuit.len(), 2);
        let set = circuit.nodes()[0].as_set().unwrap();
        assert!(set.synthesized);
        assert_eq!(set.members, vec!['a']);
        assert_eq!(set.span, Span::new(0, 0));
        assert_eq!(set.repeat, Some(RepeatRange::new(2, Some(4))));
        let quantifier = circuit.nodes()[1].as_quantifier().unwrap();
        assert_eq!(quantifier.text, "{2,4}");
        assert_eq!(quantifier.span, Span::new(1, 5));
        assert_eq!(quantifier.target, 0);
    }

    #[test]
    fn quantifier_on_escaped_literal_uses_the_escaped_char() {
        let circuit = parse("\\.{3}").unwrap();
        let set = circuit.nodes()[0].as_set().unwrap();
        assert_eq!(set.raw, "\\.");
        assert_eq!(set.members, vec!['.']);
        assert_eq!(set.span, Span::new(0, 1));
    }

    #[test]
    fn quantifier_shorthands_expand() {
        let circuit = parse("a+b*c?").unwrap();
        assert_eq!(circuit.source(), "a{1,}b{0,}c{0,1}");
        let ranges: Vec<RepeatRange> = circuit.quantifiers().map(|q| q.range).collect();
        assert_eq!(
            ranges,
            vec![
                RepeatRange::new(1, None),
                RepeatRange::new(0, None),
                RepeatRange::new(0, Some(1)),
            ]
        );
    }

    #[test]
    fn quantifier_attaches_to_the_closed_group() {
        let circuit = parse("(ab)+").unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.nodes()[0].repeat(), Some(RepeatRange::new(1, None)));
        assert_eq!(circuit.nodes()[1].as_quantifier().unwrap().target, 0);
    }

    #[test]
    fn quantifier_attaches_to_the_closed_set() {
        let circuit = parse("([ab]c)[d]{2}").unwrap();
        let sets: Vec<_> = circuit.sets().collect();
        assert_eq!(sets[0].repeat, None);
        assert_eq!(sets[1].repeat, Some(RepeatRange::exactly(2)));
    }

    #[test]
    fn shorthand_expansion_can_be_disabled() {
        let tokenizer = Tokenizer::with_config(Config {
            expand_shorthand: false,
            ..Config::default()
        });
        let circuit = tokenizer.parse("\\d+").unwrap();
        assert!(circuit.is_empty());
        assert_eq!(circuit.source(), "\\d+");
    }

    #[test]
    fn braces_inside_a_set_are_members() {
        let circuit = parse("[a{2}]").unwrap();
        assert_eq!(circuit.len(), 1);
        let set = circuit.nodes()[0].as_set().unwrap();
        assert_eq!(set.members, vec!['a', '{', '2', '}']);
        assert_eq!(set.repeat, None);
    }

    #[test]
    fn quantifier_forms_inside_a_set_agree() {
        assert_eq!(parse("[a?]").unwrap().len(), parse("[a{0,1}]").unwrap().len());
        assert_eq!(parse("[a{x}]").unwrap().len(), 1);
    }

    #[test]
    fn braces_inside_a_set_still_nest() {
        assert_eq!(
            parse("[a{]"),
            Err(ParseError::MismatchedNesting {
                offset: 3,
                expected: '}',
                found: ']'
            })
        );
    }

    #[test]
    fn quantified_opaque_shorthand_has_no_members() {
        let tokenizer = Tokenizer::with_config(Config {
            expand_shorthand: false,
            ..Config::default()
        });
        let circuit = tokenizer.parse("\\d{2}").unwrap();
        let set = circuit.nodes()[0].as_set().unwrap();
        assert_eq!(set.raw, "\\d");
        assert!(set.members.is_empty());

        let circuit = tokenizer.parse("\\d{2}x\\w{3}").unwrap();
        assert_eq!(circuit.len(), 4);
        let set = circuit.nodes()[2].as_set().unwrap();
        assert_eq!(set.raw, "\\w");
        assert!(set.members.is_empty());
        assert_eq!(set.repeat, Some(RepeatRange::exactly(3)));
    }

    #[test]
    fn reversed_range_is_swapped() {
        let circuit = parse("[c-a]").unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.nodes()[0].as_set().unwrap().members, vec!['a', 'b', 'c']);
    }

    #[test]
    fn escaped_brackets_are_not_structural() {
        let circuit = parse("\\(\\[\\{").unwrap();
        assert!(circuit.is_empty());
    }

    #[test]
    fn lone_closer_is_unmatched() {
        assert_eq!(
            parse("abc)"),
            Err(ParseError::UnmatchedCloser {
                offset: 3,
                found: ')'
            })
        );
    }

    #[test]
    fn swapped_nesting_reports_the_wrong_closer() {
        assert_eq!(
            parse("(a[b)c]"),
            Err(ParseError::MismatchedNesting {
                offset: 4,
                expected: ']',
                found: ')'
            })
        );
    }

    #[test]
    fn unclosed_openers_are_listed_innermost_first() {
        assert_eq!(
            parse("(a[b"),
            Err(ParseError::UnclosedConstruct {
                offset: 4,
                missing: vec![']', ')']
            })
        );
    }

    #[test]
    fn reversed_quantifier_bounds_fail() {
        assert_eq!(
            parse("a{4,2}"),
            Err(ParseError::InvalidQuantifierBounds {
                offset: 1,
                text: "{4,2}".to_string(),
                problem: BoundsProblem::Reversed { min: 4, max: 2 },
            })
        );
    }

    #[test]
    fn dangling_escape_reports_the_backslash() {
        assert_eq!(parse("ab\\"), Err(ParseError::DanglingEscape { offset: 2 }));
    }

    #[rstest]
    #[case("(abc", ErrorKind::UnclosedConstruct)]
    #[case("[abc", ErrorKind::UnclosedConstruct)]
    #[case("a{2", ErrorKind::UnclosedConstruct)]
    #[case("abc)", ErrorKind::UnmatchedCloser)]
    #[case("]", ErrorKind::UnmatchedCloser)]
    #[case("(a[b)c]", ErrorKind::MismatchedNesting)]
    #[case("[a-5]", ErrorKind::IncompatibleRangeTypes)]
    #[case("a{4,2}", ErrorKind::InvalidQuantifierBounds)]
    #[case("a{-1,2}", ErrorKind::InvalidQuantifierBounds)]
    #[case("a{x}", ErrorKind::InvalidQuantifierBounds)]
    #[case("[]{2}", ErrorKind::EmptyQuantifiedNode)]
    #[case("(){2}", ErrorKind::EmptyQuantifiedNode)]
    #[case("(?:)+", ErrorKind::EmptyQuantifiedNode)]
    #[case("+a", ErrorKind::NothingToRepeat)]
    #[case("(*)", ErrorKind::NothingToRepeat)]
    #[case("a|?", ErrorKind::NothingToRepeat)]
    #[case("a+*", ErrorKind::NothingToRepeat)]
    #[case("\\", ErrorKind::DanglingEscape)]
    #[case("[\\S]", ErrorKind::NegatedClassInSet)]
    fn rejects_malformed_sources(#[case] source: &str, #[case] expected: ErrorKind) {
        assert_eq!(kind(source), expected);
    }

    #[test]
    fn each_parse_starts_from_scratch() {
        let tokenizer = Tokenizer::with_config(Config::traced());
        assert!(tokenizer.parse("(a").is_err());
        let circuit = tokenizer.parse("[ab]").unwrap();
        assert_eq!(circuit.len(), 1);
    }
}
