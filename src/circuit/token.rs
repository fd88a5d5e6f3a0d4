use crate::error::{ParseError, Result};

const ESCAPE: char = '\\';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Group,      // ( )
    Set,        // [ ]
    Quantifier, // { }
}

impl Bracket {
    pub fn close(self) -> char {
        match self {
            Bracket::Group => ')',
            Bracket::Set => ']',
            Bracket::Quantifier => '}',
        }
    }
}

/// Compact notations rewritten into their bracket form before the pass
/// interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shorthand {
    Digit,      // \d
    NotDigit,   // \D
    Word,       // \w
    NotWord,    // \W
    Space,      // \s
    NotSpace,   // \S
    ZeroOrOne,  // ?
    ZeroOrMore, // *
    OneOrMore,  // +
}

impl Shorthand {
    fn from_escaped(c: char) -> Option<Self> {
        match c {
            'd' => Some(Shorthand::Digit),
            'D' => Some(Shorthand::NotDigit),
            'w' => Some(Shorthand::Word),
            'W' => Some(Shorthand::NotWord),
            's' => Some(Shorthand::Space),
            'S' => Some(Shorthand::NotSpace),
            _ => None,
        }
    }

    pub fn expansion(self) -> &'static str {
        match self {
            Shorthand::Digit => "[0-9]",
            Shorthand::NotDigit => "[^0-9]",
            Shorthand::Word => "[A-Za-z0-9_]",
            Shorthand::NotWord => "[^A-Za-z0-9_]",
            Shorthand::Space => "[ \\t\\n\\r\\v\\f]",
            Shorthand::NotSpace => "[^ \\t\\n\\r\\v\\f]",
            Shorthand::ZeroOrOne => "{0,1}",
            Shorthand::ZeroOrMore => "{0,}",
            Shorthand::OneOrMore => "{1,}",
        }
    }

    /// The bracket-free member list used when a class appears inside a set.
    /// Negated classes and quantifiers have none.
    pub fn set_members(self) -> Option<&'static str> {
        match self {
            Shorthand::Digit => Some("0-9"),
            Shorthand::Word => Some("A-Za-z0-9_"),
            Shorthand::Space => Some(" \\t\\n\\r\\v\\f"),
            _ => None,
        }
    }

    pub fn is_quantifier(self) -> bool {
        matches!(
            self,
            Shorthand::ZeroOrOne | Shorthand::ZeroOrMore | Shorthand::OneOrMore
        )
    }

    /// The character the shorthand was written with, used when it is kept
    /// as a literal.
    pub fn symbol(self) -> char {
        match self {
            Shorthand::Digit => 'd',
            Shorthand::NotDigit => 'D',
            Shorthand::Word => 'w',
            Shorthand::NotWord => 'W',
            Shorthand::Space => 's',
            Shorthand::NotSpace => 'S',
            Shorthand::ZeroOrOne => '?',
            Shorthand::ZeroOrMore => '*',
            Shorthand::OneOrMore => '+',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Open(Bracket),
    Close(Bracket),
    NonCapturing, // ?:
    Shorthand(Shorthand),
    Escaped(char), // \x, never structural
    Literal(char), // plain characters, `.`, anchors and `|`
}

impl Token {
    /// Number of source characters the token was read from.
    pub fn width(self) -> usize {
        match self {
            Token::NonCapturing | Token::Escaped(_) => 2,
            Token::Shorthand(shorthand) if !shorthand.is_quantifier() => 2,
            _ => 1,
        }
    }
}

/// Reads the token starting at `at`, never looking at or past `limit`.
///
/// A backslash always consumes exactly the following character. `?:` is
/// only a marker right after a group opener; anywhere else `?` stays a
/// quantifier shorthand and the `:` is read on its own.
pub fn read_token(
    buf: &[char],
    at: usize,
    limit: usize,
    after_group_open: bool,
) -> Result<Option<Token>> {
    if at >= limit {
        return Ok(None);
    }

    let token = match buf[at] {
        ESCAPE => {
            if at + 1 >= limit {
                return Err(ParseError::DanglingEscape { offset: at });
            }
            let escaped = buf[at + 1];
            match Shorthand::from_escaped(escaped) {
                Some(shorthand) => Token::Shorthand(shorthand),
                None => Token::Escaped(escaped),
            }
        }
        '?' if after_group_open && at + 1 < limit && buf[at + 1] == ':' => Token::NonCapturing,
        '?' => Token::Shorthand(Shorthand::ZeroOrOne),
        '*' => Token::Shorthand(Shorthand::ZeroOrMore),
        '+' => Token::Shorthand(Shorthand::OneOrMore),
        '(' => Token::Open(Bracket::Group),
        '[' => Token::Open(Bracket::Set),
        '{' => Token::Open(Bracket::Quantifier),
        ')' => Token::Close(Bracket::Group),
        ']' => Token::Close(Bracket::Set),
        '}' => Token::Close(Bracket::Quantifier),
        c => Token::Literal(c),
    };
    Ok(Some(token))
}
