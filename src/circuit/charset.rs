use crate::error::{ParseError, Result};

const RANGE_SEPARATOR: char = '-';
const NEGATION: char = '^';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit {
    ch: char,
    offset: usize,
    escaped: bool,
}

/// The two endpoint classes a range may be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeKind {
    Digit,
    Letter,
}

impl RangeKind {
    fn of(c: char) -> Option<Self> {
        if c.is_ascii_digit() {
            Some(RangeKind::Digit)
        } else if c.to_ascii_lowercase().is_ascii_lowercase() {
            Some(RangeKind::Letter)
        } else {
            None
        }
    }

    fn expand(self, from: char, to: char, members: &mut Vec<char>) {
        let (from, to) = if from > to { (to, from) } else { (from, to) };
        match self {
            RangeKind::Digit => {
                let (Some(lo), Some(hi)) = (from.to_digit(10), to.to_digit(10)) else {
                    return;
                };
                for d in lo..=hi {
                    if let Some(c) = char::from_digit(d, 10) {
                        push_unique(members, c);
                    }
                }
            }
            // Code point order, not case-folded: `Z-a` spans the punctuation between.
            RangeKind::Letter => {
                for code in from as u32..=to as u32 {
                    if let Some(c) = char::from_u32(code) {
                        push_unique(members, c);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub members: Vec<char>,
    pub negated: bool,
}

/// Expands the interior of a `[...]` set into its ordered, deduplicated
/// members. `base` is the offset of the interior's first character.
pub fn expand(interior: &[char], base: usize) -> Result<Expansion> {
    let negated = interior.first() == Some(&NEGATION);
    let (body, base) = if negated {
        (&interior[1..], base + 1)
    } else {
        (interior, base)
    };

    let units = decode(body, base);
    let mut members = Vec::new();
    let mut i = 0;
    while i < units.len() {
        let is_range = i + 2 < units.len()
            && units[i + 1].ch == RANGE_SEPARATOR
            && !units[i + 1].escaped;

        if is_range {
            let (from, to) = (units[i], units[i + 2]);
            let kind = match (RangeKind::of(from.ch), RangeKind::of(to.ch)) {
                (Some(a), Some(b)) if a == b => a,
                _ => {
                    return Err(ParseError::IncompatibleRangeTypes {
                        offset: from.offset,
                        from: from.ch,
                        to: to.ch,
                    });
                }
            };
            kind.expand(from.ch, to.ch, &mut members);
            i += 3;
        } else {
            push_unique(&mut members, units[i].ch);
            i += 1;
        }
    }

    Ok(Expansion { members, negated })
}

fn decode(body: &[char], base: usize) -> Vec<Unit> {
    let mut units = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        let offset = base + i;
        if body[i] == '\\' && i + 1 < body.len() {
            units.push(Unit {
                ch: unescape(body[i + 1]),
                offset,
                escaped: true,
            });
            i += 2;
        } else {
            units.push(Unit {
                ch: body[i],
                offset,
                escaped: false,
            });
            i += 1;
        }
    }
    units
}

fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'v' => '\x0B',
        'f' => '\x0C',
        'b' => '\x08', // backspace, as in `[\b]`
        '0' => '\0',
        other => other,
    }
}

fn push_unique(members: &mut Vec<char>, c: char) -> bool {
    if members.contains(&c) {
        return false;
    }
    members.push(c);
    true
}
