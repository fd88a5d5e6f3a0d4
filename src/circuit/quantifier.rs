use crate::circuit::node::RepeatRange;
use crate::error::BoundsProblem;

/// Parses the interior of `{m}`, `{m,}` or `{m,n}`.
pub fn parse_bounds(interior: &str) -> Result<RepeatRange, BoundsProblem> {
    match interior.split_once(',') {
        None => parse_bound(interior).map(RepeatRange::exactly),
        Some((min, "")) => Ok(RepeatRange::new(parse_bound(min)?, None)),
        Some((min, max)) => {
            let min = parse_bound(min)?;
            let max = parse_bound(max)?;
            if min > max {
                return Err(BoundsProblem::Reversed { min, max });
            }
            Ok(RepeatRange::new(min, Some(max)))
        }
    }
}

fn parse_bound(text: &str) -> Result<u32, BoundsProblem> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, text),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(BoundsProblem::NotANumber(text.to_string()));
    }
    if negative && digits.chars().any(|c| c != '0') {
        return Err(BoundsProblem::Negative(text.to_string()));
    }
    digits
        .parse()
        .map_err(|_| BoundsProblem::TooLarge(text.to_string()))
}
