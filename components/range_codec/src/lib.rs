//! Compressed range notation for sets of small integers
//!
//! Operators see circuit selections as range text rather than raw lists:
//!
//! ```
//! use range_codec::{decode, encode};
//!
//! assert_eq!(encode([1, 2, 3, 7, 9, 10, 11]), "1-3, 7, 9-11");
//! assert_eq!(encode([5]), "5");
//! assert_eq!(decode("1-3, 7").unwrap().into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 7]);
//! ```
//!
//! Two sentinels replace the general notation: the empty set renders as
//! [`EMPTY_SENTINEL`] and a set holding exactly the full circuit domain
//! (`1..=30`) renders as [`FULL_SENTINEL`]. Any other set, including a
//! contiguous run shorter than the domain such as `1..=29`, uses runs.

use std::collections::BTreeSet;
use thiserror::Error;

/// Text shown for an empty selection
pub const EMPTY_SENTINEL: &str = "Sin circuitos";

/// Text shown when every circuit of the domain is selected
pub const FULL_SENTINEL: &str = "Todos (1-30)";

/// Lowest value of the canonical circuit domain
pub const DOMAIN_MIN: i64 = 1;

/// Highest value of the canonical circuit domain
pub const DOMAIN_MAX: i64 = 30;

const SEPARATOR: &str = ", ";

/// Most values a single [`decode`] call will produce
pub const MAX_DECODED_VALUES: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Empty token at position {0}")]
    EmptyToken(usize),

    #[error("Invalid number in token '{0}'")]
    InvalidNumber(String),

    #[error("Range '{0}' ends before it starts")]
    ReversedRange(String),

    #[error("Range '{0}' would exceed {} values", MAX_DECODED_VALUES)]
    RangeTooLarge(String),
}

/// A maximal run of consecutive values, `start..=end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: i64,
    pub end: i64,
}

impl Run {
    fn token(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{}-{}", self.start, self.end)
        }
    }
}

/// Group values into maximal ascending runs of consecutive integers
///
/// Duplicates and input order are irrelevant.
pub fn runs<I, T>(values: I) -> Vec<Run>
where
    I: IntoIterator<Item = T>,
    T: Into<i64>,
{
    let sorted: BTreeSet<i64> = values.into_iter().map(Into::into).collect();

    let mut runs: Vec<Run> = Vec::new();
    for value in sorted {
        match runs.last_mut() {
            Some(run) if run.end.checked_add(1) == Some(value) => run.end = value,
            _ => runs.push(Run {
                start: value,
                end: value,
            }),
        }
    }
    runs
}

/// Encode a set of integers as range text
pub fn encode<I, T>(values: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Into<i64>,
{
    let runs = runs(values);

    match runs.as_slice() {
        [] => EMPTY_SENTINEL.to_string(),
        [only] if only.start == DOMAIN_MIN && only.end == DOMAIN_MAX => FULL_SENTINEL.to_string(),
        _ => runs
            .iter()
            .map(Run::token)
            .collect::<Vec<_>>()
            .join(SEPARATOR),
    }
}

/// Parse range text back into the set it describes
///
/// Accepts both sentinels and the `"a-b, c"` grammar produced by [`encode`].
/// Whitespace around tokens is ignored. Text describing more than
/// [`MAX_DECODED_VALUES`] values is rejected.
pub fn decode(text: &str) -> Result<BTreeSet<i64>, DecodeError> {
    let text = text.trim();

    if text == EMPTY_SENTINEL {
        return Ok(BTreeSet::new());
    }
    if text == FULL_SENTINEL {
        return Ok((DOMAIN_MIN..=DOMAIN_MAX).collect());
    }

    let mut values = BTreeSet::new();
    for (position, token) in text.split(',').enumerate() {
        let token = token.trim();
        if token.is_empty() {
            return Err(DecodeError::EmptyToken(position));
        }

        let (start, end) = parse_token(token)?;
        let span = end
            .checked_sub(start)
            .and_then(|distance| usize::try_from(distance).ok())
            .and_then(|distance| distance.checked_add(1));
        match span {
            Some(span) if values.len() + span <= MAX_DECODED_VALUES => values.extend(start..=end),
            _ => return Err(DecodeError::RangeTooLarge(token.to_string())),
        }
    }
    Ok(values)
}

fn parse_token(token: &str) -> Result<(i64, i64), DecodeError> {
    let parse = |s: &str| {
        s.trim()
            .parse::<i64>()
            .map_err(|_| DecodeError::InvalidNumber(token.to_string()))
    };

    // A leading '-' is a sign, not a range separator
    let skip = usize::from(token.starts_with('-'));
    match token[skip..].find('-') {
        Some(offset) => {
            let split = skip + offset;
            let start = parse(&token[..split])?;
            let end = parse(&token[split + 1..])?;
            if end < start {
                return Err(DecodeError::ReversedRange(token.to_string()));
            }
            Ok((start, end))
        }
        None => {
            let value = parse(token)?;
            Ok((value, value))
        }
    }
}
