//! Arity patterns and the token matcher.
//!
//! An [`Arity`] describes how many tokens an argument may consume. Matching
//! is greedy and left-anchored: the pattern takes as many leading tokens as
//! it allows, and whatever it cannot absorb is returned as leftover.

use std::fmt;
use std::str::FromStr;

use crate::error::ArityError;

/// How many tokens an argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` tokens. `Exact(0)` is a switch.
    Exact(usize),
    /// An optional single token (`?`).
    ZeroOrOne,
    /// Any number of tokens (`*`).
    ZeroOrMore,
    /// At least one token (`+`).
    OneOrMore,
    /// Between `min` and `max` tokens; no `max` means unbounded.
    Range { min: usize, max: Option<usize> },
}

/// Result of matching an arity pattern against a token run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityMatch<'a> {
    /// Leading tokens absorbed by the pattern.
    pub consumed: &'a [String],
    /// Tokens beyond what the pattern can absorb.
    pub leftover: &'a [String],
}

impl Arity {
    /// Fewest tokens the pattern accepts.
    pub fn min(&self) -> usize {
        match *self {
            Self::Exact(n) => n,
            Self::ZeroOrOne | Self::ZeroOrMore => 0,
            Self::OneOrMore => 1,
            Self::Range { min, .. } => min,
        }
    }

    /// Most tokens the pattern accepts, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        match *self {
            Self::Exact(n) => Some(n),
            Self::ZeroOrOne => Some(1),
            Self::ZeroOrMore | Self::OneOrMore => None,
            Self::Range { max, .. } => max,
        }
    }

    /// A switch takes no tokens at all.
    pub fn is_switch(&self) -> bool {
        matches!(self, Self::Exact(0))
    }

    /// Whether converted values are a single scalar rather than a list.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Exact(1) | Self::ZeroOrOne)
    }

    /// Whether the pattern can be satisfied by zero tokens.
    pub fn accepts_empty(&self) -> bool {
        self.min() == 0
    }

    /// Check the pattern is internally consistent.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Range { min, max: Some(max) } if min > max => Err(format!(
                "range minimum {} exceeds maximum {}",
                min, max
            )),
            _ => Ok(()),
        }
    }

    /// Match the pattern against `tokens`.
    ///
    /// Consumes the maximum number of leading tokens the pattern permits.
    /// Fails instead of under-consuming when fewer than [`Arity::min`]
    /// tokens are available.
    ///
    /// # Example
    ///
    /// ```
    /// use envargs::args::Arity;
    ///
    /// let tokens: Vec<String> = ["1", "2", "3", "4", "5"].map(String::from).to_vec();
    /// let m = Arity::Exact(3).match_tokens(&tokens).unwrap();
    /// assert_eq!(m.consumed.len(), 3);
    /// assert_eq!(m.leftover, &tokens[3..]);
    ///
    /// assert!(Arity::Exact(3).match_tokens(&tokens[..2]).is_err());
    /// ```
    pub fn match_tokens<'a>(&self, tokens: &'a [String]) -> Result<ArityMatch<'a>, ArityError> {
        if tokens.len() < self.min() {
            return Err(ArityError {
                expected: self.describe(),
                available: tokens.len(),
            });
        }

        let take = match self.max() {
            Some(max) => max.min(tokens.len()),
            None => tokens.len(),
        };
        let (consumed, leftover) = tokens.split_at(take);

        tracing::trace!(
            pattern = %self,
            available = tokens.len(),
            consumed = consumed.len(),
            "matched arity"
        );

        Ok(ArityMatch { consumed, leftover })
    }

    /// Human description used in error messages.
    pub fn describe(&self) -> String {
        match *self {
            Self::Exact(0) => "no values".to_string(),
            Self::Exact(1) => "1 value".to_string(),
            Self::Exact(n) => format!("{} values", n),
            Self::ZeroOrOne => "at most 1 value".to_string(),
            Self::ZeroOrMore => "any number of values".to_string(),
            Self::OneOrMore => "at least 1 value".to_string(),
            Self::Range { min, max: None } => format!("at least {} values", min),
            Self::Range { min, max: Some(max) } => format!("{} to {} values", min, max),
        }
    }
}

impl Default for Arity {
    fn default() -> Self {
        Self::Exact(1)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Exact(n) => write!(f, "{}", n),
            Self::ZeroOrOne => write!(f, "?"),
            Self::ZeroOrMore => write!(f, "*"),
            Self::OneOrMore => write!(f, "+"),
            Self::Range { min, max: None } => write!(f, "{{{},}}", min),
            Self::Range { min, max: Some(max) } => write!(f, "{{{},{}}}", min, max),
        }
    }
}

/// Parses the `nargs` notation: `?`, `*`, `+`, `N`, `{min,}` and `{min,max}`.
impl FromStr for Arity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "?" => return Ok(Self::ZeroOrOne),
            "*" => return Ok(Self::ZeroOrMore),
            "+" => return Ok(Self::OneOrMore),
            _ => {}
        }

        if let Ok(n) = s.parse::<usize>() {
            return Ok(Self::Exact(n));
        }

        let inner = s
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| format!("unrecognized arity '{}'", s))?;
        let (min, max) = inner
            .split_once(',')
            .ok_or_else(|| format!("unrecognized arity '{}'", s))?;
        let min = min
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid range minimum in '{}'", s))?;
        let max = match max.trim() {
            "" => None,
            m => Some(
                m.parse::<usize>()
                    .map_err(|_| format!("invalid range maximum in '{}'", s))?,
            ),
        };

        let arity = Self::Range { min, max };
        arity.validate()?;
        Ok(arity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_fails_when_short() {
        let err = Arity::Exact(3).match_tokens(&tokens(&["a", "b"])).unwrap_err();
        assert_eq!(err.available, 2);
        assert_eq!(err.expected, "3 values");
    }

    #[test]
    fn exact_leaves_overflow() {
        let t = tokens(&["1", "2", "3", "4", "5"]);
        let m = Arity::Exact(3).match_tokens(&t).unwrap();
        assert_eq!(m.consumed, &t[..3]);
        assert_eq!(m.leftover, &t[3..]);
    }

    #[test]
    fn one_or_more_is_greedy() {
        let t = tokens(&["a", "b", "c"]);
        let m = Arity::OneOrMore.match_tokens(&t).unwrap();
        assert_eq!(m.consumed.len(), 3);
        assert!(m.leftover.is_empty());
    }

    #[test]
    fn one_or_more_rejects_empty() {
        assert!(Arity::OneOrMore.match_tokens(&[]).is_err());
    }

    #[test]
    fn zero_or_more_accepts_empty() {
        let m = Arity::ZeroOrMore.match_tokens(&[]).unwrap();
        assert!(m.consumed.is_empty());
        assert!(m.leftover.is_empty());
    }

    #[test]
    fn zero_or_one_takes_first_token_only() {
        let t = tokens(&["x", "y"]);
        let m = Arity::ZeroOrOne.match_tokens(&t).unwrap();
        assert_eq!(m.consumed, &t[..1]);
        assert_eq!(m.leftover, &t[1..]);
    }

    #[test]
    fn bounded_range_caps_consumption() {
        let t = tokens(&["1", "2", "3", "4"]);
        let m = Arity::Range {
            min: 1,
            max: Some(2),
        }
        .match_tokens(&t)
        .unwrap();
        assert_eq!(m.consumed.len(), 2);
        assert_eq!(m.leftover.len(), 2);
    }

    #[test]
    fn unbounded_range_enforces_minimum() {
        let arity = Arity::Range { min: 2, max: None };
        assert!(arity.match_tokens(&tokens(&["1"])).is_err());
        let t = tokens(&["1", "2", "3"]);
        assert_eq!(arity.match_tokens(&t).unwrap().consumed.len(), 3);
    }

    #[test]
    fn switch_consumes_nothing() {
        let t = tokens(&["extra"]);
        let m = Arity::Exact(0).match_tokens(&t).unwrap();
        assert!(m.consumed.is_empty());
        assert_eq!(m.leftover, &t[..]);
    }

    #[test]
    fn parses_nargs_notation() {
        assert_eq!("?".parse::<Arity>().unwrap(), Arity::ZeroOrOne);
        assert_eq!("*".parse::<Arity>().unwrap(), Arity::ZeroOrMore);
        assert_eq!("+".parse::<Arity>().unwrap(), Arity::OneOrMore);
        assert_eq!("3".parse::<Arity>().unwrap(), Arity::Exact(3));
        assert_eq!(
            "{2,}".parse::<Arity>().unwrap(),
            Arity::Range { min: 2, max: None }
        );
        assert_eq!(
            "{1, 4}".parse::<Arity>().unwrap(),
            Arity::Range {
                min: 1,
                max: Some(4)
            }
        );
    }

    #[test]
    fn rejects_inverted_range() {
        assert!("{4,1}".parse::<Arity>().is_err());
        assert!(Arity::Range {
            min: 3,
            max: Some(2)
        }
        .validate()
        .is_err());
    }

    #[test]
    fn rejects_garbage_notation() {
        assert!("many".parse::<Arity>().is_err());
        assert!("{x,}".parse::<Arity>().is_err());
    }

    #[test]
    fn display_round_trips_notation() {
        for s in ["?", "*", "+", "2", "{1,}", "{1,3}"] {
            assert_eq!(s.parse::<Arity>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn scalar_shapes() {
        assert!(Arity::Exact(1).is_scalar());
        assert!(Arity::ZeroOrOne.is_scalar());
        assert!(!Arity::Exact(2).is_scalar());
        assert!(!Arity::OneOrMore.is_scalar());
    }
}
