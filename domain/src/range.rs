//! Textual range descriptors.
//!
//! A range is written as one of:
//!
//! - `Other`: unbounded, membership decided by a set of excluded values;
//! - `< value`: exclusive upper bound only;
//! - `> value`: exclusive lower bound only;
//! - `value`: the single constant `value`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DomainError, Result};

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(Other)|(?:([<>]) )?(.*))$").expect("static regex must compile"));

/// A parsed range of numeric values, still in textual form.
///
/// # Examples
///
/// ```
/// use valuegen_domain::Range;
///
/// let range = Range::of("< 10").unwrap();
/// assert_eq!(range.min(), None);
/// assert_eq!(range.max(), Some("10"));
///
/// let range = Range::of("-4.5").unwrap();
/// assert!(range.is_constant());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    min: Option<String>,
    max: Option<String>,
    excluded: BTreeSet<String>,
}

impl Range {
    /// Parses range text with no excluded values.
    pub fn of(text: &str) -> Result<Range> {
        Range::with_excluded(text, std::iter::empty::<String>())
    }

    /// Parses range text. `excluded` only applies to an `Other` range.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRange`] if the text names no value.
    pub fn with_excluded<I, S>(text: &str, excluded: I) -> Result<Range>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invalid = || DomainError::InvalidRange(text.to_string());
        let captures = RANGE_RE.captures(text).ok_or_else(invalid)?;

        if captures.get(1).is_some() {
            return Ok(Range {
                min: None,
                max: None,
                excluded: excluded.into_iter().map(Into::into).collect(),
            });
        }

        let value = captures.get(3).map(|m| m.as_str()).unwrap_or_default();
        if value.trim().is_empty() {
            return Err(invalid());
        }
        let value = Some(value.to_string());
        let (min, max) = match captures.get(2).map(|m| m.as_str()) {
            Some("<") => (None, value),
            Some(">") => (value, None),
            _ => (value.clone(), value),
        };

        Ok(Range {
            min,
            max,
            excluded: BTreeSet::new(),
        })
    }

    /// Returns the exclusive minimum, if any.
    pub fn min(&self) -> Option<&str> {
        self.min.as_deref()
    }

    /// Returns the exclusive maximum, if any.
    pub fn max(&self) -> Option<&str> {
        self.max.as_deref()
    }

    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Returns `true` if this range holds a single constant value.
    pub fn is_constant(&self) -> bool {
        self.min.is_some() && self.min == self.max
    }
}

impl FromStr for Range {
    type Err = DomainError;

    fn from_str(text: &str) -> Result<Self> {
        Range::of(text)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (None, None) => f.write_str("Other"),
            (None, Some(max)) => write!(f, "< {max}"),
            (Some(min), None) => write!(f, "> {min}"),
            (Some(value), Some(_)) => f.write_str(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_bound_only() {
        let range = Range::of("< 10").unwrap();
        assert_eq!(range.min(), None);
        assert_eq!(range.max(), Some("10"));
        assert!(!range.is_constant());
    }

    #[test]
    fn test_lower_bound_only() {
        let range = Range::of("> 100").unwrap();
        assert_eq!(range.min(), Some("100"));
        assert_eq!(range.max(), None);
    }

    #[test]
    fn test_bare_token_is_constant() {
        let range = Range::of("-99").unwrap();
        assert_eq!(range.min(), Some("-99"));
        assert_eq!(range.max(), Some("-99"));
        assert!(range.is_constant());
    }

    #[test]
    fn test_other_keeps_excluded() {
        let range = Range::with_excluded("Other", ["-11", "1", "11"]).unwrap();
        assert_eq!(range.min(), None);
        assert_eq!(range.max(), None);
        assert_eq!(range.excluded().len(), 3);
        assert!(range.excluded().contains("11"));
    }

    #[test]
    fn test_excluded_ignored_for_bounded_range() {
        let range = Range::with_excluded("> 5", ["6"]).unwrap();
        assert!(range.excluded().is_empty());
    }

    #[test]
    fn test_missing_value_rejected() {
        for text in ["", "< ", "> ", "  "] {
            let err = Range::of(text).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid number range='{text}'"));
        }
        assert!(Range::of("1\n2").is_err());
    }

    #[test]
    fn test_display() {
        for text in ["Other", "< 10", "> 100", "42"] {
            assert_eq!(Range::of(text).unwrap().to_string(), text);
        }
    }
}
