//! Length analysis for string patterns.
//!
//! Patterns follow JSON Schema semantics: a value matches if the pattern
//! matches anywhere inside it. Only a pattern anchored at both ends (`^...$`)
//! bounds the length of matching values from above.

use regex_syntax::ParserBuilder;
use regex_syntax::hir::{Class, Hir, HirKind, Look};
use thiserror::Error;

/// A pattern that cannot be used for length analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("{0}")]
    Parse(String),
    #[error("pattern can never match: {0}")]
    Unmatchable(String),
}

/// Lengths, in characters, of the strings a pattern can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternBounds {
    pub min: usize,
    /// `None` when matching strings can be arbitrarily long.
    pub max: Option<usize>,
}

/// Computes the producible length bounds of `pattern`.
///
/// # Examples
///
/// ```
/// use valuegen_core::pattern::analyze_pattern;
///
/// let bounds = analyze_pattern("^[A-Z]{2}-\\d{3,5}$").unwrap();
/// assert_eq!(bounds.min, 6);
/// assert_eq!(bounds.max, Some(8));
///
/// // Unanchored: any text may surround the match.
/// let bounds = analyze_pattern("ab+").unwrap();
/// assert_eq!(bounds.min, 2);
/// assert_eq!(bounds.max, None);
/// ```
pub fn analyze_pattern(pattern: &str) -> Result<PatternBounds, PatternError> {
    let hir = ParserBuilder::new()
        .build()
        .parse(pattern)
        .map_err(|err| PatternError::Parse(err.to_string()))?;

    let (min, max) = length_of(&hir).ok_or_else(|| PatternError::Unmatchable(pattern.to_string()))?;
    let anchored = starts_anchored(&hir) && ends_anchored(&hir);
    Ok(PatternBounds {
        min,
        max: if anchored { max } else { None },
    })
}

/// Returns `true` if every match of `hir` begins at the start of the input.
fn starts_anchored(hir: &Hir) -> bool {
    match hir.kind() {
        HirKind::Look(look) => *look == Look::Start,
        HirKind::Capture(capture) => starts_anchored(&capture.sub),
        HirKind::Concat(parts) => parts.first().is_some_and(starts_anchored),
        HirKind::Alternation(branches) => branches.iter().all(starts_anchored),
        HirKind::Repetition(repetition) => repetition.min > 0 && starts_anchored(&repetition.sub),
        _ => false,
    }
}

/// Returns `true` if every match of `hir` ends at the end of the input.
fn ends_anchored(hir: &Hir) -> bool {
    match hir.kind() {
        HirKind::Look(look) => *look == Look::End,
        HirKind::Capture(capture) => ends_anchored(&capture.sub),
        HirKind::Concat(parts) => parts.last().is_some_and(ends_anchored),
        HirKind::Alternation(branches) => branches.iter().all(ends_anchored),
        HirKind::Repetition(repetition) => repetition.min > 0 && ends_anchored(&repetition.sub),
        _ => false,
    }
}

/// Returns `(min, max)` character lengths, or `None` if nothing matches.
fn length_of(hir: &Hir) -> Option<(usize, Option<usize>)> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => Some((0, Some(0))),
        HirKind::Literal(literal) => {
            let chars = String::from_utf8_lossy(&literal.0).chars().count();
            Some((chars, Some(chars)))
        }
        HirKind::Class(class) => {
            let empty = match class {
                Class::Unicode(class) => class.ranges().is_empty(),
                Class::Bytes(class) => class.ranges().is_empty(),
            };
            if empty { None } else { Some((1, Some(1))) }
        }
        HirKind::Repetition(repetition) => {
            let Some((sub_min, sub_max)) = length_of(&repetition.sub) else {
                // Only the empty repetition can still match.
                return (repetition.min == 0).then_some((0, Some(0)));
            };
            let min = sub_min.saturating_mul(repetition.min as usize);
            let max = match (sub_max, repetition.max) {
                (Some(0), _) => Some(0),
                (Some(sub_max), Some(times)) => Some(sub_max.saturating_mul(times as usize)),
                _ => None,
            };
            Some((min, max))
        }
        HirKind::Capture(capture) => length_of(&capture.sub),
        HirKind::Concat(parts) => parts.iter().try_fold((0usize, Some(0usize)), |(min, max), part| {
            let (part_min, part_max) = length_of(part)?;
            let max = match (max, part_max) {
                (Some(max), Some(part_max)) => Some(max.saturating_add(part_max)),
                _ => None,
            };
            Some((min.saturating_add(part_min), max))
        }),
        HirKind::Alternation(branches) => {
            branches
                .iter()
                .filter_map(length_of)
                .reduce(|(min_a, max_a), (min_b, max_b)| {
                    let max = match (max_a, max_b) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        _ => None,
                    };
                    (min_a.min(min_b), max)
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(pattern: &str) -> (usize, Option<usize>) {
        let b = analyze_pattern(pattern).unwrap();
        (b.min, b.max)
    }

    #[test]
    fn test_anchored_literal() {
        assert_eq!(bounds("^abc$"), (3, Some(3)));
    }

    #[test]
    fn test_anchored_repetition_and_alternation() {
        assert_eq!(bounds("^(ab|c){2,3}$"), (2, Some(6)));
        assert_eq!(bounds("^x?y*$"), (0, None));
    }

    #[test]
    fn test_half_anchored_is_unbounded() {
        assert_eq!(bounds("^abc"), (3, None));
        assert_eq!(bounds("abc$"), (3, None));
    }

    #[test]
    fn test_top_level_alternation_needs_anchors_on_every_branch() {
        assert_eq!(bounds("^a|b$"), (1, None));
        assert_eq!(bounds("^a$|^bb"), (1, None));
        assert_eq!(bounds("^a$|^bb$"), (1, Some(2)));
    }

    #[test]
    fn test_grouped_alternation_is_anchored() {
        assert_eq!(bounds("^(a|b)$"), (1, Some(1)));
        assert_eq!(bounds("(^ab$)"), (2, Some(2)));
    }

    #[test]
    fn test_multi_line_anchors_do_not_bound() {
        assert_eq!(bounds("(?m)^abc$"), (3, None));
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        assert_eq!(bounds("^a\\$"), (2, None));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(bounds("^é[ü-ÿ]$"), (2, Some(2)));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(analyze_pattern("^[a-$"), Err(PatternError::Parse(_))));
    }

    #[test]
    fn test_empty_pattern_matches_anything() {
        assert_eq!(bounds(""), (0, None));
    }
}
