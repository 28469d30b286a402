//! Numeric value domains.
//!
//! A [`NumberDomain`] is the set of numbers strictly between two optional
//! bounds, minus a set of excluded values, that are multiples of an optional
//! factor and of none of a set of forbidden factors.
//!
//! Members lie on a grid of `10^-scale` steps, where the scale is the finest of
//! the domain's scale and the scales of its constraints. A decimal domain
//! whose bounds leave no grid point between them uses the next finer scale
//! that does, so `(0, 1)` holds `0.1 .. 0.9` when no scale was set.
//!
//! Selection works on the lattice of candidate values: every candidate is
//! `k * step * 10^-scale` for an integer `k`, where `step` is the required
//! factor (or one grid unit). Small lattices are enumerated outright. Large
//! ones are sampled, then searched for a witness with `k` coprime to every
//! forbidden factor, so an empty domain is always reported rather than
//! sampled forever.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use tracing::debug;
use valuegen_core::SchemaType;

use crate::error::{DomainError, Result};
use crate::range::Range;
use crate::value::ValueDomain;

/// Lattices with at most this many candidates are enumerated.
const ENUMERATION_LIMIT: i128 = 10_000;

/// Random draws made on a large lattice before searching analytically.
const SAMPLE_ATTEMPTS: usize = 1_000;

/// Number types a [`NumberDomain`] can hold.
///
/// Values are viewed as `mantissa * 10^-scale`, which lets both integers and
/// decimals share one exact lattice arithmetic.
pub trait DomainNumber: Copy + Ord + Hash + fmt::Debug + fmt::Display {
    /// Name used in error messages.
    const KIND: &'static str;
    /// Schema type of values of this kind.
    const SCHEMA_TYPE: SchemaType;
    /// Finest scale this type can represent.
    const MAX_SCALE: u32;
    /// Largest representable mantissa magnitude.
    const MAX_MANTISSA: i128;

    fn mantissa(self) -> i128;

    fn scale(self) -> u32;

    /// Returns `units * 10^-scale`, if representable.
    fn from_units(units: i128, scale: u32) -> Option<Self>;

    /// Returns `true` if `self` is an integral multiple of `multiple`.
    fn is_multiple_of(self, multiple: Self) -> bool;

    fn is_zero(self) -> bool;

    /// Reads a value from text.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] if `text` is not a number of
    /// this kind.
    fn parse(text: &str) -> Result<Self>;
}

impl DomainNumber for i64 {
    const KIND: &'static str = "integer";
    const SCHEMA_TYPE: SchemaType = SchemaType::Integer;
    const MAX_SCALE: u32 = 0;
    const MAX_MANTISSA: i128 = i64::MAX as i128;

    fn mantissa(self) -> i128 {
        i128::from(self)
    }

    fn scale(self) -> u32 {
        0
    }

    fn from_units(units: i128, scale: u32) -> Option<Self> {
        if scale != 0 {
            return None;
        }
        i64::try_from(units).ok()
    }

    fn is_multiple_of(self, multiple: Self) -> bool {
        match multiple {
            0 => self == 0,
            // Only `i64::MIN % -1` overflows, and it is a multiple.
            m => self.checked_rem(m).is_none_or(|r| r == 0),
        }
    }

    fn is_zero(self) -> bool {
        self == 0
    }

    fn parse(text: &str) -> Result<Self> {
        text.trim().parse().map_err(|_| DomainError::InvalidValue {
            kind: Self::KIND,
            text: text.to_string(),
        })
    }
}

impl DomainNumber for Decimal {
    const KIND: &'static str = "decimal";
    const SCHEMA_TYPE: SchemaType = SchemaType::Number;
    const MAX_SCALE: u32 = 28;
    const MAX_MANTISSA: i128 = (1 << 96) - 1;

    fn mantissa(self) -> i128 {
        Decimal::mantissa(&self)
    }

    fn scale(self) -> u32 {
        Decimal::scale(&self)
    }

    fn from_units(units: i128, scale: u32) -> Option<Self> {
        Decimal::try_from_i128_with_scale(units, scale).ok()
    }

    fn is_multiple_of(self, multiple: Self) -> bool {
        if Decimal::is_zero(&multiple) {
            return Decimal::is_zero(&self);
        }
        self.checked_rem(multiple).is_some_and(|r| Decimal::is_zero(&r))
    }

    fn is_zero(self) -> bool {
        Decimal::is_zero(&self)
    }

    fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| DomainError::InvalidValue {
                kind: Self::KIND,
                text: text.to_string(),
            })
    }
}

/// A set of numbers defined by exclusive bounds and factor constraints.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use valuegen_domain::{NumberDomain, Range, ValueDomain};
///
/// let mut domain = NumberDomain::<i64>::new(i64::from(i32::MAX));
/// domain.set_range_of(&Range::of("> 100").unwrap()).unwrap();
/// domain.set_not_multiple_ofs([2]);
///
/// assert!(domain.contains(&101));
/// assert!(!domain.contains(&99));
/// assert!(!domain.contains(&102));
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let value = domain.select(&mut rng).unwrap();
/// assert!(domain.contains(&value));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberDomain<T> {
    max_range: i64,
    scale: u32,
    min: Option<T>,
    max: Option<T>,
    excluded: BTreeSet<T>,
    multiple_of: Option<T>,
    not_multiple_ofs: BTreeSet<T>,
}

impl<T: DomainNumber> NumberDomain<T> {
    /// Creates an unbounded domain.
    ///
    /// `max_range` caps the span of the bounds, and how far values may lie
    /// past an open side.
    pub fn new(max_range: i64) -> Self {
        Self {
            max_range: max_range.max(0),
            scale: 0,
            min: None,
            max: None,
            excluded: BTreeSet::new(),
            multiple_of: None,
            not_multiple_ofs: BTreeSet::new(),
        }
    }

    pub fn max_range(&self) -> i64 {
        self.max_range
    }

    /// Changes the grid of this domain to steps of `10^-scale`.
    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale.min(T::MAX_SCALE);
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Changes the exclusive bounds of this domain.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RangeTooLarge`] if `max - min` exceeds the
    /// maximum range.
    pub fn set_range(&mut self, min: Option<T>, max: Option<T>) -> Result<()> {
        if let (Some(min), Some(max)) = (min, max) {
            if self.exceeds_max_range(min, max) {
                return Err(DomainError::RangeTooLarge {
                    min: min.to_string(),
                    max: max.to_string(),
                    max_range: self.max_range,
                });
            }
        }
        debug!(kind = T::KIND, min = ?min, max = ?max, "Setting domain range");
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// Changes the bounds and exclusions to those of `range`.
    ///
    /// A constant range yields a domain holding only that value.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] if a value in `range` is not a
    /// number of this kind, or [`DomainError::RangeTooLarge`] as for
    /// [`set_range`](Self::set_range).
    pub fn set_range_of(&mut self, range: &Range) -> Result<()> {
        let min = range.min().map(T::parse).transpose()?;
        let max = range.max().map(T::parse).transpose()?;
        let excluded = range.excluded().iter().map(|text| T::parse(text)).collect::<Result<Vec<_>>>()?;

        match min {
            Some(value) if range.is_constant() => {
                let (below, above) = self.neighbors(value).ok_or_else(|| DomainError::InvalidValue {
                    kind: T::KIND,
                    text: value.to_string(),
                })?;
                self.set_range(Some(below), Some(above))?;
            }
            _ => self.set_range(min, max)?,
        }
        self.set_excluded(excluded);
        Ok(())
    }

    /// Returns the exclusive minimum.
    pub fn min(&self) -> Option<T> {
        self.min
    }

    /// Returns the exclusive maximum.
    pub fn max(&self) -> Option<T> {
        self.max
    }

    /// Changes the values excluded from this domain.
    pub fn set_excluded(&mut self, excluded: impl IntoIterator<Item = T>) {
        self.excluded = excluded.into_iter().collect();
    }

    pub fn excluded(&self) -> &BTreeSet<T> {
        &self.excluded
    }

    /// Changes the factor required of every value. A zero factor is ignored.
    pub fn set_multiple_of(&mut self, multiple_of: Option<T>) {
        self.multiple_of = multiple_of.filter(|m| !m.is_zero());
    }

    /// Text form of [`set_multiple_of`](Self::set_multiple_of).
    pub fn set_multiple_of_text(&mut self, multiple_of: Option<&str>) -> Result<()> {
        let multiple_of = multiple_of.map(T::parse).transpose()?;
        self.set_multiple_of(multiple_of);
        Ok(())
    }

    pub fn multiple_of(&self) -> Option<T> {
        self.multiple_of
    }

    /// Changes the factors no value may have. Zero factors are ignored.
    pub fn set_not_multiple_ofs(&mut self, not_multiple_ofs: impl IntoIterator<Item = T>) {
        self.not_multiple_ofs = not_multiple_ofs.into_iter().filter(|m| !m.is_zero()).collect();
    }

    /// Text form of [`set_not_multiple_ofs`](Self::set_not_multiple_ofs).
    pub fn set_not_multiple_ofs_text<'a>(&mut self, not_multiple_ofs: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let factors = not_multiple_ofs.into_iter().map(T::parse).collect::<Result<Vec<_>>>()?;
        self.set_not_multiple_ofs(factors);
        Ok(())
    }

    pub fn not_multiple_ofs(&self) -> &BTreeSet<T> {
        &self.not_multiple_ofs
    }

    fn exceeds_max_range(&self, min: T, max: T) -> bool {
        let scale = min.scale().max(max.scale());
        let span = units_at(max, scale)
            .zip(units_at(min, scale))
            .and_then(|(max, min)| max.checked_sub(min));
        let limit = pow10(scale).and_then(|unit| i128::from(self.max_range).checked_mul(unit));
        match (span, limit) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(span), Some(limit)) => span > limit,
        }
    }

    /// Returns the values one unit below and above `value`.
    fn neighbors(&self, value: T) -> Option<(T, T)> {
        let scale = value.scale().max(self.scale).min(T::MAX_SCALE);
        let units = units_at(value, scale)?;
        let below = T::from_units(units.checked_sub(1)?, scale)?;
        let above = T::from_units(units.checked_add(1)?, scale)?;
        Some((below, above))
    }

    /// Returns the finest scale needed to express every constraint.
    fn lattice_scale(&self) -> u32 {
        self.min
            .iter()
            .chain(self.max.iter())
            .chain(self.multiple_of.iter())
            .chain(self.excluded.iter())
            .chain(self.not_multiple_ofs.iter())
            .map(|value| value.scale())
            .fold(self.scale, u32::max)
            .min(T::MAX_SCALE)
    }

    /// Returns the scale of the grid holding every member.
    ///
    /// Without a required factor, a grid with no point strictly between the
    /// bounds is refined until one fits or the finest scale is reached.
    fn grid_scale(&self) -> u32 {
        let mut scale = self.lattice_scale();
        if self.multiple_of.is_none() {
            while scale < T::MAX_SCALE && self.positions(scale, 1).is_some_and(|(first, last)| first > last) {
                scale += 1;
            }
        }
        scale
    }

    /// Returns the first and last `k` with `k * step` strictly inside the
    /// bounds at `scale`, limited to representable values.
    fn positions(&self, scale: u32, step: i128) -> Option<(i128, i128)> {
        let reach = pow10(scale)
            .and_then(|unit| i128::from(self.max_range).checked_mul(unit))
            .unwrap_or(T::MAX_MANTISSA);
        let lower = match (self.min, self.max) {
            (Some(min), _) => units_at(min, scale)?,
            (None, Some(max)) => units_at(max, scale)?.saturating_sub(reach),
            (None, None) => -(reach / 2),
        };
        let upper = match (self.min, self.max) {
            (_, Some(max)) => units_at(max, scale)?,
            (Some(min), None) => units_at(min, scale)?.saturating_add(reach),
            (None, None) => reach / 2,
        };

        let first = (lower.div_euclid(step) + 1).max(-(T::MAX_MANTISSA / step));
        let last = (-(-upper).div_euclid(step) - 1).min(T::MAX_MANTISSA / step);
        Some((first, last))
    }

    /// Returns the candidate lattice, or `None` if it is provably empty.
    fn lattice(&self) -> Option<Lattice> {
        let scale = self.grid_scale();
        let step = match self.multiple_of {
            Some(multiple_of) => units_at(multiple_of, scale)?.abs(),
            None => 1,
        };

        let (first, last) = self.positions(scale, step)?;
        if first > last {
            return None;
        }

        let mut divisors = Vec::with_capacity(self.not_multiple_ofs.len());
        for factor in &self.not_multiple_ofs {
            let factor = units_at(*factor, scale)?.abs();
            let divisor = factor / gcd(factor, step);
            if divisor == 1 {
                // Every multiple of `step` is a multiple of this factor.
                return None;
            }
            divisors.push(divisor);
        }

        Some(Lattice {
            scale,
            step,
            first,
            last,
            divisors,
        })
    }

    fn candidate(&self, lattice: &Lattice, k: i128) -> Option<T> {
        let value = T::from_units(k.checked_mul(lattice.step)?, lattice.scale)?;
        self.satisfies(&value).then_some(value)
    }

    /// Checks every constraint except grid membership.
    fn satisfies(&self, value: &T) -> bool {
        self.min.is_none_or(|min| *value > min)
            && self.max.is_none_or(|max| *value < max)
            && !self.excluded.contains(value)
            && self.multiple_of.is_none_or(|m| value.is_multiple_of(m))
            && !self.not_multiple_ofs.iter().any(|m| value.is_multiple_of(*m))
    }

    fn select_from<R: Rng>(&self, lattice: &Lattice, rng: &mut R) -> Option<T> {
        let count = lattice.last - lattice.first + 1;
        if count <= ENUMERATION_LIMIT {
            let members: Vec<T> = (lattice.first..=lattice.last)
                .filter_map(|k| self.candidate(lattice, k))
                .collect();
            return members.choose(rng).copied();
        }

        for _ in 0..SAMPLE_ATTEMPTS {
            let k = rng.gen_range(lattice.first..=lattice.last);
            if let Some(value) = self.candidate(lattice, k) {
                return Some(value);
            }
        }

        debug!(domain = %self, "Random draws failed, searching for a witness");
        self.witness(lattice, count)
    }

    /// Searches deterministically for a member of a large lattice.
    ///
    /// Any `k` that is 1 modulo the lcm of the forbidden divisors avoids every
    /// forbidden factor, so among `excluded + 1` such candidates at least one
    /// is a member.
    fn witness(&self, lattice: &Lattice, count: i128) -> Option<T> {
        let period = lattice
            .divisors
            .iter()
            .try_fold(1i128, |period, divisor| lcm(period, *divisor))
            .filter(|period| *period <= count)
            .and_then(|period| usize::try_from(period).ok().map(|step| (period, step)));

        if let Some((period, step_by)) = period {
            let start = lattice.first + (1 - lattice.first).rem_euclid(period);
            let found = (start..=lattice.last)
                .step_by(step_by)
                .take(self.excluded.len() + 1)
                .find_map(|k| self.candidate(lattice, k));
            if found.is_some() {
                return found;
            }
        }

        let limit = ENUMERATION_LIMIT as usize;
        (lattice.first..=lattice.last)
            .take(limit)
            .chain((lattice.first..=lattice.last).rev().take(limit))
            .find_map(|k| self.candidate(lattice, k))
    }
}

impl<T: DomainNumber> ValueDomain for NumberDomain<T> {
    type Value = T;

    fn contains(&self, value: &T) -> bool {
        self.satisfies(value) && units_at(*value, self.grid_scale()).is_some()
    }

    fn select<R: Rng>(&self, rng: &mut R) -> Result<T> {
        self.lattice()
            .and_then(|lattice| self.select_from(&lattice, rng))
            .ok_or_else(|| DomainError::EmptyDomain(self.to_string()))
    }

    fn types(&self) -> BTreeSet<SchemaType> {
        BTreeSet::from([T::SCHEMA_TYPE])
    }
}

impl<T: DomainNumber> fmt::Display for NumberDomain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |value: Option<T>| value.map_or_else(|| "*".to_string(), |v| v.to_string());
        write!(f, "{} range ({}, {})", T::KIND, bound(self.min), bound(self.max))?;
        if let Some(multiple_of) = self.multiple_of {
            write!(f, ", multipleOf={multiple_of}")?;
        }
        if !self.not_multiple_ofs.is_empty() {
            write!(f, ", notMultipleOf={}", join(&self.not_multiple_ofs))?;
        }
        if !self.excluded.is_empty() {
            write!(f, ", excluded={}", join(&self.excluded))?;
        }
        Ok(())
    }
}

/// Candidate values `k * step * 10^-scale` for `k` in `first..=last`.
#[derive(Debug)]
struct Lattice {
    scale: u32,
    step: i128,
    first: i128,
    last: i128,
    /// A candidate is a multiple of a forbidden factor iff some divisor divides `k`.
    divisors: Vec<i128>,
}

fn join<T: fmt::Display>(values: &BTreeSet<T>) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

fn pow10(exponent: u32) -> Option<i128> {
    10i128.checked_pow(exponent)
}

/// Returns the mantissa of `value` at `scale`, if `value` lies on that grid.
fn units_at<T: DomainNumber>(value: T, scale: u32) -> Option<i128> {
    let (mut mantissa, mut own) = (value.mantissa(), value.scale());
    while own > scale && mantissa % 10 == 0 {
        mantissa /= 10;
        own -= 1;
    }
    let shift = scale.checked_sub(own)?;
    mantissa.checked_mul(pow10(shift)?)
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: i128, b: i128) -> Option<i128> {
    (a / gcd(a, b)).checked_mul(b)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_gcd_and_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(lcm(4, 6), Some(12));
        assert_eq!(lcm(i128::MAX, 2), None);
    }

    #[test]
    fn test_units_at_finer_scale() {
        assert_eq!(units_at(dec("1.5"), 3), Some(1500));
        assert_eq!(units_at(dec("1.25"), 1), None);
        assert_eq!(units_at(dec("1.500"), 1), Some(15));
        assert_eq!(units_at(-7i64, 0), Some(-7));
    }

    #[test]
    fn test_integer_multiples() {
        assert!(15i64.is_multiple_of(5));
        assert!((-9i64).is_multiple_of(3));
        assert!(!7i64.is_multiple_of(2));
        assert!(i64::MIN.is_multiple_of(-1));
    }

    #[test]
    fn test_decimal_multiples() {
        assert!(dec("0.75").is_multiple_of(dec("0.25")));
        assert!(!dec("0.8").is_multiple_of(dec("0.25")));
        assert!(dec("3").is_multiple_of(dec("1.5")));
    }

    #[test]
    fn test_lattice_bounds_are_exclusive() {
        let mut domain = NumberDomain::<i64>::new(1000);
        domain.set_range(Some(3), Some(21)).unwrap();
        domain.set_multiple_of(Some(3));

        let lattice = domain.lattice().unwrap();
        assert_eq!((lattice.first, lattice.last), (2, 6));
        assert_eq!(lattice.step, 3);
    }

    #[test]
    fn test_lattice_detects_absorbing_factor() {
        let mut domain = NumberDomain::<i64>::new(i64::from(i32::MAX));
        domain.set_multiple_of(Some(4));
        domain.set_not_multiple_ofs([2]);
        assert!(domain.lattice().is_none());
    }

    #[test]
    fn test_open_domain_spans_max_range() {
        let domain = NumberDomain::<i64>::new(100);
        let lattice = domain.lattice().unwrap();
        assert_eq!((lattice.first, lattice.last), (-49, 49));
    }

    #[test]
    fn test_decimal_lattice_uses_scale() {
        let mut domain = NumberDomain::<Decimal>::new(10);
        domain.set_scale(2);
        domain.set_range(Some(dec("0")), Some(dec("1"))).unwrap();

        let lattice = domain.lattice().unwrap();
        assert_eq!(lattice.scale, 2);
        assert_eq!((lattice.first, lattice.last), (1, 99));
    }

    #[test]
    fn test_unscaled_decimal_grid_refines_between_bounds() {
        let mut domain = NumberDomain::<Decimal>::new(100);
        domain.set_range(Some(dec("0")), Some(dec("1"))).unwrap();

        assert_eq!(domain.grid_scale(), 1);
        assert!(domain.contains(&dec("0.5")));
        assert!(domain.contains(&dec("0.50")));
        assert!(!domain.contains(&dec("0.55")));

        let mut rng = SmallRng::seed_from_u64(42);
        for value in domain.values(&mut rng).take(20) {
            assert!(domain.contains(&value), "{value}");
            assert_eq!(value.scale(), 1);
        }
    }

    #[test]
    fn test_grid_is_not_refined_past_a_factor() {
        let mut domain = NumberDomain::<Decimal>::new(100);
        domain.set_range(Some(dec("0")), Some(dec("1"))).unwrap();
        domain.set_multiple_of(Some(dec("2")));

        assert_eq!(domain.grid_scale(), 0);
        assert!(domain.lattice().is_none());
    }

    #[test]
    fn test_contains_rejects_values_off_grid() {
        let mut domain = NumberDomain::<Decimal>::new(100);
        domain.set_scale(2);
        domain.set_range(Some(dec("1.49")), Some(dec("2.01"))).unwrap();

        assert!(domain.contains(&dec("1.5")));
        assert!(domain.contains(&dec("2.00")));
        assert!(!domain.contains(&dec("1.491")));
        assert!(!domain.contains(&dec("1.495")));
    }

    #[test]
    fn test_witness_found_after_sampling_fails() {
        let mut domain = NumberDomain::<i64>::new(i64::from(i32::MAX));
        domain.set_range(Some(0), Some(1_000_000)).unwrap();
        domain.set_not_multiple_ofs([2, 3, 5, 7]);

        let lattice = domain.lattice().unwrap();
        let value = domain.witness(&lattice, lattice.last - lattice.first + 1).unwrap();
        assert_eq!(value, 1);

        let mut rng = SmallRng::seed_from_u64(42);
        let value = domain.select(&mut rng).unwrap();
        assert!(domain.contains(&value));
    }

    #[test]
    fn test_display_lists_constraints() {
        let mut domain = NumberDomain::<i64>::new(100);
        domain.set_range(None, Some(10)).unwrap();
        domain.set_multiple_of(Some(5));
        domain.set_not_multiple_ofs([2]);
        assert_eq!(domain.to_string(), "integer range (*, 10), multipleOf=5, notMultipleOf=[2]");
    }
}
