//! Schema normalization.
//!
//! [`Schemas::normalize`] rewrites a schema in place into its canonical form:
//!
//! - numeric schemas end up with inclusive `minimum`/`maximum` only, both
//!   rounded onto the `multipleOf` grid (or the finest declared decimal unit);
//! - string schemas get `minLength`/`maxLength` reconciled with the lengths
//!   implied by `format` and `pattern`, dropping a pattern that is invalid or
//!   inapplicable;
//! - array schemas get `minItems <= maxItems`, and their `items` schema is
//!   normalized recursively.
//!
//! Every correction is reported to the [`Notifier`]; normalization itself
//! never fails.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use valuegen_core::{Schema, SchemaType, normalize_schema};
//!
//! let mut schema = Schema::new(SchemaType::Integer);
//! schema.set_exclusive_minimum(Some(Decimal::new(5, 0))).unwrap();
//! schema.set_maximum(Some(Decimal::new(20, 0))).unwrap();
//! schema.set_multiple_of(Some(Decimal::new(4, 0))).unwrap();
//!
//! let (schema, diagnostics) = normalize_schema(schema);
//! assert_eq!(schema.minimum(), Some(Decimal::new(12, 0)));
//! assert_eq!(schema.maximum(), Some(Decimal::new(20, 0)));
//! assert_eq!(schema.exclusive_minimum(), None);
//! assert!(diagnostics.is_empty());
//! ```

use std::fmt::Display;

use rust_decimal::Decimal;
use tracing::debug;

use crate::format::{is_patterned_format, string_format_max, string_format_min};
use crate::pattern::analyze_pattern;
use crate::{Diagnostics, Notifier, NumberConstraints, Schema, SchemaType, StringConstraints};

/// Normalizes schemas, reporting corrections to a [`Notifier`].
pub struct Schemas<'n> {
    notifier: &'n mut dyn Notifier,
    location: Vec<&'static str>,
}

/// Normalizes `schema` and returns it with the findings reported on the way.
pub fn normalize_schema(mut schema: Schema) -> (Schema, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    Schemas::new(&mut diagnostics).normalize(&mut schema);
    (schema, diagnostics)
}

impl<'n> Schemas<'n> {
    pub fn new(notifier: &'n mut dyn Notifier) -> Self {
        Self {
            notifier,
            location: Vec::new(),
        }
    }

    /// Rewrites `schema` into canonical form and returns it.
    ///
    /// A schema with a `const` value is left unchanged.
    pub fn normalize<'s>(&mut self, schema: &'s mut Schema) -> &'s mut Schema {
        if schema.constant().is_some() {
            return schema;
        }
        debug!(schema_type = %schema.schema_type(), location = %self.location(), "Normalizing schema");

        match schema.schema_type() {
            SchemaType::Array => self.normalize_array(schema),
            SchemaType::Integer | SchemaType::Number => {
                if let Some(numbers) = schema.numbers_mut() {
                    self.normalize_number_range(numbers);
                }
            }
            SchemaType::String => self.normalize_string(schema),
            SchemaType::Null | SchemaType::Boolean => {}
        }

        schema
    }

    fn normalize_array(&mut self, schema: &mut Schema) {
        let Some(arrays) = schema.arrays_mut() else {
            return;
        };

        let max_items = arrays.max_items.filter(|max| *max >= 0);
        let min_items = arrays.min_items.filter(|min| *min >= 0).map(|min| match max_items {
            Some(max) => self.adjusted_min_of("Items", min, max),
            None => min,
        });
        arrays.max_items = max_items;
        arrays.min_items = min_items;

        if let Some(items) = arrays.items.as_deref_mut() {
            self.location.push("items");
            self.normalize(items);
            self.location.pop();
        }
    }

    /// Reduces the numeric range to effective inclusive bounds.
    fn normalize_number_range(&mut self, numbers: &mut NumberConstraints) {
        let unit = unit_of_numbers(numbers);

        numbers.multiple_of = numbers.multiple_of.filter(|m| !m.is_zero());
        let multiple_of = numbers.multiple_of.map(|m| m.abs()).unwrap_or(unit);

        let effective_min = match numbers.exclusive_minimum {
            Some(exclusive) => {
                let above = exclusive.saturating_add(multiple_of);
                Some(numbers.minimum.filter(|min| *min >= above).unwrap_or(above))
            }
            None => numbers.minimum,
        }
        .map(|min| multiple_above(min, multiple_of));

        let effective_max = match numbers.exclusive_maximum {
            Some(exclusive) => {
                let below = exclusive.saturating_sub(multiple_of);
                Some(numbers.maximum.filter(|max| *max <= below).unwrap_or(below))
            }
            None => numbers.maximum,
        }
        .map(|max| multiple_below(max, multiple_of));

        numbers.minimum = match (effective_min, effective_max) {
            (Some(min), Some(max)) => Some(self.adjusted_min_of("imum", min, max)),
            (min, _) => min,
        };
        numbers.maximum = effective_max;
        numbers.exclusive_minimum = None;
        numbers.exclusive_maximum = None;
    }

    fn normalize_string(&mut self, schema: &mut Schema) {
        let format = schema.format().map(str::to_string);
        let Some(strings) = schema.strings_mut() else {
            return;
        };

        strings.pattern = strings
            .pattern
            .take()
            .filter(|_| self.is_pattern_applicable(format.as_deref()))
            .filter(|pattern| self.is_pattern_valid(pattern));

        self.normalize_string_length(format.as_deref(), strings);
    }

    /// Defines the effective (inclusive) length bounds of a string schema.
    fn normalize_string_length(&mut self, format: Option<&str>, strings: &mut StringConstraints) {
        let (min_required, max_required) = self.length_required(format, strings);

        strings.max_length = match strings.max_length.filter(|max| *max >= 0) {
            Some(max) => Some(self.adjust_to_range("maxLength", max, min_required, max_required)),
            None => max_required,
        };

        strings.min_length = match strings.min_length.filter(|min| *min >= 0) {
            Some(min) => {
                let min = self.adjust_to_range("minLength", min, min_required, max_required);
                Some(match strings.max_length {
                    Some(max) => self.adjusted_min_of("Length", min, max),
                    None => min,
                })
            }
            None => min_required,
        };
    }

    /// Returns `(min, max)` lengths required by format and pattern together.
    ///
    /// Drops the pattern if its lengths cannot be satisfied within the format.
    fn length_required(&mut self, format: Option<&str>, strings: &mut StringConstraints) -> (Option<i64>, Option<i64>) {
        let pattern = strings.pattern.as_deref();
        let min_required = required_min(format, pattern);
        let max_required = required_max(format, pattern);

        match (min_required, max_required) {
            (Some(min), Some(max)) if min > max => {
                let message = format!(
                    "Required length for pattern='{}' is incompatible with format='{}'",
                    pattern.unwrap_or_default(),
                    format.unwrap_or_default()
                );
                self.notify_error(&message, "Ignoring the pattern for this schema");
                strings.pattern = None;
                (string_format_min(format), string_format_max(format))
            }
            bounds => bounds,
        }
    }

    fn adjusted_min_of<T>(&mut self, description: &str, min: T, max: T) -> T
    where
        T: PartialOrd + Display,
    {
        if min > max {
            self.notify_error(
                &format!("min{description}={min} is greater than max{description}={max}"),
                &format!("Adjusting min{description} to max{description}"),
            );
            return max;
        }
        min
    }

    fn adjust_to_range(&mut self, description: &str, value: i64, min: Option<i64>, max: Option<i64>) -> i64 {
        let mut value = value;
        if let Some(max) = max.filter(|max| value > *max) {
            self.notify_error(
                &format!("{description}={value} is greater than the required maximum={max}"),
                &format!("Adjusting {description} to the required maximum"),
            );
            value = max;
        }
        if let Some(min) = min.filter(|min| value < *min) {
            self.notify_error(
                &format!("{description}={value} is less than the required minimum={min}"),
                &format!("Adjusting {description} to the required minimum"),
            );
            value = min;
        }
        value
    }

    fn is_pattern_applicable(&mut self, format: Option<&str>) -> bool {
        if is_patterned_format(format) {
            self.notify_warning(&format!(
                "Pattern matching not supported for strings with format={}. Ignoring the pattern for this schema",
                format.unwrap_or_default()
            ));
            return false;
        }
        true
    }

    fn is_pattern_valid(&mut self, pattern: &str) -> bool {
        match analyze_pattern(pattern) {
            Ok(_) => true,
            Err(err) => {
                self.notify_error(&format!("Invalid pattern: {err}"), "Ignoring the pattern for this schema");
                false
            }
        }
    }

    fn location(&self) -> String {
        self.location.join(".")
    }

    fn notify_warning(&mut self, message: &str) {
        let location = self.location();
        self.notifier.notify_warning(&location, message);
    }

    fn notify_error(&mut self, message: &str, resolution: &str) {
        let location = self.location();
        self.notifier.notify_error(&location, message, resolution);
    }
}

/// Returns the minimum length of strings matching the schema's pattern.
pub fn min_pattern_match(schema: &Schema) -> Option<i64> {
    pattern_min(schema.pattern())
}

/// Returns the maximum length of strings matching the schema's pattern.
///
/// `None` if there is no usable pattern or matches are unbounded.
pub fn max_pattern_match(schema: &Schema) -> Option<i64> {
    pattern_max(schema.pattern())
}

/// Returns the minimum string length required by format and pattern.
pub fn min_length_required(schema: &Schema) -> Option<i64> {
    required_min(schema.format(), schema.pattern())
}

/// Returns the maximum string length required by format and pattern.
pub fn max_length_required(schema: &Schema) -> Option<i64> {
    required_max(schema.format(), schema.pattern())
}

/// Returns the finest increment distinguished by the schema's numeric bounds.
///
/// This is `10^-s`, where `s` is the largest decimal scale among `multipleOf`,
/// `minimum`, `maximum`, `exclusiveMinimum` and `exclusiveMaximum`.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use valuegen_core::{Schema, SchemaType, unit_of};
///
/// let mut schema = Schema::new(SchemaType::Number);
/// schema.set_minimum(Some("1.50".parse().unwrap())).unwrap();
/// assert_eq!(unit_of(&schema), Decimal::new(1, 2));
/// ```
pub fn unit_of(schema: &Schema) -> Decimal {
    schema.numbers().map(unit_of_numbers).unwrap_or(Decimal::ONE)
}

fn unit_of_numbers(numbers: &NumberConstraints) -> Decimal {
    let scale = [
        numbers.multiple_of,
        numbers.minimum,
        numbers.maximum,
        numbers.exclusive_minimum,
        numbers.exclusive_maximum,
    ]
    .iter()
    .flatten()
    .map(Decimal::scale)
    .max()
    .unwrap_or(0);
    Decimal::new(1, scale)
}

fn pattern_min(pattern: Option<&str>) -> Option<i64> {
    let bounds = analyze_pattern(pattern?).ok()?;
    i64::try_from(bounds.min).ok()
}

fn pattern_max(pattern: Option<&str>) -> Option<i64> {
    let bounds = analyze_pattern(pattern?).ok()?;
    bounds.max.and_then(|max| i64::try_from(max).ok())
}

fn required_min(format: Option<&str>, pattern: Option<&str>) -> Option<i64> {
    match (string_format_min(format), pattern_min(pattern)) {
        (Some(f), Some(p)) => Some(f.max(p)),
        (f, p) => f.or(p),
    }
}

fn required_max(format: Option<&str>, pattern: Option<&str>) -> Option<i64> {
    match (string_format_max(format), pattern_max(pattern)) {
        (Some(f), Some(p)) => Some(f.min(p)),
        (f, p) => f.or(p),
    }
}

/// Returns the smallest multiple of `multiple` that is `>= value`.
///
/// `value` is kept when no such multiple is representable.
fn multiple_above(value: Decimal, multiple: Decimal) -> Decimal {
    let Some(remainder) = value.checked_rem(multiple) else {
        return value;
    };
    if remainder.is_zero() || value.is_sign_negative() {
        value - remainder
    } else {
        (value - remainder).checked_add(multiple).unwrap_or(value)
    }
}

/// Returns the largest multiple of `multiple` that is `<= value`.
///
/// `value` is kept when no such multiple is representable.
fn multiple_below(value: Decimal, multiple: Decimal) -> Decimal {
    let Some(remainder) = value.checked_rem(multiple) else {
        return value;
    };
    if remainder.is_zero() || value.is_sign_positive() {
        value - remainder
    } else {
        (value - remainder).checked_sub(multiple).unwrap_or(value)
    }
}
