//! Building value domains from normalized schemas.
//!
//! A normalized [`Schema`] states inclusive bounds, while a [`NumberDomain`]
//! holds exclusive ones. Lowering widens each inclusive bound outward by one
//! unit: `1` for integers, and `10^-scale` for decimals, where the scale is the
//! finest of the schema's declared scale and the configured default.

use std::collections::BTreeSet;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;
use valuegen_core::{DataValue, Schema, SchemaType, unit_of};

use crate::config::GeneratorConfig;
use crate::constant::ConstantDomain;
use crate::error::{DomainError, Result};
use crate::number::{DomainNumber, NumberDomain};
use crate::value::ValueDomain;

/// A domain for the values of a numeric schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericDomain {
    Integer(NumberDomain<i64>),
    Decimal(NumberDomain<Decimal>),
    Constant(ConstantDomain<DataValue>),
}

/// Builds the domain of a numeric schema.
///
/// A schema with a `const` value yields a [`NumericDomain::Constant`].
///
/// # Errors
///
/// Returns [`DomainError::NotNumeric`] for a non-numeric schema, and the
/// errors of [`integer_domain`] or [`decimal_domain`] otherwise.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use serde_json::json;
/// use valuegen_core::{DataValue, Schema};
/// use valuegen_domain::{GeneratorConfig, ValueDomain, numeric_domain};
///
/// let schema = Schema::from_value(&json!({ "type": "integer", "minimum": 1, "maximum": 3 })).unwrap();
/// let domain = numeric_domain(&schema, &GeneratorConfig::default()).unwrap();
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// for value in domain.values(&mut rng).take(20) {
///     assert!(matches!(value, DataValue::Integer(1..=3)));
/// }
/// ```
pub fn numeric_domain(schema: &Schema, config: &GeneratorConfig) -> Result<NumericDomain> {
    let schema_type = schema.schema_type();
    if !schema_type.is_numeric() {
        return Err(DomainError::NotNumeric(schema_type));
    }
    if let Some(constant) = schema.constant() {
        return Ok(NumericDomain::Constant(ConstantDomain::new(
            constant.clone(),
            constant.value_type(),
        )));
    }

    match schema_type {
        SchemaType::Integer => Ok(NumericDomain::Integer(integer_domain(schema, config.integer_max_range)?)),
        _ => Ok(NumericDomain::Decimal(decimal_domain(
            schema,
            config.decimal_max_range,
            config.decimal_scale,
        )?)),
    }
}

/// Builds the integer domain of an `integer` schema.
///
/// Fractional bounds are first rounded inward to the nearest integer.
///
/// # Errors
///
/// Returns [`DomainError::NotNumeric`] for a schema of another type,
/// [`DomainError::InvalidValue`] for a bound or factor that is not a
/// representable integer, and [`DomainError::RangeTooLarge`] if the bounds
/// span more than `max_range`.
pub fn integer_domain(schema: &Schema, max_range: i64) -> Result<NumberDomain<i64>> {
    if schema.schema_type() != SchemaType::Integer {
        return Err(DomainError::NotNumeric(schema.schema_type()));
    }

    let below_minimum = schema
        .minimum()
        .map(|min| min.ceil().checked_sub(Decimal::ONE).ok_or_else(|| invalid_integer(min)))
        .transpose()?;
    let min = tighter(below_minimum, schema.exclusive_minimum().map(|x| x.floor()), Ord::max)
        .map(to_integer)
        .transpose()?;

    let above_maximum = schema
        .maximum()
        .map(|max| max.floor().checked_add(Decimal::ONE).ok_or_else(|| invalid_integer(max)))
        .transpose()?;
    let max = tighter(above_maximum, schema.exclusive_maximum().map(|x| x.ceil()), Ord::min)
        .map(to_integer)
        .transpose()?;

    let multiple_of = schema
        .multiple_of()
        .map(|m| if m.fract().is_zero() { to_integer(m) } else { Err(invalid_integer(m)) })
        .transpose()?;

    let mut domain = NumberDomain::new(max_range);
    domain.set_range(min, max)?;
    domain.set_multiple_of(multiple_of);
    debug!(domain = %domain, "Lowered integer schema");
    Ok(domain)
}

/// Builds the decimal domain of a `number` schema.
///
/// # Errors
///
/// Returns [`DomainError::NotNumeric`] for a schema of another type, and
/// [`DomainError::RangeTooLarge`] if the bounds span more than `max_range`.
pub fn decimal_domain(schema: &Schema, max_range: i64, default_scale: u32) -> Result<NumberDomain<Decimal>> {
    if schema.schema_type() != SchemaType::Number {
        return Err(DomainError::NotNumeric(schema.schema_type()));
    }

    let scale = unit_of(schema).scale().max(default_scale).min(<Decimal as DomainNumber>::MAX_SCALE);
    let unit = Decimal::new(1, scale);

    let below_minimum = schema
        .minimum()
        .map(|min| min.checked_sub(unit).ok_or_else(|| invalid_decimal(min)))
        .transpose()?;
    let min = tighter(below_minimum, schema.exclusive_minimum(), Ord::max);

    let above_maximum = schema
        .maximum()
        .map(|max| max.checked_add(unit).ok_or_else(|| invalid_decimal(max)))
        .transpose()?;
    let max = tighter(above_maximum, schema.exclusive_maximum(), Ord::min);

    let mut domain = NumberDomain::new(max_range);
    domain.set_scale(scale);
    domain.set_range(min, max)?;
    domain.set_multiple_of(schema.multiple_of());
    debug!(domain = %domain, "Lowered number schema");
    Ok(domain)
}

fn tighter(a: Option<Decimal>, b: Option<Decimal>, pick: fn(Decimal, Decimal) -> Decimal) -> Option<Decimal> {
    match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, b) => a.or(b),
    }
}

fn to_integer(value: Decimal) -> Result<i64> {
    i64::try_from(value).map_err(|_| invalid_integer(value))
}

fn invalid_integer(value: Decimal) -> DomainError {
    DomainError::InvalidValue {
        kind: "integer",
        text: value.to_string(),
    }
}

fn invalid_decimal(value: Decimal) -> DomainError {
    DomainError::InvalidValue {
        kind: "decimal",
        text: value.to_string(),
    }
}

impl ValueDomain for NumericDomain {
    type Value = DataValue;

    fn contains(&self, value: &DataValue) -> bool {
        match (self, value) {
            (NumericDomain::Integer(domain), DataValue::Integer(value)) => domain.contains(value),
            (NumericDomain::Decimal(domain), DataValue::Number(value)) => domain.contains(value),
            (NumericDomain::Decimal(domain), DataValue::Integer(value)) => domain.contains(&Decimal::from(*value)),
            (NumericDomain::Constant(domain), value) => domain.contains(value),
            _ => false,
        }
    }

    fn select<R: Rng>(&self, rng: &mut R) -> Result<DataValue> {
        match self {
            NumericDomain::Integer(domain) => domain.select(rng).map(DataValue::Integer),
            NumericDomain::Decimal(domain) => domain.select(rng).map(DataValue::Number),
            NumericDomain::Constant(domain) => domain.select(rng),
        }
    }

    fn types(&self) -> BTreeSet<SchemaType> {
        match self {
            NumericDomain::Integer(domain) => domain.types(),
            NumericDomain::Decimal(domain) => domain.types(),
            NumericDomain::Constant(domain) => domain.types(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use serde_json::json;

    use super::*;

    fn schema(text: &str) -> Schema {
        serde_json::from_str(text).unwrap()
    }

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_integer_bounds_widen_by_one() {
        let domain = integer_domain(&schema(r#"{"type":"integer","minimum":3,"maximum":21}"#), 1000).unwrap();
        assert_eq!(domain.min(), Some(2));
        assert_eq!(domain.max(), Some(22));
        assert!(domain.contains(&3));
        assert!(domain.contains(&21));
        assert!(!domain.contains(&22));
    }

    #[test]
    fn test_integer_fractional_bounds_round_inward() {
        let domain = integer_domain(&schema(r#"{"type":"integer","minimum":1.5,"exclusiveMaximum":4.5}"#), 1000).unwrap();
        assert_eq!(domain.min(), Some(1));
        assert_eq!(domain.max(), Some(5));
        assert!(domain.contains(&2));
        assert!(domain.contains(&4));
    }

    #[test]
    fn test_integer_rejects_fractional_factor() {
        let err = integer_domain(&schema(r#"{"type":"integer","multipleOf":0.5}"#), 1000).unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { kind: "integer", .. }));
    }

    #[test]
    fn test_decimal_bounds_widen_by_unit() {
        let domain = decimal_domain(&schema(r#"{"type":"number","minimum":1.5,"maximum":2}"#), 1000, 2).unwrap();
        assert_eq!(domain.min(), Some(dec("1.49")));
        assert_eq!(domain.max(), Some(dec("2.01")));
        assert_eq!(domain.scale(), 2);

        let mut rng = SmallRng::seed_from_u64(42);
        for value in domain.values(&mut rng).take(50) {
            assert!(value >= dec("1.5") && value <= dec("2"), "{value}");
        }
    }

    #[test]
    fn test_decimal_widening_admits_nothing_outside_schema_bounds() {
        let domain = decimal_domain(&schema(r#"{"type":"number","minimum":1.5,"maximum":2}"#), 1000, 2).unwrap();
        assert!(domain.contains(&dec("1.5")));
        assert!(domain.contains(&dec("2")));
        assert!(!domain.contains(&dec("1.491")));
        assert!(!domain.contains(&dec("1.495")));
        assert!(!domain.contains(&dec("2.005")));
    }

    #[test]
    fn test_decimal_declared_scale_wins_over_default() {
        let domain = decimal_domain(&schema(r#"{"type":"number","minimum":0.125}"#), 1000, 2).unwrap();
        assert_eq!(domain.scale(), 3);
        assert_eq!(domain.min(), Some(dec("0.124")));
        assert_eq!(domain.max(), None);
    }

    #[test]
    fn test_const_schema_yields_constant_domain() {
        let schema = Schema::from_value(&json!({ "type": "integer", "const": -99 })).unwrap();
        let domain = numeric_domain(&schema, &GeneratorConfig::default()).unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(domain.select(&mut rng).unwrap(), DataValue::Integer(-99));
        assert_eq!(domain.types(), BTreeSet::from([SchemaType::Integer]));
    }

    #[test]
    fn test_non_numeric_schema_rejected() {
        let err = numeric_domain(&Schema::new(SchemaType::String), &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, DomainError::NotNumeric(SchemaType::String)));
    }

    #[test]
    fn test_decimal_domain_accepts_integer_values() {
        let schema = Schema::from_value(&json!({ "type": "number", "minimum": 0, "maximum": 10 })).unwrap();
        let domain = numeric_domain(&schema, &GeneratorConfig::default()).unwrap();
        assert!(domain.contains(&DataValue::Integer(10)));
        assert!(!domain.contains(&DataValue::Integer(11)));
        assert!(!domain.contains(&DataValue::String("1".into())));
    }
}
