//! Schema type definitions for value constraint modeling.
//!
//! A [`Schema`] describes the constraints on one input value. Its type is
//! fixed at construction and selects one [`Constraints`] variant, so the
//! numeric, string and array properties are only reachable on schemas of the
//! matching type. The setter shim (`set_minimum`, `set_max_length`, ...)
//! exists for callers that work with properties by name and reports
//! [`SchemaError::PropertyNotAllowed`] instead.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::SchemaError;

/// Type of the values described by a schema.
///
/// # Examples
///
/// ```
/// use valuegen_core::SchemaType;
///
/// assert_eq!(SchemaType::Integer.to_string(), "integer");
/// assert!(SchemaType::Number.is_numeric());
/// assert!(!SchemaType::String.is_numeric());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
}

impl SchemaType {
    /// Returns `true` for `integer` and `number`.
    pub fn is_numeric(self) -> bool {
        matches!(self, SchemaType::Integer | SchemaType::Number)
    }

    /// Returns the JSON Schema keyword for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Array => "array",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete value, used for `const` schemas.
///
/// # Examples
///
/// ```
/// use valuegen_core::{DataValue, SchemaType};
///
/// let value = DataValue::Integer(-99);
/// assert_eq!(value.value_type(), SchemaType::Integer);
/// assert_eq!(DataValue::Null.value_type(), SchemaType::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(Decimal),
    String(String),
    Array(Vec<DataValue>),
}

impl DataValue {
    /// Returns the schema type this value belongs to.
    pub fn value_type(&self) -> SchemaType {
        match self {
            DataValue::Null => SchemaType::Null,
            DataValue::Boolean(_) => SchemaType::Boolean,
            DataValue::Integer(_) => SchemaType::Integer,
            DataValue::Number(_) => SchemaType::Number,
            DataValue::String(_) => SchemaType::String,
            DataValue::Array(_) => SchemaType::Array,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => f.write_str("null"),
            DataValue::Boolean(value) => write!(f, "{value}"),
            DataValue::Integer(value) => write!(f, "{value}"),
            DataValue::Number(value) => write!(f, "{value}"),
            DataValue::String(value) => write!(f, "{value:?}"),
            DataValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Range and factor constraints for `integer` and `number` schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NumberConstraints {
    /// Inclusive lower bound.
    pub minimum: Option<Decimal>,
    /// Inclusive upper bound.
    pub maximum: Option<Decimal>,
    /// Exclusive lower bound.
    pub exclusive_minimum: Option<Decimal>,
    /// Exclusive upper bound.
    pub exclusive_maximum: Option<Decimal>,
    /// Required common divisor.
    pub multiple_of: Option<Decimal>,
}

/// Length and pattern constraints for `string` schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StringConstraints {
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    /// Regular expression that values must match.
    pub pattern: Option<String>,
}

/// Size and item constraints for `array` schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArrayConstraints {
    pub min_items: Option<i64>,
    pub max_items: Option<i64>,
    pub unique_items: Option<bool>,
    /// Constraints on every array item. Owned exclusively by this schema.
    pub items: Option<Box<Schema>>,
}

/// Type-specific constraints of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraints {
    Null,
    Boolean,
    Integer(NumberConstraints),
    Number(NumberConstraints),
    String(StringConstraints),
    Array(ArrayConstraints),
}

impl Constraints {
    fn empty(schema_type: SchemaType) -> Self {
        match schema_type {
            SchemaType::Null => Constraints::Null,
            SchemaType::Boolean => Constraints::Boolean,
            SchemaType::Integer => Constraints::Integer(NumberConstraints::default()),
            SchemaType::Number => Constraints::Number(NumberConstraints::default()),
            SchemaType::String => Constraints::String(StringConstraints::default()),
            SchemaType::Array => Constraints::Array(ArrayConstraints::default()),
        }
    }

    fn schema_type(&self) -> SchemaType {
        match self {
            Constraints::Null => SchemaType::Null,
            Constraints::Boolean => SchemaType::Boolean,
            Constraints::Integer(_) => SchemaType::Integer,
            Constraints::Number(_) => SchemaType::Number,
            Constraints::String(_) => SchemaType::String,
            Constraints::Array(_) => SchemaType::Array,
        }
    }
}

/// Requirements for the value of one input variable.
///
/// Equality and hashing are structural: two schemas are equal when every
/// property is equal, recursing into `items`. Cloning produces an
/// independent deep copy.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use valuegen_core::{Schema, SchemaType};
///
/// let mut schema = Schema::new(SchemaType::Integer);
/// schema.set_minimum(Some(Decimal::new(1, 0))).unwrap();
/// assert_eq!(schema.minimum(), Some(Decimal::new(1, 0)));
///
/// // Length properties do not apply to integers.
/// assert!(schema.set_min_length(Some(3)).is_err());
///
/// let copy = schema.clone();
/// assert_eq!(copy, schema);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    pub(crate) constraints: Constraints,
    pub(crate) constant: Option<DataValue>,
    pub(crate) format: Option<String>,
}

impl Schema {
    /// Creates an unconstrained schema of the given type.
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            constraints: Constraints::empty(schema_type),
            constant: None,
            format: None,
        }
    }

    /// Creates a schema with the given type-specific constraints.
    pub fn with_constraints(constraints: Constraints) -> Self {
        Self {
            constraints,
            constant: None,
            format: None,
        }
    }

    /// Returns the type of values described by this schema.
    pub fn schema_type(&self) -> SchemaType {
        self.constraints.schema_type()
    }

    /// Returns the type-specific constraints.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Returns the constant value, if any.
    pub fn constant(&self) -> Option<&DataValue> {
        self.constant.as_ref()
    }

    /// Changes the constant value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ConstantTypeMismatch`] if the value is neither
    /// null nor of this schema's type.
    pub fn set_constant(&mut self, constant: Option<DataValue>) -> Result<(), SchemaError> {
        if let Some(value) = &constant {
            let value_type = value.value_type();
            if value_type != self.schema_type() && value_type != SchemaType::Null {
                return Err(SchemaError::ConstantTypeMismatch {
                    value_type,
                    schema_type: self.schema_type(),
                });
            }
        }
        self.constant = constant;
        Ok(())
    }

    /// Returns the format of values.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Changes the format of values.
    pub fn set_format(&mut self, format: Option<String>) {
        self.format = format;
    }

    /// Builder form of [`set_format`](Schema::set_format).
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Returns the numeric constraints of an `integer` or `number` schema.
    pub fn numbers(&self) -> Option<&NumberConstraints> {
        match &self.constraints {
            Constraints::Integer(numbers) | Constraints::Number(numbers) => Some(numbers),
            _ => None,
        }
    }

    /// Mutable form of [`numbers`](Schema::numbers).
    pub fn numbers_mut(&mut self) -> Option<&mut NumberConstraints> {
        match &mut self.constraints {
            Constraints::Integer(numbers) | Constraints::Number(numbers) => Some(numbers),
            _ => None,
        }
    }

    /// Returns the constraints of a `string` schema.
    pub fn strings(&self) -> Option<&StringConstraints> {
        match &self.constraints {
            Constraints::String(strings) => Some(strings),
            _ => None,
        }
    }

    /// Mutable form of [`strings`](Schema::strings).
    pub fn strings_mut(&mut self) -> Option<&mut StringConstraints> {
        match &mut self.constraints {
            Constraints::String(strings) => Some(strings),
            _ => None,
        }
    }

    /// Returns the constraints of an `array` schema.
    pub fn arrays(&self) -> Option<&ArrayConstraints> {
        match &self.constraints {
            Constraints::Array(arrays) => Some(arrays),
            _ => None,
        }
    }

    /// Mutable form of [`arrays`](Schema::arrays).
    pub fn arrays_mut(&mut self) -> Option<&mut ArrayConstraints> {
        match &mut self.constraints {
            Constraints::Array(arrays) => Some(arrays),
            _ => None,
        }
    }

    pub fn minimum(&self) -> Option<Decimal> {
        self.numbers().and_then(|n| n.minimum)
    }

    pub fn maximum(&self) -> Option<Decimal> {
        self.numbers().and_then(|n| n.maximum)
    }

    pub fn exclusive_minimum(&self) -> Option<Decimal> {
        self.numbers().and_then(|n| n.exclusive_minimum)
    }

    pub fn exclusive_maximum(&self) -> Option<Decimal> {
        self.numbers().and_then(|n| n.exclusive_maximum)
    }

    pub fn multiple_of(&self) -> Option<Decimal> {
        self.numbers().and_then(|n| n.multiple_of)
    }

    pub fn min_length(&self) -> Option<i64> {
        self.strings().and_then(|s| s.min_length)
    }

    pub fn max_length(&self) -> Option<i64> {
        self.strings().and_then(|s| s.max_length)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.strings().and_then(|s| s.pattern.as_deref())
    }

    pub fn min_items(&self) -> Option<i64> {
        self.arrays().and_then(|a| a.min_items)
    }

    pub fn max_items(&self) -> Option<i64> {
        self.arrays().and_then(|a| a.max_items)
    }

    pub fn unique_items(&self) -> Option<bool> {
        self.arrays().and_then(|a| a.unique_items)
    }

    pub fn items(&self) -> Option<&Schema> {
        self.arrays().and_then(|a| a.items.as_deref())
    }

    pub fn set_minimum(&mut self, value: Option<Decimal>) -> Result<(), SchemaError> {
        self.numbers_for("minimum")?.minimum = value;
        Ok(())
    }

    pub fn set_maximum(&mut self, value: Option<Decimal>) -> Result<(), SchemaError> {
        self.numbers_for("maximum")?.maximum = value;
        Ok(())
    }

    pub fn set_exclusive_minimum(&mut self, value: Option<Decimal>) -> Result<(), SchemaError> {
        self.numbers_for("exclusiveMinimum")?.exclusive_minimum = value;
        Ok(())
    }

    pub fn set_exclusive_maximum(&mut self, value: Option<Decimal>) -> Result<(), SchemaError> {
        self.numbers_for("exclusiveMaximum")?.exclusive_maximum = value;
        Ok(())
    }

    pub fn set_multiple_of(&mut self, value: Option<Decimal>) -> Result<(), SchemaError> {
        self.numbers_for("multipleOf")?.multiple_of = value;
        Ok(())
    }

    pub fn set_min_length(&mut self, value: Option<i64>) -> Result<(), SchemaError> {
        self.strings_for("minLength")?.min_length = value;
        Ok(())
    }

    pub fn set_max_length(&mut self, value: Option<i64>) -> Result<(), SchemaError> {
        self.strings_for("maxLength")?.max_length = value;
        Ok(())
    }

    pub fn set_pattern(&mut self, value: Option<String>) -> Result<(), SchemaError> {
        self.strings_for("pattern")?.pattern = value;
        Ok(())
    }

    pub fn set_min_items(&mut self, value: Option<i64>) -> Result<(), SchemaError> {
        self.arrays_for("minItems")?.min_items = value;
        Ok(())
    }

    pub fn set_max_items(&mut self, value: Option<i64>) -> Result<(), SchemaError> {
        self.arrays_for("maxItems")?.max_items = value;
        Ok(())
    }

    pub fn set_unique_items(&mut self, value: Option<bool>) -> Result<(), SchemaError> {
        self.arrays_for("uniqueItems")?.unique_items = value;
        Ok(())
    }

    pub fn set_items(&mut self, value: Option<Schema>) -> Result<(), SchemaError> {
        self.arrays_for("items")?.items = value.map(Box::new);
        Ok(())
    }

    fn not_allowed(&self, property: &'static str) -> SchemaError {
        SchemaError::PropertyNotAllowed {
            property,
            schema_type: self.schema_type(),
        }
    }

    fn numbers_for(&mut self, property: &'static str) -> Result<&mut NumberConstraints, SchemaError> {
        let err = self.not_allowed(property);
        self.numbers_mut().ok_or(err)
    }

    fn strings_for(&mut self, property: &'static str) -> Result<&mut StringConstraints, SchemaError> {
        let err = self.not_allowed(property);
        self.strings_mut().ok_or(err)
    }

    fn arrays_for(&mut self, property: &'static str) -> Result<&mut ArrayConstraints, SchemaError> {
        let err = self.not_allowed(property);
        self.arrays_mut().ok_or(err)
    }
}
