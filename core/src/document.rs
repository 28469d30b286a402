//! Conversion between [`Schema`] and JSON Schema documents.
//!
//! Documents use the JSON Schema keywords (`type`, `const`, `format`,
//! `minimum`, `exclusiveMinimum`, `minLength`, `items`, ...). Unknown keywords
//! are ignored. Numeric bounds keep the scale they were written with, so
//! `1.50` in a document stays `1.50`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::{DataValue, Schema, SchemaError, SchemaType};

impl Schema {
    /// Builds a schema from a JSON Schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidType`] if `type` is missing or unknown,
    /// [`SchemaError::PropertyNotAllowed`] for a keyword that does not apply
    /// to the type, and [`SchemaError::InvalidProperty`] for a malformed value.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use valuegen_core::{Schema, SchemaType};
    ///
    /// let schema = Schema::from_value(&json!({
    ///     "type": "array",
    ///     "maxItems": 3,
    ///     "items": { "type": "string", "format": "uuid" }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(schema.schema_type(), SchemaType::Array);
    /// assert_eq!(schema.items().and_then(|items| items.format()), Some("uuid"));
    /// ```
    pub fn from_value(value: &Value) -> Result<Schema, SchemaError> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::InvalidType(format!("expected an object, found {value}")))?;

        let schema_type = match object.get("type") {
            Some(Value::String(name)) => parse_type(name)?,
            Some(other) => return Err(SchemaError::InvalidType(other.to_string())),
            None => return Err(SchemaError::InvalidType("missing 'type'".to_string())),
        };

        let mut schema = Schema::new(schema_type);
        for (key, value) in object {
            match key.as_str() {
                "type" => {}
                "const" => schema.set_constant(Some(data_value_of(value, schema_type)?))?,
                "format" => schema.set_format(Some(string_of("format", value)?)),
                "minimum" => schema.set_minimum(Some(decimal_of("minimum", value)?))?,
                "maximum" => schema.set_maximum(Some(decimal_of("maximum", value)?))?,
                "exclusiveMinimum" => schema.set_exclusive_minimum(Some(decimal_of("exclusiveMinimum", value)?))?,
                "exclusiveMaximum" => schema.set_exclusive_maximum(Some(decimal_of("exclusiveMaximum", value)?))?,
                "multipleOf" => schema.set_multiple_of(Some(decimal_of("multipleOf", value)?))?,
                "minLength" => schema.set_min_length(Some(integer_of("minLength", value)?))?,
                "maxLength" => schema.set_max_length(Some(integer_of("maxLength", value)?))?,
                "pattern" => schema.set_pattern(Some(string_of("pattern", value)?))?,
                "minItems" => schema.set_min_items(Some(integer_of("minItems", value)?))?,
                "maxItems" => schema.set_max_items(Some(integer_of("maxItems", value)?))?,
                "uniqueItems" => schema.set_unique_items(Some(bool_of("uniqueItems", value)?))?,
                "items" => schema.set_items(Some(Schema::from_value(value)?))?,
                _ => {}
            }
        }
        Ok(schema)
    }

    /// Renders this schema as a JSON Schema document.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".into(), Value::String(self.schema_type().to_string()));
        if let Some(constant) = self.constant() {
            object.insert("const".into(), constant.to_value());
        }
        if let Some(format) = self.format() {
            object.insert("format".into(), Value::String(format.to_string()));
        }

        let mut put_decimal = |key: &str, value: Option<Decimal>| {
            if let Some(value) = value {
                object.insert(key.into(), decimal_value(value));
            }
        };
        put_decimal("minimum", self.minimum());
        put_decimal("maximum", self.maximum());
        put_decimal("exclusiveMinimum", self.exclusive_minimum());
        put_decimal("exclusiveMaximum", self.exclusive_maximum());
        put_decimal("multipleOf", self.multiple_of());

        let mut put_integer = |key: &str, value: Option<i64>| {
            if let Some(value) = value {
                object.insert(key.into(), Value::from(value));
            }
        };
        put_integer("minLength", self.min_length());
        put_integer("maxLength", self.max_length());
        put_integer("minItems", self.min_items());
        put_integer("maxItems", self.max_items());

        if let Some(pattern) = self.pattern() {
            object.insert("pattern".into(), Value::String(pattern.to_string()));
        }
        if let Some(unique) = self.unique_items() {
            object.insert("uniqueItems".into(), Value::Bool(unique));
        }
        if let Some(items) = self.items() {
            object.insert("items".into(), items.to_value());
        }
        Value::Object(object)
    }
}

impl DataValue {
    /// Renders this value as JSON.
    pub fn to_value(&self) -> Value {
        match self {
            DataValue::Null => Value::Null,
            DataValue::Boolean(value) => Value::Bool(*value),
            DataValue::Integer(value) => Value::from(*value),
            DataValue::Number(value) => decimal_value(*value),
            DataValue::String(value) => Value::String(value.clone()),
            DataValue::Array(items) => Value::Array(items.iter().map(DataValue::to_value).collect()),
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Schema::from_value(&value).map_err(D::Error::custom)
    }
}

fn parse_type(name: &str) -> Result<SchemaType, SchemaError> {
    match name {
        "null" => Ok(SchemaType::Null),
        "boolean" => Ok(SchemaType::Boolean),
        "integer" => Ok(SchemaType::Integer),
        "number" => Ok(SchemaType::Number),
        "string" => Ok(SchemaType::String),
        "array" => Ok(SchemaType::Array),
        other => Err(SchemaError::InvalidType(other.to_string())),
    }
}

/// Converts a `const` value, reading numbers as the schema's numeric type.
fn data_value_of(value: &Value, schema_type: SchemaType) -> Result<DataValue, SchemaError> {
    Ok(match value {
        Value::Null => DataValue::Null,
        Value::Bool(value) => DataValue::Boolean(*value),
        Value::String(value) => DataValue::String(value.clone()),
        Value::Array(items) => DataValue::Array(
            items
                .iter()
                .map(|item| data_value_of(item, SchemaType::Null))
                .collect::<Result<_, _>>()?,
        ),
        Value::Number(_) if schema_type == SchemaType::Integer => DataValue::Integer(integer_of("const", value)?),
        Value::Number(_) => {
            let number = decimal_of("const", value)?;
            match i64::try_from(number) {
                Ok(integer) if schema_type != SchemaType::Number && number.scale() == 0 => DataValue::Integer(integer),
                _ => DataValue::Number(number),
            }
        }
        Value::Object(_) => {
            return Err(SchemaError::InvalidProperty {
                property: "const",
                reason: "objects are not supported".to_string(),
            });
        }
    })
}

fn decimal_of(property: &'static str, value: &Value) -> Result<Decimal, SchemaError> {
    let invalid = |reason: String| SchemaError::InvalidProperty { property, reason };
    let Value::Number(number) = value else {
        return Err(invalid(format!("expected a number, found {value}")));
    };
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|err| invalid(format!("{text}: {err}")))
}

fn integer_of(property: &'static str, value: &Value) -> Result<i64, SchemaError> {
    let number = decimal_of(property, value)?;
    if !number.fract().is_zero() {
        return Err(SchemaError::InvalidProperty {
            property,
            reason: format!("expected an integer, found {number}"),
        });
    }
    i64::try_from(number).map_err(|err| SchemaError::InvalidProperty {
        property,
        reason: format!("{number}: {err}"),
    })
}

fn string_of(property: &'static str, value: &Value) -> Result<String, SchemaError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::InvalidProperty {
            property,
            reason: format!("expected a string, found {value}"),
        })
}

fn bool_of(property: &'static str, value: &Value) -> Result<bool, SchemaError> {
    value.as_bool().ok_or_else(|| SchemaError::InvalidProperty {
        property,
        reason: format!("expected a boolean, found {value}"),
    })
}

fn decimal_value(value: Decimal) -> Value {
    let text = value.to_string();
    serde_json::from_str::<Number>(&text)
        .map(Value::Number)
        .unwrap_or(Value::String(text))
}
