//! Error types for schema construction and document conversion.

use thiserror::Error;

use crate::SchemaType;

/// Structural errors raised while building a [`Schema`](crate::Schema).
///
/// These are fatal at the call that caused them; constraint inconsistencies
/// found during normalization are reported as diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A property was set on a schema whose type does not support it.
    #[error("property={property} is not allowed for schema type={schema_type}")]
    PropertyNotAllowed {
        property: &'static str,
        schema_type: SchemaType,
    },
    /// A `const` value does not match the schema type.
    #[error("'const' type={value_type} is not allowed for schema type={schema_type}")]
    ConstantTypeMismatch {
        value_type: SchemaType,
        schema_type: SchemaType,
    },
    /// The schema document has no usable `type`.
    #[error("invalid schema type: {0}")]
    InvalidType(String),
    /// A schema document property has the wrong shape.
    #[error("invalid value for property={property}: {reason}")]
    InvalidProperty {
        property: &'static str,
        reason: String,
    },
}
