//! Error types for value domains.
//!
//! Configuration errors (malformed range text, unparsable values, a range
//! wider than the configured cap) are raised by the setter that caused them.
//! [`DomainError::EmptyDomain`] is raised only by `select`, since feasibility
//! depends on every constraint together.

use thiserror::Error;
use valuegen_core::SchemaType;

/// Errors that can occur while configuring or sampling a domain.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Range text does not follow the range grammar.
    #[error("Invalid number range='{0}'")]
    InvalidRange(String),

    /// A value could not be read as the domain's number type.
    #[error("invalid {kind} value='{text}'")]
    InvalidValue { kind: &'static str, text: String },

    /// The bounds span more than the configured maximum range.
    #[error("range ({min}, {max}) is larger than the maximum range={max_range}")]
    RangeTooLarge {
        min: String,
        max: String,
        max_range: i64,
    },

    /// No value satisfies all constraints of the domain.
    #[error("no value satisfies {0}")]
    EmptyDomain(String),

    /// The schema does not describe numbers.
    #[error("no numeric domain for schema type={0}")]
    NotNumeric(SchemaType),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`DomainError`].
pub type Result<T> = std::result::Result<T, DomainError>;
