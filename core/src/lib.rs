//! Core constraint model for schema-driven test-data generation.
//!
//! This crate defines the types describing what an input value may be, and
//! the transformations that make those descriptions consistent:
//!
//! - [`Schema`] holds the constraints on one value. Its [`SchemaType`] is
//!   fixed at construction and selects the applicable [`Constraints`].
//! - [`Schemas`] normalizes a schema into canonical form (inclusive numeric
//!   bounds, lengths consistent with `format` and `pattern`, `minItems <=
//!   maxItems`), reporting each correction to a [`Notifier`].
//! - [`merge`] layers a schema over a set of defaults.
//! - [`Schema::from_value`] and [`Schema::to_value`] convert to and from
//!   JSON Schema documents.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use valuegen_core::*;
//!
//! let schema = Schema::from_value(&json!({
//!     "type": "array",
//!     "minItems": 5,
//!     "maxItems": 2,
//!     "items": { "type": "string", "format": "date" }
//! }))
//! .unwrap();
//!
//! let (schema, diagnostics) = normalize_schema(schema);
//! assert_eq!(schema.min_items(), Some(2));
//! assert_eq!(schema.items().and_then(Schema::max_length), Some(10));
//! assert!(diagnostics.has_errors());
//! ```

mod diagnostics;
mod document;
mod error;
pub mod format;
mod merge;
mod normalize;
pub mod pattern;
mod types;

pub use diagnostics::{Diagnostic, Diagnostics, Notifier, Severity};
pub use error::SchemaError;
pub use merge::merge;
pub use normalize::{
    Schemas, max_length_required, max_pattern_match, min_length_required, min_pattern_match, normalize_schema,
    unit_of,
};
pub use types::*;
