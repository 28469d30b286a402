//! Schema merging.
//!
//! A schema may be declared on its own and also inherit defaults from an
//! enclosing definition. [`merge`] combines the two: properties set on the
//! schema win, anything it leaves unset is taken from the defaults.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use valuegen_core::{Schema, SchemaType, merge};
//!
//! let mut defaults = Schema::new(SchemaType::Integer);
//! defaults.set_minimum(Some(Decimal::new(0, 0))).unwrap();
//! defaults.set_maximum(Some(Decimal::new(100, 0))).unwrap();
//!
//! let mut schema = Schema::new(SchemaType::Integer);
//! schema.set_maximum(Some(Decimal::new(10, 0))).unwrap();
//!
//! let merged = merge(Some(&defaults), Some(&schema)).unwrap();
//! assert_eq!(merged.minimum(), Some(Decimal::new(0, 0)));
//! assert_eq!(merged.maximum(), Some(Decimal::new(10, 0)));
//! ```

use tracing::debug;

use crate::{ArrayConstraints, Constraints, NumberConstraints, Schema, StringConstraints};

/// Merges `schema` over `defaults`.
///
/// Returns an independent copy of whichever input is present, or `None` if
/// neither is.
pub fn merge(defaults: Option<&Schema>, schema: Option<&Schema>) -> Option<Schema> {
    match (defaults, schema) {
        (Some(defaults), Some(schema)) => Some(defaults.merge(schema)),
        (defaults, schema) => schema.or(defaults).cloned(),
    }
}

impl Schema {
    /// Returns this schema with every property set on `overlay` replaced.
    ///
    /// Defaults for a different type do not apply: in that case the result is
    /// a copy of `overlay`.
    pub fn merge(&self, overlay: &Schema) -> Schema {
        if self.schema_type() != overlay.schema_type() {
            debug!(
                defaults = %self.schema_type(),
                overlay = %overlay.schema_type(),
                "Ignoring defaults for a different schema type"
            );
            return overlay.clone();
        }

        let constraints = match (&self.constraints, &overlay.constraints) {
            (Constraints::Integer(base), Constraints::Integer(over)) => Constraints::Integer(merge_numbers(base, over)),
            (Constraints::Number(base), Constraints::Number(over)) => Constraints::Number(merge_numbers(base, over)),
            (Constraints::String(base), Constraints::String(over)) => Constraints::String(merge_strings(base, over)),
            (Constraints::Array(base), Constraints::Array(over)) => Constraints::Array(merge_arrays(base, over)),
            (_, over) => over.clone(),
        };

        Schema {
            constraints,
            constant: overlay.constant.clone().or_else(|| self.constant.clone()),
            format: overlay.format.clone().or_else(|| self.format.clone()),
        }
    }
}

fn merge_numbers(base: &NumberConstraints, overlay: &NumberConstraints) -> NumberConstraints {
    NumberConstraints {
        minimum: overlay.minimum.or(base.minimum),
        maximum: overlay.maximum.or(base.maximum),
        exclusive_minimum: overlay.exclusive_minimum.or(base.exclusive_minimum),
        exclusive_maximum: overlay.exclusive_maximum.or(base.exclusive_maximum),
        multiple_of: overlay.multiple_of.or(base.multiple_of),
    }
}

fn merge_strings(base: &StringConstraints, overlay: &StringConstraints) -> StringConstraints {
    StringConstraints {
        min_length: overlay.min_length.or(base.min_length),
        max_length: overlay.max_length.or(base.max_length),
        pattern: overlay.pattern.clone().or_else(|| base.pattern.clone()),
    }
}

fn merge_arrays(base: &ArrayConstraints, overlay: &ArrayConstraints) -> ArrayConstraints {
    let items = match (base.items.as_deref(), overlay.items.as_deref()) {
        (Some(base), Some(overlay)) => Some(Box::new(base.merge(overlay))),
        (base, overlay) => overlay.or(base).cloned().map(Box::new),
    };

    ArrayConstraints {
        min_items: overlay.min_items.or(base.min_items),
        max_items: overlay.max_items.or(base.max_items),
        unique_items: overlay.unique_items.or(base.unique_items),
        items,
    }
}
