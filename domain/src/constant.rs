//! Single-value domains.

use std::collections::BTreeSet;

use rand::Rng;
use valuegen_core::SchemaType;

use crate::error::Result;
use crate::value::ValueDomain;

/// A domain holding exactly one value.
///
/// [`values`](ValueDomain::values) repeats the value on every draw, like any
/// other domain, rather than ending after one item.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use valuegen_core::SchemaType;
/// use valuegen_domain::{ConstantDomain, ValueDomain};
///
/// let domain = ConstantDomain::new(-99i64, SchemaType::Integer);
/// let mut rng = SmallRng::seed_from_u64(42);
///
/// assert_eq!(domain.select(&mut rng).unwrap(), -99);
/// assert!(domain.contains(&-99));
/// assert!(!domain.contains(&99));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDomain<T> {
    value: T,
    value_type: SchemaType,
}

impl<T: Clone + PartialEq> ConstantDomain<T> {
    pub fn new(value: T, value_type: SchemaType) -> Self {
        Self { value, value_type }
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + PartialEq> ValueDomain for ConstantDomain<T> {
    type Value = T;

    fn contains(&self, value: &T) -> bool {
        *value == self.value
    }

    fn select<R: Rng>(&self, _rng: &mut R) -> Result<T> {
        Ok(self.value.clone())
    }

    fn types(&self) -> BTreeSet<SchemaType> {
        BTreeSet::from([self.value_type])
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_values_repeat_the_constant() {
        let domain = ConstantDomain::new("x".to_string(), SchemaType::String);
        let mut rng = SmallRng::seed_from_u64(42);

        let values: Vec<String> = domain.values(&mut rng).take(3).collect();
        assert_eq!(values, vec!["x", "x", "x"]);
        assert_eq!(domain.types(), BTreeSet::from([SchemaType::String]));
    }
}
