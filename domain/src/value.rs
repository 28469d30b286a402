//! The value domain contract.

use std::collections::BTreeSet;

use rand::Rng;
use valuegen_core::SchemaType;

use crate::error::Result;

/// A set of values that can be tested for membership and sampled.
///
/// Randomness is always supplied by the caller, so a domain behaves
/// deterministically for a given random source.
pub trait ValueDomain {
    type Value;

    /// Returns `true` if `value` belongs to this domain.
    fn contains(&self, value: &Self::Value) -> bool;

    /// Returns one random member of this domain.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyDomain`](crate::DomainError::EmptyDomain)
    /// if no value satisfies every constraint.
    fn select<R: Rng>(&self, rng: &mut R) -> Result<Self::Value>;

    /// Returns the schema types of the values in this domain.
    fn types(&self) -> BTreeSet<SchemaType>;

    /// Returns an endless stream of independently selected members.
    ///
    /// The stream is empty if the domain is.
    fn values<'a, R: Rng>(&'a self, rng: &'a mut R) -> Values<'a, Self, R>
    where
        Self: Sized,
    {
        Values {
            domain: self,
            rng,
            exhausted: false,
        }
    }
}

/// Iterator returned by [`ValueDomain::values`].
pub struct Values<'a, D, R> {
    domain: &'a D,
    rng: &'a mut R,
    exhausted: bool,
}

impl<D, R> Iterator for Values<'_, D, R>
where
    D: ValueDomain,
    R: Rng,
{
    type Item = D::Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let selected = self.domain.select(&mut *self.rng).ok();
        self.exhausted = selected.is_none();
        selected
    }
}
