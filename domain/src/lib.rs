//! Value domains for schema-driven test-data generation.
//!
//! A [`ValueDomain`] is a set of values that can be tested for membership and
//! sampled with a caller-supplied random source:
//!
//! - [`NumberDomain`] holds the numbers between exclusive bounds that satisfy
//!   multiple-of and not-multiple-of factors, for integers (`i64`) and
//!   decimals ([`Decimal`](rust_decimal::Decimal)).
//! - [`ConstantDomain`] holds a single value.
//! - [`Range`] parses the textual range notation (`Other`, `< 10`, `> 100`,
//!   `42`) used to configure a number domain.
//!
//! [`numeric_domain`] builds the domain of a normalized numeric
//! [`Schema`](valuegen_core::Schema), as limited by a [`GeneratorConfig`].
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use valuegen_domain::*;
//!
//! let mut domain = NumberDomain::<i64>::new(1_000);
//! domain.set_range(Some(3), Some(21)).unwrap();
//! domain.set_multiple_of(Some(3));
//! domain.set_not_multiple_ofs([5, 2]);
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! assert_eq!(domain.select(&mut rng).unwrap(), 9);
//!
//! domain.set_range(Some(12), Some(21)).unwrap();
//! assert!(matches!(domain.select(&mut rng), Err(DomainError::EmptyDomain(_))));
//! ```

mod config;
mod constant;
mod error;
mod lower;
mod number;
mod range;
mod value;

pub use config::GeneratorConfig;
pub use constant::ConstantDomain;
pub use error::{DomainError, Result};
pub use lower::{NumericDomain, decimal_domain, integer_domain, numeric_domain};
pub use number::{DomainNumber, NumberDomain};
pub use range::Range;
pub use value::{ValueDomain, Values};
