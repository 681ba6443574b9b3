//! Explicit optional values and the combinators to use them.
//!
//! [`Opt`] is a two-variant sum type (`Absent` / `Present(T)`) with the usual
//! vocabulary of map, bind, filter, match and fold-to-default. The [`seq`]
//! module bridges ordinary iterators and options: first/last/single "or
//! none" queries, and filtering or collecting sequences of options.
//!
//! ```
//! use optuple_core::{some, none, Opt, SeqExt};
//!
//! let port = some("8080").bind(|s| Opt::from_nullable(s.parse::<u16>().ok()));
//! assert_eq!(port.or(80), 8080);
//!
//! let found = [3, 8, 12].into_iter().first_or_none_by(|n| n % 4 == 0);
//! assert_eq!(found, some(8));
//!
//! let all = vec![some(1), none(), some(3)].into_iter().list_all();
//! assert!(all.is_none());
//! ```

pub mod error;
pub mod option;
pub mod pattern;
pub mod query;
pub mod seq;

pub use error::OptionError;
pub use option::{none, some, Case, Opt};
pub use seq::{ListExt, SeqExt, Values};
