// Option core - the optional value and its primitives

use crate::error::OptionError;
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::cmp::Ordering;

/// Zero or one value of type `T`, explicitly tagged.
///
/// Variant order matters: `Absent` sorts before every `Present(_)`, and two
/// present values compare by their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Opt<T> {
    Absent,
    Present(T),
}

/// Enumerated view of the presence tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    None,
    Some,
}

/// Construct a present value
pub fn some<T>(value: T) -> Opt<T> {
    Opt::Present(value)
}

/// Construct an absent value
pub fn none<T>() -> Opt<T> {
    Opt::Absent
}

impl<T> Default for Opt<T> {
    fn default() -> Self {
        Opt::Absent
    }
}

/// Construction and inspection
impl<T> Opt<T> {
    pub fn some(value: T) -> Self {
        Opt::Present(value)
    }

    pub fn none() -> Self {
        Opt::Absent
    }

    /// Adapt a success flag and payload, as produced by try-style APIs.
    /// The payload is dropped when `flag` is false.
    pub fn from_flag(flag: bool, value: T) -> Self {
        if flag {
            Opt::Present(value)
        } else {
            Opt::Absent
        }
    }

    /// Same as [`Opt::from_flag`], taking the pair as a tuple
    pub fn from_flagged((flag, value): (bool, T)) -> Self {
        Opt::from_flag(flag, value)
    }

    /// Present if `value` carries something, absent otherwise.
    ///
    /// A payload type that is itself nullable stays distinguishable:
    /// `Opt::some(None::<u8>)` is present, `Opt::from_nullable(None::<u8>)` is not.
    pub fn from_nullable(value: Option<T>) -> Self {
        match value {
            Some(v) => Opt::Present(v),
            None => Opt::Absent,
        }
    }

    /// Present iff `predicate` holds on `value`
    pub fn some_when<P>(value: T, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        if predicate(&value) {
            Opt::Present(value)
        } else {
            Opt::Absent
        }
    }

    /// Absent iff `predicate` holds on `value`
    pub fn none_when<P>(value: T, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        Opt::some_when(value, |v| !predicate(v))
    }

    pub fn is_some(&self) -> bool {
        matches!(self, Opt::Present(_))
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn case(&self) -> Case {
        match self {
            Opt::Present(_) => Case::Some,
            Opt::Absent => Case::None,
        }
    }

    pub fn as_ref(&self) -> Opt<&T> {
        match self {
            Opt::Present(v) => Opt::Present(v),
            Opt::Absent => Opt::Absent,
        }
    }

    /// 1 if present, 0 if absent
    pub fn count(&self) -> usize {
        match self {
            Opt::Present(_) => 1,
            Opt::Absent => 0,
        }
    }
}

/// Transformation and extraction
impl<T> Opt<T> {
    /// Run exactly one of `some` or `none` and return its result
    pub fn match_with<R, S, N>(self, some: S, none: N) -> R
    where
        S: FnOnce(T) -> R,
        N: FnOnce() -> R,
    {
        match self {
            Opt::Present(v) => some(v),
            Opt::Absent => none(),
        }
    }

    /// Run `action` on the payload; does nothing when absent
    pub fn if_some<F>(self, action: F)
    where
        F: FnOnce(T),
    {
        self.match_with(action, || {})
    }

    /// Monadic composition. `f` is never called on an absent value.
    pub fn bind<U, F>(self, f: F) -> Opt<U>
    where
        F: FnOnce(T) -> Opt<U>,
    {
        match self {
            Opt::Present(v) => f(v),
            Opt::Absent => Opt::Absent,
        }
    }

    pub fn map<U, F>(self, f: F) -> Opt<U>
    where
        F: FnOnce(T) -> U,
    {
        self.bind(|v| Opt::Present(f(v)))
    }

    /// Keep the payload only if `predicate` holds on it
    pub fn filter<P>(self, predicate: P) -> Opt<T>
    where
        P: FnOnce(&T) -> bool,
    {
        self.bind(|v| Opt::some_when(v, predicate))
    }

    /// True iff present and `predicate` holds on the payload
    pub fn exists<P>(&self, predicate: P) -> bool
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Opt::Present(v) => predicate(v),
            Opt::Absent => false,
        }
    }

    /// Extract the payload.
    ///
    /// Extracting from an absent value is a programming error and is
    /// reported as [`OptionError::InvalidState`].
    pub fn get(self) -> Result<T, OptionError> {
        match self {
            Opt::Present(v) => Ok(v),
            Opt::Absent => Err(OptionError::InvalidState(format!(
                "no value present in Opt<{}>",
                type_name::<T>()
            ))),
        }
    }

    pub fn or(self, fallback: T) -> T {
        match self {
            Opt::Present(v) => v,
            Opt::Absent => fallback,
        }
    }

    pub fn or_default(self) -> T
    where
        T: Default,
    {
        self.or(T::default())
    }

    pub fn into_nullable(self) -> Option<T> {
        match self {
            Opt::Present(v) => Some(v),
            Opt::Absent => None,
        }
    }

    /// The (present, value) pair used by try-style APIs. An absent value
    /// yields `(false, T::default())`.
    pub fn flagged(self) -> (bool, T)
    where
        T: Default,
    {
        match self {
            Opt::Present(v) => (true, v),
            Opt::Absent => (false, T::default()),
        }
    }
}

impl<T: PartialOrd> Opt<T> {
    /// Compare with a payload type that may lack a total order.
    ///
    /// Comparisons involving an absent side always succeed; two present
    /// payloads that do not compare (e.g. `f64::NAN`) are an error.
    pub fn try_cmp(&self, other: &Opt<T>) -> Result<Ordering, OptionError> {
        match (self, other) {
            (Opt::Absent, Opt::Absent) => Ok(Ordering::Equal),
            (Opt::Absent, Opt::Present(_)) => Ok(Ordering::Less),
            (Opt::Present(_), Opt::Absent) => Ok(Ordering::Greater),
            (Opt::Present(a), Opt::Present(b)) => a.partial_cmp(b).ok_or_else(unordered::<T>),
        }
    }
}

fn unordered<T>() -> OptionError {
    OptionError::ComparisonNotSupported {
        type_name: type_name::<T>(),
    }
}

impl<T> From<Option<T>> for Opt<T> {
    fn from(value: Option<T>) -> Self {
        Opt::from_nullable(value)
    }
}

impl<T> From<Opt<T>> for Option<T> {
    fn from(value: Opt<T>) -> Self {
        value.into_nullable()
    }
}

impl<T> From<(bool, T)> for Opt<T> {
    fn from(pair: (bool, T)) -> Self {
        Opt::from_flagged(pair)
    }
}
