// Query layer - combinators built on the option core

use crate::error::OptionError;
use crate::option::Opt;
use std::any::{type_name, Any};
use std::iter::FusedIterator;

/// Query-style combinators
impl<T> Opt<T> {
    /// Alias of [`Opt::map`]
    pub fn select<U, F>(self, selector: F) -> Opt<U>
    where
        F: FnOnce(T) -> U,
    {
        self.map(selector)
    }

    /// Alias of [`Opt::filter`]
    pub fn r#where<P>(self, predicate: P) -> Opt<T>
    where
        P: FnOnce(&T) -> bool,
    {
        self.filter(predicate)
    }

    /// Alias of [`Opt::bind`]
    pub fn select_many<U, F>(self, selector: F) -> Opt<U>
    where
        F: FnOnce(T) -> Opt<U>,
    {
        self.bind(selector)
    }

    /// Bind to a second option, then combine both payloads.
    ///
    /// `selector` sees the first payload by reference so that `combine` can
    /// still take ownership of it.
    pub fn select_many_with<U, R, F, C>(self, selector: F, combine: C) -> Opt<R>
    where
        F: FnOnce(&T) -> Opt<U>,
        C: FnOnce(T, U) -> R,
    {
        self.bind(|x| {
            let second = selector(&x);
            second.map(|y| combine(x, y))
        })
    }

    /// Narrow the payload through `TryFrom`. Absence passes through untouched.
    pub fn cast<U>(self) -> Result<Opt<U>, OptionError>
    where
        T: TryInto<U>,
    {
        match self {
            Opt::Present(v) => v.try_into().map(Opt::Present).map_err(|_| {
                OptionError::InvalidCast {
                    from: type_name::<T>(),
                    to: type_name::<U>(),
                }
            }),
            Opt::Absent => Ok(Opt::Absent),
        }
    }

    /// Universal quantification: vacuously true when absent
    pub fn all<P>(&self, predicate: P) -> bool
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Opt::Present(v) => predicate(v),
            Opt::Absent => true,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.match_with(|v| vec![v], Vec::new)
    }

    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.into_vec().into_boxed_slice()
    }

    pub fn iter(&self) -> IntoIter<&T> {
        self.as_ref().into_iter()
    }
}

impl Opt<Box<dyn Any>> {
    /// Narrow a dynamically typed payload to `U`
    pub fn downcast<U: Any>(self) -> Result<Opt<U>, OptionError> {
        match self {
            Opt::Present(v) => v
                .downcast::<U>()
                .map(|b| Opt::Present(*b))
                .map_err(|_| OptionError::InvalidCast {
                    from: "dyn Any",
                    to: type_name::<U>(),
                }),
            Opt::Absent => Ok(Opt::Absent),
        }
    }
}

/// Zero or one element iterator over an option's payload
#[derive(Debug, Clone)]
pub struct IntoIter<T> {
    inner: Opt<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        std::mem::take(&mut self.inner).into_nullable()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.inner.count();
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.next()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> IntoIterator for Opt<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { inner: self }
    }
}

impl<'a, T> IntoIterator for &'a Opt<T> {
    type Item = &'a T;
    type IntoIter = IntoIter<&'a T>;

    fn into_iter(self) -> IntoIter<&'a T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::option::{none, some, Opt};

    #[test]
    fn chained_select_many_combines_both_payloads() {
        let parse = |s: &&str| Opt::from_nullable(s.parse::<i32>().ok());
        let sum = some("20")
            .select_many_with(parse, |s, n| format!("{}+1={}", s, n + 1));
        assert_eq!(sum, some("20+1=21".to_string()));

        let missing = some("x").select_many_with(parse, |_, n| n);
        assert_eq!(missing, none());
    }

    #[test]
    fn iteration_yields_at_most_one_element() {
        assert_eq!(some(7).into_iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(none::<i32>().iter().count(), 0);
        assert_eq!(some(7).into_boxed_slice().len(), 1);
    }
}
