// Sequence integration - bridging iterators and optional values

use crate::option::Opt;
use std::iter::FusedIterator;

/// Optional element queries over any iterator.
///
/// Every query pulls from the source at most once per element. `first` and
/// `single` stop as soon as the answer is known; `last` must drain the source.
pub trait SeqExt: Iterator + Sized {
    /// First element, or absent for an empty source
    fn first_or_none(mut self) -> Opt<Self::Item> {
        Opt::from_nullable(self.next())
    }

    /// First element satisfying `predicate`
    fn first_or_none_by<P>(self, predicate: P) -> Opt<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.filter(predicate).first_or_none()
    }

    /// Last element, or absent for an empty source
    fn last_or_none(self) -> Opt<Self::Item> {
        self.fold(Opt::Absent, |_, item| Opt::Present(item))
    }

    /// Last element satisfying `predicate`
    fn last_or_none_by<P>(self, predicate: P) -> Opt<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.filter(predicate).last_or_none()
    }

    /// The only element; absent when the source has zero or more than one
    fn single_or_none(mut self) -> Opt<Self::Item> {
        match self.next() {
            Some(item) if self.next().is_none() => Opt::Present(item),
            _ => Opt::Absent,
        }
    }

    /// The only element satisfying `predicate`
    fn single_or_none_by<P>(self, predicate: P) -> Opt<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.filter(predicate).single_or_none()
    }

    /// Lazily yield the payloads of present entries, in order
    fn values<T>(self) -> Values<Self>
    where
        Self: Iterator<Item = Opt<T>>,
    {
        Values { iter: self }
    }

    /// Collect every payload, or nothing at all.
    ///
    /// Stops pulling at the first absent entry, so an unbounded source is
    /// fine as long as it yields one. An empty source collects to an empty
    /// list.
    fn list_all<T>(self) -> Opt<Vec<T>>
    where
        Self: Iterator<Item = Opt<T>>,
    {
        let mut list = Vec::new();
        for option in self {
            match option {
                Opt::Present(v) => list.push(v),
                Opt::Absent => return Opt::Absent,
            }
        }
        Opt::Present(list)
    }
}

impl<I: Iterator> SeqExt for I {}

/// Constant-time queries for indexable sources
pub trait ListExt<T> {
    /// O(1) first element of the slice
    fn first_or_none(&self) -> Opt<&T>;
    /// O(1) last element of the slice
    fn last_or_none(&self) -> Opt<&T>;
    /// The only element, absent unless the slice has exactly one
    fn single_or_none(&self) -> Opt<&T>;
}

impl<T> ListExt<T> for [T] {
    fn first_or_none(&self) -> Opt<&T> {
        Opt::from_nullable(self.first())
    }

    fn last_or_none(&self) -> Opt<&T> {
        Opt::from_nullable(self.last())
    }

    fn single_or_none(&self) -> Opt<&T> {
        match self {
            [only] => Opt::Present(only),
            _ => Opt::Absent,
        }
    }
}

/// Iterator over the payloads of present entries, see [`SeqExt::values`]
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<I> {
    iter: I,
}

impl<I, T> Iterator for Values<I>
where
    I: Iterator<Item = Opt<T>>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if let Opt::Present(v) = self.iter.next()? {
                return Some(v);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.iter.size_hint().1)
    }
}

impl<I, T> DoubleEndedIterator for Values<I>
where
    I: DoubleEndedIterator<Item = Opt<T>>,
{
    fn next_back(&mut self) -> Option<T> {
        loop {
            if let Opt::Present(v) = self.iter.next_back()? {
                return Some(v);
            }
        }
    }
}

impl<I, T> FusedIterator for Values<I> where I: FusedIterator<Item = Opt<T>> {}

pub fn first_or_none<I: IntoIterator>(source: I) -> Opt<I::Item> {
    source.into_iter().first_or_none()
}

pub fn last_or_none<I: IntoIterator>(source: I) -> Opt<I::Item> {
    source.into_iter().last_or_none()
}

pub fn single_or_none<I: IntoIterator>(source: I) -> Opt<I::Item> {
    source.into_iter().single_or_none()
}

pub fn values<I, T>(source: I) -> Values<I::IntoIter>
where
    I: IntoIterator<Item = Opt<T>>,
{
    source.into_iter().values()
}

/// Same as [`values`]
pub fn filter<I, T>(source: I) -> Values<I::IntoIter>
where
    I: IntoIterator<Item = Opt<T>>,
{
    values(source)
}

pub fn list_all<I, T>(source: I) -> Opt<Vec<T>>
where
    I: IntoIterator<Item = Opt<T>>,
{
    source.into_iter().list_all()
}
