// Test utilities and generators for optuple property-based testing

#![allow(dead_code)]

use optuple_core::Opt;
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

/// Generate an option around values from `inner`, absent roughly a third of the time
pub fn arb_opt<S>(inner: S) -> impl Strategy<Value = Opt<S::Value>>
where
    S: Strategy,
    S::Value: Clone,
{
    prop_oneof![
        1 => Just(Opt::Absent),
        2 => inner.prop_map(Opt::Present),
    ]
}

/// Generate an integer option
pub fn arb_opt_int() -> impl Strategy<Value = Opt<i64>> {
    arb_opt(any::<i64>())
}

/// Generate a reasonable-sized sequence of integer options
pub fn arb_opt_seq() -> impl Strategy<Value = Vec<Opt<i64>>> {
    prop::collection::vec(arb_opt_int(), 0..20)
}

/// Generate a sequence of integer options that are all present
pub fn arb_present_seq() -> impl Strategy<Value = Vec<Opt<i64>>> {
    prop::collection::vec(any::<i64>().prop_map(Opt::Present), 0..20)
}

/// A value that must never be evaluated
pub fn breaking<T>() -> T {
    panic!("element was evaluated but should not have been")
}

/// Lazily evaluate each function as the sequence is pulled
pub fn from_fns<T, const N: usize>(fns: [fn() -> T; N]) -> impl Iterator<Item = T> {
    fns.into_iter().map(|f| f())
}

/// Iterator wrapper that counts how many elements were pulled
pub struct Counted<I> {
    inner: I,
    pulls: Rc<Cell<usize>>,
}

impl<I> Counted<I> {
    pub fn new(inner: I) -> (Self, Rc<Cell<usize>>) {
        let pulls = Rc::new(Cell::new(0));
        (
            Counted {
                inner,
                pulls: Rc::clone(&pulls),
            },
            pulls,
        )
    }
}

impl<I: Iterator> Iterator for Counted<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.pulls.set(self.pulls.get() + 1);
        }
        item
    }
}
