use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
/// Emission stops early once the observer reports itself closed, so a
/// downstream `take` does not drain an endless iterator.
///
/// ```
/// use rxlite::prelude::*;
///
/// let squares = observable::from_iter(0..).map(|v| v * v).take(4).to_vec();
/// assert_eq!(squares, Ok(vec![0, 1, 4, 9]));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> ObservableIter<Iter>
where
  Iter: IntoIterator,
{
  ObservableIter(iter)
}

#[derive(Clone)]
pub struct ObservableIter<Iter>(Iter);

impl<O, Iter> Observable<Iter::Item, Infallible, O> for ObservableIter<Iter>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    let mut iter = self.0.into_iter();
    while !observer.is_closed() {
      match iter.next() {
        Some(v) => observer.next(v),
        None => return observer.complete(),
      }
    }
  }
}

impl<Iter> ObservableExt<Iter::Item, Infallible> for ObservableIter<Iter> where Iter: IntoIterator {}
