use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  ops::fail,
  subscription::SubscriptionSlot,
};

#[derive(Clone)]
pub struct FilterOp<S, F> {
  source: S,
  filter: F,
}

impl<S, F> FilterOp<S, F> {
  #[inline]
  pub(crate) fn new(source: S, filter: F) -> Self { FilterOp { source, filter } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for FilterOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, FilterObserver<O, F>>,
  F: FnMut(&Item) -> bool,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(FilterObserver { observer, filter: self.filter })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for FilterOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> bool,
{
}

pub struct FilterObserver<O, F> {
  observer: O,
  filter: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.filter)(&value) {
      self.observer.next(value)
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[derive(Clone)]
pub struct TryFilterOp<S, F> {
  source: S,
  filter: F,
}

impl<S, F> TryFilterOp<S, F> {
  #[inline]
  pub(crate) fn new(source: S, filter: F) -> Self { TryFilterOp { source, filter } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for TryFilterOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TryFilterObserver<O, F>>,
  S::Unsub: 'static,
  F: FnMut(&Item) -> Result<bool, Err>,
{
  type Unsub = SubscriptionSlot;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SubscriptionSlot::new();
    let unsub = self.source.actual_subscribe(TryFilterObserver {
      observer: Some(observer),
      filter: self.filter,
      upstream: upstream.clone(),
    });
    upstream.set(unsub);
    upstream
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for TryFilterOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item) -> Result<bool, Err>,
{
}

pub struct TryFilterObserver<O, F> {
  observer: Option<O>,
  filter: F,
  upstream: SubscriptionSlot,
}

impl<Item, Err, O, F> Observer<Item, Err> for TryFilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> Result<bool, Err>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.filter)(&value) {
      Ok(true) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(value)
        }
      }
      Ok(false) => {}
      Err(err) => fail::<_, Item, _>(&mut self.observer, &self.upstream, err),
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[rxlite_macro::test]
  fn fork_and_shared() {
    let filtered = observable::from_iter(0..10).filter(|v| v % 2 == 0);
    let mut evens = vec![];
    filtered.clone().subscribe(|v| evens.push(v));
    assert_eq!(evens, vec![0, 2, 4, 6, 8]);
    assert_eq!(filtered.to_vec(), Ok(vec![0, 2, 4, 6, 8]));
  }

  #[rxlite_macro::test]
  fn matches_iterator_filter() {
    let input: Vec<i32> = (0..50).map(|v| (v * 37) % 11).collect();
    let expected: Vec<_> = input.iter().copied().filter(|v| v % 3 != 0).collect();
    assert_eq!(observable::from_iter(input).filter(|v| v % 3 != 0).to_vec(), Ok(expected));
  }

  #[rxlite_macro::test]
  fn try_filter_error() {
    let mut values = vec![];
    let mut errors = vec![];
    let mut completed = false;
    observable::from_iter(0..10)
      .with_err::<i32>()
      .try_filter(|v| if *v < 5 { Ok(v % 2 == 1) } else { Err(*v) })
      .subscribe_all(|v| values.push(v), |e| errors.push(e), || completed = true);
    assert_eq!(values, vec![1, 3]);
    assert_eq!(errors, vec![5]);
    assert!(!completed);
  }
}
