use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  type_hint::TypeHint,
};

/// Folds with the first value as the seed; see
/// [`ObservableExt::reduce`](crate::observable::ObservableExt::reduce).
#[derive(Clone)]
pub struct ReduceOp<S, F> {
  source: S,
  func: F,
}

impl<S, F> ReduceOp<S, F> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self { ReduceOp { source, func } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for ReduceOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, ReduceObserver<O, F, Item>>,
  F: FnMut(Item, Item) -> Item,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(ReduceObserver { observer, func: self.func, acc: None })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for ReduceOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item, Item) -> Item,
{
}

pub struct ReduceObserver<O, F, Acc> {
  observer: O,
  func: F,
  acc: Option<Acc>,
}

impl<Item, Err, O, F> Observer<Item, Err> for ReduceObserver<O, F, Item>
where
  O: Observer<Item, Err>,
  F: FnMut(Item, Item) -> Item,
{
  fn next(&mut self, value: Item) {
    let acc = match self.acc.take() {
      Some(acc) => (self.func)(acc, value),
      None => value,
    };
    self.acc = Some(acc);
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete()
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Folds from an explicit seed; see
/// [`ObservableExt::reduce_initial`](crate::observable::ObservableExt::reduce_initial).
pub struct ReduceInitialOp<S, F, Acc, Item> {
  source: S,
  func: F,
  seed: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> ReduceInitialOp<S, F, Acc, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: F, seed: Acc) -> Self {
    ReduceInitialOp { source, func, seed, _hint: TypeHint::new() }
  }
}

impl<S: Clone, F: Clone, Acc: Clone, Item> Clone for ReduceInitialOp<S, F, Acc, Item> {
  fn clone(&self) -> Self { ReduceInitialOp::new(self.source.clone(), self.func.clone(), self.seed.clone()) }
}

impl<Item, Acc, Err, O, S, F> Observable<Acc, Err, O> for ReduceInitialOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, ReduceInitialObserver<O, F, Acc>>,
  F: FnMut(Acc, Item) -> Acc,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(ReduceInitialObserver { observer, func: self.func, acc: Some(self.seed) })
  }
}

impl<Item, Acc, Err, S, F> ObservableExt<Acc, Err> for ReduceInitialOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
}

pub struct ReduceInitialObserver<O, F, Acc> {
  observer: O,
  func: F,
  acc: Option<Acc>,
}

impl<Item, Acc, Err, O, F> Observer<Item, Err> for ReduceInitialObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.func)(acc, value));
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete()
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
