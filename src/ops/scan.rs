use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  ops::fail,
  subscription::SubscriptionSlot,
  type_hint::TypeHint,
};

pub struct ScanOp<S, F, Acc, Item> {
  source: S,
  func: F,
  seed: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> ScanOp<S, F, Acc, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: F, seed: Acc) -> Self {
    ScanOp { source, func, seed, _hint: TypeHint::new() }
  }
}

impl<S: Clone, F: Clone, Acc: Clone, Item> Clone for ScanOp<S, F, Acc, Item> {
  fn clone(&self) -> Self { ScanOp::new(self.source.clone(), self.func.clone(), self.seed.clone()) }
}

impl<Item, Acc, Err, O, S, F> Observable<Acc, Err, O> for ScanOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, ScanObserver<O, F, Acc>>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(ScanObserver { observer, func: self.func, acc: Some(self.seed) })
  }
}

impl<Item, Acc, Err, S, F> ObservableExt<Acc, Err> for ScanOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
}

/// `acc` is only `None` while the accumulator runs.
pub struct ScanObserver<O, F, Acc> {
  observer: O,
  func: F,
  acc: Option<Acc>,
}

impl<Item, Acc, Err, O, F> Observer<Item, Err> for ScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      let acc = (self.func)(acc, value);
      self.acc = Some(acc.clone());
      self.observer.next(acc);
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct TryScanOp<S, F, Acc, Item> {
  source: S,
  func: F,
  seed: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> TryScanOp<S, F, Acc, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: F, seed: Acc) -> Self {
    TryScanOp { source, func, seed, _hint: TypeHint::new() }
  }
}

impl<S: Clone, F: Clone, Acc: Clone, Item> Clone for TryScanOp<S, F, Acc, Item> {
  fn clone(&self) -> Self { TryScanOp::new(self.source.clone(), self.func.clone(), self.seed.clone()) }
}

impl<Item, Acc, Err, O, S, F> Observable<Acc, Err, O> for TryScanOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, TryScanObserver<O, F, Acc>>,
  S::Unsub: 'static,
  F: FnMut(Acc, Item) -> Result<Acc, Err>,
  Acc: Clone,
{
  type Unsub = SubscriptionSlot;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SubscriptionSlot::new();
    let unsub = self.source.actual_subscribe(TryScanObserver {
      observer: Some(observer),
      func: self.func,
      acc: Some(self.seed),
      upstream: upstream.clone(),
    });
    upstream.set(unsub);
    upstream
  }
}

impl<Item, Acc, Err, S, F> ObservableExt<Acc, Err> for TryScanOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Result<Acc, Err>,
{
}

pub struct TryScanObserver<O, F, Acc> {
  observer: Option<O>,
  func: F,
  acc: Option<Acc>,
  upstream: SubscriptionSlot,
}

impl<Item, Acc, Err, O, F> Observer<Item, Err> for TryScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Result<Acc, Err>,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    let Some(acc) = self.acc.take() else {
      return;
    };
    match (self.func)(acc, value) {
      Ok(acc) => {
        self.acc = Some(acc.clone());
        if let Some(observer) = self.observer.as_mut() {
          observer.next(acc);
        }
      }
      Err(err) => fail::<_, Acc, _>(&mut self.observer, &self.upstream, err),
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
  fn running_sum() {
    let got = observable::from_iter([1, 2, 3, 4]).scan(0, |acc, v| acc + v).to_vec();
    assert_eq!(got, Ok(vec![1, 3, 6, 10]));
  }

  #[rxlite_macro::test]
  fn seed_is_not_emitted() {
    let mut emitted = vec![];
    observable::empty::<i32>().scan(100, |acc, v| acc + v).subscribe(|v| emitted.push(v));
    assert!(emitted.is_empty());
  }

  #[rxlite_macro::test]
  fn scan_with_differently_typed_accumulator() {
    let got = observable::from_iter(["a", "bb", "ccc"])
      .scan(String::new(), |mut acc, v| {
        acc.push_str(v);
        acc
      })
      .to_vec();
    assert_eq!(got, Ok(vec!["a".to_owned(), "abb".to_owned(), "abbccc".to_owned()]));
  }

  #[rxlite_macro::test]
  fn try_scan_overflow_errors() {
    let mut values = vec![];
    let mut error = None;
    observable::from_iter([100u8, 100, 100, 1])
      .with_err::<&str>()
      .try_scan(0u8, |acc, v| acc.checked_add(v).ok_or("overflow"))
      .subscribe_err(|v| values.push(v), |e| error = Some(e));
    assert_eq!(values, vec![100, 200]);
    assert_eq!(error, Some("overflow"));
  }
}
