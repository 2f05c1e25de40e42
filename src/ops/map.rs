use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  ops::fail,
  subscription::SubscriptionSlot,
  type_hint::TypeHint,
};

pub struct MapOp<S, F, Item> {
  source: S,
  func: F,
  _hint: TypeHint<Item>,
}

impl<S, F, Item> MapOp<S, F, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self { MapOp { source, func, _hint: TypeHint::new() } }
}

impl<S: Clone, F: Clone, Item> Clone for MapOp<S, F, Item> {
  fn clone(&self) -> Self { MapOp::new(self.source.clone(), self.func.clone()) }
}

impl<Item, B, Err, O, S, F> Observable<B, Err, O> for MapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapObserver<O, F>>,
  F: FnMut(Item) -> B,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(MapObserver { observer, func: self.func })
  }
}

impl<Item, B, Err, S, F> ObservableExt<B, Err> for MapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> B,
{
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F, B> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

pub struct TryMapOp<S, F, Item> {
  source: S,
  func: F,
  _hint: TypeHint<Item>,
}

impl<S, F, Item> TryMapOp<S, F, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self { TryMapOp { source, func, _hint: TypeHint::new() } }
}

impl<S: Clone, F: Clone, Item> Clone for TryMapOp<S, F, Item> {
  fn clone(&self) -> Self { TryMapOp::new(self.source.clone(), self.func.clone()) }
}

impl<Item, B, Err, O, S, F> Observable<B, Err, O> for TryMapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, TryMapObserver<O, F>>,
  S::Unsub: 'static,
  F: FnMut(Item) -> Result<B, Err>,
{
  type Unsub = SubscriptionSlot;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SubscriptionSlot::new();
    let unsub = self.source.actual_subscribe(TryMapObserver {
      observer: Some(observer),
      func: self.func,
      upstream: upstream.clone(),
    });
    upstream.set(unsub);
    upstream
  }
}

impl<Item, B, Err, S, F> ObservableExt<B, Err> for TryMapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
}

pub struct TryMapObserver<O, F> {
  observer: Option<O>,
  func: F,
  upstream: SubscriptionSlot,
}

impl<Item, Err, O, F, B> Observer<Item, Err> for TryMapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Result<B, Err>,
{
  fn next(&mut self, value: Item) {
    if self.observer.is_none() {
      return;
    }
    match (self.func)(value) {
      Ok(v) => {
        if let Some(observer) = self.observer.as_mut() {
          observer.next(v)
        }
      }
      Err(err) => fail::<_, B, _>(&mut self.observer, &self.upstream, err),
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn primitive_type() {
    let mut i = 0;
    observable::from_iter(100..101).map(|v| v * 2).subscribe(|v| i += v);
    assert_eq!(i, 200);
  }

  #[rxlite_macro::test]
  fn map_of_single_value() {
    let mut i = 0;
    observable::of(100).map(|v| v).subscribe(|v| i += v);
    assert_eq!(i, 100);
  }

  #[rxlite_macro::test]
  fn matches_iterator_map() {
    let input = vec![3, 1, 4, 1, 5, 9, 2, 6];
    let expected: Vec<_> = input.iter().map(|v| v * v + 1).collect();
    let got = observable::from_iter(input).map(|v| v * v + 1).to_vec();
    assert_eq!(got, Ok(expected));
  }

  #[rxlite_macro::test]
  fn map_types_mixed() {
    let mut i = 0;
    observable::from_iter(vec!['a', 'b', 'c']).map(|_| 1).subscribe(|v| i += v);
    assert_eq!(i, 3);
  }

  #[rxlite_macro::test]
  fn try_map_error_stops_source() {
    let emitter = EventEmitter::<i32>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let (c_next, c_err) = (log.clone(), log.clone());
    observable::from_event(emitter.clone())
      .with_err::<String>()
      .try_map(|v| if v >= 0 { Ok(v * 2) } else { Err(format!("negative {v}")) })
      .subscribe_err(
        move |v| c_next.borrow_mut().push(v.to_string()),
        move |e| c_err.borrow_mut().push(e),
      );

    emitter.emit(1);
    emitter.emit(-3);
    emitter.emit(4);

    assert_eq!(*log.borrow(), vec!["2", "negative -3"]);
    assert_eq!(emitter.listener_count(), 0);
  }
}
