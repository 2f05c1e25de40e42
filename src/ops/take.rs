use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscription::{Subscription, SubscriptionSlot},
};

#[derive(Clone)]
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  #[inline]
  pub(crate) fn new(source: S, count: usize) -> Self { TakeOp { source, count } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for TakeOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeObserver<O>>,
  S::Unsub: 'static,
{
  type Unsub = SubscriptionSlot;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let upstream = SubscriptionSlot::new();
    if self.count == 0 {
      observer.complete();
      upstream.clone().unsubscribe();
      return upstream;
    }
    let unsub = self.source.actual_subscribe(TakeObserver {
      observer: Some(observer),
      remaining: self.count,
      upstream: upstream.clone(),
    });
    upstream.set(unsub);
    upstream
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for TakeOp<S> where S: ObservableExt<Item, Err> {}

pub struct TakeObserver<O> {
  observer: Option<O>,
  remaining: usize,
  upstream: SubscriptionSlot,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    let Some(observer) = self.observer.as_mut() else {
      return;
    };
    self.remaining -= 1;
    observer.next(value);
    if self.remaining == 0 {
      if let Some(observer) = self.observer.take() {
        observer.complete();
      }
      self.upstream.clone().unsubscribe();
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.observer) }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn base_function() {
    let mut completed = false;
    let mut next_count = 0;

    observable::from_iter(0..100)
      .take(5)
      .subscribe_complete(|_| next_count += 1, || completed = true);

    assert!(completed);
    assert_eq!(next_count, 5);
  }

  #[rxlite_macro::test]
  fn fewer_values_than_count() {
    let got = observable::from_iter(0..3).take(10).to_vec();
    assert_eq!(got, Ok(vec![0, 1, 2]));
  }

  #[rxlite_macro::test]
  fn take_zero_never_subscribes() {
    let producer_runs = Rc::new(Cell::new(0));
    let c_runs = producer_runs.clone();
    let completed = Rc::new(Cell::new(false));
    let c_completed = completed.clone();
    observable::create(move |e: Emitter<i32, ()>| {
      c_runs.set(c_runs.get() + 1);
      e.next(1);
    })
    .take(0)
    .subscribe_complete(|_| {}, move || c_completed.set(true));
    assert!(completed.get());
    assert_eq!(producer_runs.get(), 0);
  }

  #[rxlite_macro::test]
  fn take_cancels_async_source() {
    let emitter = EventEmitter::<i32>::new();
    let values = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(Cell::new(0));
    let (c_values, c_completed) = (values.clone(), completed.clone());
    let sub = observable::from_event(emitter.clone())
      .take(2)
      .subscribe_complete(move |v| c_values.borrow_mut().push(v), move || c_completed.set(c_completed.get() + 1));

    emitter.emit(1);
    assert_eq!(emitter.listener_count(), 1);
    emitter.emit(2);
    assert_eq!(emitter.listener_count(), 0);
    emitter.emit(3);
    sub.unsubscribe();

    assert_eq!(*values.borrow(), vec![1, 2]);
    assert_eq!(completed.get(), 1);
  }
}
