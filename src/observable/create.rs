use std::rc::Rc;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver, Sink},
  subscription::Subscription,
  type_hint::TypeHint,
};

/// Creates an observable from a producer function.
///
/// The producer runs once per subscription. It receives an [`Emitter`] and
/// returns the teardown to run when the subscription ends: a
/// [`ClosureSubscription`](crate::subscription::ClosureSubscription), `()`
/// when there is nothing to release, or any other subscription.
///
/// ```
/// use rxlite::prelude::*;
/// use std::{cell::RefCell, rc::Rc};
///
/// let got = Rc::new(RefCell::new(vec![]));
/// let c_got = got.clone();
/// observable::create(|e: Emitter<i32, ()>| {
///   e.next(1);
///   e.next(2);
///   e.complete();
/// })
/// .subscribe(move |v| c_got.borrow_mut().push(v));
/// assert_eq!(*got.borrow(), vec![1, 2]);
/// ```
///
/// The teardown runs exactly once: when the consumer unsubscribes, after a
/// terminal notification, or right away if the producer terminated before
/// returning it. Anything the producer emits after that is dropped.
pub fn create<F, U, Item, Err>(producer: F) -> Create<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> U,
  U: Subscription,
{
  Create { producer, _hint: TypeHint::new() }
}

pub struct Create<F, Item, Err> {
  producer: F,
  _hint: TypeHint<(Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for Create<F, Item, Err> {
  fn clone(&self) -> Self { Create { producer: self.producer.clone(), _hint: TypeHint::new() } }
}

impl<F, U, Item, Err, O> Observable<Item, Err, O> for Create<F, Item, Err>
where
  O: Observer<Item, Err> + 'static,
  F: FnOnce(Emitter<Item, Err>) -> U,
  U: Subscription + 'static,
  Item: 'static,
  Err: 'static,
{
  type Unsub = SharedObserver<O, Item, Err>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let shared = SharedObserver::new(observer);
    let teardown = (self.producer)(Emitter(Rc::new(shared.clone())));
    shared.set_teardown(teardown);
    shared
  }
}

impl<F, U, Item, Err> ObservableExt<Item, Err> for Create<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> U,
  U: Subscription,
{
}

/// The producer side of a [`create`] subscription. Clones feed the same
/// subscriber.
pub struct Emitter<Item, Err>(Rc<dyn Sink<Item, Err>>);

impl<Item, Err> Clone for Emitter<Item, Err> {
  fn clone(&self) -> Self { Emitter(self.0.clone()) }
}

impl<Item, Err> Emitter<Item, Err> {
  #[inline]
  pub fn next(&self, value: Item) { self.0.sink_next(value) }

  #[inline]
  pub fn error(&self, err: Err) { self.0.sink_error(err) }

  #[inline]
  pub fn complete(&self) { self.0.sink_complete() }

  /// `true` once the subscriber terminated or unsubscribed; long-running
  /// producers can poll it to stop early.
  #[inline]
  pub fn is_closed(&self) -> bool { self.0.sink_is_closed() }
}
