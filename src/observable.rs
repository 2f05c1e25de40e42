//! The `Observable` trait, the operator methods and the factory functions.
//!
//! An observable is an immutable description of a push sequence. Nothing
//! happens until it is subscribed; every subscription builds its own state,
//! so a pipeline whose parts are `Clone` can be cloned and subscribed again.

use std::convert::Infallible;

use crate::{
  error::CollectError,
  observer::{drop_error, noop, FnObserver, Observer, SharedObserver},
  ops::{
    distinct_until_changed::DistinctUntilChangedOp,
    filter::{FilterOp, TryFilterOp},
    map::{MapOp, TryMapOp},
    map_err::MapErrOp,
    merge_all::MergeAllOp,
    on_complete::OnCompleteOp,
    on_error::OnErrorOp,
    reduce::{ReduceInitialOp, ReduceOp},
    scan::{ScanOp, TryScanOp},
    take::TakeOp,
    take_until::TakeUntilOp,
    throttle::{ThrottleFlush, ThrottleOp},
    to_vec::{self, CollectObserver},
    zip::{pair, ZipOp},
  },
  scheduler::{Duration, Scheduler},
  subscription::{SubscriptionWrapper, TupleSubscription},
};

mod create;
mod from_callback;
mod from_event;
mod from_iter;
mod interval;
mod of;
mod timer;
mod trivial;

pub use create::*;
pub use from_callback::*;
pub use from_event::*;
pub use from_iter::*;
pub use interval::*;
pub use of::*;
pub use timer::*;
pub use trivial::*;

pub use crate::ops::zip::{zip_all, ZipAllOp};

/// Something that pushes `Item`s, then at most one terminal notification,
/// to an observer of type `O`.
pub trait Observable<Item, Err, O> {
  type Unsub: crate::subscription::Subscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub;
}

/// The handle type returned by subscribing `O` to `S`.
pub type Subscribed<S, O, Item, Err> = SubscriptionWrapper<
  TupleSubscription<
    SharedObserver<O, Item, Err>,
    <S as Observable<Item, Err, SharedObserver<O, Item, Err>>>::Unsub,
  >,
>;

pub type FnSubscribed<S, N, E, C, Item, Err> = Subscribed<S, FnObserver<N, E, C>, Item, Err>;

/// Error conversion used by [`ObservableExt::with_err`].
fn never_error<Err, E>(err: Err) -> E
where
  Err: Into<Infallible>,
{
  match Into::<Infallible>::into(err) {}
}

/// The operator methods, available on every observable of this crate.
pub trait ObservableExt<Item, Err>: Sized {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  #[inline]
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp::new(self, f)
  }

  /// Like `map`, but a transform that returns `Err` terminates the stream
  /// with that error and cancels the upstream subscription.
  #[inline]
  fn try_map<B, F>(self, f: F) -> TryMapOp<Self, F, Item>
  where
    F: FnMut(Item) -> Result<B, Err>,
  {
    TryMapOp::new(self, f)
  }

  /// Emit only those items from an Observable that pass a predicate test.
  #[inline]
  fn filter<F>(self, filter: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp::new(self, filter)
  }

  #[inline]
  fn try_filter<F>(self, filter: F) -> TryFilterOp<Self, F>
  where
    F: FnMut(&Item) -> Result<bool, Err>,
  {
    TryFilterOp::new(self, filter)
  }

  /// Applies an accumulator over the source and emits every intermediate
  /// result. The first emission is `f(seed, first)`; nothing is emitted for
  /// the seed itself.
  #[inline]
  fn scan<B, F>(self, seed: B, f: F) -> ScanOp<Self, F, B, Item>
  where
    F: FnMut(B, Item) -> B,
    B: Clone,
  {
    ScanOp::new(self, f, seed)
  }

  #[inline]
  fn try_scan<B, F>(self, seed: B, f: F) -> TryScanOp<Self, F, B, Item>
  where
    F: FnMut(B, Item) -> Result<B, Err>,
    B: Clone,
  {
    TryScanOp::new(self, f, seed)
  }

  /// Flattens an observable of observables, subscribing every inner source
  /// as it arrives and forwarding inner values in arrival order.
  #[inline]
  fn merge_all(self) -> MergeAllOp<Self, Item> { MergeAllOp::new(self, usize::MAX) }

  /// `merge_all` with at most `concurrent` inner sources subscribed at a
  /// time; later ones wait in arrival order.
  #[inline]
  fn merge_all_limited(self, concurrent: usize) -> MergeAllOp<Self, Item> {
    MergeAllOp::new(self, concurrent.max(1))
  }

  /// Subscribes inner sources one after another.
  #[inline]
  fn concat_all(self) -> MergeAllOp<Self, Item> { MergeAllOp::new(self, 1) }

  /// `map(f).merge_all()`.
  #[inline]
  fn flat_map<Inner, F>(self, f: F) -> MergeAllOp<MapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Inner,
  {
    MergeAllOp::new(MapOp::new(self, f), usize::MAX)
  }

  /// `try_map(f).merge_all()`.
  #[inline]
  fn try_flat_map<Inner, F>(self, f: F) -> MergeAllOp<TryMapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Result<Inner, Err>,
  {
    MergeAllOp::new(TryMapOp::new(self, f), usize::MAX)
  }

  /// `map(f).concat_all()`.
  #[inline]
  fn concat_map<Inner, F>(self, f: F) -> MergeAllOp<MapOp<Self, F, Item>, Inner>
  where
    F: FnMut(Item) -> Inner,
  {
    MergeAllOp::new(MapOp::new(self, f), 1)
  }

  /// Folds the source with its first value as the seed and emits the result
  /// when the source completes. An empty source completes without a value.
  #[inline]
  fn reduce<F>(self, f: F) -> ReduceOp<Self, F>
  where
    F: FnMut(Item, Item) -> Item,
  {
    ReduceOp::new(self, f)
  }

  /// Folds the source starting from `seed`; an empty source emits `seed`.
  #[inline]
  fn reduce_initial<B, F>(self, seed: B, f: F) -> ReduceInitialOp<Self, F, B, Item>
  where
    F: FnMut(B, Item) -> B,
  {
    ReduceInitialOp::new(self, f, seed)
  }

  /// Pairs up values of `self` and `other` by index.
  #[inline]
  fn zip<Other, B>(self, other: Other) -> ZipOp<Self, Other, fn(Item, B) -> (Item, B), Item, B>
  where
    Other: ObservableExt<B, Err>,
  {
    ZipOp::new(self, other, pair::<Item, B> as fn(Item, B) -> (Item, B))
  }

  /// Combines values of `self` and `other` by index with `f`.
  #[inline]
  fn zip_with<Other, B, Out, F>(self, other: Other, f: F) -> ZipOp<Self, Other, F, Item, B>
  where
    Other: ObservableExt<B, Err>,
    F: FnMut(Item, B) -> Out,
  {
    ZipOp::new(self, other, f)
  }

  /// Emits only the first `count` values, then completes and cancels the
  /// source.
  #[inline]
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Forwards source values until `notifier` emits or terminates.
  #[inline]
  fn take_until<N, NItem, NErr>(self, notifier: N) -> TakeUntilOp<Self, N, NItem, NErr>
  where
    N: ObservableExt<NItem, NErr>,
  {
    TakeUntilOp::new(self, notifier)
  }

  /// Only emits a value when it differs from the last one emitted.
  #[inline]
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self, fn(&Item, &Item) -> bool>
  where
    Item: PartialEq + Clone,
  {
    DistinctUntilChangedOp::new(self, <Item as PartialEq>::eq as fn(&Item, &Item) -> bool)
  }

  /// `distinct_until_changed` with a custom equality.
  #[inline]
  fn distinct_until_changed_by<F>(self, eq: F) -> DistinctUntilChangedOp<Self, F>
  where
    F: FnMut(&Item, &Item) -> bool,
    Item: Clone,
  {
    DistinctUntilChangedOp::new(self, eq)
  }

  /// Trailing-edge throttle: emits a value once `duration` has passed
  /// without a newer one. A value still held when the source completes is
  /// emitted before the completion.
  #[inline]
  fn throttle<SD>(self, duration: Duration, scheduler: SD) -> ThrottleOp<Self, SD>
  where
    SD: Scheduler,
  {
    ThrottleOp::new(self, duration, ThrottleFlush::Flush, scheduler)
  }

  /// `throttle` with an explicit policy for the value held at completion.
  #[inline]
  fn throttle_with<SD>(self, duration: Duration, flush: ThrottleFlush, scheduler: SD) -> ThrottleOp<Self, SD>
  where
    SD: Scheduler,
  {
    ThrottleOp::new(self, duration, flush, scheduler)
  }

  #[inline]
  fn map_err<E, F>(self, f: F) -> MapErrOp<Self, F, Err>
  where
    F: FnOnce(Err) -> E,
  {
    MapErrOp::new(self, f)
  }

  /// Gives a source that cannot fail the error type `E`, so it composes with
  /// fallible sources and `try_*` operators.
  #[inline]
  fn with_err<E>(self) -> MapErrOp<Self, fn(Err) -> E, Err>
  where
    Err: Into<Infallible>,
  {
    MapErrOp::new(self, never_error::<Err, E> as fn(Err) -> E)
  }

  /// Calls `f` with the error before it is forwarded.
  #[inline]
  fn on_error<F>(self, f: F) -> OnErrorOp<Self, F>
  where
    F: FnOnce(&Err),
  {
    OnErrorOp::new(self, f)
  }

  /// Calls `f` when the source completes, before the completion is
  /// forwarded.
  #[inline]
  fn on_complete<F>(self, f: F) -> OnCompleteOp<Self, F>
  where
    F: FnOnce(),
  {
    OnCompleteOp::new(self, f)
  }

  /// Subscribes and collects every value of a source that terminates during
  /// the subscribe call.
  fn to_vec(self) -> Result<Vec<Item>, CollectError<Err>>
  where
    Self: Observable<Item, Err, CollectObserver<Item, Err>>,
  {
    to_vec::collect(self)
  }

  /// Subscribes an observer.
  ///
  /// The returned handle is `Clone`; unsubscribing any number of clones has
  /// the same effect as unsubscribing once.
  fn subscribe_with<O>(self, observer: O) -> Subscribed<Self, O, Item, Err>
  where
    O: Observer<Item, Err>,
    Self: Observable<Item, Err, SharedObserver<O, Item, Err>>,
  {
    let shared = SharedObserver::new(observer);
    let unsub = self.actual_subscribe(shared.clone());
    SubscriptionWrapper(TupleSubscription::new(shared, unsub))
  }

  /// Subscribes with a `next` handler. An error, if one arrives, is dropped.
  fn subscribe<N>(self, next: N) -> FnSubscribed<Self, N, fn(Err), fn(), Item, Err>
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, SharedObserver<FnObserver<N, fn(Err), fn()>, Item, Err>>,
  {
    self.subscribe_with(FnObserver::new(next, drop_error::<Err> as fn(Err), noop as fn()))
  }

  fn subscribe_err<N, E>(self, next: N, error: E) -> FnSubscribed<Self, N, E, fn(), Item, Err>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    Self: Observable<Item, Err, SharedObserver<FnObserver<N, E, fn()>, Item, Err>>,
  {
    self.subscribe_with(FnObserver::new(next, error, noop as fn()))
  }

  fn subscribe_complete<N, C>(self, next: N, complete: C) -> FnSubscribed<Self, N, fn(Err), C, Item, Err>
  where
    N: FnMut(Item),
    C: FnOnce(),
    Self: Observable<Item, Err, SharedObserver<FnObserver<N, fn(Err), C>, Item, Err>>,
  {
    self.subscribe_with(FnObserver::new(next, drop_error::<Err> as fn(Err), complete))
  }

  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> FnSubscribed<Self, N, E, C, Item, Err>
  where
    N: FnMut(Item),
    E: FnOnce(Err),
    C: FnOnce(),
    Self: Observable<Item, Err, SharedObserver<FnObserver<N, E, C>, Item, Err>>,
  {
    self.subscribe_with(FnObserver::new(next, error, complete))
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn handle_clones_dispose_once() {
    let emitter = EventEmitter::<i32>::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let sub = observable::from_event(emitter.clone()).subscribe(move |v| c_seen.borrow_mut().push(v));
    emitter.emit(1);

    let other = sub.clone();
    sub.unsubscribe();
    other.unsubscribe();
    emitter.emit(2);

    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(emitter.listener_count(), 0);
  }

  #[rxlite_macro::test]
  fn pipeline_is_resubscribable() {
    let pipeline = observable::from_iter(1..=3).map(|v| v * 10);
    let first = pipeline.clone().to_vec();
    let second = pipeline.to_vec();
    assert_eq!(first, Ok(vec![10, 20, 30]));
    assert_eq!(first, second);
  }

  #[rxlite_macro::test]
  fn subscribe_all_sees_every_notification() {
    let mut values = vec![];
    let mut errors = vec![];
    let mut completes = 0;
    observable::from_iter([1, 2]).with_err::<&str>().subscribe_all(
      |v| values.push(v),
      |e| errors.push(e),
      || completes += 1,
    );
    assert_eq!(values, vec![1, 2]);
    assert!(errors.is_empty());
    assert_eq!(completes, 1);

    let mut errors = vec![];
    observable::throw::<i32, _>("boom").subscribe_err(|_| {}, |e| errors.push(e));
    assert_eq!(errors, vec!["boom"]);
  }

  #[rxlite_macro::test]
  fn unhandled_error_is_dropped() {
    let mut values = vec![];
    observable::from_iter([1, 2, 3])
      .with_err::<String>()
      .try_map(|v| if v < 3 { Ok(v) } else { Err("three".to_owned()) })
      .subscribe(|v| values.push(v));
    assert_eq!(values, vec![1, 2]);
  }

  #[rxlite_macro::test]
  fn guard_unsubscribes_on_drop() {
    let emitter = EventEmitter::<()>::new();
    {
      let _guard = observable::from_event(emitter.clone()).subscribe(|_| {}).unsubscribe_when_dropped();
      assert_eq!(emitter.listener_count(), 1);
    }
    assert_eq!(emitter.listener_count(), 0);
  }
}
