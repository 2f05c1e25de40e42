//! TakeUntil operator implementation
//!
//! Emits the values of the source until a second observable, the notifier,
//! emits a value or terminates. The notifier is subscribed first; when it
//! fires, downstream completes and both subscriptions are released. Values
//! of the source still queued for delivery at that point are discarded.

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscription::{Subscription, SubscriptionSlot, TupleSubscription},
  type_hint::TypeHint,
};

pub struct TakeUntilOp<S, N, NItem, NErr> {
  source: S,
  notifier: N,
  _hint: TypeHint<(NItem, NErr)>,
}

impl<S, N, NItem, NErr> TakeUntilOp<S, N, NItem, NErr> {
  #[inline]
  pub(crate) fn new(source: S, notifier: N) -> Self { TakeUntilOp { source, notifier, _hint: TypeHint::new() } }
}

impl<S: Clone, N: Clone, NItem, NErr> Clone for TakeUntilOp<S, N, NItem, NErr> {
  fn clone(&self) -> Self { TakeUntilOp::new(self.source.clone(), self.notifier.clone()) }
}

impl<Item, Err, O, S, N, NItem, NErr> Observable<Item, Err, O> for TakeUntilOp<S, N, NItem, NErr>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeUntilObserver<O, Item, Err>>,
  S::Unsub: 'static,
  N: Observable<NItem, NErr, NotifierObserver<O, Item, Err>>,
  N::Unsub: 'static,
{
  type Unsub = TupleSubscription<SubscriptionSlot, SubscriptionSlot>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let downstream = SharedObserver::new(observer);
    let source = SubscriptionSlot::new();
    let notifier = SubscriptionSlot::new();

    let unsub = self.notifier.actual_subscribe(NotifierObserver {
      downstream: downstream.clone(),
      source: source.clone(),
      notifier: notifier.clone(),
    });
    notifier.set(unsub);

    if downstream.is_stopped() {
      source.clone().unsubscribe();
    } else {
      let unsub = self
        .source
        .actual_subscribe(TakeUntilObserver { downstream, notifier: notifier.clone() });
      source.set(unsub);
    }
    TupleSubscription::new(source, notifier)
  }
}

impl<Item, Err, S, N, NItem, NErr> ObservableExt<Item, Err> for TakeUntilOp<S, N, NItem, NErr>
where
  S: ObservableExt<Item, Err>,
  N: ObservableExt<NItem, NErr>,
{
}

/// Observer for the source observable
pub struct TakeUntilObserver<O, Item, Err> {
  downstream: SharedObserver<O, Item, Err>,
  notifier: SubscriptionSlot,
}

impl<O, Item, Err> Observer<Item, Err> for TakeUntilObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.downstream.emit_next(value) }

  fn error(self, err: Err) {
    self.downstream.emit_error(err);
    self.notifier.unsubscribe();
  }

  fn complete(self) {
    self.downstream.emit_complete();
    self.notifier.unsubscribe();
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

/// Observer for the notifier; any notification it receives ends the stream.
pub struct NotifierObserver<O, Item, Err> {
  downstream: SharedObserver<O, Item, Err>,
  source: SubscriptionSlot,
  notifier: SubscriptionSlot,
}

impl<O, Item, Err> NotifierObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn stop(&self) {
    tracing::trace!("take_until notifier fired");
    self.downstream.preempt_complete();
    self.source.clone().unsubscribe();
    self.notifier.clone().unsubscribe();
  }
}

impl<O, Item, Err, NItem, NErr> Observer<NItem, NErr> for NotifierObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, _value: NItem) { self.stop() }

  fn error(self, _err: NErr) { self.stop() }

  fn complete(self) { self.stop() }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

#[cfg(test)]
mod test {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  type Log = Rc<RefCell<Vec<String>>>;

  fn record(log: &Log) -> (impl FnMut(i32), impl FnOnce()) {
    let (n, c) = (log.clone(), log.clone());
    (move |v| n.borrow_mut().push(v.to_string()), move || c.borrow_mut().push("complete".to_owned()))
  }

  #[rxlite_macro::test]
  fn emits_until_notifier_emits() {
    let source = EventEmitter::<i32>::new();
    let notifier = EventEmitter::<()>::new();
    let log = Log::default();
    let (next, complete) = record(&log);
    observable::from_event(source.clone())
      .take_until(observable::from_event(notifier.clone()))
      .subscribe_complete(next, complete);

    source.emit(1);
    source.emit(2);
    notifier.emit(());
    source.emit(3);

    assert_eq!(*log.borrow(), vec!["1", "2", "complete"]);
    assert_eq!(source.listener_count(), 0);
    assert_eq!(notifier.listener_count(), 0);
  }

  #[rxlite_macro::test]
  fn finished_notifier_skips_the_source() {
    let subscribed = Rc::new(Cell::new(false));
    let c_subscribed = subscribed.clone();
    let log = Log::default();
    let (next, complete) = record(&log);
    observable::create(move |e: Emitter<i32, ()>| {
      c_subscribed.set(true);
      e.next(1);
    })
    .take_until(observable::empty::<()>())
    .subscribe_complete(next, complete);

    assert!(!subscribed.get());
    assert_eq!(*log.borrow(), vec!["complete"]);
  }

  #[rxlite_macro::test]
  fn notifier_error_completes() {
    let source = EventEmitter::<i32>::new();
    let log = Log::default();
    let (next, complete) = record(&log);
    let scheduler = TestScheduler::new();
    let failing = observable::timer(Duration::from_millis(10), scheduler.clone())
      .with_err::<&str>()
      .try_map(|_| Err::<(), _>("notifier failed"));

    observable::from_event(source.clone()).take_until(failing).subscribe_complete(next, complete);
    source.emit(1);
    scheduler.advance_by(Duration::from_millis(10));
    source.emit(2);

    assert_eq!(*log.borrow(), vec!["1", "complete"]);
    assert_eq!(source.listener_count(), 0);
  }

  #[rxlite_macro::test]
  fn source_complete_disposes_notifier() {
    let notifier = EventEmitter::<()>::new();
    let log = Log::default();
    let (next, complete) = record(&log);
    observable::from_iter([1, 2])
      .take_until(observable::from_event(notifier.clone()))
      .subscribe_complete(next, complete);

    assert_eq!(*log.borrow(), vec!["1", "2", "complete"]);
    assert_eq!(notifier.listener_count(), 0);
  }

  #[rxlite_macro::test]
  fn notifier_wins_over_queued_values() {
    let emitter_slot: Rc<RefCell<Option<Emitter<i32, ()>>>> = Rc::default();
    let notifier = EventEmitter::<()>::new();
    let log = Log::default();

    let c_slot = emitter_slot.clone();
    let (c_log, c_done) = (log.clone(), log.clone());
    let c_emitter = emitter_slot.clone();
    let c_notifier = notifier.clone();
    observable::create(move |e: Emitter<i32, ()>| *c_slot.borrow_mut() = Some(e))
      .take_until(observable::from_event(notifier.clone()))
      .subscribe_complete(
        move |v| {
          c_log.borrow_mut().push(v.to_string());
          if v == 1 {
            if let Some(e) = c_emitter.borrow().as_ref() {
              e.next(2);
            }
            c_notifier.emit(());
          }
        },
        move || c_done.borrow_mut().push("complete".to_owned()),
      );

    let emitter = emitter_slot.borrow().clone().unwrap();
    emitter.next(1);
    emitter.next(3);

    assert_eq!(*log.borrow(), vec!["1", "complete"]);
    assert!(emitter.is_closed());
  }
}
