use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::{MutRc, RcDerefMut},
  scheduler::{Duration, Scheduler},
  subscription::{Subscription, SubscriptionSlot, TupleSubscription},
};

/// What `throttle` does with a value still held when the source completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrottleFlush {
  /// Emit the held value, then complete.
  #[default]
  Flush,
  /// Drop the held value and complete.
  Discard,
}

#[derive(Clone)]
pub struct ThrottleOp<S, SD> {
  source: S,
  duration: Duration,
  flush: ThrottleFlush,
  scheduler: SD,
}

impl<S, SD> ThrottleOp<S, SD> {
  #[inline]
  pub(crate) fn new(source: S, duration: Duration, flush: ThrottleFlush, scheduler: SD) -> Self {
    ThrottleOp { source, duration, flush, scheduler }
  }
}

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for ThrottleOp<S, SD>
where
  O: Observer<Item, Err> + 'static,
  S: Observable<Item, Err, ThrottleObserver<O, SD, Item, Err>>,
  SD: Scheduler,
  Item: 'static,
  Err: 'static,
{
  type Unsub = TupleSubscription<S::Unsub, SubscriptionSlot>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let Self { source, duration, flush, scheduler } = self;
    let timer = SubscriptionSlot::new();
    let unsub = source.actual_subscribe(ThrottleObserver {
      downstream: SharedObserver::new(observer),
      pending: MutRc::own(None),
      timer: timer.clone(),
      duration,
      flush,
      scheduler,
    });
    TupleSubscription::new(unsub, timer)
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for ThrottleOp<S, SD> where S: ObservableExt<Item, Err> {}

pub struct ThrottleObserver<O, SD, Item, Err> {
  downstream: SharedObserver<O, Item, Err>,
  pending: MutRc<Option<Item>>,
  timer: SubscriptionSlot,
  duration: Duration,
  flush: ThrottleFlush,
  scheduler: SD,
}

impl<Item, Err, O, SD> Observer<Item, Err> for ThrottleObserver<O, SD, Item, Err>
where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Item: 'static,
  Err: 'static,
{
  fn next(&mut self, value: Item) {
    *self.pending.rc_deref_mut() = Some(value);
    let downstream = self.downstream.clone();
    let pending = self.pending.clone();
    let handle = self.scheduler.schedule(
      move || {
        let value = pending.rc_deref_mut().take();
        if let Some(value) = value {
          downstream.emit_next(value);
        }
      },
      Some(self.duration),
    );
    // replaces and cancels the previous timer
    self.timer.set(handle);
  }

  fn error(self, err: Err) {
    self.timer.unsubscribe();
    let dropped = self.pending.rc_deref_mut().take();
    drop(dropped);
    self.downstream.emit_error(err);
  }

  fn complete(self) {
    self.timer.unsubscribe();
    let held = self.pending.rc_deref_mut().take();
    if let (Some(value), ThrottleFlush::Flush) = (held, self.flush) {
      self.downstream.emit_next(value);
    }
    self.downstream.emit_complete();
  }

  #[inline]
  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}
