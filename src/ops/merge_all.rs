use std::collections::VecDeque;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::{MutRc, RcDerefMut},
  subscription::{MultiSubscription, Subscription},
  type_hint::TypeHint,
};

/// Flattens an observable of observables. `concurrent` bounds how many
/// inner sources are subscribed at once; `usize::MAX` is a plain merge and
/// `1` is a concat.
pub struct MergeAllOp<S, Inner> {
  source: S,
  concurrent: usize,
  _hint: TypeHint<Inner>,
}

impl<S, Inner> MergeAllOp<S, Inner> {
  #[inline]
  pub(crate) fn new(source: S, concurrent: usize) -> Self {
    MergeAllOp { source, concurrent, _hint: TypeHint::new() }
  }
}

impl<S: Clone, Inner> Clone for MergeAllOp<S, Inner> {
  fn clone(&self) -> Self { MergeAllOp::new(self.source.clone(), self.concurrent) }
}

impl<Item, Err, O, S, Inner> Observable<Item, Err, O> for MergeAllOp<S, Inner>
where
  O: Observer<Item, Err>,
  S: Observable<Inner, Err, OuterObserver<O, Item, Err, Inner>>,
  S::Unsub: 'static,
  Inner: Observable<Item, Err, InnerObserver<O, Item, Err, Inner>>,
  Inner::Unsub: 'static,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let subscriptions = MultiSubscription::new();
    let core = MergeCore {
      downstream: SharedObserver::new(observer),
      state: MutRc::own(MergeState {
        active: 0,
        outer_done: false,
        draining: false,
        buffered: VecDeque::new(),
      }),
      subscriptions: subscriptions.clone(),
      concurrent: self.concurrent,
      subscribe_inner: subscribe_inner::<O, Item, Err, Inner>,
    };
    let id = subscriptions.reserve_id();
    let unsub = self.source.actual_subscribe(OuterObserver(core));
    subscriptions.insert(id, unsub);
    subscriptions
  }
}

impl<Item, Err, S, Inner> ObservableExt<Item, Err> for MergeAllOp<S, Inner>
where
  S: ObservableExt<Inner, Err>,
  Inner: ObservableExt<Item, Err>,
{
}

struct MergeState<Inner> {
  active: usize,
  outer_done: bool,
  // set while a `drain` is on the stack
  draining: bool,
  buffered: VecDeque<Inner>,
}

/// Per-subscription state shared by the outer observer and every inner one.
///
/// `subscribe_inner` is instantiated where the inner subscribe bound is
/// known, so inner observers can start buffered sources without carrying
/// that bound themselves.
pub struct MergeCore<O, Item, Err, Inner> {
  downstream: SharedObserver<O, Item, Err>,
  state: MutRc<MergeState<Inner>>,
  subscriptions: MultiSubscription,
  concurrent: usize,
  subscribe_inner: fn(&MergeCore<O, Item, Err, Inner>, Inner),
}

impl<O, Item, Err, Inner> Clone for MergeCore<O, Item, Err, Inner> {
  fn clone(&self) -> Self {
    MergeCore {
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      subscriptions: self.subscriptions.clone(),
      concurrent: self.concurrent,
      subscribe_inner: self.subscribe_inner,
    }
  }
}

fn subscribe_inner<O, Item, Err, Inner>(core: &MergeCore<O, Item, Err, Inner>, inner: Inner)
where
  O: Observer<Item, Err>,
  Inner: Observable<Item, Err, InnerObserver<O, Item, Err, Inner>>,
  Inner::Unsub: 'static,
{
  let id = core.subscriptions.reserve_id();
  tracing::trace!(id, "merge_all subscribing inner source");
  let unsub = inner.actual_subscribe(InnerObserver { core: core.clone(), id });
  core.subscriptions.insert(id, unsub);
}

impl<O, Item, Err, Inner> MergeCore<O, Item, Err, Inner>
where
  O: Observer<Item, Err>,
{
  fn fail(&self, err: Err) {
    self.downstream.emit_error(err);
    self.subscriptions.clone().unsubscribe();
  }

  /// Starts buffered inner sources while there is room, then completes
  /// downstream if nothing is left. Inner sources that finish during the
  /// loop only release their place, so synchronous inners never nest.
  fn drain(&self) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.draining {
        return;
      }
      state.draining = true;
    }
    loop {
      let next = {
        let mut state = self.state.rc_deref_mut();
        if self.downstream.is_stopped() {
          state.buffered.clear();
          None
        } else if state.active < self.concurrent {
          let next = state.buffered.pop_front();
          if next.is_some() {
            state.active += 1;
          }
          next
        } else {
          None
        }
      };
      match next {
        Some(inner) => (self.subscribe_inner)(self, inner),
        None => break,
      }
    }
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.draining = false;
      state.outer_done && state.active == 0 && state.buffered.is_empty()
    };
    if done {
      self.downstream.emit_complete();
    }
  }
}

pub struct OuterObserver<O, Item, Err, Inner>(MergeCore<O, Item, Err, Inner>);

impl<O, Item, Err, Inner> Observer<Inner, Err> for OuterObserver<O, Item, Err, Inner>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, inner: Inner) {
    if self.0.downstream.is_stopped() {
      return;
    }
    self.0.state.rc_deref_mut().buffered.push_back(inner);
    self.0.drain();
  }

  fn error(self, err: Err) { self.0.fail(err) }

  fn complete(self) {
    self.0.state.rc_deref_mut().outer_done = true;
    self.0.drain();
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.0.downstream) }
}

pub struct InnerObserver<O, Item, Err, Inner> {
  core: MergeCore<O, Item, Err, Inner>,
  id: usize,
}

impl<O, Item, Err, Inner> Observer<Item, Err> for InnerObserver<O, Item, Err, Inner>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.core.downstream.emit_next(value) }

  fn error(self, err: Err) { self.core.fail(err) }

  fn complete(self) {
    self.core.subscriptions.remove(self.id);
    self.core.state.rc_deref_mut().active -= 1;
    self.core.drain();
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.core.downstream) }
}
