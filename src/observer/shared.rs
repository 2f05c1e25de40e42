use std::collections::VecDeque;

use crate::{
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::{BoxSubscription, Subscription},
};

/// A terminal notification held back until the running handler returns.
pub enum Terminal<Err> {
  Error(Err),
  Complete,
}

struct SharedState<O, Item, Err> {
  observer: Option<O>,
  delivering: bool,
  stopped: bool,
  disposed: bool,
  queue: VecDeque<Item>,
  terminal: Option<Terminal<Err>>,
  teardown: Option<BoxSubscription>,
}

/// The downstream slot every subscription delivers through.
///
/// Clones share one slot. An emission that arrives while the observer is
/// inside a handler is queued and delivered after the handler returns, in
/// order, so the observer is never re-entered and no borrow of the shared
/// state is held while user code runs.
///
/// After a terminal notification or a `dispose`, every further notification
/// is dropped. A teardown registered with [`SharedObserver::set_teardown`]
/// runs exactly once, after the terminal notification was delivered or on
/// dispose, whichever comes first.
pub struct SharedObserver<O, Item, Err>(MutRc<SharedState<O, Item, Err>>);

impl<O, Item, Err> Clone for SharedObserver<O, Item, Err> {
  #[inline]
  fn clone(&self) -> Self { SharedObserver(self.0.clone()) }
}

impl<O, Item, Err> SharedObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  pub fn new(observer: O) -> Self {
    SharedObserver(MutRc::own(SharedState {
      observer: Some(observer),
      delivering: false,
      stopped: false,
      disposed: false,
      queue: VecDeque::new(),
      terminal: None,
      teardown: None,
    }))
  }

  pub fn emit_next(&self, value: Item) {
    let mut state = self.0.rc_deref_mut();
    if state.stopped || state.disposed {
      tracing::debug!("next after terminal or dispose suppressed");
      return;
    }
    if state.delivering {
      state.queue.push_back(value);
      return;
    }
    let Some(mut observer) = state.observer.take() else {
      return;
    };
    state.delivering = true;
    drop(state);
    observer.next(value);
    self.drain(observer);
  }

  pub fn emit_error(&self, err: Err) { self.terminate(Terminal::Error(err), false); }

  pub fn emit_complete(&self) { self.terminate(Terminal::Complete, false); }

  /// Completes downstream, discarding values still queued for delivery.
  pub fn preempt_complete(&self) { self.terminate(Terminal::Complete, true); }

  /// Stops delivery and runs the teardown. Idempotent.
  pub fn dispose(&self) {
    let mut state = self.0.rc_deref_mut();
    if state.disposed {
      return;
    }
    state.disposed = true;
    state.queue.clear();
    state.terminal = None;
    let observer = state.observer.take();
    let teardown = state.teardown.take();
    drop(state);
    drop(observer);
    if let Some(teardown) = teardown {
      teardown.unsubscribe();
    }
  }

  /// Registers the subscription to release when this slot closes. If the slot
  /// is already closed the subscription is released immediately.
  pub fn set_teardown<U: Subscription + 'static>(&self, teardown: U) {
    let mut state = self.0.rc_deref_mut();
    if state.disposed {
      drop(state);
      teardown.unsubscribe();
      return;
    }
    let prev = state.teardown.replace(BoxSubscription::new(teardown));
    drop(state);
    if let Some(prev) = prev {
      prev.unsubscribe();
    }
  }

  /// `true` once a terminal notification was accepted or the slot was
  /// disposed.
  pub fn is_stopped(&self) -> bool {
    let state = self.0.rc_deref();
    state.stopped || state.disposed
  }

  fn terminate(&self, terminal: Terminal<Err>, discard_queued: bool) {
    let mut state = self.0.rc_deref_mut();
    if state.stopped || state.disposed {
      tracing::debug!("terminal after terminal or dispose suppressed");
      return;
    }
    state.stopped = true;
    if discard_queued {
      state.queue.clear();
    }
    if state.delivering {
      state.terminal = Some(terminal);
      return;
    }
    let observer = state.observer.take();
    drop(state);
    if let Some(observer) = observer {
      self.finish(observer, terminal);
    }
  }

  fn drain(&self, mut observer: O) {
    loop {
      let mut state = self.0.rc_deref_mut();
      if state.disposed {
        state.delivering = false;
        drop(state);
        return;
      }
      if let Some(value) = state.queue.pop_front() {
        drop(state);
        observer.next(value);
        continue;
      }
      state.delivering = false;
      match state.terminal.take() {
        Some(terminal) => {
          drop(state);
          self.finish(observer, terminal);
        }
        None => state.observer = Some(observer),
      }
      return;
    }
  }

  fn finish(&self, observer: O, terminal: Terminal<Err>) {
    match terminal {
      Terminal::Error(err) => observer.error(err),
      Terminal::Complete => observer.complete(),
    }
    let teardown = {
      let mut state = self.0.rc_deref_mut();
      state.disposed = true;
      state.queue.clear();
      state.teardown.take()
    };
    if let Some(teardown) = teardown {
      teardown.unsubscribe();
    }
  }
}

impl<O, Item, Err> Observer<Item, Err> for SharedObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.emit_next(value) }

  #[inline]
  fn error(self, err: Err) { self.emit_error(err) }

  #[inline]
  fn complete(self) { self.emit_complete() }

  fn is_closed(&self) -> bool {
    let state = self.0.rc_deref();
    state.stopped || state.disposed || state.observer.as_ref().map_or(false, O::is_closed)
  }
}

impl<O, Item, Err> Subscription for SharedObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn unsubscribe(self) { self.dispose() }

  #[inline]
  fn is_closed(&self) -> bool { self.is_stopped() }
}

/// Object-safe face of a [`SharedObserver`], used where the observer type
/// has to be erased (the emitter handed to `create` producers).
pub trait Sink<Item, Err> {
  fn sink_next(&self, value: Item);
  fn sink_error(&self, err: Err);
  fn sink_complete(&self);
  fn sink_is_closed(&self) -> bool;
}

impl<O, Item, Err> Sink<Item, Err> for SharedObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  fn sink_next(&self, value: Item) { self.emit_next(value) }
  fn sink_error(&self, err: Err) { self.emit_error(err) }
  fn sink_complete(&self) { self.emit_complete() }
  fn sink_is_closed(&self) -> bool { Observer::is_closed(self) }
}
