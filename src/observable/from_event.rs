//! Adapter for listener-style event sources.
//!
//! Anything that can register and unregister a callback implements
//! [`EventSource`]; [`from_event`] turns it into an observable that emits
//! every occurrence, never completes, and removes its listener when the
//! subscription ends. [`EventEmitter`] is a ready-made source.

use std::{collections::VecDeque, convert::Infallible};

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::ClosureSubscription,
  type_hint::TypeHint,
};

/// Identifies a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub usize);

pub trait EventSource<T> {
  fn add_listener(&self, listener: Box<dyn FnMut(T)>) -> ListenerId;

  fn remove_listener(&self, id: ListenerId);
}

pub fn from_event<E, T>(source: E) -> FromEvent<E, T>
where
  E: EventSource<T>,
{
  FromEvent { source, _hint: TypeHint::new() }
}

pub struct FromEvent<E, T> {
  source: E,
  _hint: TypeHint<T>,
}

impl<E: Clone, T> Clone for FromEvent<E, T> {
  fn clone(&self) -> Self { FromEvent { source: self.source.clone(), _hint: TypeHint::new() } }
}

impl<E, T, O> Observable<T, Infallible, O> for FromEvent<E, T>
where
  O: Observer<T, Infallible> + 'static,
  E: EventSource<T> + 'static,
  T: 'static,
{
  type Unsub = SharedObserver<O, T, Infallible>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let shared = SharedObserver::new(observer);
    let sink = shared.clone();
    let id = self.source.add_listener(Box::new(move |event| sink.emit_next(event)));
    tracing::trace!(?id, "event listener added");
    let source = self.source;
    shared.set_teardown(ClosureSubscription(move || {
      tracing::trace!(?id, "event listener removed");
      source.remove_listener(id)
    }));
    shared
  }
}

impl<E, T> ObservableExt<T, Infallible> for FromEvent<E, T> where E: EventSource<T> {}

type Listener<T> = Box<dyn FnMut(T)>;

struct Registry<T> {
  next_id: usize,
  // `None` while the listener is running
  listeners: Vec<(ListenerId, Option<Listener<T>>)>,
  emitting: bool,
  queued: VecDeque<T>,
}

/// An in-process event source. Clones share the listener registry.
pub struct EventEmitter<T>(MutRc<Registry<T>>);

impl<T> Clone for EventEmitter<T> {
  fn clone(&self) -> Self { EventEmitter(self.0.clone()) }
}

impl<T> Default for EventEmitter<T> {
  fn default() -> Self {
    EventEmitter(MutRc::own(Registry {
      next_id: 0,
      listeners: vec![],
      emitting: false,
      queued: VecDeque::new(),
    }))
  }
}

impl<T> EventEmitter<T> {
  pub fn new() -> Self { Self::default() }

  /// Calls every listener registered at the time the event is dispatched.
  /// Listeners may add or remove listeners, including themselves, while
  /// running. An event emitted from inside a listener is queued and
  /// dispatched after the current one, in order.
  pub fn emit(&self, event: T)
  where
    T: Clone,
  {
    {
      let mut registry = self.0.rc_deref_mut();
      if registry.emitting {
        registry.queued.push_back(event);
        return;
      }
      registry.emitting = true;
    }
    let mut event = Some(event);
    while let Some(current) = event {
      self.dispatch(current);
      let mut registry = self.0.rc_deref_mut();
      event = registry.queued.pop_front();
      if event.is_none() {
        registry.emitting = false;
      }
    }
  }

  fn dispatch(&self, event: T)
  where
    T: Clone,
  {
    let ids: Vec<ListenerId> = self.0.rc_deref().listeners.iter().map(|(id, _)| *id).collect();
    for id in ids {
      let listener = {
        let mut registry = self.0.rc_deref_mut();
        registry
          .listeners
          .iter_mut()
          .find(|(l, _)| *l == id)
          .and_then(|(_, f)| f.take())
      };
      let Some(mut listener) = listener else {
        continue;
      };
      listener(event.clone());
      let removed = {
        let mut registry = self.0.rc_deref_mut();
        match registry.listeners.iter_mut().find(|(l, _)| *l == id) {
          Some((_, slot)) => {
            *slot = Some(listener);
            None
          }
          None => Some(listener),
        }
      };
      drop(removed);
    }
  }

  pub fn listener_count(&self) -> usize { self.0.rc_deref().listeners.len() }
}

impl<T> EventSource<T> for EventEmitter<T> {
  fn add_listener(&self, listener: Box<dyn FnMut(T)>) -> ListenerId {
    let mut registry = self.0.rc_deref_mut();
    let id = ListenerId(registry.next_id);
    registry.next_id += 1;
    registry.listeners.push((id, Some(listener)));
    id
  }

  fn remove_listener(&self, id: ListenerId) {
    let removed = {
      let mut registry = self.0.rc_deref_mut();
      let index = registry.listeners.iter().position(|(l, _)| *l == id);
      index.map(|index| registry.listeners.remove(index))
    };
    drop(removed);
  }
}
