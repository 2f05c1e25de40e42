use std::rc::Rc;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver, Sink},
  type_hint::TypeHint,
};

/// Adapts a single-shot callback API.
///
/// `f` runs on subscribe and receives a [`Callback`]. Resolving it with
/// `Ok(v)` emits `v` then completes; `Err(e)` emits the error. A callback
/// resolved after the subscriber unsubscribed is ignored, and one that is
/// dropped unresolved leaves the stream open.
///
/// ```
/// use rxlite::prelude::*;
///
/// fn lookup(key: &str, done: impl FnOnce(Result<usize, String>)) { done(Ok(key.len())) }
///
/// let got = observable::from_callback(|cb: Callback<usize, String>| lookup("abc", |r| cb.resolve(r))).to_vec();
/// assert_eq!(got, Ok(vec![3]));
/// ```
pub fn from_callback<F, T, E>(f: F) -> FromCallback<F, T, E>
where
  F: FnOnce(Callback<T, E>),
{
  FromCallback { f, _hint: TypeHint::new() }
}

pub struct FromCallback<F, T, E> {
  f: F,
  _hint: TypeHint<(T, E)>,
}

impl<F: Clone, T, E> Clone for FromCallback<F, T, E> {
  fn clone(&self) -> Self { FromCallback { f: self.f.clone(), _hint: TypeHint::new() } }
}

impl<F, T, E, O> Observable<T, E, O> for FromCallback<F, T, E>
where
  O: Observer<T, E> + 'static,
  F: FnOnce(Callback<T, E>),
  T: 'static,
  E: 'static,
{
  type Unsub = SharedObserver<O, T, E>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let shared = SharedObserver::new(observer);
    (self.f)(Callback(Rc::new(shared.clone())));
    shared
  }
}

impl<F, T, E> ObservableExt<T, E> for FromCallback<F, T, E> where F: FnOnce(Callback<T, E>) {}

/// Completion handle passed to a [`from_callback`] function.
pub struct Callback<T, E>(Rc<dyn Sink<T, E>>);

impl<T, E> Callback<T, E> {
  pub fn resolve(self, result: Result<T, E>) {
    match result {
      Ok(value) => {
        self.0.sink_next(value);
        self.0.sink_complete();
      }
      Err(err) => self.0.sink_error(err),
    }
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.sink_is_closed() }
}
