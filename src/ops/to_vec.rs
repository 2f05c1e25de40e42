//! Synchronous draining of a source into a `Vec`.

use std::mem;

use crate::{
  error::CollectError,
  observable::Observable,
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

struct CollectState<Item, Err> {
  values: Vec<Item>,
  outcome: Option<Result<(), Err>>,
}

/// Observer used by [`ObservableExt::to_vec`](crate::observable::ObservableExt::to_vec).
pub struct CollectObserver<Item, Err>(MutRc<CollectState<Item, Err>>);

impl<Item, Err> Observer<Item, Err> for CollectObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.0.rc_deref_mut().values.push(value) }

  fn error(self, err: Err) { self.0.rc_deref_mut().outcome = Some(Err(err)) }

  fn complete(self) { self.0.rc_deref_mut().outcome = Some(Ok(())) }

  fn is_closed(&self) -> bool { self.0.rc_deref().outcome.is_some() }
}

pub(crate) fn collect<S, Item, Err>(source: S) -> Result<Vec<Item>, CollectError<Err>>
where
  S: Observable<Item, Err, CollectObserver<Item, Err>>,
{
  let state = MutRc::own(CollectState { values: vec![], outcome: None });
  let unsub = source.actual_subscribe(CollectObserver(state.clone()));
  let mut state = state.rc_deref_mut();
  match state.outcome.take() {
    Some(Ok(())) => Ok(mem::take(&mut state.values)),
    Some(Err(err)) => Err(CollectError::Source(err)),
    None => {
      drop(state);
      tracing::debug!("to_vec source still running, unsubscribing");
      unsub.unsubscribe();
      Err(CollectError::Incomplete)
    }
  }
}
