use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

#[derive(Clone)]
pub struct OnErrorOp<S, F> {
  source: S,
  func: F,
}

impl<S, F> OnErrorOp<S, F> {
  #[inline]
  pub(crate) fn new(source: S, func: F) -> Self { OnErrorOp { source, func } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for OnErrorOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, OnErrorObserver<O, F>>,
  F: FnOnce(&Err),
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self.source.actual_subscribe(OnErrorObserver { observer, func: self.func })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for OnErrorOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnOnce(&Err),
{
}

pub struct OnErrorObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for OnErrorObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnOnce(&Err),
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(self, err: Err) {
    (self.func)(&err);
    self.observer.error(err);
  }

  #[inline]
  fn complete(self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[rxlite_macro::test]
  fn sees_error_before_downstream() {
    let mut log = vec![];
    let mut seen = None;
    observable::throw::<i32, _>(404)
      .on_error(|e| seen = Some(*e))
      .subscribe_err(|_| {}, |e| log.push(e));
    assert_eq!(seen, Some(404));
    assert_eq!(log, vec![404]);
  }

  #[rxlite_macro::test]
  fn not_called_on_completion() {
    let mut called = false;
    let got = observable::from_iter([1, 2]).with_err::<u16>().on_error(|_| called = true).to_vec();
    assert_eq!(got, Ok(vec![1, 2]));
    assert!(!called);
  }
}
