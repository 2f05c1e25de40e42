use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
};

/// Skips values equal to the last one forwarded, as judged by `eq`.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S, F> {
  source: S,
  eq: F,
}

impl<S, F> DistinctUntilChangedOp<S, F> {
  #[inline]
  pub(crate) fn new(source: S, eq: F) -> Self { DistinctUntilChangedOp { source, eq } }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for DistinctUntilChangedOp<S, F>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, DistinctUntilChangedObserver<O, F, Item>>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    self
      .source
      .actual_subscribe(DistinctUntilChangedObserver { observer, eq: self.eq, last: None })
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for DistinctUntilChangedOp<S, F>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
{
}

pub struct DistinctUntilChangedObserver<O, F, Item> {
  observer: O,
  eq: F,
  last: Option<Item>,
}

impl<Item, Err, O, F> Observer<Item, Err> for DistinctUntilChangedObserver<O, F, Item>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item, &Item) -> bool,
  Item: Clone,
{
  fn next(&mut self, value: Item) {
    let repeated = match self.last.as_ref() {
      Some(last) => (self.eq)(last, &value),
      None => false,
    };
    if !repeated {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) { self.observer.error(err); }

  fn complete(self) { self.observer.complete(); }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn smoke_distinct_until_changed() {
    let got = observable::from_iter([1, 1, 3, 3, 5, 1]).distinct_until_changed().to_vec();
    assert_eq!(got, Ok(vec![1, 3, 5, 1]));
  }

  #[rxlite_macro::test]
  fn after_map() {
    let x = Rc::new(RefCell::new(vec![]));
    let x_c = x.clone();
    observable::from_iter([1, 2, 2, 1, 2, 3])
      .map(|v| v % 5)
      .distinct_until_changed()
      .subscribe(move |v| x_c.borrow_mut().push(v));
    assert_eq!(&*x.borrow(), &[1, 2, 1, 2, 3]);
  }

  #[rxlite_macro::test]
  fn custom_equality_for_structured_values() {
    #[derive(Clone, Debug, PartialEq)]
    struct Reading {
      sensor: &'static str,
      value: i32,
    }

    let readings = vec![
      Reading { sensor: "a", value: 1 },
      Reading { sensor: "a", value: 2 },
      Reading { sensor: "b", value: 2 },
      Reading { sensor: "b", value: 7 },
      Reading { sensor: "a", value: 7 },
    ];
    let got = observable::from_iter(readings)
      .distinct_until_changed_by(|prev: &Reading, next: &Reading| prev.sensor == next.sensor)
      .map(|r| r.value)
      .to_vec();
    assert_eq!(got, Ok(vec![1, 2, 7]));
  }
}
