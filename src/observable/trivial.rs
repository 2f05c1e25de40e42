use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  type_hint::TypeHint,
};

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw<Item, Err>(e: Err) -> ThrowObservable<Item, Err> { ThrowObservable(e, TypeHint::new()) }

pub struct ThrowObservable<Item, Err>(Err, TypeHint<Item>);

impl<Item, Err: Clone> Clone for ThrowObservable<Item, Err> {
  fn clone(&self) -> Self { ThrowObservable(self.0.clone(), TypeHint::new()) }
}

impl<Item, Err, O> Observable<Item, Err, O> for ThrowObservable<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.error(self.0) }
}

impl<Item, Err> ObservableExt<Item, Err> for ThrowObservable<Item, Err> {}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
pub fn empty<Item>() -> EmptyObservable<Item> { EmptyObservable(TypeHint::new()) }

pub struct EmptyObservable<Item>(TypeHint<Item>);

impl<Item> Clone for EmptyObservable<Item> {
  fn clone(&self) -> Self { EmptyObservable(TypeHint::new()) }
}

impl<Item, O> Observable<Item, Infallible, O> for EmptyObservable<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, observer: O) -> Self::Unsub { observer.complete() }
}

impl<Item> ObservableExt<Item, Infallible> for EmptyObservable<Item> {}

/// Creates an observable that never emits anything.
///
/// Neither emits a value, nor completes, nor emits an error.
pub fn never<Item>() -> NeverObservable<Item> { NeverObservable(TypeHint::new()) }

pub struct NeverObservable<Item>(TypeHint<Item>);

impl<Item> Clone for NeverObservable<Item> {
  fn clone(&self) -> Self { NeverObservable(TypeHint::new()) }
}

impl<Item, O> Observable<Item, Infallible, O> for NeverObservable<Item>
where
  O: Observer<Item, Infallible>,
{
  type Unsub = ();

  fn actual_subscribe(self, _observer: O) -> Self::Unsub {}
}

impl<Item> ObservableExt<Item, Infallible> for NeverObservable<Item> {}
