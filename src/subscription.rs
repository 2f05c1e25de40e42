//! Cancellation handles.
//!
//! Every `subscribe` call returns a [`Subscription`]. Unsubscribing stops all
//! further notifications to the observer and releases upstream resources;
//! doing it more than once has no further effect.

mod boxed;
mod multi;
mod slot;
mod tuple;
mod wrapper;

pub use boxed::*;
pub use multi::*;
pub use slot::*;
pub use tuple::*;
pub use wrapper::*;

/// A handle that can cancel an ongoing subscription.
pub trait Subscription {
  /// Cancels the subscription.
  fn unsubscribe(self);

  /// `true` once the subscription was cancelled or has finished on its own.
  fn is_closed(&self) -> bool;
}

/// Synchronous sources finish inside `subscribe` and have nothing to cancel.
impl Subscription for () {
  #[inline]
  fn unsubscribe(self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<U: Subscription> Subscription for Option<U> {
  #[inline]
  fn unsubscribe(self) {
    if let Some(inner) = self {
      inner.unsubscribe()
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.as_ref().map_or(true, U::is_closed) }
}

/// Runs a closure on unsubscribe, typically a producer's teardown.
pub struct ClosureSubscription<F>(pub F);

impl<F: FnOnce()> Subscription for ClosureSubscription<F> {
  #[inline]
  fn unsubscribe(self) { (self.0)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

#[cfg(test)]
mod test {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  #[rxlite_macro::test]
  fn unit_is_closed() {
    assert!(().is_closed());
    assert!(None::<()>.is_closed());
  }

  #[rxlite_macro::test]
  fn closure_runs_on_unsubscribe() {
    let hit = Rc::new(Cell::new(0));
    let c_hit = hit.clone();
    let sub = Some(ClosureSubscription(move || c_hit.set(c_hit.get() + 1)));
    assert!(!sub.is_closed());
    sub.unsubscribe();
    assert_eq!(hit.get(), 1);
  }
}
