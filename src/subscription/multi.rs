use smallvec::SmallVec;

use super::{BoxSubscription, Subscription};
use crate::rc::{MutRc, RcDeref, RcDerefMut};

#[derive(Default)]
struct MultiState {
  closed: bool,
  next_id: usize,
  items: SmallVec<[(usize, BoxSubscription); 2]>,
  released: SmallVec<[usize; 2]>,
}

/// A growing set of subscriptions with ID-based release.
///
/// Fan-in operators reserve an ID before subscribing an inner source (its
/// observer needs the ID to release itself on completion), then insert the
/// resulting subscription. Unsubscribing cancels everything still held and
/// every subscription inserted afterwards.
#[derive(Clone, Default)]
pub struct MultiSubscription(MutRc<MultiState>);

impl MultiSubscription {
  pub fn new() -> Self { Self::default() }

  pub fn reserve_id(&self) -> usize {
    let mut state = self.0.rc_deref_mut();
    let id = state.next_id;
    state.next_id += 1;
    id
  }

  /// Inserts a subscription under an ID from [`Self::reserve_id`].
  ///
  /// Subscriptions that are already closed, or whose ID was released before
  /// they arrived, are not kept.
  pub fn insert<U: Subscription + 'static>(&self, id: usize, subscription: U) {
    let mut state = self.0.rc_deref_mut();
    if state.closed {
      drop(state);
      subscription.unsubscribe();
      return;
    }
    if let Some(idx) = state.released.iter().position(|i| *i == id) {
      state.released.swap_remove(idx);
      return;
    }
    if !subscription.is_closed() {
      state.items.push((id, BoxSubscription::new(subscription)));
    }
  }

  pub fn add<U: Subscription + 'static>(&self, subscription: U) -> usize {
    let id = self.reserve_id();
    self.insert(id, subscription);
    id
  }

  /// Releases the subscription without cancelling it, its source has already
  /// finished.
  pub fn remove(&self, id: usize) {
    let removed = {
      let mut state = self.0.rc_deref_mut();
      match state.items.iter().position(|(i, _)| *i == id) {
        Some(idx) => Some(state.items.remove(idx)),
        None => {
          state.released.push(id);
          None
        }
      }
    };
    drop(removed);
  }

  pub fn len(&self) -> usize { self.0.rc_deref().items.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Subscription for MultiSubscription {
  fn unsubscribe(self) {
    let items = {
      let mut state = self.0.rc_deref_mut();
      state.closed = true;
      std::mem::take(&mut state.items)
    };
    for (_, item) in items {
      item.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

#[cfg(test)]
mod test {
  use std::{cell::Cell, rc::Rc};

  use super::*;
  use crate::subscription::{ClosureSubscription, SubscriptionSlot};

  #[rxlite_macro::test]
  fn add_remove_unsubscribe() {
    let hit = Rc::new(Cell::new(0));
    let multi = MultiSubscription::new();
    let h1 = hit.clone();
    let h2 = hit.clone();
    let id1 = multi.add(ClosureSubscription(move || h1.set(h1.get() + 1)));
    multi.add(ClosureSubscription(move || h2.set(h2.get() + 10)));
    assert_eq!(multi.len(), 2);

    multi.remove(id1);
    assert_eq!(multi.len(), 1);
    assert_eq!(hit.get(), 0);

    multi.clone().unsubscribe();
    assert_eq!(hit.get(), 10);
    assert!(multi.is_closed());
    assert!(multi.is_empty());
  }

  #[rxlite_macro::test]
  fn closed_subscriptions_are_not_kept() {
    let multi = MultiSubscription::new();
    let id = multi.reserve_id();
    multi.insert(id, ());
    assert!(multi.is_empty());

    let slot = SubscriptionSlot::new();
    let id = multi.reserve_id();
    multi.remove(id);
    multi.insert(id, slot.clone());
    assert!(multi.is_empty());
    assert!(!slot.is_closed());

    multi.clone().unsubscribe();
    multi.add(slot.clone());
    assert!(slot.is_closed());
  }
}
