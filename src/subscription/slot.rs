use super::{BoxSubscription, Subscription};
use crate::rc::{MutRc, RcDeref, RcDerefMut};

#[derive(Default)]
struct SlotState {
  closed: bool,
  inner: Option<BoxSubscription>,
}

/// A shared, replaceable place for one subscription.
///
/// Operators that have to cancel their own upstream (`take`, `take_until`,
/// the `try_*` family) hand a clone of the slot to their observer before the
/// upstream subscription exists, then fill it in once `actual_subscribe`
/// returns. Once the slot is closed anything stored into it is cancelled
/// right away, which covers an observer that finished during the subscribe
/// call.
#[derive(Clone, Default)]
pub struct SubscriptionSlot(MutRc<SlotState>);

impl SubscriptionSlot {
  pub fn new() -> Self { Self::default() }

  /// Stores `subscription`, cancelling the one held before.
  pub fn set<U: Subscription + 'static>(&self, subscription: U) {
    let mut state = self.0.rc_deref_mut();
    if state.closed {
      drop(state);
      subscription.unsubscribe();
      return;
    }
    let prev = state.inner.replace(BoxSubscription::new(subscription));
    drop(state);
    if let Some(prev) = prev {
      prev.unsubscribe();
    }
  }
}

impl Subscription for SubscriptionSlot {
  fn unsubscribe(self) {
    let inner = {
      let mut state = self.0.rc_deref_mut();
      state.closed = true;
      state.inner.take()
    };
    if let Some(inner) = inner {
      inner.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}
