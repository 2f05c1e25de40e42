use super::Subscription;

/// Object-safe mirror of [`Subscription`], `unsubscribe` takes `self` by value
/// and can't go through a vtable directly.
pub trait DynSubscription {
  fn box_unsubscribe(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T: Subscription> DynSubscription for T {
  #[inline]
  fn box_unsubscribe(self: Box<Self>) { (*self).unsubscribe() }

  #[inline]
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// A type-erased subscription.
///
/// Subscriptions are control handles that get stored and called later, so
/// the boxed form is `'static`.
pub struct BoxSubscription(Box<dyn DynSubscription>);

impl BoxSubscription {
  #[inline]
  pub fn new<U: Subscription + 'static>(subscription: U) -> Self { BoxSubscription(Box::new(subscription)) }
}

impl Subscription for BoxSubscription {
  #[inline]
  fn unsubscribe(self) { self.0.box_unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.box_is_closed() }
}
