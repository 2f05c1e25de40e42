//! Operator implementations. Each operator is an `XxxOp` observable that
//! wraps its source, and an observer that does the work per subscription.
//! The methods creating them live on
//! [`ObservableExt`](crate::observable::ObservableExt).

use crate::{
  observer::Observer,
  subscription::{Subscription, SubscriptionSlot},
};

pub mod distinct_until_changed;
pub mod filter;
pub mod map;
pub mod map_err;
pub mod merge_all;
pub mod on_complete;
pub mod on_error;
pub mod reduce;
pub mod scan;
pub mod take;
pub mod take_until;
pub mod throttle;
pub mod to_vec;
pub mod zip;

/// Terminates `observer` with `err` and cancels the upstream; shared by the
/// `try_*` operators.
pub(crate) fn fail<O, Item, Err>(observer: &mut Option<O>, upstream: &SubscriptionSlot, err: Err)
where
  O: Observer<Item, Err>,
{
  if let Some(observer) = observer.take() {
    observer.error(err);
  }
  upstream.clone().unsubscribe();
}
