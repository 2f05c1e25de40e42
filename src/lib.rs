//! # rxlite: a small Observable library
//!
//! Lazy, push-based sequences with the usual operator algebra, built for
//! single-threaded cooperative code.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let evens = observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .to_vec();
//! assert_eq!(evens, Ok(vec![0, 4, 8, 12, 16]));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A re-subscribable description of a push sequence |
//! | [`ObservableExt`] | The operator methods and `subscribe*` |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | Source of delayed callbacks for time-based operators |
//!
//! Every observer sees at most one terminal notification and nothing after
//! it. Emissions that arrive while a handler is still running are queued and
//! delivered once it returns, so handlers may emit, subscribe or unsubscribe
//! freely.
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): [`Scheduler`] for
//!   `futures::executor::LocalSpawner`
//! - **`tokio-scheduler`**: `TokioLocalScheduler`, spawning on a tokio
//!   `LocalSet`
//!
//! [`Observable`]: observable::Observable
//! [`ObservableExt`]: observable::ObservableExt
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subscription;
pub mod type_hint;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
