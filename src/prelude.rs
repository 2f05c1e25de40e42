//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::CollectError,
  observable::{
    self, Callback, Emitter, EventEmitter, EventSource, ListenerId, Observable, ObservableExt,
    ObservableIter,
  },
  observer::{BoxedObserver, DynObserver, FnObserver, Observer, SharedObserver},
  ops::throttle::ThrottleFlush,
  scheduler::{Duration, Scheduler, TaskHandle, TaskStatus, TestScheduler},
  subscription::*,
};

#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioLocalScheduler;
