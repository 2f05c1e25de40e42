//! Sources of delayed callbacks.
//!
//! Time-based operators take a [`Scheduler`] by value, so tests can inject a
//! [`TestScheduler`] and drive virtual time by hand while production code
//! runs on a real executor.

use crate::{
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

mod test_scheduler;
pub use test_scheduler::TestScheduler;

#[cfg(feature = "futures-scheduler")]
mod futures_scheduler;

#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioLocalScheduler;

pub use std::time::Duration;

/// A Scheduler is an object to order task and schedule their execution.
pub trait Scheduler: Clone {
  /// Runs `task` once `delay` has elapsed, or as soon as possible when no
  /// delay is given. The task never runs once the returned handle was
  /// unsubscribed.
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + 'static;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
  Pending,
  Finished,
  Cancelled,
}

struct TaskState {
  status: TaskStatus,
  canceller: Option<Box<dyn FnOnce()>>,
}

/// Cancellation handle of one scheduled task.
#[derive(Clone)]
pub struct TaskHandle(MutRc<TaskState>);

impl Default for TaskHandle {
  fn default() -> Self { TaskHandle::new() }
}

impl TaskHandle {
  pub fn new() -> Self {
    TaskHandle(MutRc::own(TaskState { status: TaskStatus::Pending, canceller: None }))
  }

  /// A handle whose task can no longer run.
  pub fn finished() -> Self {
    TaskHandle(MutRc::own(TaskState { status: TaskStatus::Finished, canceller: None }))
  }

  /// Registers what to do on cancellation, e.g. aborting a spawned future.
  /// Runs at once if the handle was already cancelled.
  pub fn set_canceller(&self, canceller: impl FnOnce() + 'static) {
    let mut state = self.0.rc_deref_mut();
    match state.status {
      TaskStatus::Pending => state.canceller = Some(Box::new(canceller)),
      TaskStatus::Cancelled => {
        drop(state);
        canceller();
      }
      TaskStatus::Finished => {}
    }
  }

  pub fn status(&self) -> TaskStatus { self.0.rc_deref().status }

  /// Claims the right to run the task. Returns `false` when it was cancelled
  /// or has already run.
  pub fn begin(&self) -> bool {
    let mut state = self.0.rc_deref_mut();
    if state.status == TaskStatus::Pending {
      state.status = TaskStatus::Finished;
      state.canceller = None;
      true
    } else {
      false
    }
  }
}

impl Subscription for TaskHandle {
  fn unsubscribe(self) {
    let canceller = {
      let mut state = self.0.rc_deref_mut();
      if state.status != TaskStatus::Pending {
        return;
      }
      state.status = TaskStatus::Cancelled;
      state.canceller.take()
    };
    tracing::trace!("scheduled task cancelled");
    if let Some(canceller) = canceller {
      canceller();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.status() != TaskStatus::Pending }
}

#[cfg(test)]
mod test {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  #[rxlite_macro::test]
  fn cancel_runs_canceller_once() {
    let hit = Rc::new(Cell::new(0));
    let handle = TaskHandle::new();
    let c_hit = hit.clone();
    handle.set_canceller(move || c_hit.set(c_hit.get() + 1));
    handle.clone().unsubscribe();
    handle.clone().unsubscribe();
    assert_eq!(hit.get(), 1);
    assert_eq!(handle.status(), TaskStatus::Cancelled);
    assert!(!handle.begin());
  }

  #[rxlite_macro::test]
  fn finished_task_ignores_cancel() {
    let hit = Rc::new(Cell::new(false));
    let handle = TaskHandle::new();
    assert!(handle.begin());
    let c_hit = hit.clone();
    handle.set_canceller(move || c_hit.set(true));
    handle.clone().unsubscribe();
    assert!(!hit.get());
    assert_eq!(handle.status(), TaskStatus::Finished);
    assert!(TaskHandle::finished().is_closed());
  }
}
