//! Virtual time scheduler for deterministic tests of time-based operators.
//!
//! Time only moves when the test says so:
//!
//! ```rust
//! use rxlite::prelude::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let scheduler = TestScheduler::new();
//! let fired = Rc::new(Cell::new(false));
//! let c_fired = fired.clone();
//! observable::timer(Duration::from_millis(100), scheduler.clone())
//!   .subscribe(move |_| c_fired.set(true));
//!
//! scheduler.advance_by(Duration::from_millis(99));
//! assert!(!fired.get());
//! scheduler.advance_by(Duration::from_millis(1));
//! assert!(fired.get());
//! ```
//!
//! Tasks run synchronously inside `advance_by` / `advance_to` / `flush`, in
//! due-time order; tasks due at the same instant run in the order they were
//! scheduled. While a task runs, [`TestScheduler::now`] reports its due time,
//! so work it schedules is relative to that instant.

use std::{cmp::Ordering, collections::BinaryHeap};

use super::{Duration, Scheduler, TaskHandle};
use crate::{
  rc::{MutRc, RcDeref, RcDerefMut},
  subscription::Subscription,
};

struct ScheduledTask {
  due: Duration,
  task_id: usize,
  task: Box<dyn FnOnce()>,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool { self.due == other.due && self.task_id == other.task_id }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other.due.cmp(&self.due).then_with(|| other.task_id.cmp(&self.task_id))
  }
}

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
}

/// A virtual time scheduler. Clones share the same clock and queue.
#[derive(Clone, Default)]
pub struct TestScheduler(MutRc<TestSchedulerState>);

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// The current virtual time, starting at zero.
  pub fn now(&self) -> Duration { self.0.rc_deref().virtual_time }

  /// Number of tasks still waiting to run; cancelled tasks don't count.
  pub fn pending_count(&self) -> usize {
    self
      .0
      .rc_deref()
      .task_queue
      .iter()
      .filter(|t| !t.handle.is_closed())
      .count()
  }

  pub fn is_empty(&self) -> bool { self.pending_count() == 0 }

  /// Moves the clock forward by `duration`, running every task that falls due.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.now() + duration;
    self.advance_to(target);
  }

  /// Moves the clock to `time`, running every task due at or before it. The
  /// clock never moves backwards.
  pub fn advance_to(&self, time: Duration) {
    tracing::trace!(?time, "advancing virtual time");
    while let Some(task) = self.pop_due(Some(time)) {
      Self::run(task);
    }
    let mut state = self.0.rc_deref_mut();
    if state.virtual_time < time {
      state.virtual_time = time;
    }
  }

  /// Runs every pending task, advancing the clock as far as needed. Never
  /// returns while a periodic source (such as `interval`) is still active.
  pub fn flush(&self) {
    while let Some(task) = self.pop_due(None) {
      Self::run(task);
    }
  }

  fn pop_due(&self, limit: Option<Duration>) -> Option<ScheduledTask> {
    let mut state = self.0.rc_deref_mut();
    let due = state.task_queue.peek()?.due;
    if limit.map_or(false, |limit| due > limit) {
      return None;
    }
    let task = state.task_queue.pop()?;
    if state.virtual_time < task.due {
      state.virtual_time = task.due;
    }
    Some(task)
  }

  fn run(task: ScheduledTask) {
    if task.handle.begin() {
      (task.task)();
    }
  }
}

impl Scheduler for TestScheduler {
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + 'static,
  {
    let handle = TaskHandle::new();
    let mut state = self.0.rc_deref_mut();
    let due = state.virtual_time + delay.unwrap_or_default();
    let task_id = state.next_task_id;
    state.next_task_id += 1;
    tracing::trace!(task_id, ?due, "task scheduled");
    state.task_queue.push(ScheduledTask {
      due,
      task_id,
      task: Box::new(task),
      handle: handle.clone(),
    });
    handle
  }
}
