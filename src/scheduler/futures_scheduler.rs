use futures::{
  executor::LocalSpawner,
  future::{abortable, FutureExt},
  task::LocalSpawnExt,
};

use super::{Duration, Scheduler, TaskHandle};

/// Runs tasks on a `futures::executor::LocalPool`, sleeping with
/// `futures-time` timers.
impl Scheduler for LocalSpawner {
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + 'static,
  {
    let handle = TaskHandle::new();
    let run_handle = handle.clone();
    let (fut, abort) = abortable(async move {
      if let Some(delay) = delay {
        futures_time::task::sleep(delay.into()).await;
      }
      if run_handle.begin() {
        task();
      }
    });
    handle.set_canceller(move || abort.abort());
    if let Err(err) = self.spawn_local(fut.map(|_| ())) {
      tracing::error!(%err, "failed to spawn scheduled task");
    }
    handle
  }
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use futures::executor::LocalPool;

  use super::*;
  use crate::subscription::Subscription;

  #[rxlite_macro::test]
  fn delayed_tasks_run_on_local_pool() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let log = Rc::new(RefCell::new(vec![]));

    let c_log = log.clone();
    spawner.schedule(move || c_log.borrow_mut().push(2), Some(Duration::from_millis(10)));
    let c_log = log.clone();
    spawner.schedule(move || c_log.borrow_mut().push(1), None);
    let c_log = log.clone();
    let cancelled = spawner.schedule(move || c_log.borrow_mut().push(3), Some(Duration::from_millis(5)));
    cancelled.unsubscribe();

    pool.run();
    assert_eq!(*log.borrow(), vec![1, 2]);
  }
}
