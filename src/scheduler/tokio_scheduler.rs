use super::{Duration, Scheduler, TaskHandle};

/// Spawns tasks with `tokio::task::spawn_local`, so it must be used from
/// inside a `tokio::task::LocalSet`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioLocalScheduler;

impl Scheduler for TokioLocalScheduler {
  fn schedule<T>(&self, task: T, delay: Option<Duration>) -> TaskHandle
  where
    T: FnOnce() + 'static,
  {
    let handle = TaskHandle::new();
    let run_handle = handle.clone();
    let join = tokio::task::spawn_local(async move {
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
      }
      if run_handle.begin() {
        task();
      }
    });
    handle.set_canceller(move || join.abort());
    handle
  }
}
