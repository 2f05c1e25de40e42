use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  scheduler::{Duration, Scheduler, TaskHandle},
};

/// Returns an observable which emits `()` once after `delay` on
/// `scheduler`, then completes.
pub fn timer<SD>(delay: Duration, scheduler: SD) -> TimerObservable<SD> { TimerObservable { delay, scheduler } }

#[derive(Clone)]
pub struct TimerObservable<SD> {
  delay: Duration,
  scheduler: SD,
}

impl<O, SD> Observable<(), Infallible, O> for TimerObservable<SD>
where
  O: Observer<(), Infallible> + 'static,
  SD: Scheduler,
{
  type Unsub = TaskHandle;

  fn actual_subscribe(self, mut observer: O) -> Self::Unsub {
    self.scheduler.schedule(
      move || {
        observer.next(());
        observer.complete();
      },
      Some(self.delay),
    )
  }
}

impl<SD> ObservableExt<(), Infallible> for TimerObservable<SD> {}
