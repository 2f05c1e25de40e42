use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  scheduler::{Duration, Scheduler},
  subscription::SubscriptionSlot,
};

/// Creates an observable which emits sequential numbers, starting at `0`,
/// every `period` on `scheduler`. It never completes.
pub fn interval<SD>(period: Duration, scheduler: SD) -> IntervalObservable<SD> {
  IntervalObservable { period, scheduler }
}

#[derive(Clone)]
pub struct IntervalObservable<SD> {
  period: Duration,
  scheduler: SD,
}

impl<O, SD> Observable<usize, Infallible, O> for IntervalObservable<SD>
where
  O: Observer<usize, Infallible> + 'static,
  SD: Scheduler + 'static,
{
  type Unsub = SubscriptionSlot;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let ticks = SubscriptionSlot::new();
    schedule_tick(SharedObserver::new(observer), ticks.clone(), self.scheduler, self.period, 0);
    ticks
  }
}

impl<SD> ObservableExt<usize, Infallible> for IntervalObservable<SD> {}

fn schedule_tick<O, SD>(
  observer: SharedObserver<O, usize, Infallible>,
  ticks: SubscriptionSlot,
  scheduler: SD,
  period: Duration,
  index: usize,
) where
  O: Observer<usize, Infallible> + 'static,
  SD: Scheduler + 'static,
{
  let next_ticks = ticks.clone();
  let next_scheduler = scheduler.clone();
  let handle = scheduler.schedule(
    move || {
      observer.emit_next(index);
      if !Observer::is_closed(&observer) {
        schedule_tick(observer, next_ticks, next_scheduler, period, index + 1);
      }
    },
    Some(period),
  );
  ticks.set(handle);
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn ticks_every_period() {
    let scheduler = TestScheduler::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let c_scheduler = scheduler.clone();
    let sub = observable::interval(Duration::from_millis(10), scheduler.clone())
      .subscribe(move |v| c_seen.borrow_mut().push((v, c_scheduler.now().as_millis())));

    scheduler.advance_by(Duration::from_millis(35));
    assert_eq!(*seen.borrow(), vec![(0, 10), (1, 20), (2, 30)]);

    sub.unsubscribe();
    scheduler.advance_by(Duration::from_millis(100));
    assert_eq!(seen.borrow().len(), 3);
    assert!(scheduler.is_empty());
  }

  #[rxlite_macro::test]
  fn take_stops_the_ticks() {
    let scheduler = TestScheduler::new();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    observable::interval(Duration::from_millis(5), scheduler.clone())
      .take(3)
      .subscribe(move |v| c_seen.borrow_mut().push(v));

    scheduler.flush();
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(scheduler.now(), Duration::from_millis(15));
  }
}
