//! Integration tests for rxlite
//!
//! Operator chains across modules, driven by event sources, callbacks and
//! schedulers the way an application would combine them.

use std::{
  cell::{Cell, RefCell},
  convert::Infallible,
  rc::Rc,
};

use futures::executor::LocalPool;
use rxlite::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

#[rxlite_macro::test]
fn basic_chain_matches_iterator() {
  let input: Vec<i32> = (1..=20).collect();
  let expected: Vec<i32> = input.iter().map(|x| x * 3).filter(|x| x % 2 == 0).take(4).collect();
  let got = observable::from_iter(input).map(|x| x * 3).filter(|x| x % 2 == 0).take(4).to_vec();
  assert_eq!(got, Ok(expected));
}

#[rxlite_macro::test]
fn search_as_you_type() {
  init_tracing();
  let scheduler = TestScheduler::new();
  let keys = EventEmitter::<&'static str>::new();
  let stop = EventEmitter::<()>::new();
  let results = Rc::new(RefCell::new(vec![]));

  let lookup_scheduler = scheduler.clone();
  let c_results = results.clone();
  let c_scheduler = scheduler.clone();
  observable::from_event(keys.clone())
    .throttle(Duration::from_millis(300), scheduler.clone())
    .distinct_until_changed()
    .flat_map(move |query: &'static str| {
      let s = lookup_scheduler.clone();
      observable::from_callback(move |cb: Callback<String, Infallible>| {
        s.schedule(move || cb.resolve(Ok(format!("results for {query}"))), Some(Duration::from_millis(50)));
      })
    })
    .take_until(observable::from_event(stop.clone()))
    .subscribe(move |r| c_results.borrow_mut().push((c_scheduler.now().as_millis(), r)));

  for (at, key) in [(0, "r"), (100, "ru"), (200, "rus"), (600, "rust"), (700, "rus"), (1100, "rust")] {
    scheduler.advance_to(Duration::from_millis(at));
    keys.emit(key);
  }
  scheduler.advance_to(Duration::from_millis(1500));
  stop.emit(());
  keys.emit("rusty");
  scheduler.flush();

  assert_eq!(
    *results.borrow(),
    vec![(550, "results for rus".to_owned()), (1450, "results for rust".to_owned())]
  );
  assert_eq!(keys.listener_count(), 0);
  assert_eq!(stop.listener_count(), 0);
}

#[rxlite_macro::test]
fn sequenced_callbacks() {
  let load_orders = |user: u32| {
    observable::from_callback(move |cb: Callback<Vec<&'static str>, String>| {
      cb.resolve(if user == 7 { Ok(vec!["book", "pen"]) } else { Err(format!("no orders for {user}")) })
    })
  };

  let got = observable::from_callback(|cb: Callback<u32, String>| cb.resolve(Ok(7)))
    .flat_map(load_orders)
    .zip(observable::of("profile").with_err::<String>())
    .to_vec();
  assert_eq!(got, Ok(vec![(vec!["book", "pen"], "profile")]));

  let got = observable::from_callback(|cb: Callback<u32, String>| cb.resolve(Ok(3)))
    .flat_map(load_orders)
    .to_vec();
  assert_eq!(got, Err(CollectError::Source("no orders for 3".to_owned())));
}

#[rxlite_macro::test]
fn running_totals_on_virtual_time() {
  let scheduler = TestScheduler::new();
  let totals = Rc::new(RefCell::new(vec![]));
  let sum = Rc::new(Cell::new(None));
  let (c_totals, c_sum) = (totals.clone(), sum.clone());

  let ticks = observable::interval(Duration::from_millis(10), scheduler.clone()).take(4);
  ticks.clone().scan(0, |acc, v| acc + v).subscribe(move |v| c_totals.borrow_mut().push(v));
  ticks.reduce(|a, b| a + b).subscribe(move |v| c_sum.set(Some(v)));

  scheduler.advance_by(Duration::from_millis(25));
  assert_eq!(*totals.borrow(), vec![0, 1]);
  assert_eq!(sum.get(), None);

  scheduler.flush();
  assert_eq!(*totals.borrow(), vec![0, 1, 3, 6]);
  assert_eq!(sum.get(), Some(6));
}

#[rxlite_macro::test]
fn zip_all_of_timers() {
  let scheduler = TestScheduler::new();
  let rows = Rc::new(RefCell::new(vec![]));
  let c_rows = rows.clone();
  let sources = [30u64, 10, 20]
    .into_iter()
    .map(|ms| observable::interval(Duration::from_millis(ms), scheduler.clone()).take(2))
    .collect::<Vec<_>>();
  observable::zip_all(sources, |row: Vec<usize>| row).subscribe(move |row| c_rows.borrow_mut().push(row));

  scheduler.flush();
  assert_eq!(*rows.borrow(), vec![vec![0, 0, 0], vec![1, 1, 1]]);
  assert!(scheduler.is_empty());
}

#[rxlite_macro::test]
fn local_pool_drives_interval() {
  let mut pool = LocalPool::new();
  let seen = Rc::new(RefCell::new(vec![]));
  let completed = Rc::new(Cell::new(false));
  let (c_seen, c_completed) = (seen.clone(), completed.clone());
  observable::interval(Duration::from_millis(1), pool.spawner())
    .take(3)
    .subscribe_complete(move |v| c_seen.borrow_mut().push(v), move || c_completed.set(true));

  pool.run();
  assert_eq!(*seen.borrow(), vec![0, 1, 2]);
  assert!(completed.get());
}

#[rxlite_macro::test]
fn dropped_guard_stops_everything() {
  let scheduler = TestScheduler::new();
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  let guard = observable::interval(Duration::from_millis(10), scheduler.clone())
    .map(|v| v * 100)
    .subscribe(move |v| c_seen.borrow_mut().push(v))
    .unsubscribe_when_dropped();

  scheduler.advance_by(Duration::from_millis(20));
  drop(guard);
  scheduler.advance_by(Duration::from_millis(100));

  assert_eq!(*seen.borrow(), vec![0, 100]);
  assert!(scheduler.is_empty());
}

#[cfg(feature = "tokio-scheduler")]
#[rxlite_macro::test(local)]
async fn tokio_scheduler_drives_throttle() {
  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  observable::interval(Duration::from_millis(2), TokioLocalScheduler)
    .take(3)
    .throttle(Duration::from_millis(50), TokioLocalScheduler)
    .subscribe(move |v| c_seen.borrow_mut().push(v));

  tokio::time::sleep(Duration::from_millis(100)).await;
  assert_eq!(*seen.borrow(), vec![2]);
}
