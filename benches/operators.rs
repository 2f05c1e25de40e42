use bencher::{benchmark_group, benchmark_main, black_box, Bencher};
use rxlite::prelude::*;

fn map_filter_take(b: &mut Bencher) {
  b.iter(|| {
    let got = observable::from_iter(0..10_000)
      .map(|v| v * 3)
      .filter(|v| v % 2 == 0)
      .take(1_000)
      .to_vec();
    black_box(got)
  });
}

fn flat_map_sync(b: &mut Bencher) {
  b.iter(|| {
    let got = observable::from_iter(0..200)
      .flat_map(|v| observable::from_iter(0..v % 10))
      .reduce(|a, b| a + b)
      .to_vec();
    black_box(got)
  });
}

fn zip_and_scan(b: &mut Bencher) {
  b.iter(|| {
    let got = observable::from_iter(0..5_000)
      .zip(observable::from_iter((0..5_000).rev()))
      .scan(0i64, |acc, (a, b)| acc + i64::from(a) - i64::from(b))
      .distinct_until_changed()
      .to_vec();
    black_box(got)
  });
}

fn throttle_virtual_time(b: &mut Bencher) {
  b.iter(|| {
    let scheduler = TestScheduler::new();
    let emitter = EventEmitter::<u32>::new();
    let sub = observable::from_event(emitter.clone())
      .throttle(Duration::from_millis(5), scheduler.clone())
      .subscribe(|v| {
        black_box(v);
      });
    for v in 0..1_000 {
      scheduler.advance_by(Duration::from_millis(u64::from(v % 7)));
      emitter.emit(v);
    }
    scheduler.flush();
    sub.unsubscribe();
  });
}

benchmark_group!(benches, map_filter_take, flat_map_sync, zip_and_scan, throttle_virtual_time);
benchmark_main!(benches);
