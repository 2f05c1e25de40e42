//! Zip operators
//!
//! Zip combines items from several observables by index. Each source gets a
//! FIFO buffer; a combined value is emitted whenever every buffer holds at
//! least one item. The output ends as soon as a finished source has nothing
//! left buffered, since no further combination can be formed; the remaining
//! sources are then cancelled. Any error is forwarded at once and cancels
//! the rest.

use std::collections::VecDeque;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::{MutRc, RcDerefMut},
  subscription::{MultiSubscription, Subscription, SubscriptionSlot, TupleSubscription},
  type_hint::TypeHint,
};

#[inline]
pub(crate) fn pair<A, B>(a: A, b: B) -> (A, B) { (a, b) }

// ==================== Zip Operator ====================

pub struct ZipOp<A, B, F, ItemA, ItemB> {
  source_a: A,
  source_b: B,
  func: F,
  _hint: TypeHint<(ItemA, ItemB)>,
}

impl<A, B, F, ItemA, ItemB> ZipOp<A, B, F, ItemA, ItemB> {
  #[inline]
  pub(crate) fn new(source_a: A, source_b: B, func: F) -> Self {
    ZipOp { source_a, source_b, func, _hint: TypeHint::new() }
  }
}

impl<A: Clone, B: Clone, F: Clone, ItemA, ItemB> Clone for ZipOp<A, B, F, ItemA, ItemB> {
  fn clone(&self) -> Self { ZipOp::new(self.source_a.clone(), self.source_b.clone(), self.func.clone()) }
}

impl<A, B, F, ItemA, ItemB, Out, Err, O> Observable<Out, Err, O> for ZipOp<A, B, F, ItemA, ItemB>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
  A: Observable<ItemA, Err, ZipAObserver<O, F, ItemA, ItemB, Out, Err>>,
  A::Unsub: 'static,
  B: Observable<ItemB, Err, ZipBObserver<O, F, ItemA, ItemB, Out, Err>>,
  B::Unsub: 'static,
{
  type Unsub = TupleSubscription<SubscriptionSlot, SubscriptionSlot>;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let core = ZipCore {
      downstream: SharedObserver::new(observer),
      state: MutRc::own(ZipState {
        buffer_a: VecDeque::new(),
        buffer_b: VecDeque::new(),
        completed_a: false,
        completed_b: false,
      }),
      func: MutRc::own(self.func),
      unsub_a: SubscriptionSlot::new(),
      unsub_b: SubscriptionSlot::new(),
    };
    let unsub_a = self.source_a.actual_subscribe(ZipAObserver(core.clone()));
    core.unsub_a.set(unsub_a);
    if core.downstream.is_stopped() {
      core.unsub_b.clone().unsubscribe();
    } else {
      let unsub_b = self.source_b.actual_subscribe(ZipBObserver(core.clone()));
      core.unsub_b.set(unsub_b);
    }
    TupleSubscription::new(core.unsub_a, core.unsub_b)
  }
}

impl<A, B, F, ItemA, ItemB, Out, Err> ObservableExt<Out, Err> for ZipOp<A, B, F, ItemA, ItemB>
where
  A: ObservableExt<ItemA, Err>,
  B: ObservableExt<ItemB, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
{
}

// ==================== Shared State ====================

struct ZipState<ItemA, ItemB> {
  buffer_a: VecDeque<ItemA>,
  buffer_b: VecDeque<ItemB>,
  completed_a: bool,
  completed_b: bool,
}

pub struct ZipCore<O, F, ItemA, ItemB, Out, Err> {
  downstream: SharedObserver<O, Out, Err>,
  state: MutRc<ZipState<ItemA, ItemB>>,
  func: MutRc<F>,
  unsub_a: SubscriptionSlot,
  unsub_b: SubscriptionSlot,
}

impl<O, F, ItemA, ItemB, Out, Err> Clone for ZipCore<O, F, ItemA, ItemB, Out, Err> {
  fn clone(&self) -> Self {
    ZipCore {
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      func: self.func.clone(),
      unsub_a: self.unsub_a.clone(),
      unsub_b: self.unsub_b.clone(),
    }
  }
}

impl<O, F, ItemA, ItemB, Out, Err> ZipCore<O, F, ItemA, ItemB, Out, Err>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
{
  fn push_a(&self, a: ItemA) {
    let ready = {
      let mut state = self.state.rc_deref_mut();
      match state.buffer_b.pop_front() {
        Some(b) => Some((a, b)),
        None => {
          state.buffer_a.push_back(a);
          None
        }
      }
    };
    if let Some((a, b)) = ready {
      self.emit(a, b);
    }
  }

  fn push_b(&self, b: ItemB) {
    let ready = {
      let mut state = self.state.rc_deref_mut();
      match state.buffer_a.pop_front() {
        Some(a) => Some((a, b)),
        None => {
          state.buffer_b.push_back(b);
          None
        }
      }
    };
    if let Some((a, b)) = ready {
      self.emit(a, b);
    }
  }

  fn emit(&self, a: ItemA, b: ItemB) {
    let value = {
      let mut func = self.func.rc_deref_mut();
      (*func)(a, b)
    };
    self.downstream.emit_next(value);
    self.check_complete();
  }

  fn check_complete(&self) {
    let done = {
      let state = self.state.rc_deref_mut();
      (state.completed_a && state.buffer_a.is_empty()) || (state.completed_b && state.buffer_b.is_empty())
    };
    if done {
      self.downstream.emit_complete();
      self.cancel();
    }
  }

  fn fail(&self, err: Err) {
    self.downstream.emit_error(err);
    self.cancel();
  }

  fn cancel(&self) {
    self.unsub_a.clone().unsubscribe();
    self.unsub_b.clone().unsubscribe();
  }
}

// ==================== Observer Structs ====================

pub struct ZipAObserver<O, F, ItemA, ItemB, Out, Err>(ZipCore<O, F, ItemA, ItemB, Out, Err>);

impl<O, F, ItemA, ItemB, Out, Err> Observer<ItemA, Err> for ZipAObserver<O, F, ItemA, ItemB, Out, Err>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
{
  fn next(&mut self, value: ItemA) { self.0.push_a(value) }

  fn error(self, err: Err) { self.0.fail(err) }

  fn complete(self) {
    self.0.state.rc_deref_mut().completed_a = true;
    self.0.check_complete();
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.0.downstream) }
}

pub struct ZipBObserver<O, F, ItemA, ItemB, Out, Err>(ZipCore<O, F, ItemA, ItemB, Out, Err>);

impl<O, F, ItemA, ItemB, Out, Err> Observer<ItemB, Err> for ZipBObserver<O, F, ItemA, ItemB, Out, Err>
where
  O: Observer<Out, Err>,
  F: FnMut(ItemA, ItemB) -> Out,
{
  fn next(&mut self, value: ItemB) { self.0.push_b(value) }

  fn error(self, err: Err) { self.0.fail(err) }

  fn complete(self) {
    self.0.state.rc_deref_mut().completed_b = true;
    self.0.check_complete();
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.0.downstream) }
}

// ==================== ZipAll ====================

/// Zips any number of sources of one type; `func` receives one item of each
/// source, in source order. With no sources the result completes at once.
pub fn zip_all<S, F, Item, Err, Out>(sources: Vec<S>, func: F) -> ZipAllOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Vec<Item>) -> Out,
{
  ZipAllOp { sources, func, _hint: TypeHint::new() }
}

pub struct ZipAllOp<S, F, Item> {
  sources: Vec<S>,
  func: F,
  _hint: TypeHint<Item>,
}

impl<S: Clone, F: Clone, Item> Clone for ZipAllOp<S, F, Item> {
  fn clone(&self) -> Self {
    ZipAllOp { sources: self.sources.clone(), func: self.func.clone(), _hint: TypeHint::new() }
  }
}

impl<S, F, Item, Out, Err, O> Observable<Out, Err, O> for ZipAllOp<S, F, Item>
where
  O: Observer<Out, Err>,
  F: FnMut(Vec<Item>) -> Out,
  S: Observable<Item, Err, ZipAllObserver<O, F, Item, Out, Err>>,
  S::Unsub: 'static,
{
  type Unsub = MultiSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let count = self.sources.len();
    let subscriptions = MultiSubscription::new();
    let core = ZipAllCore {
      downstream: SharedObserver::new(observer),
      state: MutRc::own(ZipAllState {
        buffers: (0..count).map(|_| VecDeque::new()).collect(),
        completed: vec![false; count],
      }),
      func: MutRc::own(self.func),
      subscriptions: subscriptions.clone(),
    };
    if count == 0 {
      core.downstream.emit_complete();
      return subscriptions;
    }
    for (index, source) in self.sources.into_iter().enumerate() {
      if core.downstream.is_stopped() {
        break;
      }
      let id = subscriptions.reserve_id();
      let unsub = source.actual_subscribe(ZipAllObserver { core: core.clone(), index });
      subscriptions.insert(id, unsub);
    }
    subscriptions
  }
}

impl<S, F, Item, Out, Err> ObservableExt<Out, Err> for ZipAllOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Vec<Item>) -> Out,
{
}

struct ZipAllState<Item> {
  buffers: Vec<VecDeque<Item>>,
  completed: Vec<bool>,
}

pub struct ZipAllCore<O, F, Item, Out, Err> {
  downstream: SharedObserver<O, Out, Err>,
  state: MutRc<ZipAllState<Item>>,
  func: MutRc<F>,
  subscriptions: MultiSubscription,
}

impl<O, F, Item, Out, Err> Clone for ZipAllCore<O, F, Item, Out, Err> {
  fn clone(&self) -> Self {
    ZipAllCore {
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      func: self.func.clone(),
      subscriptions: self.subscriptions.clone(),
    }
  }
}

pub struct ZipAllObserver<O, F, Item, Out, Err> {
  core: ZipAllCore<O, F, Item, Out, Err>,
  index: usize,
}

impl<O, F, Item, Out, Err> ZipAllObserver<O, F, Item, Out, Err>
where
  O: Observer<Out, Err>,
  F: FnMut(Vec<Item>) -> Out,
{
  fn check_complete(&self) {
    let done = {
      let state = self.core.state.rc_deref_mut();
      state.completed.iter().zip(&state.buffers).any(|(done, buffer)| *done && buffer.is_empty())
    };
    if done {
      self.core.downstream.emit_complete();
      self.core.subscriptions.clone().unsubscribe();
    }
  }
}

impl<O, F, Item, Out, Err> Observer<Item, Err> for ZipAllObserver<O, F, Item, Out, Err>
where
  O: Observer<Out, Err>,
  F: FnMut(Vec<Item>) -> Out,
{
  fn next(&mut self, value: Item) {
    let row = {
      let mut state = self.core.state.rc_deref_mut();
      state.buffers[self.index].push_back(value);
      if state.buffers.iter().all(|b| !b.is_empty()) {
        Some(state.buffers.iter_mut().filter_map(VecDeque::pop_front).collect::<Vec<_>>())
      } else {
        None
      }
    };
    if let Some(row) = row {
      let value = {
        let mut func = self.core.func.rc_deref_mut();
        (*func)(row)
      };
      self.core.downstream.emit_next(value);
      self.check_complete();
    }
  }

  fn error(self, err: Err) {
    self.core.downstream.emit_error(err);
    self.core.subscriptions.clone().unsubscribe();
  }

  fn complete(self) {
    self.core.state.rc_deref_mut().completed[self.index] = true;
    self.check_complete();
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.core.downstream) }
}
