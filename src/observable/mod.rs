//! The `observable` module provides the building blocks for creating and
//! manipulating observables: cold, re-subscribable descriptions of push-based
//! pipelines.

mod emitter;

pub use emitter::Emitter;

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crate::errors::PipelineError;
use crate::observer::Observer;
use crate::scheduler::Scheduler;
use crate::subscription::subscribe::{Disposable, Subscribeable, Subscriber};

/// The `Observable` struct represents a source of values that can be observed
/// and transformed.
///
/// An observable is an immutable wrapper around one subscription function: a
/// deferred unit of work that, given a [`Subscriber`], performs production and
/// delivers events to it. Nothing happens until [`subscribe`] is called, and
/// every `subscribe` call re-runs production from scratch (cold semantics);
/// side effects are not shared across subscribers.
///
/// Operators never mutate an observable; they wrap its subscription function
/// and return a new one.
///
/// [`subscribe`]: Subscribeable::subscribe
///
/// # Example: custom source via `new`
///
/// ```no_run
/// use rxo::subscribe::Subscriber;
/// use rxo::{Observable, Observer, Subscribeable};
///
/// // Emits values from 1 to 10, synchronously, then completes.
/// let emit_10 = Observable::new(|mut subscriber: Subscriber<_>| {
///     for i in 1..=10 {
///         subscriber.next(i);
///     }
///     subscriber.complete();
/// });
///
/// let observer = Subscriber::new(
///     |v| println!("Emitted {}", v),
///     |e| eprintln!("Error: {}", e),
///     || println!("Completed"),
/// );
///
/// // Observables are cold: comment this line out and nothing is emitted.
/// emit_10.subscribe(observer);
/// ```
///
/// # Example: asynchronous source
///
/// A subscription function may hand production off to another thread. The
/// emitting thread should poll the subscriber's [`Disposable`] so that
/// cancellation actually stops production.
///
/// ```no_run
/// use std::time::Duration;
///
/// use rxo::subscribe::Subscriber;
/// use rxo::{Observable, Observer, Subscribeable};
///
/// let observable = Observable::new(|mut subscriber: Subscriber<_>| {
///     let disposable = subscriber.disposable();
///
///     std::thread::spawn(move || {
///         for i in 0..=10_000 {
///             if disposable.is_disposed() {
///                 break;
///             }
///             subscriber.next(i);
///             std::thread::sleep(Duration::from_millis(1));
///         }
///         subscriber.complete();
///     });
/// });
///
/// let subscription = observable.subscribe(Subscriber::on_next(|v| println!("Emitted {}", v)));
///
/// // Stop background emissions.
/// subscription.dispose();
/// ```
pub struct Observable<T> {
    subscribe_fn: Box<dyn Fn(Subscriber<T>) + Send + Sync>,
}

impl<T: 'static> Observable<T> {
    /// Creates a new `Observable` with the provided subscription function.
    ///
    /// The subscription function defines the behavior of the observable when
    /// subscribed: it receives the subscriber and is responsible for
    /// delivering events to it. It must be re-entrant-safe; it may be invoked
    /// concurrently, once per `subscribe` call, and must not share mutable
    /// state between invocations.
    pub fn new(sf: impl Fn(Subscriber<T>) + Send + Sync + 'static) -> Self {
        Observable {
            subscribe_fn: Box::new(sf),
        }
    }

    /// Creates an `Observable` from a producer callback.
    ///
    /// On every subscription the `producer` is invoked with a fresh
    /// [`Emitter`] that forwards to the subscriber. The invocation is wrapped
    /// in a failure boundary: if the producer panics, the panic is caught and
    /// delivered as a single `error` ([`PipelineError::CallbackPanic`] with
    /// stage `"create"`) instead of unwinding the producing thread.
    pub fn create(producer: impl Fn(&mut Emitter<T>) + Send + Sync + 'static) -> Self {
        Observable::new(move |subscriber| {
            let mut emitter = Emitter::new(subscriber);

            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| producer(&mut emitter))) {
                emitter.error(Arc::new(PipelineError::callback_panic("create", payload)));
            }
        })
    }

    /// Creates an `Observable` that emits the given items in order, then
    /// completes.
    ///
    /// Items are cloned for every subscription. The producer checks the
    /// subscription's disposal flag between emissions and stops early once
    /// the consumer has cancelled.
    pub fn just(items: impl IntoIterator<Item = T>) -> Self
    where
        T: Clone + Send + Sync,
    {
        let items: Vec<T> = items.into_iter().collect();

        Observable::create(move |emitter| {
            for item in &items {
                if emitter.is_disposed() {
                    return;
                }
                emitter.next(item.clone());
            }
            emitter.complete();
        })
    }

    /// Transforms the items emitted by the observable using a transformation
    /// function.
    ///
    /// If `f` panics, the panic is caught and delivered downstream as a
    /// single `error`; afterwards the terminal-state guard discards anything
    /// else arriving from upstream. Upstream `error` and `complete` pass
    /// through unchanged.
    pub fn map<U, F>(self, f: F) -> Observable<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        U: 'static,
    {
        let f = Arc::new(f);

        Observable::new(move |o: Subscriber<U>| {
            let f = Arc::clone(&f);
            let disposable = o.disposable();
            let o_shared = Arc::new(Mutex::new(o));
            let o_cloned_e = Arc::clone(&o_shared);
            let o_cloned_c = Arc::clone(&o_shared);

            let mut u = Subscriber::new(
                move |v| match catch_unwind(AssertUnwindSafe(|| f(v))) {
                    Ok(mapped) => o_shared.lock().unwrap().next(mapped),
                    Err(payload) => o_shared
                        .lock()
                        .unwrap()
                        .error(Arc::new(PipelineError::callback_panic("map", payload))),
                },
                move |e| {
                    o_cloned_e.lock().unwrap().error(e);
                },
                move || {
                    o_cloned_c.lock().unwrap().complete();
                },
            );
            u.set_disposable(disposable);
            self.subscribe(u);
        })
    }

    /// Filters the items emitted by the observable based on a predicate
    /// function.
    ///
    /// Only items for which the predicate returns `true` are forwarded. A
    /// panicking predicate is converted into a single downstream `error`, the
    /// same way `map` handles it. Upstream `error` and `complete` pass
    /// through unchanged.
    pub fn filter<P>(self, predicate: P) -> Observable<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);

        Observable::new(move |o: Subscriber<T>| {
            let predicate = Arc::clone(&predicate);
            let disposable = o.disposable();
            let o_shared = Arc::new(Mutex::new(o));
            let o_cloned_e = Arc::clone(&o_shared);
            let o_cloned_c = Arc::clone(&o_shared);

            let mut u = Subscriber::new(
                move |v| match catch_unwind(AssertUnwindSafe(|| predicate(&v))) {
                    Ok(true) => o_shared.lock().unwrap().next(v),
                    Ok(false) => (),
                    Err(payload) => o_shared
                        .lock()
                        .unwrap()
                        .error(Arc::new(PipelineError::callback_panic("filter", payload))),
                },
                move |e| {
                    o_cloned_e.lock().unwrap().error(e);
                },
                move || {
                    o_cloned_c.lock().unwrap().complete();
                },
            );
            u.set_disposable(disposable);
            self.subscribe(u);
        })
    }

    /// Projects each item to an inner observable and merges all inner
    /// emissions into a single stream.
    ///
    /// Inner streams are subscribed as their triggering items arrive and run
    /// concurrently; their emissions interleave with no ordering guarantee
    /// across inner streams, although each inner stream's own order is
    /// preserved. Downstream completes only after the outer stream and every
    /// inner stream have completed, tracked by an atomic active-subscription
    /// counter that starts at 1 for the outer source and is incremented
    /// before each inner subscription.
    ///
    /// Any `error` (outer, inner, or a panicking projection) goes downstream
    /// immediately; in-flight sibling inner streams are left to drain, and
    /// their late events are discarded by the terminal-state guard.
    pub fn flat_map<R, F>(self, project: F) -> Observable<R>
    where
        F: Fn(T) -> Observable<R> + Send + Sync + 'static,
        R: 'static,
    {
        let project = Arc::new(project);

        Observable::new(move |o: Subscriber<R>| {
            let project = Arc::clone(&project);
            let disposable = o.disposable();
            let disposable_inner = disposable.clone();
            let o_shared = Arc::new(Mutex::new(o));
            let o_cloned_e = Arc::clone(&o_shared);
            let o_cloned_c = Arc::clone(&o_shared);

            // Starts at 1: the outer source itself counts as active until it
            // completes. Prevents a premature downstream complete when the
            // outer finishes before its inner streams do.
            let active = Arc::new(AtomicUsize::new(1));
            let active_outer = Arc::clone(&active);

            let mut u = Subscriber::new(
                move |v| {
                    let o_shared = Arc::clone(&o_shared);
                    let o_inner_e = Arc::clone(&o_shared);
                    let o_inner_c = Arc::clone(&o_shared);
                    let active = Arc::clone(&active);

                    // Increment before subscribing, so overlapping in-flight
                    // inner streams are accounted for regardless of
                    // completion order.
                    active.fetch_add(1, Ordering::SeqCst);

                    let inner = match catch_unwind(AssertUnwindSafe(|| project(v))) {
                        Ok(inner) => inner,
                        Err(payload) => {
                            o_shared
                                .lock()
                                .unwrap()
                                .error(Arc::new(PipelineError::callback_panic("flat_map", payload)));
                            return;
                        }
                    };

                    let mut inner_subscriber = Subscriber::new(
                        move |k| {
                            o_shared.lock().unwrap().next(k);
                        },
                        move |e| {
                            o_inner_e.lock().unwrap().error(e);
                        },
                        move || {
                            // Decrement-and-check must be one atomic step;
                            // two inner streams finishing simultaneously on
                            // different threads race on the zero check
                            // otherwise.
                            if active.fetch_sub(1, Ordering::SeqCst) == 1 {
                                o_inner_c.lock().unwrap().complete();
                            }
                        },
                    );
                    inner_subscriber.set_disposable(disposable_inner.clone());
                    inner.subscribe(inner_subscriber);
                },
                move |e| {
                    o_cloned_e.lock().unwrap().error(e);
                },
                move || {
                    // The outer source finished: release its slot. Reaches
                    // zero here only when all inner streams already finished.
                    if active_outer.fetch_sub(1, Ordering::SeqCst) == 1 {
                        o_cloned_c.lock().unwrap().complete();
                    }
                },
            );
            u.set_disposable(disposable);
            self.subscribe(u);
        })
    }

    /// Moves the *act of subscribing*, and with it production, onto
    /// `scheduler`.
    ///
    /// The entire upstream subscription call is submitted as one task, so
    /// `subscribe` returns as soon as the task is queued, before production
    /// necessarily started, let alone completed.
    pub fn subscribe_on<S>(self, scheduler: S) -> Observable<T>
    where
        S: Scheduler + Send + Sync + 'static,
        T: Send,
    {
        let source = Arc::new(self);
        let scheduler = Arc::new(scheduler);

        Observable::new(move |subscriber: Subscriber<T>| {
            let source = Arc::clone(&source);

            scheduler.execute(Box::new(move || {
                source.subscribe(subscriber);
            }));
        })
    }

    /// Moves event *delivery* onto `scheduler`.
    ///
    /// Each `next`, `error`, and `complete` is submitted as a separate task,
    /// individually, as it arrives from upstream. Event order is preserved
    /// only if the scheduler preserves FIFO submission order, as
    /// [`SingleThreadScheduler`] does; pool-backed schedulers may deliver out
    /// of order.
    ///
    /// [`SingleThreadScheduler`]: crate::SingleThreadScheduler
    pub fn observe_on<S>(self, scheduler: S) -> Observable<T>
    where
        S: Scheduler + Send + Sync + 'static,
        T: Send,
    {
        let scheduler = Arc::new(scheduler);

        Observable::new(move |o: Subscriber<T>| {
            let scheduler_n = Arc::clone(&scheduler);
            let scheduler_e = Arc::clone(&scheduler);
            let scheduler_c = Arc::clone(&scheduler);
            let disposable = o.disposable();
            let o_shared = Arc::new(Mutex::new(o));
            let o_cloned_e = Arc::clone(&o_shared);
            let o_cloned_c = Arc::clone(&o_shared);

            let mut u = Subscriber::new(
                move |v| {
                    let o_shared = Arc::clone(&o_shared);
                    scheduler_n.execute(Box::new(move || {
                        o_shared.lock().unwrap().next(v);
                    }));
                },
                move |e| {
                    let o_cloned_e = Arc::clone(&o_cloned_e);
                    scheduler_e.execute(Box::new(move || {
                        o_cloned_e.lock().unwrap().error(e);
                    }));
                },
                move || {
                    let o_cloned_c = Arc::clone(&o_cloned_c);
                    scheduler_c.execute(Box::new(move || {
                        o_cloned_c.lock().unwrap().complete();
                    }));
                },
            );
            u.set_disposable(disposable);
            self.subscribe(u);
        })
    }
}

impl<T: 'static> Subscribeable for Observable<T> {
    type ObsType = T;

    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Disposable {
        let disposable = s.disposable();
        (self.subscribe_fn)(s);
        disposable
    }
}
