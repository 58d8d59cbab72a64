use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc,
    },
};

use crate::observer::Observer;

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values emitted by an observable stream.
pub trait Subscribeable {
    /// The type of items emitted by the observable stream.
    type ObsType;

    /// Subscribes to the observable stream and specifies how to handle emitted
    /// values.
    ///
    /// Each call is an independent execution of the pipeline: implementations
    /// must not share mutable state between invocations, so the same source
    /// can be subscribed concurrently from unrelated callers.
    ///
    /// The returned [`Disposable`] is bound to this one invocation and carries
    /// the subscription's cancellation flag.
    fn subscribe(&self, s: Subscriber<Self::ObsType>) -> Disposable;
}

/// A handle representing one subscription's cancellation intent and status.
///
/// `dispose` sets a shared flag that the whole observer chain of that
/// subscription consults: delivery stops at every operator boundary, and
/// cooperative producers (such as [`Observable::just`]) check the flag
/// between emissions and stop producing. Disposal is best-effort for
/// in-flight events and never set by the pipeline itself, so completing
/// normally leaves the handle undisposed.
///
/// Cloning a `Disposable` clones the handle, not the subscription: all clones
/// observe and control the same flag.
///
/// [`Observable::just`]: crate::Observable::just
#[derive(Debug, Clone, Default)]
pub struct Disposable {
    disposed: Arc<AtomicBool>,
}

impl Disposable {
    /// Creates a handle with the flag unset.
    #[must_use]
    pub fn new() -> Self {
        Disposable {
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cancellation of the subscription this handle is bound to.
    /// Idempotent.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once `dispose` has been called on any clone of this
    /// handle.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

// Terminal states of one subscription. A Subscriber starts ACTIVE and moves
// to exactly one of the other two, at most once.
const ACTIVE: u8 = 0;
const COMPLETED: u8 = 1;
const ERRORED: u8 = 2;

type NextFn<T> = Box<dyn FnMut(T) + Send>;
type CompleteFn = Box<dyn FnMut() + Send + Sync>;
type ErrorFn = Box<dyn FnMut(Arc<dyn Error + Send + Sync>) + Send + Sync>;

/// A type that acts as an observer, allowing users to handle emitted values,
/// errors, and completion when subscribing to an [`Observable`].
///
/// Beyond invoking the user-provided handlers, a `Subscriber` enforces the
/// terminal-event contract: once `error` or `complete` has been delivered,
/// every later call is discarded, no matter which thread makes it. The
/// winner of the terminal slot is decided by an atomic compare-and-swap, so
/// the guarantee holds under concurrent delivery (e.g. from `flat_map` inner
/// streams or `observe_on` tasks).
///
/// [`Observable`]: crate::Observable
pub struct Subscriber<NextFnType> {
    next_fn: NextFn<NextFnType>,
    complete_fn: Option<CompleteFn>,
    error_fn: Option<ErrorFn>,
    state: AtomicU8,
    disposable: Disposable,
}

impl<NextFnType> Subscriber<NextFnType> {
    /// Creates a new `Subscriber` instance with custom handling functions for
    /// emitted values, errors, and completion.
    pub fn new(
        next_fn: impl FnMut(NextFnType) + 'static + Send,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) + 'static + Send + Sync,
        complete_fn: impl FnMut() + 'static + Send + Sync,
    ) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: Some(Box::new(complete_fn)),
            error_fn: Some(Box::new(error_fn)),
            state: AtomicU8::new(ACTIVE),
            disposable: Disposable::new(),
        }
    }

    /// Create a new Subscriber with the provided `next` function only.
    ///
    /// The `next` closure is called when the observable emits a new item.
    /// Terminal events are still tracked but invoke no handler until one is
    /// set with [`on_error`] or [`on_complete`].
    ///
    /// [`on_error`]: Subscriber::on_error
    /// [`on_complete`]: Subscriber::on_complete
    pub fn on_next(next_fn: impl FnMut(NextFnType) + 'static + Send) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            complete_fn: None,
            error_fn: None,
            state: AtomicU8::new(ACTIVE),
            disposable: Disposable::new(),
        }
    }

    /// Set the completion function for the Subscriber.
    pub fn on_complete(&mut self, complete_fn: impl FnMut() + 'static + Send + Sync) {
        self.complete_fn = Some(Box::new(complete_fn));
    }

    /// Set the error-handling function for the Subscriber.
    pub fn on_error(
        &mut self,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) + 'static + Send + Sync,
    ) {
        self.error_fn = Some(Box::new(error_fn));
    }

    /// Returns a handle to this subscription's cancellation flag.
    #[must_use]
    pub fn disposable(&self) -> Disposable {
        self.disposable.clone()
    }

    /// Replaces this subscriber's cancellation flag with `d`.
    ///
    /// Operators use this to make every subscriber in one chain share the
    /// flag of the downstream subscriber, so disposing the handle returned
    /// from `subscribe` cuts off the whole chain. Custom operators built on
    /// [`Observable::new`] should do the same before subscribing upstream.
    ///
    /// [`Observable::new`]: crate::Observable::new
    pub fn set_disposable(&mut self, d: Disposable) {
        self.disposable = d;
    }

    // Claims the terminal slot for `target`. Returns false if another
    // terminal event already won it.
    fn enter_terminal_state(&self, target: u8) -> bool {
        self.state
            .compare_exchange(ACTIVE, target, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl<T> Observer for Subscriber<T> {
    type NextFnType = T;

    fn next(&mut self, v: Self::NextFnType) {
        if self.disposable.is_disposed() || self.state.load(Ordering::SeqCst) != ACTIVE {
            return;
        }
        (self.next_fn)(v);
    }

    fn error(&mut self, e: Arc<dyn Error + Send + Sync>) {
        if self.disposable.is_disposed() || !self.enter_terminal_state(ERRORED) {
            return;
        }
        if let Some(efn) = &mut self.error_fn {
            (efn)(e);
        }
    }

    fn complete(&mut self) {
        if self.disposable.is_disposed() || !self.enter_terminal_state(COMPLETED) {
            return;
        }
        if let Some(cfn) = &mut self.complete_fn {
            (cfn)();
        }
    }
}
