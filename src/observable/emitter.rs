use std::{error::Error, sync::Arc};

use crate::{observer::Observer, subscription::subscribe::Subscriber};

/// Producer-facing handle given to a [`create`] callback.
///
/// An `Emitter` carries the same capability set as an [`Observer`]: call
/// `next` any number of times, then at most one of `error` or `complete`.
/// The terminal-event contract is enforced by the wrapped subscriber, so a
/// misbehaving producer that signals `complete` after `error` (or keeps
/// emitting past a terminal event) has its late calls discarded.
///
/// One emitter exists per subscription. Long-running producers should poll
/// [`is_disposed`] between emissions and stop once the consumer has
/// cancelled.
///
/// [`create`]: crate::Observable::create
/// [`is_disposed`]: Emitter::is_disposed
pub struct Emitter<T> {
    subscriber: Subscriber<T>,
}

impl<T> Emitter<T> {
    pub(crate) fn new(subscriber: Subscriber<T>) -> Self {
        Emitter { subscriber }
    }

    /// Returns `true` once the subscription this emitter feeds has been
    /// cancelled. Producers should treat this as a stop signal.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.subscriber.disposable().is_disposed()
    }
}

impl<T> Observer for Emitter<T> {
    type NextFnType = T;

    fn next(&mut self, v: Self::NextFnType) {
        self.subscriber.next(v);
    }

    fn error(&mut self, e: Arc<dyn Error + Send + Sync>) {
        self.subscriber.error(e);
    }

    fn complete(&mut self) {
        self.subscriber.complete();
    }
}
