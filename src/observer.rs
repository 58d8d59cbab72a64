use std::{error::Error, sync::Arc};

/// Consumer-side sink capability of a reactive pipeline.
///
/// Values arrive through `next`, after which the stream ends with at most one
/// terminal event: either `error` or `complete`. Both the consumer-facing
/// [`Subscriber`] and the producer-facing [`Emitter`] implement this trait;
/// the two roles share an identical capability set.
///
/// [`Subscriber`]: crate::subscribe::Subscriber
/// [`Emitter`]: crate::Emitter
pub trait Observer {
    /// The type of items this observer accepts.
    type NextFnType;

    /// Delivers the next item in the stream.
    fn next(&mut self, _: Self::NextFnType);

    /// Signals that the stream failed. Terminal; nothing may follow it.
    fn error(&mut self, _: Arc<dyn Error + Send + Sync>);

    /// Signals that the stream finished successfully. Terminal; nothing may
    /// follow it.
    fn complete(&mut self);
}
