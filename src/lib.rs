//! `rxo` is a push-based reactive-stream library: composable pipelines in
//! which a producer emits values over time to a consumer, operators transform
//! the stream in between, and schedulers relocate where producer and consumer
//! code run.
//!
//! The building blocks:
//!
//! - [`Observable`] is an immutable, re-subscribable description of a
//!   pipeline. Cold: every subscription re-runs production from scratch.
//! - [`Observer`] is the sink capability (`next` / `error` / `complete`),
//!   implemented by the consumer-side [`Subscriber`](subscribe::Subscriber)
//!   and the producer-side [`Emitter`].
//! - Operators: [`map`], [`filter`] and [`flat_map`] transform the stream;
//!   [`subscribe_on`] and [`observe_on`] move production and delivery onto a
//!   [`Scheduler`].
//! - [`Disposable`](subscribe::Disposable) is the handle returned by
//!   [`subscribe`], carrying the subscription's cooperative cancellation
//!   flag.
//!
//! # Example
//!
//! ```no_run
//! use rxo::subscribe::Subscriber;
//! use rxo::{IoThreadScheduler, Observable, SingleThreadScheduler, Subscribeable};
//!
//! let observer = Subscriber::new(
//!     |v| println!("Received {}", v),
//!     |e| eprintln!("Error: {}", e),
//!     || println!("Done"),
//! );
//!
//! Observable::just(["Orange", "Strawberry", "Fig", "Watermelon"])
//!     .subscribe_on(IoThreadScheduler::new())
//!     .filter(|fruit| fruit.len() > 5)
//!     .map(str::to_uppercase)
//!     .observe_on(SingleThreadScheduler::new())
//!     .subscribe(observer);
//! ```
//!
//! [`map`]: Observable::map
//! [`filter`]: Observable::filter
//! [`flat_map`]: Observable::flat_map
//! [`subscribe_on`]: Observable::subscribe_on
//! [`observe_on`]: Observable::observe_on
//! [`subscribe`]: Subscribeable::subscribe

mod errors;
mod observable;
mod observer;
mod scheduler;
mod subscription;

pub use errors::PipelineError;
pub use observable::{Emitter, Observable};
pub use observer::Observer;
pub use scheduler::{
    ComputationScheduler, IoThreadScheduler, Scheduler, SingleThreadScheduler, Task,
};
pub use subscription::subscribe::Subscribeable;

/// Subscription-side types: the [`Subscriber`] sink and the [`Disposable`]
/// cancellation handle.
///
/// [`Subscriber`]: subscribe::Subscriber
/// [`Disposable`]: subscribe::Disposable
pub mod subscribe {
    pub use crate::subscription::subscribe::{Disposable, Subscribeable, Subscriber};
}
