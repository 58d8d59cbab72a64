//! Execution contexts for relocating pipeline work off the calling thread.
//!
//! A [`Scheduler`] accepts fire-and-forget tasks; the thread-relocation
//! operators [`subscribe_on`] and [`observe_on`] accept any implementation.
//! Three reference backends are provided: a strict-FIFO single worker, a
//! fixed-size pool sized to the machine, and a thread-per-task spawner.
//!
//! [`subscribe_on`]: crate::Observable::subscribe_on
//! [`observe_on`]: crate::Observable::observe_on

use std::thread;

use tokio::{runtime, sync::mpsc};

/// A unit of work submitted to a [`Scheduler`].
pub type Task = Box<dyn FnOnce() + Send>;

/// An execution-context abstraction: accepts a unit of work and guarantees it
/// eventually runs, exactly once, possibly on a different thread than the
/// caller.
///
/// `execute` is fire-and-forget; there is no result channel and no handle to
/// the submitted task. The guarantee holds for as long as the scheduler
/// instance is alive: tasks still queued when a backend is dropped are
/// discarded.
pub trait Scheduler {
    /// Submits `task` for execution.
    fn execute(&self, task: Task);
}

/// A scheduler backed by one dedicated worker thread.
///
/// Tasks run in strict submission order, which makes this the backend of
/// choice for [`observe_on`] when event order must be preserved.
///
/// [`observe_on`]: crate::Observable::observe_on
pub struct SingleThreadScheduler {
    sender: mpsc::UnboundedSender<Task>,
}

impl SingleThreadScheduler {
    /// Spawns the worker thread. The worker exits once the scheduler is
    /// dropped and its queue has drained.
    #[must_use]
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();

        thread::spawn(move || {
            while let Some(task) = receiver.blocking_recv() {
                task();
            }
        });

        SingleThreadScheduler { sender }
    }
}

impl Default for SingleThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SingleThreadScheduler {
    fn execute(&self, task: Task) {
        // Fails only if the worker is gone, i.e. the scheduler was dropped.
        let _ = self.sender.send(task);
    }
}

/// A scheduler backed by a fixed-size thread pool sized to the available
/// parallelism of the machine.
///
/// Tasks may run on any pool thread; no ordering between tasks is guaranteed,
/// only per-task eventual execution.
pub struct ComputationScheduler {
    runtime: runtime::Runtime,
}

impl ComputationScheduler {
    /// Builds the pool. Falls back to a single worker when the parallelism of
    /// the machine cannot be queried.
    ///
    /// # Panics
    ///
    /// Panics if the underlying runtime cannot be started. Scheduler
    /// construction failure is unrecoverable for the pipeline.
    #[must_use]
    pub fn new() -> Self {
        let workers = thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);

        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("rxo-computation")
            .build()
            .expect("failed to start computation scheduler runtime");

        ComputationScheduler { runtime }
    }
}

impl Default for ComputationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ComputationScheduler {
    fn execute(&self, task: Task) {
        self.runtime.spawn(async move { task() });
    }
}

/// A scheduler that spawns one new OS thread per submitted task.
///
/// Unbounded: every submission gets its own thread, so long-blocking tasks
/// never starve each other. No ordering between tasks is guaranteed.
pub struct IoThreadScheduler;

impl IoThreadScheduler {
    #[must_use]
    pub fn new() -> Self {
        IoThreadScheduler
    }
}

impl Default for IoThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for IoThreadScheduler {
    fn execute(&self, task: Task) {
        thread::spawn(task);
    }
}
